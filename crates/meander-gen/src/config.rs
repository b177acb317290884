use serde::{Deserialize, Serialize};

use meander_types::{Expression, ParameterSet};

use crate::error::ConfigError;

/// Segment name prefix used when a config does not set one.
pub const DEFAULT_NAME_PREFIX: &str = "meander_LU2_";

/// Everything one generation run needs besides the kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of segments to emit.
    #[serde(default = "default_turns")]
    pub turns: u32,
    /// Kernel namespace the segments are created under.
    #[serde(default = "default_component")]
    pub component: String,
    #[serde(default = "default_material")]
    pub material: String,
    /// Segment `i` is named `<name_prefix><i>`.
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
    /// Chamfer distance, passed to the kernel unevaluated.
    #[serde(default = "default_chamfer_value")]
    pub chamfer_value: Expression,
    #[serde(default = "default_chamfer_angle")]
    pub chamfer_angle_deg: f64,
    pub parameters: ParameterSet,
}

fn default_turns() -> u32 {
    3
}

fn default_component() -> String {
    "Meander".to_string()
}

fn default_material() -> String {
    "copper".to_string()
}

fn default_name_prefix() -> String {
    DEFAULT_NAME_PREFIX.to_string()
}

fn default_chamfer_value() -> Expression {
    Expression::new("w_meander_gap")
}

fn default_chamfer_angle() -> f64 {
    45.0
}

impl GeneratorConfig {
    /// Defaults for everything except the design parameters.
    pub fn new(parameters: ParameterSet) -> Self {
        Self {
            turns: default_turns(),
            component: default_component(),
            material: default_material(),
            name_prefix: default_name_prefix(),
            chamfer_value: default_chamfer_value(),
            chamfer_angle_deg: default_chamfer_angle(),
            parameters,
        }
    }

    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = turns;
        self
    }

    pub fn segment_name(&self, index: u32) -> String {
        format!("{}{}", self.name_prefix, index)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turns == 0 {
            return Err(ConfigError::InvalidTurns);
        }

        let missing = self.parameters.missing_required();
        if !missing.is_empty() {
            return Err(ConfigError::MissingParameters(
                missing.into_iter().map(String::from).collect(),
            ));
        }

        if !(self.chamfer_angle_deg > 0.0 && self.chamfer_angle_deg < 90.0) {
            return Err(ConfigError::InvalidChamferAngle(self.chamfer_angle_deg));
        }

        if self.chamfer_value.as_str().trim().is_empty() {
            return Err(ConfigError::EmptyChamferValue);
        }

        // The kernel resolves the value later, against the same parameter set.
        let value = expr_resolver::parse(self.chamfer_value.as_str())
            .map_err(|e| ConfigError::InvalidChamferValue(e.to_string()))?;
        let unknown: Vec<&str> = value
            .parameters()
            .into_iter()
            .filter(|name| !self.parameters.contains(name))
            .collect();
        if !unknown.is_empty() {
            return Err(ConfigError::InvalidChamferValue(format!(
                "unknown parameters: {}",
                unknown.join(", ")
            )));
        }

        Ok(())
    }
}

/// Parse and validate a JSON generator configuration.
pub fn load_config(json: &str) -> Result<GeneratorConfig, ConfigError> {
    let config: GeneratorConfig =
        serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_filled_in() {
        let json = r#"{
            "parameters": {
                "x_patch1": 0, "l_patch": 10, "y_patch1": 0, "w_meander": 1,
                "w_meander_gap": 0.5, "w_chamfer_patch": 0.2, "ts": 0, "tp": 1
            }
        }"#;
        let config = load_config(json).unwrap();
        assert_eq!(config.turns, 3);
        assert_eq!(config.component, "Meander");
        assert_eq!(config.chamfer_value.as_str(), "w_meander_gap");
        assert_eq!(config.chamfer_angle_deg, 45.0);
        assert_eq!(config.segment_name(2), "meander_LU2_2");
    }

    #[test]
    fn test_missing_parameters_reported() {
        let json = r#"{ "parameters": { "x_patch1": 0, "l_patch": 10 } }"#;
        match load_config(json) {
            Err(ConfigError::MissingParameters(names)) => {
                assert_eq!(names.len(), 6);
                assert!(names.contains(&"w_meander".to_string()));
            }
            other => panic!("expected MissingParameters, got {:?}", other),
        }
    }

    #[test]
    fn test_default_prefix_matches_config() {
        let config = GeneratorConfig::new(ParameterSet::new());
        assert_eq!(config.name_prefix, DEFAULT_NAME_PREFIX);
        assert_eq!(config.segment_name(1), format!("{}1", DEFAULT_NAME_PREFIX));
    }

    #[test]
    fn test_chamfer_value_checked_against_parameters() {
        let json = r#"{
            "chamfer_value": "w_meander_gap + w_slot",
            "parameters": {
                "x_patch1": 0, "l_patch": 10, "y_patch1": 0, "w_meander": 1,
                "w_meander_gap": 0.5, "w_chamfer_patch": 0.2, "ts": 0, "tp": 1
            }
        }"#;
        match load_config(json) {
            Err(ConfigError::InvalidChamferValue(msg)) => assert!(msg.contains("w_slot")),
            other => panic!("expected InvalidChamferValue, got {:?}", other),
        }
    }

    #[test]
    fn test_unparsable_chamfer_value() {
        let mut config = load_config(
            r#"{ "parameters": {
                "x_patch1": 0, "l_patch": 10, "y_patch1": 0, "w_meander": 1,
                "w_meander_gap": 0.5, "w_chamfer_patch": 0.2, "ts": 0, "tp": 1
            } }"#,
        )
        .unwrap();
        config.chamfer_value = Expression::new("w_meander_gap *");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidChamferValue(_))
        ));

        config.chamfer_value = Expression::new("w_meander_gap / 2");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            load_config("{ turns: 3 }"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
