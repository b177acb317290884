use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter names every meander run must define.
pub const REQUIRED_PARAMETERS: [&str; 8] = [
    "x_patch1",
    "l_patch",
    "w_meander",
    "w_meander_gap",
    "w_chamfer_patch",
    "ts",
    "tp",
    "y_patch1",
];

/// Named real-valued design variables.
///
/// Owned by the caller and read-only for the duration of a generation run.
/// Serializes as a flat JSON object `{ "name": value, ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet {
    values: BTreeMap<String, f64>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Names from [`REQUIRED_PARAMETERS`] that this set does not define.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_PARAMETERS
            .iter()
            .copied()
            .filter(|name| !self.contains(name))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
