use serde::{Deserialize, Serialize};

/// Entity ids returned by the kernel's coordinate pickers.
///
/// Ids are raw kernel integers: anything non-positive means the picker found
/// nothing at the sampled coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickResult {
    pub edge_id: i64,
    pub vertex_id: i64,
    pub face_id: i64,
}

impl PickResult {
    /// All three ids must be strictly positive before a chamfer may be issued.
    pub fn is_valid(&self) -> bool {
        self.edge_id > 0 && self.vertex_id > 0 && self.face_id > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_validity_requires_all_positive() {
        let ok = PickResult {
            edge_id: 3,
            vertex_id: 1,
            face_id: 12,
        };
        assert!(ok.is_valid());

        let zero_face = PickResult { face_id: 0, ..ok };
        assert!(!zero_face.is_valid());

        let missing_edge = PickResult { edge_id: -1, ..ok };
        assert!(!missing_edge.is_valid());
    }
}
