use serde::{Deserialize, Serialize};

/// Placement of a participant in the spatial audio scene. Bounds are owned by
/// the conferencing service.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct SpatialPosition {
    pub angle: f64,
    pub distance: f64,
}

impl SpatialPosition {
    pub fn new(angle: f64, distance: f64) -> Self {
        Self { angle, distance }
    }
}
