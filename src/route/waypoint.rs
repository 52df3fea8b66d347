use serde::{Deserialize, Serialize};

use crate::geometry::{Coord, GridPoint};

/// A point the route must pass through, with the layer the route continues
/// on from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Waypoint {
    pub position: GridPoint,
    pub layer: usize,
    /// Width of the wire arriving here, the current width when unset.
    #[serde(default)]
    pub width: Option<Coord>,
}

impl Waypoint {
    pub fn new(position: GridPoint, layer: usize, width: Option<Coord>) -> Self {
        Self {
            position,
            layer,
            width,
        }
    }

    pub fn translated(&self, offset: GridPoint) -> Self {
        Self {
            position: self.position + offset,
            ..*self
        }
    }
}

/// Whether consecutive points differ in at most one axis.
pub fn is_manhattan(points: &[Waypoint]) -> bool {
    points
        .windows(2)
        .all(|pair| pair[0].position.x == pair[1].position.x || pair[0].position.y == pair[1].position.y)
}
