use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Coord};

/// Directions a layer may be routed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferredDirection {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "xy")]
    Both,
}

impl PreferredDirection {
    pub fn allows(self, axis: Axis) -> bool {
        match self {
            PreferredDirection::X => axis == Axis::X,
            PreferredDirection::Y => axis == Axis::Y,
            PreferredDirection::Both => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRules {
    pub name: String,
    /// Routing grid pitch.
    pub spacing: Coord,
    /// Default wire width.
    pub width: Coord,
    pub direction: PreferredDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AsymmetricEnclosure {
    /// Extension along the wire.
    pub large: Coord,
    /// Extension across the wire.
    pub small: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViaArray {
    pub columns: u32,
    pub rows: u32,
}

impl ViaArray {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }
}

impl Default for ViaArray {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// A cut connecting `bottom` to the higher layer `top`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViaRules {
    pub name: String,
    pub bottom: String,
    pub top: String,
    pub cut_size: Coord,
    pub cut_pitch: Coord,
    pub uniform_enclosure: Coord,
    pub asymmetric_enclosure: AsymmetricEnclosure,
    #[serde(default)]
    pub default_array: ViaArray,
}
