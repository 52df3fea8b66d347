use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Coord, Direction, GridPoint, Rect},
    route::EnclosurePolicy,
};

/// Where a routed command starts, with the layer given by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPoint {
    pub position: GridPoint,
    pub direction: Direction,
    pub layer: String,
    #[serde(default)]
    pub width: Option<Coord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedWaypoint {
    pub position: GridPoint,
    pub layer: String,
    #[serde(default)]
    pub width: Option<Coord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedObstruction {
    pub rect: Rect,
    pub layer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViaOptions {
    #[serde(default)]
    pub enclosure: EnclosurePolicy,
    #[serde(default)]
    pub primitive_vias: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Route {
        start: StartPoint,
        waypoints: Vec<NamedWaypoint>,
        #[serde(default)]
        vias: ViaOptions,
    },
    Shielded {
        start: StartPoint,
        waypoints: Vec<NamedWaypoint>,
        spacing: Coord,
        stitch_pitch: Coord,
        #[serde(default)]
        stitch_width: Option<Coord>,
        #[serde(default)]
        shield_layers: Vec<String>,
        #[serde(default)]
        vias: ViaOptions,
    },
    DifferentialPair {
        start: StartPoint,
        waypoints: Vec<NamedWaypoint>,
        spacing: Coord,
        #[serde(default)]
        vias: ViaOptions,
    },
    Bus {
        start: StartPoint,
        waypoints: Vec<NamedWaypoint>,
        size: usize,
        spacing: Coord,
        #[serde(default)]
        vias: ViaOptions,
    },
    GridSearch {
        start: GridPoint,
        end: GridPoint,
        start_layer: String,
        end_layer: String,
        layers: Vec<String>,
        #[serde(default)]
        obstructions: Vec<NamedObstruction>,
        #[serde(default)]
        bounds: Option<Rect>,
    },
    VisibilitySearch {
        start: GridPoint,
        end: GridPoint,
        layer: String,
        #[serde(default)]
        width: Option<Coord>,
        #[serde(default)]
        obstructions: Vec<NamedObstruction>,
    },
}
