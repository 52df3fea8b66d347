//! Evenly spaced reference lines used to snap coordinates onto a routing
//! grid.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{div_round, Axis, Coord},
    technology::{AccessTechnology, PreferredDirection},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error("track {0:?} already exists")]
    Duplicate(String),
    #[error("track {0:?} does not exist")]
    NotFound(String),
}

/// Positions along `axis` at `origin + n * pitch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub axis: Axis,
    pub pitch: Coord,
    pub origin: Coord,
}

impl Track {
    pub fn new(axis: Axis, pitch: Coord, origin: Coord) -> Self {
        Self {
            axis,
            pitch,
            origin,
        }
    }

    pub fn coord(&self, index: i64) -> Coord {
        self.origin + index * self.pitch
    }

    /// Index of the closest line.
    pub fn nearest(&self, coord: Coord) -> i64 {
        div_round(coord - self.origin, self.pitch)
    }

    pub fn snap(&self, coord: Coord) -> Coord {
        self.coord(self.nearest(coord))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrackManager {
    tracks: HashMap<String, Track>,
}

impl TrackManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// One track per layer and routing direction, named `<layer>.<axis>`,
    /// holding the positions of parallel wires at the layer spacing.
    pub fn from_technology(technology: &impl AccessTechnology) -> Self {
        let mut tracks = HashMap::new();

        for layer in 0..technology.layer_count() {
            let Some(rules) = technology.layer(layer) else {
                continue;
            };

            for axis in [Axis::X, Axis::Y] {
                let routable = match axis {
                    Axis::X => rules.direction != PreferredDirection::Y,
                    Axis::Y => rules.direction != PreferredDirection::X,
                };

                if routable {
                    tracks.insert(
                        format!("{}.{}", rules.name, axis),
                        Track::new(axis.other(), rules.spacing, 0),
                    );
                }
            }
        }

        Self { tracks }
    }

    pub fn add_track(&mut self, name: impl Into<String>, track: Track) -> Result<(), TrackError> {
        let name = name.into();

        if self.tracks.contains_key(&name) {
            return Err(TrackError::Duplicate(name));
        }

        self.tracks.insert(name, track);
        Ok(())
    }

    pub fn track(&self, name: &str) -> Result<&Track, TrackError> {
        self.tracks
            .get(name)
            .ok_or_else(|| TrackError::NotFound(name.to_string()))
    }

    pub fn coord(&self, name: &str, index: i64) -> Result<Coord, TrackError> {
        Ok(self.track(name)?.coord(index))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
