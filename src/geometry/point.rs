use std::ops::{Add, Mul, Neg, Sub};

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::geometry::Axis;

/// Fixed-point coordinate in database units.
pub type Coord = i64;

/// Divides `value` by a positive `pitch`, rounding half away from the lower
/// neighbor.
pub fn div_round(value: Coord, pitch: Coord) -> Coord {
    let quotient = value.div_euclid(pitch);
    let remainder = value.rem_euclid(pitch);

    if 2 * remainder >= pitch {
        quotient + 1
    } else {
        quotient
    }
}

/// Rounds `value` to the nearest multiple of `pitch`.
pub fn snap_to_pitch(value: Coord, pitch: Coord) -> Coord {
    div_round(value, pitch) * pitch
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPoint {
    pub x: Coord,
    pub y: Coord,
}

impl GridPoint {
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Snaps a point given in user units onto the database grid.
    pub fn snap(point: Point, resolution: f64) -> Self {
        Self {
            x: (point.x() / resolution).round() as Coord,
            y: (point.y() / resolution).round() as Coord,
        }
    }

    pub fn to_real(self, resolution: f64) -> Point {
        Point::new(self.x as f64 * resolution, self.y as f64 * resolution)
    }

    pub fn coord(&self, axis: Axis) -> Coord {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn with_coord(mut self, axis: Axis, value: Coord) -> Self {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
        self
    }

    pub fn manhattan_distance(&self, other: &GridPoint) -> Coord {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn snap_to_pitch(self, pitch: Coord) -> Self {
        Self::new(snap_to_pitch(self.x, pitch), snap_to_pitch(self.y, pitch))
    }
}

impl From<(Coord, Coord)> for GridPoint {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self::new(x, y)
    }
}

impl Add for GridPoint {
    type Output = GridPoint;

    fn add(self, rhs: GridPoint) -> GridPoint {
        GridPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridPoint {
    type Output = GridPoint;

    fn sub(self, rhs: GridPoint) -> GridPoint {
        GridPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<Coord> for GridPoint {
    type Output = GridPoint;

    fn mul(self, rhs: Coord) -> GridPoint {
        GridPoint::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for GridPoint {
    type Output = GridPoint;

    fn neg(self) -> GridPoint {
        GridPoint::new(-self.x, -self.y)
    }
}
