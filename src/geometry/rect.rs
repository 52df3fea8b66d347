use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Axis, Coord, GridPoint};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid handle {0:?}")]
pub struct InvalidHandleError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0:?} and {1:?} do not overlap")]
pub struct OverlapRequiredError(pub Rect, pub Rect);

/// Position of a handle along one axis of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Low,
    Center,
    High,
}

/// Named anchor on a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    #[serde(rename = "ll")]
    LowerLeft,
    #[serde(rename = "lr")]
    LowerRight,
    #[serde(rename = "ul")]
    UpperLeft,
    #[serde(rename = "ur")]
    UpperRight,
    #[serde(rename = "l")]
    Left,
    #[serde(rename = "r")]
    Right,
    #[serde(rename = "b")]
    Bottom,
    #[serde(rename = "t")]
    Top,
    #[serde(rename = "cl")]
    CenterLeft,
    #[serde(rename = "cr")]
    CenterRight,
    #[serde(rename = "cb")]
    CenterBottom,
    #[serde(rename = "ct")]
    CenterTop,
    #[serde(rename = "c")]
    Center,
}

impl Handle {
    /// Horizontal and vertical components. Edge handles only constrain one
    /// axis.
    pub fn sides(self) -> (Option<Side>, Option<Side>) {
        use Side::*;

        match self {
            Handle::LowerLeft => (Some(Low), Some(Low)),
            Handle::LowerRight => (Some(High), Some(Low)),
            Handle::UpperLeft => (Some(Low), Some(High)),
            Handle::UpperRight => (Some(High), Some(High)),
            Handle::Left => (Some(Low), None),
            Handle::Right => (Some(High), None),
            Handle::Bottom => (None, Some(Low)),
            Handle::Top => (None, Some(High)),
            Handle::CenterLeft => (Some(Low), Some(Center)),
            Handle::CenterRight => (Some(High), Some(Center)),
            Handle::CenterBottom => (Some(Center), Some(Low)),
            Handle::CenterTop => (Some(Center), Some(High)),
            Handle::Center => (Some(Center), Some(Center)),
        }
    }

    /// Axis along which stretching moves an edge-center handle.
    pub fn stretch_axis(self) -> Option<Axis> {
        match self.sides() {
            (Some(Side::Low | Side::High), Some(Side::Center)) => Some(Axis::X),
            (Some(Side::Center), Some(Side::Low | Side::High)) => Some(Axis::Y),
            _ => None,
        }
    }
}

impl FromStr for Handle {
    type Err = InvalidHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ll" => Handle::LowerLeft,
            "lr" => Handle::LowerRight,
            "ul" => Handle::UpperLeft,
            "ur" => Handle::UpperRight,
            "l" => Handle::Left,
            "r" => Handle::Right,
            "b" => Handle::Bottom,
            "t" => Handle::Top,
            "cl" => Handle::CenterLeft,
            "cr" => Handle::CenterRight,
            "cb" => Handle::CenterBottom,
            "ct" => Handle::CenterTop,
            "c" => Handle::Center,
            other => return Err(InvalidHandleError(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RectCorners")]
pub struct Rect {
    ll: GridPoint,
    ur: GridPoint,
}

/// Corners as written in a file, in any order.
#[derive(Deserialize)]
struct RectCorners {
    ll: GridPoint,
    ur: GridPoint,
}

impl From<RectCorners> for Rect {
    fn from(corners: RectCorners) -> Self {
        Self::new(corners.ll, corners.ur)
    }
}

impl Rect {
    pub fn new(a: GridPoint, b: GridPoint) -> Self {
        Self {
            ll: GridPoint::new(a.x.min(b.x), a.y.min(b.y)),
            ur: GridPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Rectangle of a wire of `width` centered on the axis-aligned line from
    /// `start` to `end`.
    pub fn from_segment(start: GridPoint, end: GridPoint, width: Coord) -> Self {
        let low = width / 2;
        let high = width - low;

        if start.y == end.y {
            Self::new(
                GridPoint::new(start.x, start.y - low),
                GridPoint::new(end.x, end.y + high),
            )
        } else {
            Self::new(
                GridPoint::new(start.x - low, start.y),
                GridPoint::new(end.x + high, end.y),
            )
        }
    }

    /// Rectangle of the given dimensions centered on `center`.
    pub fn centered(center: GridPoint, width: Coord, height: Coord) -> Self {
        let ll = GridPoint::new(center.x - width / 2, center.y - height / 2);
        Self::new(ll, GridPoint::new(ll.x + width, ll.y + height))
    }

    pub fn ll(&self) -> GridPoint {
        self.ll
    }

    pub fn ur(&self) -> GridPoint {
        self.ur
    }

    pub fn width(&self) -> Coord {
        self.ur.x - self.ll.x
    }

    pub fn height(&self) -> Coord {
        self.ur.y - self.ll.y
    }

    pub fn dim(&self, axis: Axis) -> Coord {
        match axis {
            Axis::X => self.width(),
            Axis::Y => self.height(),
        }
    }

    pub fn center(&self) -> GridPoint {
        GridPoint::new(
            self.ll.x + self.width() / 2,
            self.ll.y + self.height() / 2,
        )
    }

    fn side(&self, axis: Axis, side: Side) -> Coord {
        match side {
            Side::Low => self.ll.coord(axis),
            Side::Center => self.ll.coord(axis) + self.dim(axis) / 2,
            Side::High => self.ur.coord(axis),
        }
    }

    /// Location of `handle`. Edge handles report the middle of their edge.
    pub fn handle(&self, handle: Handle) -> GridPoint {
        let (sx, sy) = handle.sides();

        GridPoint::new(
            self.side(Axis::X, sx.unwrap_or(Side::Center)),
            self.side(Axis::Y, sy.unwrap_or(Side::Center)),
        )
    }

    /// Translates the rectangle so that `handle` lands on `target`.
    pub fn align(&mut self, handle: Handle, target: GridPoint) {
        let (sx, sy) = handle.sides();

        for (axis, side) in [(Axis::X, sx), (Axis::Y, sy)] {
            if let Some(side) = side {
                let delta = target.coord(axis) - self.side(axis, side);
                self.ll = self.ll.with_coord(axis, self.ll.coord(axis) + delta);
                self.ur = self.ur.with_coord(axis, self.ur.coord(axis) + delta);
            }
        }
    }

    /// Moves the edges named by `handle` onto `target`, keeping the opposite
    /// edges fixed. Center components re-center along their axis.
    pub fn stretch(&mut self, handle: Handle, target: GridPoint) {
        let (sx, sy) = handle.sides();

        for (axis, side) in [(Axis::X, sx), (Axis::Y, sy)] {
            let value = target.coord(axis);

            match side {
                Some(Side::Low) => {
                    let high = self.ur.coord(axis);
                    self.ll = self.ll.with_coord(axis, value.min(high));
                    self.ur = self.ur.with_coord(axis, value.max(high));
                }
                Some(Side::High) => {
                    let low = self.ll.coord(axis);
                    self.ll = self.ll.with_coord(axis, value.min(low));
                    self.ur = self.ur.with_coord(axis, value.max(low));
                }
                Some(Side::Center) => {
                    let delta = value - self.side(axis, Side::Center);
                    self.ll = self.ll.with_coord(axis, self.ll.coord(axis) + delta);
                    self.ur = self.ur.with_coord(axis, self.ur.coord(axis) + delta);
                }
                None => (),
            }
        }
    }

    /// Closed intersection, `None` when the rectangles are disjoint.
    pub fn overlap(&self, other: &Rect) -> Option<Rect> {
        let ll = GridPoint::new(self.ll.x.max(other.ll.x), self.ll.y.max(other.ll.y));
        let ur = GridPoint::new(self.ur.x.min(other.ur.x), self.ur.y.min(other.ur.y));

        (ll.x <= ur.x && ll.y <= ur.y).then_some(Rect { ll, ur })
    }

    pub fn require_overlap(&self, other: &Rect) -> Result<Rect, OverlapRequiredError> {
        self.overlap(other)
            .ok_or(OverlapRequiredError(*self, *other))
    }

    /// Whether the intersection has a positive area. Touching edges do not
    /// count.
    pub fn overlaps_strictly(&self, other: &Rect) -> bool {
        self.ll.x.max(other.ll.x) < self.ur.x.min(other.ur.x)
            && self.ll.y.max(other.ll.y) < self.ur.y.min(other.ur.y)
    }

    /// Whether `self`, taken as closed, reaches into the interior of `other`.
    /// Degenerate rectangles count, so a line crossing `other` does too.
    pub fn meets_interior(&self, other: &Rect) -> bool {
        self.ll.x < other.ur.x
            && self.ur.x > other.ll.x
            && self.ll.y < other.ur.y
            && self.ur.y > other.ll.y
    }

    /// Smallest rectangle covering both.
    pub fn enclosure(&self, other: &Rect) -> Rect {
        Rect {
            ll: GridPoint::new(self.ll.x.min(other.ll.x), self.ll.y.min(other.ll.y)),
            ur: GridPoint::new(self.ur.x.max(other.ur.x), self.ur.y.max(other.ur.y)),
        }
    }

    pub fn expand(&self, left: Coord, bottom: Coord, right: Coord, top: Coord) -> Rect {
        Rect::new(
            GridPoint::new(self.ll.x - left, self.ll.y - bottom),
            GridPoint::new(self.ur.x + right, self.ur.y + top),
        )
    }

    pub fn contains(&self, point: GridPoint) -> bool {
        (self.ll.x..=self.ur.x).contains(&point.x) && (self.ll.y..=self.ur.y).contains(&point.y)
    }

    pub fn to_real(&self, resolution: f64) -> geo::Rect {
        geo::Rect::new(
            self.ll.to_real(resolution),
            self.ur.to_real(resolution),
        )
    }
}
