use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Coord, Direction, GridPoint},
    route::{RouteError, Segment, Waypoint},
};

/// Unit displacement of a waypoint on a course offset to the left of travel,
/// given the directions of travel into and out of it.
///
/// A straight continuation gives the left normal. A turn gives the sum of the
/// left normals of both directions, moving the corner diagonally.
pub const fn offset_unit(incoming: Direction, outgoing: Direction) -> (Coord, Coord) {
    use Direction::*;

    match (incoming, outgoing) {
        (PosX, PosX) | (PosX, NegX) => (0, 1),
        (PosX, PosY) => (-1, 1),
        (PosX, NegY) => (1, 1),
        (NegX, PosX) | (NegX, NegX) => (0, -1),
        (NegX, PosY) => (-1, -1),
        (NegX, NegY) => (1, -1),
        (PosY, PosX) => (-1, 1),
        (PosY, NegX) => (-1, -1),
        (PosY, PosY) | (PosY, NegY) => (-1, 0),
        (NegY, PosX) => (1, 1),
        (NegY, NegX) => (1, -1),
        (NegY, PosY) | (NegY, NegY) => (1, 0),
    }
}

/// A waypoint list running parallel to the primary course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetCourse {
    /// Total distance from the primary course, positive to the left.
    pub offset: Coord,
    pub start_direction: Direction,
    pub waypoints: Vec<Waypoint>,
}

impl OffsetCourse {
    pub fn primary(start_direction: Direction, waypoints: Vec<Waypoint>) -> Self {
        Self {
            offset: 0,
            start_direction,
            waypoints,
        }
    }

    /// Course displaced by `step` from this one, keeping its turn sequence.
    pub fn derive(&self, step: Coord) -> Result<OffsetCourse, RouteError> {
        let points = &self.waypoints;

        let Some(first) = points.first() else {
            return Err(RouteError::DegenerateCourse(0));
        };

        if points.iter().all(|point| point.position == first.position) {
            return Err(RouteError::DegenerateCourse(1));
        }

        let mut current = self.start_direction;
        let directions: Vec<Direction> = points
            .iter()
            .tuple_windows()
            .map(|(from, to)| {
                current = Direction::between(from.position, to.position, current);
                current
            })
            .collect();

        let shift = |(x, y): (Coord, Coord)| GridPoint::new(x * step, y * step);
        let mut waypoints = Vec::with_capacity(points.len());
        let mut run_start = 0;

        // Waypoints sharing a position (layer changes) move as one corner.
        while run_start < points.len() {
            let position = points[run_start].position;
            let run_end = run_start
                + points[run_start..]
                    .iter()
                    .take_while(|point| point.position == position)
                    .count();

            let incoming = run_start.checked_sub(1).map(|hop| directions[hop]);
            let outgoing = (run_end < points.len()).then(|| directions[run_end - 1]);
            let unit = match (incoming, outgoing) {
                (Some(incoming), Some(outgoing)) => offset_unit(incoming, outgoing),
                (incoming, outgoing) => {
                    let direction = incoming.or(outgoing).unwrap_or(self.start_direction);
                    offset_unit(direction, direction)
                }
            };

            waypoints.extend(
                points[run_start..run_end]
                    .iter()
                    .map(|point| point.translated(shift(unit))),
            );
            run_start = run_end;
        }

        Ok(OffsetCourse {
            offset: self.offset + step,
            start_direction: self.start_direction,
            waypoints,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldSpec {
    /// Distance from the signal to each shield.
    pub spacing: Coord,
    /// Gap between consecutive stitches.
    pub stitch_pitch: Coord,
    /// Stitch width, the signal start width when unset.
    #[serde(default)]
    pub stitch_width: Option<Coord>,
    /// Layers stitches are drawn on, the shield layer when empty.
    #[serde(default)]
    pub layers: Vec<usize>,
}

/// How parallel courses are derived from a primary course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetStrategy {
    /// The signal plus a stitched shield on each side.
    Shield(ShieldSpec),
    /// Two wires at half the spacing on each side, without the center.
    DifferentialPair { spacing: Coord },
    /// `size` wires alternating sides around the center, each derived from
    /// the outermost wire on its side.
    Bus { size: usize, spacing: Coord },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPlan {
    /// The primary course when it is routed too.
    pub primary: Option<OffsetCourse>,
    pub courses: Vec<OffsetCourse>,
}

impl OffsetStrategy {
    pub fn plan(&self, primary: OffsetCourse) -> Result<OffsetPlan, RouteError> {
        match self {
            OffsetStrategy::Shield(spec) => Ok(OffsetPlan {
                courses: vec![primary.derive(spec.spacing)?, primary.derive(-spec.spacing)?],
                primary: Some(primary),
            }),
            OffsetStrategy::DifferentialPair { spacing } => {
                let half = spacing / 2;

                Ok(OffsetPlan {
                    courses: vec![primary.derive(half)?, primary.derive(-half)?],
                    primary: None,
                })
            }
            OffsetStrategy::Bus { size, spacing } => {
                if *size == 0 {
                    return Err(RouteError::EmptyBus);
                }

                let even = size % 2 == 0;
                let count = if even { *size } else { size - 1 };
                let mut upper = primary.clone();
                let mut lower = primary.clone();
                let mut courses = Vec::with_capacity(count);

                for index in 0..count {
                    let step = if even && index < 2 {
                        spacing / 2
                    } else {
                        *spacing
                    };

                    if index % 2 == 0 {
                        upper = upper.derive(step)?;
                        courses.push(upper.clone());
                    } else {
                        lower = lower.derive(-step)?;
                        courses.push(lower.clone());
                    }
                }

                Ok(OffsetPlan {
                    primary: (!even).then_some(primary),
                    courses,
                })
            }
        }
    }
}

/// Stitch lines between two parallel rails, one every `width + pitch` along
/// the span both rails cover.
pub fn stitch_positions(
    a: &Segment,
    b: &Segment,
    width: Coord,
    pitch: Coord,
) -> Vec<(GridPoint, GridPoint)> {
    if a.axis() != b.axis() || a.track() == b.track() || width <= 0 || width + pitch <= 0 {
        return vec![];
    }

    let axis = a.axis();
    let (a_low, a_high) = a.span();
    let (b_low, b_high) = b.span();
    let (low, high) = (a_low.max(b_low), a_high.min(b_high));

    let mut stitches = vec![];
    let mut edge = low;

    while edge + width <= high {
        let center = edge + width / 2;
        let at = |track: Coord| {
            GridPoint::default()
                .with_coord(axis, center)
                .with_coord(axis.other(), track)
        };

        stitches.push((at(a.track()), at(b.track())));
        edge += width + pitch;
    }

    stitches
}
