use std::{fmt, ops::Not, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Coord, GridPoint, Handle};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid direction {0:?}, expected one of +x, -x, +y, -y")]
pub struct InvalidDirectionError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

impl Not for Axis {
    type Output = Self;

    fn not(self) -> Self {
        self.other()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// One of the four cardinal directions of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+x")]
    PosX,
    #[serde(rename = "-x")]
    NegX,
    #[serde(rename = "+y")]
    PosY,
    #[serde(rename = "-y")]
    NegY,
}

impl Direction {
    pub fn new(axis: Axis, positive: bool) -> Self {
        match (axis, positive) {
            (Axis::X, true) => Direction::PosX,
            (Axis::X, false) => Direction::NegX,
            (Axis::Y, true) => Direction::PosY,
            (Axis::Y, false) => Direction::NegY,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::PosX | Direction::NegX => Axis::X,
            Direction::PosY | Direction::NegY => Axis::Y,
        }
    }

    pub fn sign(self) -> Coord {
        match self {
            Direction::PosX | Direction::PosY => 1,
            Direction::NegX | Direction::NegY => -1,
        }
    }

    pub fn opposite(self) -> Self {
        Direction::new(self.axis(), self.sign() < 0)
    }

    pub fn unit(self) -> GridPoint {
        match self.axis() {
            Axis::X => GridPoint::new(self.sign(), 0),
            Axis::Y => GridPoint::new(0, self.sign()),
        }
    }

    /// Unit normal pointing to the left of travel.
    pub fn left(self) -> GridPoint {
        match self {
            Direction::PosX => GridPoint::new(0, 1),
            Direction::NegX => GridPoint::new(0, -1),
            Direction::PosY => GridPoint::new(-1, 0),
            Direction::NegY => GridPoint::new(1, 0),
        }
    }

    /// Direction of travel from `from` to `to`.
    ///
    /// Coincident points keep `current`. When both axes differ, the axis of
    /// `current` wins.
    pub fn between(from: GridPoint, to: GridPoint, current: Direction) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;

        match (dx.signum(), dy.signum()) {
            (0, 0) => current,
            (sx, 0) => Direction::new(Axis::X, sx > 0),
            (0, sy) => Direction::new(Axis::Y, sy > 0),
            (sx, sy) => match current.axis() {
                Axis::X => Direction::new(Axis::X, sx > 0),
                Axis::Y => Direction::new(Axis::Y, sy > 0),
            },
        }
    }

    /// Direction of the first hop, resolving diagonal hops toward x.
    pub fn of_hop(from: GridPoint, to: GridPoint) -> Self {
        if to.x > from.x {
            Direction::PosX
        } else if to.x < from.x {
            Direction::NegX
        } else if to.y > from.y {
            Direction::PosY
        } else {
            Direction::NegY
        }
    }

    /// Anchor on the leading edge of a wire travelling in this direction.
    pub fn leading_handle(self) -> Handle {
        match self {
            Direction::PosX => Handle::CenterRight,
            Direction::NegX => Handle::CenterLeft,
            Direction::PosY => Handle::CenterTop,
            Direction::NegY => Handle::CenterBottom,
        }
    }
}

impl FromStr for Direction {
    type Err = InvalidDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+x" => Ok(Direction::PosX),
            "-x" => Ok(Direction::NegX),
            "+y" => Ok(Direction::PosY),
            "-y" => Ok(Direction::NegY),
            other => Err(InvalidDirectionError(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.sign() > 0 { '+' } else { '-' };
        write!(f, "{}{}", sign, self.axis())
    }
}
