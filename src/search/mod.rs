pub mod astar;
mod grid;
mod visibility;

pub use grid::*;
pub use visibility::*;

use thiserror::Error;

use crate::{
    geometry::{GridPoint, Rect},
    technology::UnknownLayerError,
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("target is unreachable")]
pub struct UnreachableTargetError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    Unreachable(#[from] UnreachableTargetError),
    #[error(transparent)]
    UnknownLayer(#[from] UnknownLayerError),
    #[error("{0:?} lies outside the routing area")]
    OutOfBounds(GridPoint),
    #[error("layer {0} is not among the routing layers")]
    UnusableLayer(usize),
    #[error("layer {0} has no usable grid pitch")]
    InvalidPitch(usize),
    #[error("routing area {0:?} does not fit a grid")]
    InvalidBounds(Rect),
    #[error("search gave up after {0} steps")]
    StepLimit(usize),
}
