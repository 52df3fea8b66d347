use rstar::{RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use crate::geometry::{Coord, Rect};

/// A rectangle drawn on one layer of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub rect: Rect,
    pub layer: usize,
}

impl Shape {
    pub fn new(rect: Rect, layer: usize) -> Self {
        Self { rect, layer }
    }
}

/// Envelope of a shape, with the layer as the third dimension.
pub fn shape_envelope(rect: &Rect, layer: usize) -> AABB<[Coord; 3]> {
    AABB::from_corners(
        [rect.ll().x, rect.ll().y, layer as Coord],
        [rect.ur().x, rect.ur().y, layer as Coord],
    )
}

impl RTreeObject for Shape {
    type Envelope = AABB<[Coord; 3]>;

    fn envelope(&self) -> Self::Envelope {
        shape_envelope(&self.rect, self.layer)
    }
}
