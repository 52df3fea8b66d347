//! Turns routes into rectangles and vias on a drawing canvas.

use thiserror::Error;

use crate::{
    geometry::{GridPoint, OverlapRequiredError, Rect, Shape},
    route::{LRoute, Route, RouteElement, ViaLevel, ViaRecord, ViaStyle},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    #[error(transparent)]
    OverlapRequired(#[from] OverlapRequiredError),
}

pub trait AccessCanvas {
    type ShapeIndex: Copy;

    fn add_shape(&mut self, shape: Shape) -> Self::ShapeIndex;
    fn shape(&self, index: Self::ShapeIndex) -> Shape;
    /// Joins two shapes with the given cut levels. The shapes must overlap.
    fn add_via(
        &mut self,
        bottom: Self::ShapeIndex,
        top: Self::ShapeIndex,
        levels: &[ViaLevel],
    ) -> Result<(), OverlapRequiredError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedVia {
    pub bottom: usize,
    pub top: usize,
    /// Cut array extent of each level.
    pub cuts: Vec<Rect>,
    pub levels: Vec<ViaLevel>,
}

/// In-memory canvas.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    shapes: Vec<Shape>,
    vias: Vec<PlacedVia>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn vias(&self) -> &[PlacedVia] {
        &self.vias
    }
}

impl AccessCanvas for Canvas {
    type ShapeIndex = usize;

    fn add_shape(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    fn shape(&self, index: usize) -> Shape {
        self.shapes[index]
    }

    fn add_via(
        &mut self,
        bottom: usize,
        top: usize,
        levels: &[ViaLevel],
    ) -> Result<(), OverlapRequiredError> {
        let overlap = self.shapes[bottom]
            .rect
            .require_overlap(&self.shapes[top].rect)?;
        let center = overlap.center();

        self.vias.push(PlacedVia {
            bottom,
            top,
            cuts: levels.iter().map(|level| level.cut_rect(center)).collect(),
            levels: levels.to_vec(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<I> {
    pub shapes: Vec<I>,
    pub vias: usize,
}

fn adjacent_segment<'a>(
    mut elements: impl Iterator<Item = (usize, &'a RouteElement)>,
    position: GridPoint,
    layer: usize,
) -> Option<usize> {
    elements.find_map(|(index, element)| match element {
        RouteElement::Turn(..) => None,
        RouteElement::Segment(segment)
            if segment.layer == layer && (segment.start == position || segment.end == position) =>
        {
            Some(Some(index))
        }
        _ => Some(None),
    })?
}

fn pad(level: &ViaLevel, position: GridPoint, top: bool) -> Shape {
    let cut = level.cut_rect(position);

    if top {
        Shape::new(level.top_enclosure.apply(&cut), level.top)
    } else {
        Shape::new(level.bottom_enclosure.apply(&cut), level.bottom)
    }
}

fn commit_via<C: AccessCanvas>(
    canvas: &mut C,
    via: &ViaRecord,
    lower: Option<C::ShapeIndex>,
    upper: Option<C::ShapeIndex>,
) -> Result<usize, CommitError> {
    let (Some(first), Some(last)) = (via.levels.first(), via.levels.last()) else {
        return Ok(0);
    };

    let lower = lower.unwrap_or_else(|| canvas.add_shape(pad(first, via.position, false)));
    let upper = upper.unwrap_or_else(|| canvas.add_shape(pad(last, via.position, true)));

    match via.style {
        ViaStyle::Stack => {
            canvas.add_via(lower, upper, &via.levels)?;
            Ok(1)
        }
        ViaStyle::Primitive => {
            let mut bottom = lower;

            for (index, level) in via.levels.iter().enumerate() {
                let top = match via.levels.get(index + 1) {
                    Some(next) => {
                        let landing = pad(level, via.position, true)
                            .rect
                            .enclosure(&pad(next, via.position, false).rect);
                        canvas.add_shape(Shape::new(landing, level.top))
                    }
                    None => upper,
                };

                canvas.add_via(bottom, top, std::slice::from_ref(level))?;
                bottom = top;
            }

            Ok(via.levels.len())
        }
    }
}

/// Draws every segment of `route` and connects the vias to the wires
/// meeting them, adding landing pads where no wire does.
pub fn commit<C: AccessCanvas>(
    route: &Route,
    canvas: &mut C,
) -> Result<Committed<C::ShapeIndex>, CommitError> {
    let elements = route.elements();
    let segment_shapes: Vec<Option<C::ShapeIndex>> = elements
        .iter()
        .map(|element| match element {
            RouteElement::Segment(segment) => Some(canvas.add_shape(segment.shape())),
            _ => None,
        })
        .collect();

    let mut committed = Committed {
        shapes: segment_shapes.iter().flatten().copied().collect(),
        vias: 0,
    };

    for (index, element) in elements.iter().enumerate() {
        let RouteElement::Via(via) = element else {
            continue;
        };

        let before = adjacent_segment(
            elements[..index].iter().enumerate().rev(),
            via.position,
            via.from_layer,
        );
        let after = adjacent_segment(
            elements.iter().enumerate().skip(index + 1),
            via.position,
            via.to_layer,
        );
        let (lower, upper) = if via.from_layer < via.to_layer {
            (before, after)
        } else {
            (after, before)
        };

        committed.vias += commit_via(
            canvas,
            via,
            lower.and_then(|index| segment_shapes[index]),
            upper.and_then(|index| segment_shapes[index]),
        )?;
    }

    Ok(committed)
}

/// Draws both legs of an L and joins them when they sit on different
/// layers.
pub fn commit_l_route<C: AccessCanvas>(
    l_route: &LRoute,
    canvas: &mut C,
) -> Result<Committed<C::ShapeIndex>, CommitError> {
    let first = canvas.add_shape(l_route.first);
    let second = canvas.add_shape(l_route.second);
    let mut vias = 0;

    if l_route.turn.is_via() {
        let (lower, upper) = if l_route.first.layer < l_route.second.layer {
            (first, second)
        } else {
            (second, first)
        };
        canvas.add_via(lower, upper, &l_route.turn.levels)?;
        vias = 1;
    } else {
        l_route.first.rect.require_overlap(&l_route.second.rect)?;
    }

    Ok(Committed {
        shapes: vec![first, second],
        vias,
    })
}
