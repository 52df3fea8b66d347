use enum_dispatch::enum_dispatch;

use crate::{
    geometry::{Axis, Coord, Direction, GridPoint, Rect, Shape},
    route::EnclosurePolicy,
    technology::ViaArray,
};

#[enum_dispatch]
pub trait GetLayers {
    /// Lowest and highest layer touched.
    fn layers(&self) -> (usize, usize);
}

#[enum_dispatch]
pub trait GetEndpoint {
    /// Where the route continues after this element.
    fn endpoint(&self) -> GridPoint;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: GridPoint,
    pub end: GridPoint,
    pub layer: usize,
    pub width: Coord,
    pub direction: Direction,
}

impl Segment {
    pub fn axis(&self) -> Axis {
        self.direction.axis()
    }

    pub fn length(&self) -> Coord {
        self.start.manhattan_distance(&self.end)
    }

    /// Extent along the direction of travel, low end first.
    pub fn span(&self) -> (Coord, Coord) {
        let axis = self.axis();
        let (a, b) = (self.start.coord(axis), self.end.coord(axis));
        (a.min(b), a.max(b))
    }

    /// Coordinate of the line the segment runs on.
    pub fn track(&self) -> Coord {
        self.start.coord(self.axis().other())
    }

    pub fn rect(&self) -> Rect {
        Rect::from_segment(self.start, self.end, self.width)
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.rect(), self.layer)
    }
}

impl GetLayers for Segment {
    fn layers(&self) -> (usize, usize) {
        (self.layer, self.layer)
    }
}

impl GetEndpoint for Segment {
    fn endpoint(&self) -> GridPoint {
        self.end
    }
}

/// Metal extension around a cut: left, bottom, right, top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Enclosure {
    pub left: Coord,
    pub bottom: Coord,
    pub right: Coord,
    pub top: Coord,
}

impl Enclosure {
    pub fn uniform(value: Coord) -> Self {
        Self {
            left: value,
            bottom: value,
            right: value,
            top: value,
        }
    }

    /// `large` along a wire running in `axis`, `small` across it.
    pub fn along(axis: Axis, large: Coord, small: Coord) -> Self {
        match axis {
            Axis::X => Self {
                left: large,
                bottom: small,
                right: large,
                top: small,
            },
            Axis::Y => Self {
                left: small,
                bottom: large,
                right: small,
                top: large,
            },
        }
    }

    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.expand(self.left, self.bottom, self.right, self.top)
    }
}

/// One cut level of a via.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViaLevel {
    pub name: String,
    pub bottom: usize,
    pub top: usize,
    pub cut_size: Coord,
    pub cut_pitch: Coord,
    pub array: ViaArray,
    pub bottom_enclosure: Enclosure,
    pub top_enclosure: Enclosure,
}

impl ViaLevel {
    /// Extent of the cut array centered on `center`.
    pub fn cut_rect(&self, center: GridPoint) -> Rect {
        Rect::centered(
            center,
            self.cut_size + (self.array.columns as Coord - 1) * self.cut_pitch,
            self.cut_size + (self.array.rows as Coord - 1) * self.cut_pitch,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViaStyle {
    /// One primitive via per cut level, with landing pads in between.
    Primitive,
    /// A single stacked via spanning all levels.
    Stack,
}

impl ViaStyle {
    pub fn from_primitive(primitive: bool) -> Self {
        if primitive {
            ViaStyle::Primitive
        } else {
            ViaStyle::Stack
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViaRecord {
    pub position: GridPoint,
    pub from_layer: usize,
    pub to_layer: usize,
    pub incoming: Direction,
    pub outgoing: Direction,
    pub policy: EnclosurePolicy,
    pub style: ViaStyle,
    /// Cut levels from bottom to top.
    pub levels: Vec<ViaLevel>,
}

impl GetLayers for ViaRecord {
    fn layers(&self) -> (usize, usize) {
        (
            self.from_layer.min(self.to_layer),
            self.from_layer.max(self.to_layer),
        )
    }
}

impl GetEndpoint for ViaRecord {
    fn endpoint(&self) -> GridPoint {
        self.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnRecord {
    pub position: GridPoint,
    pub layer: usize,
    pub incoming: Direction,
    pub outgoing: Direction,
}

impl GetLayers for TurnRecord {
    fn layers(&self) -> (usize, usize) {
        (self.layer, self.layer)
    }
}

impl GetEndpoint for TurnRecord {
    fn endpoint(&self) -> GridPoint {
        self.position
    }
}

#[enum_dispatch(GetLayers, GetEndpoint)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteElement {
    Segment(Segment),
    Via(ViaRecord),
    Turn(TurnRecord),
}

/// Ordered output of a routing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    elements: Vec<RouteElement>,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: impl Into<RouteElement>) {
        self.elements.push(element.into());
    }

    pub fn extend(&mut self, other: Route) {
        self.elements.extend(other.elements);
    }

    pub fn elements(&self) -> &[RouteElement] {
        &self.elements
    }

    pub fn into_elements(self) -> Vec<RouteElement> {
        self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.elements.iter().filter_map(|element| match element {
            RouteElement::Segment(segment) => Some(segment),
            _ => None,
        })
    }

    pub fn vias(&self) -> impl Iterator<Item = &ViaRecord> + '_ {
        self.elements.iter().filter_map(|element| match element {
            RouteElement::Via(via) => Some(via),
            _ => None,
        })
    }

    pub fn turns(&self) -> impl Iterator<Item = &TurnRecord> + '_ {
        self.elements.iter().filter_map(|element| match element {
            RouteElement::Turn(turn) => Some(turn),
            _ => None,
        })
    }

    pub fn wirelength(&self) -> Coord {
        self.segments().map(Segment::length).sum()
    }

    pub fn endpoint(&self) -> Option<GridPoint> {
        self.elements.last().map(|element| element.endpoint())
    }

    /// Rectangles of all segments.
    pub fn shapes(&self) -> impl Iterator<Item = Shape> + '_ {
        self.segments().map(Segment::shape)
    }
}
