use thiserror::Error;

use crate::{
    geometry::{Coord, Direction, GridPoint},
    route::{
        plan_turn, EnclosurePolicy, RouteState, Segment, Trace, TurnRecord,
        UninitializedRouteError, ViaRecord, ViaStyle,
    },
    technology::{AccessTechnology, IncompleteViaStackError, UnknownLayerError, ViaArray},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error(transparent)]
    Uninitialized(#[from] UninitializedRouteError),
    #[error(transparent)]
    IncompleteViaStack(#[from] IncompleteViaStackError),
    #[error(transparent)]
    UnknownLayer(#[from] UnknownLayerError),
    #[error("an offset course needs at least two distinct waypoints, got {0}")]
    DegenerateCourse(usize),
    #[error("a bus needs at least one wire")]
    EmptyBus,
}

/// Draws straight moves, turns and vias at the head of a [`Trace`].
#[derive(Debug)]
pub struct Tracer<'a, T: AccessTechnology> {
    pub technology: &'a T,
}

impl<'a, T: AccessTechnology> Tracer<'a, T> {
    pub fn new(technology: &'a T) -> Self {
        Self { technology }
    }

    pub fn start(
        &self,
        position: GridPoint,
        direction: Direction,
        layer: usize,
        width: Option<Coord>,
    ) -> Result<Trace, RouteError> {
        let rules = self.technology.layer_rules(layer)?;
        let width = width.unwrap_or(rules.width);

        log::debug!(
            "start route at {:?} heading {} on layer {} width {}",
            position,
            direction,
            layer,
            width
        );
        Ok(Trace::new(RouteState::new(position, direction, layer, width)))
    }

    /// Stretches the head wire by its handle until it lines up with `target`.
    /// Nothing is emitted for a zero-length move.
    pub fn extend(
        &self,
        trace: &mut Trace,
        target: GridPoint,
        width: Option<Coord>,
    ) -> Option<Segment> {
        let state = &mut trace.state;
        let axis = state
            .handle
            .stretch_axis()
            .unwrap_or_else(|| state.direction.axis());
        let end = state.position.with_coord(axis, target.coord(axis));
        let width = width.unwrap_or(state.width);
        state.width = width;

        if end == state.position {
            return None;
        }

        let segment = Segment {
            start: state.position,
            end,
            layer: state.layer,
            width,
            direction: Direction::between(state.position, end, state.direction),
        };

        state.position = end;
        state.handle = segment.direction.leading_handle();
        trace.push(segment);
        Some(segment)
    }

    /// Changes direction and/or layer at the head. A same-layer change emits
    /// a turn record, a layer change a via.
    pub fn turn_via(
        &self,
        trace: &mut Trace,
        layer: usize,
        direction: Direction,
        policy: EnclosurePolicy,
        style: ViaStyle,
        array: Option<ViaArray>,
    ) -> Result<(), RouteError> {
        self.technology.layer_rules(layer)?;

        let state = trace.state;
        let spec = plan_turn(
            self.technology,
            state.direction,
            state.layer,
            direction,
            layer,
            policy,
            array,
        )?;

        if spec.is_via() {
            trace.push(ViaRecord {
                position: state.position,
                from_layer: spec.from_layer,
                to_layer: spec.to_layer,
                incoming: spec.incoming,
                outgoing: spec.outgoing,
                policy,
                style,
                levels: spec.levels,
            });
        } else if spec.is_turn() {
            trace.push(TurnRecord {
                position: state.position,
                layer,
                incoming: spec.incoming,
                outgoing: spec.outgoing,
            });
        }

        trace.state = RouteState::new(state.position, direction, layer, state.width);
        Ok(())
    }
}
