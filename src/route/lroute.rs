use crate::{
    geometry::{Axis, Direction, Handle, Shape},
    route::{plan_turn, EnclosurePolicy, RouteError, TurnSpec},
    technology::{AccessTechnology, ViaArray},
};

/// Two stretched shapes forming an L, and the turn joining them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LRoute {
    pub first: Shape,
    pub second: Shape,
    pub turn: TurnSpec,
}

/// Stretches `start` along `start_axis` to the far edge of `end`, then
/// stretches `end` back onto `start`.
pub fn l_route(
    technology: &impl AccessTechnology,
    start: &Shape,
    start_axis: Axis,
    end: &Shape,
    policy: EnclosurePolicy,
    array: Option<ViaArray>,
) -> Result<LRoute, RouteError> {
    technology.layer_rules(start.layer)?;
    technology.layer_rules(end.layer)?;

    let mut first = *start;
    let mut second = *end;
    let other = start_axis.other();

    let (far, near) = match start_axis {
        Axis::X => (Handle::Right, Handle::Left),
        Axis::Y => (Handle::Top, Handle::Bottom),
    };
    let (low_edge, high_edge) = match other {
        Axis::X => (Handle::Left, Handle::Right),
        Axis::Y => (Handle::Bottom, Handle::Top),
    };

    let forward = end.rect.handle(far).coord(start_axis) > start.rect.handle(far).coord(start_axis);
    if forward {
        first.rect.stretch(far, end.rect.handle(far));
    } else {
        first.rect.stretch(near, end.rect.handle(near));
    }

    let sideways = end.rect.center().coord(other) > start.rect.center().coord(other);
    if sideways {
        second.rect.stretch(low_edge, first.rect.handle(low_edge));
    } else {
        second.rect.stretch(high_edge, first.rect.handle(high_edge));
    }

    let turn = plan_turn(
        technology,
        Direction::new(start_axis, forward),
        start.layer,
        Direction::new(other, sideways),
        end.layer,
        policy,
        array,
    )?;

    Ok(LRoute {
        first,
        second,
        turn,
    })
}
