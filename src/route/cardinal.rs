use itertools::Itertools;

use crate::{
    geometry::Direction,
    route::{EnclosurePolicy, RouteError, Trace, Tracer, ViaStyle, Waypoint},
    technology::AccessTechnology,
};

/// Draws a normalized waypoint list whose first point is the trace head.
///
/// Each point is reached along the current axis, then the head turns toward
/// the next point and moves to the point's layer. The last point only
/// receives a uniform via when it sits on another layer.
pub fn route_cardinal<T: AccessTechnology>(
    tracer: &Tracer<T>,
    trace: &mut Trace,
    waypoints: &[Waypoint],
    policy: EnclosurePolicy,
    style: ViaStyle,
) -> Result<(), RouteError> {
    let Some(last) = waypoints.last() else {
        return Ok(());
    };

    for (from, to) in waypoints.iter().tuple_windows() {
        tracer.extend(trace, from.position, from.width);

        let direction = Direction::between(from.position, to.position, trace.state.direction);
        tracer.turn_via(trace, from.layer, direction, policy, style, None)?;
    }

    tracer.extend(trace, last.position, last.width);

    if last.layer != trace.state.layer {
        let direction = trace.state.direction;
        tracer.turn_via(
            trace,
            last.layer,
            direction,
            EnclosurePolicy::Uniform,
            style,
            None,
        )?;
    }

    Ok(())
}
