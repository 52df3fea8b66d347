use crate::{
    geometry::{Axis, Coord, Direction},
    route::Waypoint,
};

/// Rewrites `targets` into a path whose consecutive points differ in one
/// axis only, starting from `initial`.
///
/// A diagonal hop is split at a corner reached by moving along the
/// preferred axis first. The preferred axis starts as the axis of
/// `initial_direction` and then follows the last hop. Coincident points are
/// dropped unless they change layer.
pub fn manhattanize(
    initial_direction: Direction,
    initial: Waypoint,
    targets: &[Waypoint],
) -> Vec<Waypoint> {
    let mut preferred = initial_direction.axis();
    let mut points = vec![initial];
    let mut current = initial;

    for &target in targets {
        let moves_x = target.position.x != current.position.x;
        let moves_y = target.position.y != current.position.y;

        match (moves_x, moves_y) {
            (false, false) => {
                if target.layer == current.layer {
                    continue;
                }
            }
            (true, true) => {
                let corner = current
                    .position
                    .with_coord(preferred, target.position.coord(preferred));

                points.push(Waypoint::new(corner, target.layer, current.width));
                preferred = preferred.other();
            }
            (true, false) => preferred = Axis::Y,
            (false, true) => preferred = Axis::X,
        }

        points.push(target);
        current = target;
    }

    points
}

fn is_between(a: Coord, b: Coord, c: Coord) -> bool {
    (a <= b && b <= c) || (a >= b && b >= c)
}

/// Whether `middle` can be dropped without changing the drawn path.
fn is_redundant(first: &Waypoint, middle: &Waypoint, last: &Waypoint) -> bool {
    if first.layer != middle.layer || middle.layer != last.layer {
        return false;
    }

    let (a, b, c) = (first.position, middle.position, last.position);

    (a.x == b.x && b.x == c.x && is_between(a.y, b.y, c.y))
        || (a.y == b.y && b.y == c.y && is_between(a.x, b.x, c.x))
}

/// Drops interior points lying monotonically between two collinear
/// neighbors on the same layer.
pub fn reduce_collinear(points: Vec<Waypoint>) -> Vec<Waypoint> {
    let mut reduced: Vec<Waypoint> = Vec::with_capacity(points.len());

    for point in points {
        while let [.., first, middle] = reduced.as_slice() {
            if !is_redundant(first, middle, &point) {
                break;
            }
            reduced.pop();
        }

        reduced.push(point);
    }

    reduced
}

pub fn normalize(
    initial_direction: Direction,
    initial: Waypoint,
    targets: &[Waypoint],
) -> Vec<Waypoint> {
    reduce_collinear(manhattanize(initial_direction, initial, targets))
}
