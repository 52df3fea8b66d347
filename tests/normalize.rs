use cardinal::{
    geometry::{Direction, GridPoint},
    route::{is_manhattan, manhattanize, normalize, reduce_collinear, Waypoint},
};
use rstest::rstest;

mod common;

use common::p;

fn wp(x: i64, y: i64, layer: usize) -> Waypoint {
    Waypoint::new(p(x, y), layer, None)
}

fn positions(points: &[Waypoint]) -> Vec<GridPoint> {
    points.iter().map(|point| point.position).collect()
}

#[rstest]
#[case(Direction::PosX, vec![(3, 4)], vec![(0, 0), (3, 0), (3, 4)])]
#[case(Direction::PosY, vec![(3, 4)], vec![(0, 0), (0, 4), (3, 4)])]
#[case(Direction::PosX, vec![(3, 0), (3, 4)], vec![(0, 0), (3, 0), (3, 4)])]
#[case(Direction::PosX, vec![(1, 0), (2, 0), (3, 0)], vec![(0, 0), (3, 0)])]
#[case(Direction::PosX, vec![(0, 0)], vec![(0, 0)])]
#[case(Direction::NegY, vec![(5, 0), (5, -3), (-2, -7)], vec![(0, 0), (5, 0), (5, -3), (-2, -3), (-2, -7)])]
fn normalize_examples(
    #[case] direction: Direction,
    #[case] targets: Vec<(i64, i64)>,
    #[case] expected: Vec<(i64, i64)>,
) {
    let targets: Vec<Waypoint> = targets.into_iter().map(|(x, y)| wp(x, y, 0)).collect();
    let normalized = normalize(direction, wp(0, 0, 0), &targets);

    assert_eq!(
        positions(&normalized),
        expected.into_iter().map(GridPoint::from).collect::<Vec<_>>()
    );
}

#[test]
fn diagonal_corner_alternates_axes() {
    // After the first hop moves along x the next diagonal goes y first.
    let points = manhattanize(
        Direction::PosX,
        wp(0, 0, 0),
        &[wp(4, 0, 0), wp(6, 3, 0), wp(9, 9, 0)],
    );

    assert_eq!(
        positions(&points),
        vec![p(0, 0), p(4, 0), p(4, 3), p(6, 3), p(9, 3), p(9, 9)]
    );
    assert!(is_manhattan(&points));
}

#[test]
fn corner_takes_target_layer() {
    let points = manhattanize(Direction::PosX, wp(0, 0, 0), &[wp(3, 4, 1)]);

    assert_eq!(points[1], wp(3, 0, 1));
    assert_eq!(points[2], wp(3, 4, 1));
}

#[test]
fn layer_change_keeps_coincident_point() {
    let normalized = normalize(
        Direction::PosX,
        wp(0, 0, 0),
        &[wp(5, 0, 0), wp(5, 0, 1), wp(5, 5, 1)],
    );

    assert_eq!(
        normalized,
        vec![wp(0, 0, 0), wp(5, 0, 0), wp(5, 0, 1), wp(5, 5, 1)]
    );
}

#[test]
fn collinear_points_on_other_layer_stay() {
    let reduced = reduce_collinear(vec![wp(0, 0, 0), wp(2, 0, 1), wp(4, 0, 1)]);
    assert_eq!(reduced.len(), 3);
}

#[test]
fn reversal_is_preserved() {
    let reduced = reduce_collinear(vec![wp(0, 0, 0), wp(5, 0, 0), wp(2, 0, 0)]);
    assert_eq!(positions(&reduced), vec![p(0, 0), p(5, 0), p(2, 0)]);
}

#[test]
fn long_collinear_run_collapses() {
    let points: Vec<Waypoint> = (0..10).map(|x| wp(x, 0, 0)).chain([wp(9, 4, 0)]).collect();
    assert_eq!(positions(&reduce_collinear(points)), vec![p(0, 0), p(9, 0), p(9, 4)]);
}

#[rstest]
#[case(Direction::PosX)]
#[case(Direction::NegY)]
fn normalize_is_idempotent(#[case] direction: Direction) {
    let targets = [
        wp(3, 4, 0),
        wp(3, 4, 1),
        wp(-2, 4, 1),
        wp(-2, 4, 1),
        wp(-7, 11, 2),
        wp(-7, 20, 2),
        wp(-7, 25, 2),
    ];

    let once = normalize(direction, wp(0, 0, 0), &targets);
    let twice = normalize(direction, once[0], &once[1..]);

    assert!(is_manhattan(&once));
    assert_eq!(once, twice);
}
