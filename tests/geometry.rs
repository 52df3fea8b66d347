use cardinal::geometry::{
    div_round, Axis, Direction, GridPoint, Handle, InvalidDirectionError, InvalidHandleError,
    Rect,
};
use rstest::rstest;

mod common;

use common::p;

#[rstest]
#[case("+x", Direction::PosX)]
#[case("-x", Direction::NegX)]
#[case("+y", Direction::PosY)]
#[case("-y", Direction::NegY)]
fn parse_direction(#[case] text: &str, #[case] direction: Direction) {
    assert_eq!(text.parse::<Direction>(), Ok(direction));
    assert_eq!(direction.to_string(), text);
}

#[rstest]
#[case("x")]
#[case("+z")]
#[case("")]
fn reject_direction(#[case] text: &str) {
    assert_eq!(
        text.parse::<Direction>(),
        Err(InvalidDirectionError(text.to_string()))
    );
}

#[test]
fn reject_handle() {
    assert_eq!("cc".parse::<Handle>(), Err(InvalidHandleError("cc".to_string())));
    assert_eq!("ur".parse::<Handle>(), Ok(Handle::UpperRight));
}

#[test]
fn direction_between_prefers_current_axis() {
    assert_eq!(Direction::between(p(0, 0), p(0, 0), Direction::NegY), Direction::NegY);
    assert_eq!(Direction::between(p(0, 0), p(-3, 0), Direction::PosY), Direction::NegX);
    assert_eq!(Direction::between(p(0, 0), p(3, 4), Direction::PosY), Direction::PosY);
    assert_eq!(Direction::between(p(0, 0), p(3, -4), Direction::NegX), Direction::PosX);
    assert_eq!(Direction::PosX.opposite(), Direction::NegX);
    assert_eq!(!Axis::X, Axis::Y);
}

#[test]
fn rect_handles() {
    let rect = Rect::new(p(10, 20), p(0, 0));

    assert_eq!(rect.ll(), p(0, 0));
    assert_eq!(rect.ur(), p(10, 20));
    assert_eq!(rect.handle(Handle::CenterRight), p(10, 10));
    assert_eq!(rect.handle(Handle::UpperLeft), p(0, 20));
    assert_eq!(rect.handle(Handle::Top), p(5, 20));
}

#[test]
fn rect_read_with_swapped_corners_is_normalized() {
    let rect: Rect =
        serde_json::from_str(r#"{"ll": {"x": 3, "y": 3}, "ur": {"x": 2, "y": 2}}"#).unwrap();

    assert_eq!(rect, Rect::new(p(2, 2), p(3, 3)));
    assert_eq!(rect.ll(), p(2, 2));
}

#[rstest]
#[case(Handle::CenterRight, Some(Axis::X))]
#[case(Handle::CenterLeft, Some(Axis::X))]
#[case(Handle::CenterTop, Some(Axis::Y))]
#[case(Handle::CenterBottom, Some(Axis::Y))]
#[case(Handle::UpperLeft, None)]
#[case(Handle::Center, None)]
fn handle_stretch_axis(#[case] handle: Handle, #[case] axis: Option<Axis>) {
    assert_eq!(handle.stretch_axis(), axis);
}

#[test]
fn align_moves_only_named_axes() {
    let mut rect = Rect::new(p(0, 0), p(10, 20));
    rect.align(Handle::Left, p(5, 100));
    assert_eq!(rect, Rect::new(p(5, 0), p(15, 20)));

    rect.align(Handle::Center, p(0, 0));
    assert_eq!(rect, Rect::new(p(-5, -10), p(5, 10)));
}

#[test]
fn stretch_keeps_opposite_edge() {
    let mut rect = Rect::new(p(0, 0), p(10, 4));
    rect.stretch(Handle::Right, p(40, 99));
    assert_eq!(rect, Rect::new(p(0, 0), p(40, 4)));

    rect.stretch(Handle::LowerLeft, p(-5, -6));
    assert_eq!(rect, Rect::new(p(-5, -6), p(40, 4)));
}

#[test]
fn overlap_and_interior() {
    let a = Rect::new(p(0, 0), p(10, 10));
    let b = Rect::new(p(10, 0), p(20, 10));
    let c = Rect::new(p(11, 0), p(20, 10));

    assert_eq!(a.overlap(&b), Some(Rect::new(p(10, 0), p(10, 10))));
    assert!(!a.overlaps_strictly(&b));
    assert_eq!(a.overlap(&c), None);
    assert!(a.require_overlap(&c).is_err());

    let crossing = Rect::new(p(-5, 5), p(15, 5));
    assert!(crossing.meets_interior(&a));
    let along_edge = Rect::new(p(0, 10), p(10, 10));
    assert!(!along_edge.meets_interior(&a));
}

#[test]
fn segment_rect_is_centered() {
    assert_eq!(
        Rect::from_segment(p(0, 0), p(30, 0), 4),
        Rect::new(p(0, -2), p(30, 2))
    );
    assert_eq!(
        Rect::from_segment(p(5, 10), p(5, -10), 3),
        Rect::new(p(4, -10), p(7, 10))
    );
}

#[test]
fn rounding_and_snapping() {
    assert_eq!(div_round(14, 10), 1);
    assert_eq!(div_round(15, 10), 2);
    assert_eq!(div_round(-14, 10), -1);
    assert_eq!(div_round(-16, 10), -2);
    assert_eq!(p(14, -16).snap_to_pitch(10), p(10, -20));

    let point = GridPoint::snap(geo::Point::new(1.2344, -0.5), 0.001);
    assert_eq!(point, p(1234, -500));
    assert!((point.to_real(0.001).x() - 1.234).abs() < 1e-9);
}
