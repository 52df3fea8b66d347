use cardinal::{
    commit::{commit, commit_l_route, AccessCanvas, Canvas, CommitError},
    geometry::{Axis, Direction, OverlapRequiredError, Rect, Shape},
    route::EnclosurePolicy,
    router::Router,
};

mod common;

use common::{layer, p, technology};

#[test]
fn primitive_vias_get_landing_pads() {
    let technology = technology();
    let m1 = layer(&technology, "M1");
    let m2 = layer(&technology, "M2");
    let m3 = layer(&technology, "M3");
    let mut router = Router::new(&technology);

    router.start_route(p(0, 0), Direction::PosX, m1, None).unwrap();
    router.add_waypoints([p(30, 0), p(30, 60)], m3, None).unwrap();
    let route = router.route_all(EnclosurePolicy::Uniform, true).unwrap();

    let mut canvas = Canvas::new();
    let committed = commit(&route, &mut canvas).unwrap();

    assert_eq!(committed.shapes.len(), 2);
    assert_eq!(committed.vias, 2);
    assert_eq!(canvas.shapes().len(), 3);

    let pad = canvas.shapes()[2];
    assert_eq!(pad.layer, m2);
    assert_eq!(pad.rect, Rect::new(p(26, -2), p(34, 2)));

    let [lower, upper] = canvas.vias() else {
        panic!("expected two vias, got {:?}", canvas.vias());
    };
    assert_eq!((lower.bottom, lower.top), (0, 2));
    assert_eq!((upper.bottom, upper.top), (2, 1));
    assert_eq!(upper.cuts, vec![Rect::new(p(27, 0), p(33, 2))]);
}

#[test]
fn stacked_via_joins_wires_directly() {
    let technology = technology();
    let m1 = layer(&technology, "M1");
    let m3 = layer(&technology, "M3");
    let mut router = Router::new(&technology);

    router.start_route(p(0, 0), Direction::PosX, m1, None).unwrap();
    router.add_waypoints([p(30, 0), p(30, 60)], m3, None).unwrap();
    let route = router.route_all(EnclosurePolicy::Uniform, false).unwrap();

    let mut canvas = Canvas::new();
    let committed = commit(&route, &mut canvas).unwrap();

    assert_eq!(committed.vias, 1);
    assert_eq!(canvas.shapes().len(), 2);
    assert_eq!(canvas.vias()[0].levels.len(), 2);
    assert_eq!(canvas.vias()[0].cuts.len(), 2);
}

#[test]
fn via_without_wires_gets_pads() {
    let technology = technology();
    let mut router = Router::new(&technology);

    router.start_route(p(0, 0), Direction::PosX, 0, None).unwrap();
    router
        .turn_via(1, Direction::PosY, EnclosurePolicy::Uniform, None)
        .unwrap();
    let route = router.finish_route().unwrap();

    let mut canvas = Canvas::new();
    let committed = commit(&route, &mut canvas).unwrap();

    assert!(committed.shapes.is_empty());
    assert_eq!(committed.vias, 1);
    assert_eq!(
        canvas.shapes().iter().map(|shape| shape.layer).collect::<Vec<_>>(),
        vec![0, 1]
    );
}

#[test]
fn canvas_requires_overlap() {
    let technology = technology();
    let mut router = Router::new(&technology);
    router.start_route(p(0, 0), Direction::PosX, 0, None).unwrap();
    router
        .turn_via(1, Direction::PosX, EnclosurePolicy::Uniform, None)
        .unwrap();
    let levels = router.trace().unwrap().route.vias().next().unwrap().levels.clone();

    let mut canvas = Canvas::new();
    let a = Rect::new(p(0, 0), p(10, 10));
    let b = Rect::new(p(20, 0), p(30, 10));
    let bottom = canvas.add_shape(Shape::new(a, 0));
    let top = canvas.add_shape(Shape::new(b, 1));

    assert_eq!(
        canvas.add_via(bottom, top, &levels),
        Err(OverlapRequiredError(a, b))
    );
    assert!(canvas.vias().is_empty());
}

#[test]
fn l_route_meets_at_corner() {
    let technology = technology();
    let router = Router::new(&technology);
    let start = Shape::new(Rect::new(p(0, 0), p(10, 4)), 0);
    let end = Shape::new(Rect::new(p(40, 20), p(44, 60)), 1);

    let l_route = router
        .route_l(&start, Axis::X, &end, EnclosurePolicy::Asymmetric, None)
        .unwrap();

    assert_eq!(l_route.first.rect, Rect::new(p(0, 0), p(44, 4)));
    assert_eq!(l_route.second.rect, Rect::new(p(40, 0), p(44, 60)));
    assert_eq!(l_route.turn.incoming, Direction::PosX);
    assert_eq!(l_route.turn.outgoing, Direction::PosY);

    let mut canvas = Canvas::new();
    let committed = commit_l_route(&l_route, &mut canvas).unwrap();
    assert_eq!(committed.vias, 1);
    assert_eq!(canvas.vias()[0].cuts, vec![Rect::new(p(41, 1), p(43, 3))]);
}

#[test]
fn l_route_backwards_and_down() {
    let technology = technology();
    let router = Router::new(&technology);
    let start = Shape::new(Rect::new(p(100, 100), p(104, 120)), 0);
    let end = Shape::new(Rect::new(p(0, 0), p(60, 6)), 0);

    let l_route = router
        .route_l(&start, Axis::Y, &end, EnclosurePolicy::Uniform, None)
        .unwrap();

    assert_eq!(l_route.first.rect, Rect::new(p(100, 0), p(104, 120)));
    assert_eq!(l_route.second.rect, Rect::new(p(0, 0), p(104, 6)));
    assert_eq!(l_route.turn.incoming, Direction::NegY);
    assert_eq!(l_route.turn.outgoing, Direction::NegX);
    assert!(!l_route.turn.is_via());

    let mut canvas = Canvas::new();
    assert_eq!(commit_l_route(&l_route, &mut canvas).map(|committed| committed.vias), Ok(0));
}

#[test]
fn l_route_without_via_needs_overlap() {
    let technology = technology();
    let router = Router::new(&technology);
    let start = Shape::new(Rect::new(p(0, 0), p(10, 4)), 0);
    let end = Shape::new(Rect::new(p(40, 20), p(44, 60)), 0);

    let mut l_route = router
        .route_l(&start, Axis::X, &end, EnclosurePolicy::Uniform, None)
        .unwrap();
    l_route.second.rect = Rect::new(p(40, 20), p(44, 60));

    let mut canvas = Canvas::new();
    assert!(matches!(
        commit_l_route(&l_route, &mut canvas),
        Err(CommitError::OverlapRequired(..))
    ));
}
