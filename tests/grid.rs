use std::collections::VecDeque;

use cardinal::{
    geometry::{Direction, GridPoint, Rect, Shape},
    route::RouteElement,
    router::{Router, RouterConfig, RouterError},
    search::{search_grid, GridRequest, SearchError, UnreachableTargetError},
};

mod common;

use common::{assert_continuous, grid_technology, layer, p};

const SIZE: i64 = 10;

fn bounds() -> Rect {
    Rect::new(p(0, 0), p(SIZE - 1, SIZE - 1))
}

/// Moves on a plain 10x10 grid, for comparison with the router.
fn bfs_distance(blocked: &[Rect], start: GridPoint, end: GridPoint) -> Option<usize> {
    let free = |point: GridPoint| {
        (0..SIZE).contains(&point.x)
            && (0..SIZE).contains(&point.y)
            && !blocked.iter().any(|rect| rect.contains(point))
    };

    let mut distances = vec![None; (SIZE * SIZE) as usize];
    let index = |point: GridPoint| (point.y * SIZE + point.x) as usize;
    let mut queue = VecDeque::from([start]);
    distances[index(start)] = Some(0);

    while let Some(point) = queue.pop_front() {
        let distance = distances[index(point)].unwrap();

        if point == end {
            return Some(distance);
        }

        for step in [p(1, 0), p(-1, 0), p(0, 1), p(0, -1)] {
            let next = point + step;

            if free(next) && distances[index(next)].is_none() {
                distances[index(next)] = Some(distance + 1);
                queue.push_back(next);
            }
        }
    }

    None
}

fn assert_single_layer_path(blocked: &[Rect], start: GridPoint, end: GridPoint) {
    let technology = grid_technology();
    let g1 = layer(&technology, "G1");
    let obstructions: Vec<Shape> = blocked.iter().map(|rect| Shape::new(*rect, g1)).collect();

    let path = search_grid(
        &technology,
        &GridRequest {
            start,
            end,
            start_layer: g1,
            end_layer: g1,
            obstructions: &obstructions,
            layers: &[g1],
            bounds: Some(bounds()),
        },
        None,
    )
    .unwrap();

    assert_eq!(path.len(), bfs_distance(blocked, start, end).unwrap() + 1);
    assert_eq!(path.first().unwrap().position, start);
    assert_eq!(path.last().unwrap().position, end);

    for (from, to) in path.iter().zip(path.iter().skip(1)) {
        assert_eq!(from.position.manhattan_distance(&to.position), 1);
    }
    for point in &path {
        assert!(!blocked.iter().any(|rect| rect.contains(point.position)));
        assert_eq!(point.width, Some(1));
    }
}

#[test]
fn path_around_block_is_shortest() {
    assert_single_layer_path(&[Rect::new(p(4, 4), p(5, 5))], p(0, 0), p(9, 9));
    assert_single_layer_path(&[Rect::new(p(4, 4), p(5, 5))], p(4, 0), p(5, 9));
}

#[test]
fn path_around_wall_is_shortest() {
    let wall = [Rect::new(p(0, 5), p(8, 5))];

    assert_single_layer_path(&wall, p(0, 0), p(0, 9));
    assert_eq!(bfs_distance(&wall, p(0, 0), p(0, 9)), Some(27));
}

#[test]
fn start_equal_to_end() {
    assert_single_layer_path(&[], p(3, 3), p(3, 3));
}

#[test]
fn enclosed_target_is_unreachable() {
    let technology = grid_technology();
    let g1 = layer(&technology, "G1");
    let mut router = Router::new(&technology);

    let result = router.route_grid_search(
        p(0, 0),
        p(9, 9),
        g1,
        g1,
        &[Shape::new(Rect::new(p(0, 3), p(9, 3)), g1)],
        &[g1],
        Some(bounds()),
    );

    assert_eq!(
        result,
        Err(RouterError::Search(SearchError::Unreachable(
            UnreachableTargetError
        )))
    );
}

#[test]
fn obstructed_start_is_unreachable() {
    let technology = grid_technology();
    let g1 = layer(&technology, "G1");
    let obstructions = [Shape::new(Rect::new(p(0, 0), p(1, 1)), g1)];

    let result = search_grid(
        &technology,
        &GridRequest {
            start: p(0, 0),
            end: p(5, 5),
            start_layer: g1,
            end_layer: g1,
            obstructions: &obstructions,
            layers: &[g1],
            bounds: None,
        },
        None,
    );

    assert_eq!(result, Err(SearchError::Unreachable(UnreachableTargetError)));
}

#[test]
fn endpoint_layers_must_be_routable() {
    let technology = grid_technology();
    let g1 = layer(&technology, "G1");
    let g2 = layer(&technology, "G2");

    let result = search_grid(
        &technology,
        &GridRequest {
            start: p(0, 0),
            end: p(5, 5),
            start_layer: g1,
            end_layer: g2,
            obstructions: &[],
            layers: &[g1],
            bounds: None,
        },
        None,
    );

    assert_eq!(result, Err(SearchError::UnusableLayer(g2)));
}

#[test]
fn endpoint_outside_bounds() {
    let technology = grid_technology();
    let g1 = layer(&technology, "G1");

    let result = search_grid(
        &technology,
        &GridRequest {
            start: p(0, 0),
            end: p(20, 5),
            start_layer: g1,
            end_layer: g1,
            obstructions: &[],
            layers: &[g1],
            bounds: Some(bounds()),
        },
        None,
    );

    assert_eq!(result, Err(SearchError::OutOfBounds(p(20, 5))));
}

#[test]
fn oversized_area_is_rejected() {
    let technology = grid_technology();
    let g1 = layer(&technology, "G1");
    let area = Rect::new(p(0, 0), p(i64::MAX / 4, i64::MAX / 4));

    let result = search_grid(
        &technology,
        &GridRequest {
            start: p(0, 0),
            end: p(1, 1),
            start_layer: g1,
            end_layer: g1,
            obstructions: &[],
            layers: &[g1],
            bounds: Some(area),
        },
        None,
    );

    assert_eq!(result, Err(SearchError::InvalidBounds(area)));
}

#[test]
fn step_limit_stops_search() {
    let technology = grid_technology();
    let g1 = layer(&technology, "G1");
    let config = RouterConfig {
        max_search_steps: Some(3),
        ..Default::default()
    };
    let mut router = Router::with_config(&technology, config);

    let result = router.route_grid_search(
        p(0, 0),
        p(0, 9),
        g1,
        g1,
        &[Shape::new(Rect::new(p(0, 5), p(8, 5)), g1)],
        &[g1],
        Some(bounds()),
    );

    assert_eq!(result, Err(RouterError::Search(SearchError::StepLimit(3))));
}

#[test]
fn wall_is_crossed_on_second_layer() {
    let technology = grid_technology();
    let g1 = layer(&technology, "G1");
    let g2 = layer(&technology, "G2");
    let mut router = Router::new(&technology);

    let route = router
        .route_grid_search(
            p(0, 0),
            p(9, 0),
            g1,
            g1,
            &[Shape::new(Rect::new(p(5, 0), p(5, 9)), g1)],
            &[g1, g2],
            Some(bounds()),
        )
        .unwrap();

    assert_continuous(&route, p(0, 0));
    assert_eq!(route.endpoint(), Some(p(9, 0)));
    assert_eq!(route.vias().count(), 2);
    assert_eq!(route.wirelength(), 9);
    assert!(route
        .segments()
        .filter(|segment| segment.layer == g1)
        .all(|segment| segment.span().1 < 5 || segment.span().0 > 5));
}

#[test]
fn preferred_directions_force_layer_changes() {
    let technology = grid_technology();
    let h = layer(&technology, "H");
    let v = layer(&technology, "V");
    let mut router = Router::new(&technology);

    let route = router
        .route_grid_search(p(0, 0), p(5, 5), h, h, &[], &[h, v], None)
        .unwrap();

    assert_continuous(&route, p(0, 0));
    assert_eq!(route.endpoint(), Some(p(5, 5)));
    assert_eq!(route.wirelength(), 10);
    assert_eq!(route.vias().count(), 2);

    for element in route.elements() {
        if let RouteElement::Segment(segment) = element {
            let expected = if segment.layer == h {
                Direction::PosX
            } else {
                Direction::PosY
            };
            assert_eq!(segment.direction, expected);
        }
    }
}

#[test]
fn routed_wires_block_later_searches() {
    let technology = grid_technology();
    let g1 = layer(&technology, "G1");

    for (avoid_routed, reachable) in [(false, true), (true, false)] {
        let config = RouterConfig {
            avoid_routed,
            ..Default::default()
        };
        let mut router = Router::with_config(&technology, config);

        router.start_route(p(5, 0), Direction::PosY, g1, None).unwrap();
        router.extend_to(p(5, 9), None).unwrap();
        router.finish_route().unwrap();

        let result = router.route_grid_search(p(0, 0), p(9, 0), g1, g1, &[], &[g1], Some(bounds()));
        assert_eq!(result.is_ok(), reachable);
    }
}
