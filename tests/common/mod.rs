use cardinal::{
    geometry::GridPoint,
    route::{GetEndpoint, Route, RouteElement},
    technology::{AccessTechnology, Technology},
};

/// Five metals with alternating preferred directions. M4 has no via up to
/// M5.
pub const STACK: &str = r#"{
    "resolution": 0.001,
    "layers": [
        {"name": "M1", "spacing": 10, "width": 4, "direction": "x"},
        {"name": "M2", "spacing": 10, "width": 4, "direction": "y"},
        {"name": "M3", "spacing": 20, "width": 6, "direction": "x"},
        {"name": "M4", "spacing": 20, "width": 6, "direction": "y"},
        {"name": "M5", "spacing": 20, "width": 6, "direction": "x"}
    ],
    "vias": [
        {"name": "V1", "bottom": "M1", "top": "M2", "cut_size": 2, "cut_pitch": 4,
         "uniform_enclosure": 1, "asymmetric_enclosure": {"large": 3, "small": 1}},
        {"name": "V2", "bottom": "M2", "top": "M3", "cut_size": 2, "cut_pitch": 4,
         "uniform_enclosure": 1, "asymmetric_enclosure": {"large": 3, "small": 1},
         "default_array": {"columns": 2, "rows": 1}},
        {"name": "V3", "bottom": "M3", "top": "M4", "cut_size": 4, "cut_pitch": 8,
         "uniform_enclosure": 2, "asymmetric_enclosure": {"large": 5, "small": 1}}
    ]
}"#;

/// Unit-pitch layers for grid searches. G1 and G2 route both ways, H only
/// along x and V only along y.
pub const GRID_STACK: &str = r#"{
    "layers": [
        {"name": "G1", "spacing": 1, "width": 1, "direction": "xy"},
        {"name": "G2", "spacing": 1, "width": 1, "direction": "xy"},
        {"name": "H", "spacing": 1, "width": 1, "direction": "x"},
        {"name": "V", "spacing": 1, "width": 1, "direction": "y"}
    ],
    "vias": [
        {"name": "GV", "bottom": "G1", "top": "G2", "cut_size": 1, "cut_pitch": 2,
         "uniform_enclosure": 0, "asymmetric_enclosure": {"large": 1, "small": 0}},
        {"name": "HV", "bottom": "H", "top": "V", "cut_size": 1, "cut_pitch": 2,
         "uniform_enclosure": 0, "asymmetric_enclosure": {"large": 1, "small": 0}}
    ]
}"#;

pub fn technology() -> Technology {
    Technology::from_json_str(STACK).unwrap()
}

pub fn grid_technology() -> Technology {
    Technology::from_json_str(GRID_STACK).unwrap()
}

pub fn layer(technology: &impl AccessTechnology, layername: &str) -> usize {
    technology.layername_layer(layername).unwrap()
}

pub fn p(x: i64, y: i64) -> GridPoint {
    GridPoint::new(x, y)
}

/// Checks that every element attaches where the previous one ended and
/// that segments are axis-aligned and non-empty.
pub fn assert_continuous(route: &Route, start: GridPoint) {
    let mut position = start;

    for element in route.elements() {
        match element {
            RouteElement::Segment(segment) => {
                assert_eq!(segment.start, position, "segment {:?} is detached", segment);
                assert!(segment.start.x == segment.end.x || segment.start.y == segment.end.y);
                assert_ne!(segment.start, segment.end);
            }
            other => assert_eq!(other.endpoint(), position),
        }

        position = element.endpoint();
    }
}
