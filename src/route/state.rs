use thiserror::Error;

use crate::{
    geometry::{Coord, Direction, GridPoint, Handle},
    route::{Route, RouteElement, Waypoint},
};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no route has been started")]
pub struct UninitializedRouteError;

/// Where the route in progress currently ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteState {
    pub position: GridPoint,
    pub direction: Direction,
    /// Anchor of the wire end the next element attaches to.
    pub handle: Handle,
    pub layer: usize,
    pub width: Coord,
}

impl RouteState {
    pub fn new(position: GridPoint, direction: Direction, layer: usize, width: Coord) -> Self {
        Self {
            position,
            direction,
            handle: direction.leading_handle(),
            layer,
            width,
        }
    }

    pub fn waypoint(&self) -> Waypoint {
        Waypoint::new(self.position, self.layer, Some(self.width))
    }
}

/// A route in progress: its head state and what has been emitted so far.
#[derive(Debug, Clone)]
pub struct Trace {
    pub state: RouteState,
    pub route: Route,
}

impl Trace {
    pub fn new(state: RouteState) -> Self {
        Self {
            state,
            route: Route::new(),
        }
    }

    pub fn push(&mut self, element: impl Into<RouteElement>) {
        let element = element.into();
        log::trace!("emit {:?}", element);
        self.route.push(element);
    }

    pub fn finish(self) -> Route {
        self.route
    }
}
