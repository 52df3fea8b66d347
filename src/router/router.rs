use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geometry::{Axis, Coord, Direction, GridPoint, Rect, Shape},
    route::{
        l_route, normalize, route_cardinal, stitch_positions, EnclosurePolicy, LRoute,
        OffsetCourse, OffsetStrategy, Route, RouteError, RouteState, Segment, ShieldSpec, Trace,
        Tracer, UninitializedRouteError, ViaStyle, Waypoint,
    },
    router::RouterConfig,
    search::{search_grid, search_visibility, GridRequest, SearchError, UnreachableTargetError},
    technology::{AccessTechnology, ViaArray},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Where an offset-family route starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStart {
    pub position: GridPoint,
    pub direction: Direction,
    pub layer: usize,
    #[serde(default)]
    pub width: Option<Coord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetRoute {
    /// Distance from the primary course, positive to the left of travel.
    pub offset: Coord,
    pub route: Route,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetRoutes {
    pub primary: Option<Route>,
    /// Derived routes in placement order.
    pub courses: Vec<OffsetRoute>,
    pub stitches: Route,
}

impl OffsetRoutes {
    pub fn routes(&self) -> impl Iterator<Item = &Route> + '_ {
        self.primary
            .iter()
            .chain(self.courses.iter().map(|course| &course.route))
            .chain(std::iter::once(&self.stitches))
    }

    /// Derived routes ordered by offset, lowest first.
    pub fn by_offset(&self) -> Vec<&OffsetRoute> {
        let mut courses: Vec<&OffsetRoute> = self.courses.iter().collect();
        courses.sort_by_key(|course| course.offset);
        courses
    }
}

/// Entry point for all routing calls. Keeps the route in progress and the
/// waypoints queued for it.
pub struct Router<'a, T: AccessTechnology> {
    tracer: Tracer<'a, T>,
    config: RouterConfig,
    trace: Option<Trace>,
    waypoints: Vec<Waypoint>,
    routed: Vec<Shape>,
}

impl<'a, T: AccessTechnology> Router<'a, T> {
    pub fn new(technology: &'a T) -> Self {
        Self::with_config(technology, RouterConfig::default())
    }

    pub fn with_config(technology: &'a T, config: RouterConfig) -> Self {
        Self {
            tracer: Tracer::new(technology),
            config,
            trace: None,
            waypoints: vec![],
            routed: vec![],
        }
    }

    pub fn technology(&self) -> &'a T {
        self.tracer.technology
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The route in progress, including what a failed call left behind.
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    pub fn state(&self) -> Option<&RouteState> {
        self.trace.as_ref().map(|trace| &trace.state)
    }

    pub fn pending_waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Wire shapes of every route finished so far.
    pub fn routed(&self) -> &[Shape] {
        &self.routed
    }

    pub fn record(&mut self, route: &Route) {
        self.routed.extend(route.shapes());
    }

    pub fn clear_routed(&mut self) {
        self.routed.clear();
    }

    /// Drops the route in progress and the queued waypoints.
    pub fn abandon_route(&mut self) {
        self.trace = None;
        self.waypoints.clear();
    }

    pub fn start_route(
        &mut self,
        position: GridPoint,
        direction: Direction,
        layer: usize,
        width: Option<Coord>,
    ) -> Result<(), RouterError> {
        self.trace = Some(self.tracer.start(position, direction, layer, width)?);
        self.waypoints.clear();
        Ok(())
    }

    fn trace_mut(trace: &mut Option<Trace>) -> Result<&mut Trace, RouteError> {
        trace
            .as_mut()
            .ok_or(RouteError::Uninitialized(UninitializedRouteError))
    }

    pub fn extend_to(
        &mut self,
        position: GridPoint,
        width: Option<Coord>,
    ) -> Result<Option<Segment>, RouterError> {
        let trace = Self::trace_mut(&mut self.trace)?;
        Ok(self.tracer.extend(trace, position, width))
    }

    pub fn turn_via(
        &mut self,
        layer: usize,
        direction: Direction,
        policy: EnclosurePolicy,
        array: Option<ViaArray>,
    ) -> Result<(), RouterError> {
        let style = ViaStyle::from_primitive(self.config.primitive_vias);
        let trace = Self::trace_mut(&mut self.trace)?;
        Ok(self
            .tracer
            .turn_via(trace, layer, direction, policy, style, array)?)
    }

    /// Queues points to be reached on `layer`.
    pub fn add_waypoints(
        &mut self,
        points: impl IntoIterator<Item = GridPoint>,
        layer: usize,
        width: Option<Coord>,
    ) -> Result<(), RouterError> {
        self.technology()
            .layer_rules(layer)
            .map_err(RouteError::from)?;
        self.waypoints.extend(
            points
                .into_iter()
                .map(|point| Waypoint::new(point, layer, width)),
        );
        Ok(())
    }

    /// Routes the queued waypoints from the head of the started route and
    /// finishes it. On failure the partial route stays in [`Router::trace`].
    pub fn route_all(
        &mut self,
        policy: EnclosurePolicy,
        primitive_vias: bool,
    ) -> Result<Route, RouterError> {
        let trace = Self::trace_mut(&mut self.trace)?;
        let waypoints = normalize(trace.state.direction, trace.state.waypoint(), &self.waypoints);
        log::debug!(
            "route {} waypoints from {:?}",
            waypoints.len(),
            trace.state.position
        );

        route_cardinal(
            &self.tracer,
            trace,
            &waypoints,
            policy,
            ViaStyle::from_primitive(primitive_vias),
        )?;

        self.waypoints.clear();
        self.finish_route()
    }

    /// Hands over the route in progress.
    pub fn finish_route(&mut self) -> Result<Route, RouterError> {
        let trace = self
            .trace
            .take()
            .ok_or(RouteError::Uninitialized(UninitializedRouteError))?;
        let route = trace.finish();
        self.record(&route);
        Ok(route)
    }

    /// Routes the queued waypoints as a family of parallel courses. The queue
    /// is consumed even when routing fails.
    pub fn route_offset(
        &mut self,
        start: CourseStart,
        strategy: &OffsetStrategy,
        policy: EnclosurePolicy,
        primitive_vias: bool,
    ) -> Result<OffsetRoutes, RouterError> {
        let style = ViaStyle::from_primitive(primitive_vias);
        let head = self
            .tracer
            .start(start.position, start.direction, start.layer, start.width)?;
        let queued = std::mem::take(&mut self.waypoints);
        let waypoints = normalize(start.direction, head.state.waypoint(), &queued);
        let plan = strategy.plan(OffsetCourse::primary(start.direction, waypoints))?;
        log::debug!(
            "route {} offset courses ({} primary)",
            plan.courses.len(),
            if plan.primary.is_some() { "with" } else { "without" }
        );

        let mut routes = OffsetRoutes {
            primary: plan
                .primary
                .as_ref()
                .map(|course| self.route_course(course, policy, style))
                .transpose()?,
            ..Default::default()
        };

        for course in &plan.courses {
            routes.courses.push(OffsetRoute {
                offset: course.offset,
                route: self.route_course(course, policy, style)?,
            });
        }

        if let (OffsetStrategy::Shield(spec), [first, second]) =
            (strategy, routes.courses.as_slice())
        {
            routes.stitches = self.stitch(&first.route, &second.route, spec, head.state.width)?;
        }

        for route in routes.routes() {
            self.routed.extend(route.shapes());
        }

        Ok(routes)
    }

    pub fn route_shielded(
        &mut self,
        start: CourseStart,
        shield: ShieldSpec,
        policy: EnclosurePolicy,
        primitive_vias: bool,
    ) -> Result<OffsetRoutes, RouterError> {
        self.route_offset(start, &OffsetStrategy::Shield(shield), policy, primitive_vias)
    }

    pub fn route_differential_pair(
        &mut self,
        start: CourseStart,
        spacing: Coord,
        policy: EnclosurePolicy,
        primitive_vias: bool,
    ) -> Result<OffsetRoutes, RouterError> {
        self.route_offset(
            start,
            &OffsetStrategy::DifferentialPair { spacing },
            policy,
            primitive_vias,
        )
    }

    pub fn route_bus(
        &mut self,
        start: CourseStart,
        size: usize,
        spacing: Coord,
        policy: EnclosurePolicy,
        primitive_vias: bool,
    ) -> Result<OffsetRoutes, RouterError> {
        self.route_offset(
            start,
            &OffsetStrategy::Bus { size, spacing },
            policy,
            primitive_vias,
        )
    }

    fn route_course(
        &self,
        course: &OffsetCourse,
        policy: EnclosurePolicy,
        style: ViaStyle,
    ) -> Result<Route, RouteError> {
        let Some(first) = course.waypoints.first() else {
            return Err(RouteError::DegenerateCourse(0));
        };

        let mut trace =
            self.tracer
                .start(first.position, course.start_direction, first.layer, first.width)?;
        route_cardinal(&self.tracer, &mut trace, &course.waypoints, policy, style)?;
        Ok(trace.finish())
    }

    /// Perpendicular wires joining two shield rails, with vias down to each
    /// rail when drawn on another layer.
    fn stitch(
        &self,
        first: &Route,
        second: &Route,
        spec: &ShieldSpec,
        width: Coord,
    ) -> Result<Route, RouteError> {
        let stitch_width = spec.stitch_width.unwrap_or(width);
        let mut stitches = Route::new();

        for (a, b) in first.segments().zip(second.segments()) {
            let layers = if spec.layers.is_empty() {
                vec![a.layer]
            } else {
                spec.layers.clone()
            };

            for (from, to) in stitch_positions(a, b, stitch_width, spec.stitch_pitch) {
                let direction = Direction::between(from, to, Direction::new(a.axis().other(), true));

                for &layer in &layers {
                    let mut trace = self.tracer.start(from, direction, a.layer, Some(stitch_width))?;
                    self.tracer.turn_via(
                        &mut trace,
                        layer,
                        direction,
                        self.config.enclosure,
                        ViaStyle::Stack,
                        None,
                    )?;
                    self.tracer.extend(&mut trace, to, None);
                    self.tracer.turn_via(
                        &mut trace,
                        b.layer,
                        direction,
                        self.config.enclosure,
                        ViaStyle::Stack,
                        None,
                    )?;
                    stitches.extend(trace.finish());
                }
            }
        }

        Ok(stitches)
    }

    fn obstructions_with_routed(&self, obstructions: &[Shape]) -> Vec<Shape> {
        let mut all = obstructions.to_vec();

        if self.config.avoid_routed {
            all.extend_from_slice(&self.routed);
        }

        all
    }

    /// Finds a path with the grid wave router and draws it.
    #[allow(clippy::too_many_arguments)]
    pub fn route_grid_search(
        &mut self,
        start: GridPoint,
        end: GridPoint,
        start_layer: usize,
        end_layer: usize,
        obstructions: &[Shape],
        layers: &[usize],
        bounds: Option<Rect>,
    ) -> Result<Route, RouterError> {
        let obstructions = self.obstructions_with_routed(obstructions);
        let request = GridRequest {
            start,
            end,
            start_layer,
            end_layer,
            obstructions: &obstructions,
            layers,
            bounds,
        };

        let path = search_grid(self.technology(), &request, self.config.max_search_steps)?;
        self.route_path(&path)
    }

    /// Finds a path over the visibility graph of the obstructions on
    /// `layer` and draws it.
    pub fn route_visibility_search(
        &mut self,
        start: GridPoint,
        end: GridPoint,
        obstructions: &[Shape],
        layer: usize,
        width: Option<Coord>,
    ) -> Result<Route, RouterError> {
        self.technology()
            .layer_rules(layer)
            .map_err(RouteError::from)?;

        let obstructions = self.obstructions_with_routed(obstructions);
        let points = search_visibility(
            start,
            end,
            &obstructions,
            layer,
            self.config.max_search_steps,
        )?;
        let path: Vec<Waypoint> = points
            .into_iter()
            .map(|point| Waypoint::new(point, layer, width))
            .collect();

        self.route_path(&path)
    }

    fn route_path(&mut self, path: &[Waypoint]) -> Result<Route, RouterError> {
        let Some((first, rest)) = path.split_first() else {
            return Err(SearchError::from(UnreachableTargetError).into());
        };

        let direction = rest
            .iter()
            .find(|point| point.position != first.position)
            .map(|point| Direction::of_hop(first.position, point.position))
            .unwrap_or(Direction::PosX);

        let mut trace = self
            .tracer
            .start(first.position, direction, first.layer, first.width)?;
        let waypoints = normalize(direction, trace.state.waypoint(), rest);
        route_cardinal(
            &self.tracer,
            &mut trace,
            &waypoints,
            self.config.enclosure,
            ViaStyle::from_primitive(self.config.primitive_vias),
        )?;

        let route = trace.finish();
        self.record(&route);
        Ok(route)
    }

    /// Joins two shapes with an L of stretched copies.
    pub fn route_l(
        &self,
        start: &Shape,
        start_axis: Axis,
        end: &Shape,
        policy: EnclosurePolicy,
        array: Option<ViaArray>,
    ) -> Result<LRoute, RouterError> {
        Ok(l_route(
            self.technology(),
            start,
            start_axis,
            end,
            policy,
            array,
        )?)
    }
}
