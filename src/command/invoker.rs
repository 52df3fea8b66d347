use thiserror::Error;

use crate::{
    command::{
        Command, History, HistoryError, NamedObstruction, NamedWaypoint, StartPoint, ViaOptions,
    },
    geometry::{Coord, Shape},
    route::{OffsetStrategy, Route, ShieldSpec},
    router::{CourseStart, OffsetRoutes, Router, RouterError},
    technology::AccessTechnology,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokerError {
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Router(#[from] RouterError),
    #[error("unknown layer {0:?}")]
    UnknownLayername(String),
}

/// What an executed command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Route(Route),
    Offset(OffsetRoutes),
}

impl Output {
    pub fn routes(&self) -> Vec<&Route> {
        match self {
            Output::Route(route) => vec![route],
            Output::Offset(routes) => routes.routes().collect(),
        }
    }
}

/// Runs commands against a router and keeps their outputs and history.
pub struct Invoker<'a, T: AccessTechnology> {
    router: Router<'a, T>,
    history: History,
    outputs: Vec<Output>,
}

impl<'a, T: AccessTechnology> Invoker<'a, T> {
    pub fn new(router: Router<'a, T>) -> Self {
        Self {
            router,
            history: History::new(),
            outputs: vec![],
        }
    }

    pub fn router(&self) -> &Router<'a, T> {
        &self.router
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn execute(&mut self, command: Command) -> Result<&Output, InvokerError> {
        let output = self.dispatch(&command)?;
        self.history.record(command);
        self.outputs.push(output);
        Ok(&self.outputs[self.outputs.len() - 1])
    }

    /// Drops the output of the last command and forgets its wires.
    pub fn undo(&mut self) -> Result<(), InvokerError> {
        self.history.undo()?;
        self.outputs.pop();

        self.router.clear_routed();
        for output in &self.outputs {
            for route in output.routes() {
                self.router.record(route);
            }
        }

        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), InvokerError> {
        let command = self.history.next_redo()?.clone();
        let output = self.dispatch(&command)?;
        self.outputs.push(output);
        Ok(self.history.redo()?)
    }

    /// Executes every done command of `history` in order, stopping at the
    /// first failure.
    pub fn replay(&mut self, history: History) -> Result<(), InvokerError> {
        let (done, undone) = history.into_commands();

        for command in done {
            self.execute(command)?;
        }

        self.history.restore_undone(undone);
        Ok(())
    }

    fn layer(&self, layername: &str) -> Result<usize, InvokerError> {
        self.router
            .technology()
            .layername_layer(layername)
            .ok_or_else(|| InvokerError::UnknownLayername(layername.to_string()))
    }

    fn layers(&self, layernames: &[String]) -> Result<Vec<usize>, InvokerError> {
        layernames
            .iter()
            .map(|layername| self.layer(layername))
            .collect()
    }

    fn obstructions(&self, obstructions: &[NamedObstruction]) -> Result<Vec<Shape>, InvokerError> {
        obstructions
            .iter()
            .map(|obstruction| -> Result<Shape, InvokerError> {
                Ok(Shape::new(obstruction.rect, self.layer(&obstruction.layer)?))
            })
            .collect()
    }

    fn course_start(&self, start: &StartPoint) -> Result<CourseStart, InvokerError> {
        Ok(CourseStart {
            position: start.position,
            direction: start.direction,
            layer: self.layer(&start.layer)?,
            width: start.width,
        })
    }

    fn queue(&mut self, waypoints: &[NamedWaypoint]) -> Result<(), InvokerError> {
        let layers = waypoints
            .iter()
            .map(|waypoint| self.layer(&waypoint.layer))
            .collect::<Result<Vec<_>, _>>()?;

        for (waypoint, layer) in waypoints.iter().zip(layers) {
            self.router
                .add_waypoints([waypoint.position], layer, waypoint.width)?;
        }

        Ok(())
    }

    fn route_offset(
        &mut self,
        start: &StartPoint,
        waypoints: &[NamedWaypoint],
        strategy: OffsetStrategy,
        vias: ViaOptions,
    ) -> Result<Output, InvokerError> {
        let start = self.course_start(start)?;
        self.queue(waypoints)?;

        Ok(Output::Offset(self.router.route_offset(
            start,
            &strategy,
            vias.enclosure,
            vias.primitive_vias,
        )?))
    }

    /// Runs `command`, leaving no route in progress behind when it fails.
    fn dispatch(&mut self, command: &Command) -> Result<Output, InvokerError> {
        log::debug!("execute {:?}", command);

        let result = self.dispatch_routing(command);
        if result.is_err() {
            self.router.abandon_route();
        }

        result
    }

    fn dispatch_routing(&mut self, command: &Command) -> Result<Output, InvokerError> {
        match command {
            Command::Route {
                start,
                waypoints,
                vias,
            } => {
                let start = self.course_start(start)?;
                self.router
                    .start_route(start.position, start.direction, start.layer, start.width)?;
                self.queue(waypoints)?;

                Ok(Output::Route(
                    self.router.route_all(vias.enclosure, vias.primitive_vias)?,
                ))
            }
            Command::Shielded {
                start,
                waypoints,
                spacing,
                stitch_pitch,
                stitch_width,
                shield_layers,
                vias,
            } => {
                let spec = ShieldSpec {
                    spacing: *spacing,
                    stitch_pitch: *stitch_pitch,
                    stitch_width: *stitch_width,
                    layers: self.layers(shield_layers)?,
                };
                self.route_offset(start, waypoints, OffsetStrategy::Shield(spec), *vias)
            }
            Command::DifferentialPair {
                start,
                waypoints,
                spacing,
                vias,
            } => self.route_offset(
                start,
                waypoints,
                OffsetStrategy::DifferentialPair { spacing: *spacing },
                *vias,
            ),
            Command::Bus {
                start,
                waypoints,
                size,
                spacing,
                vias,
            } => self.route_offset(
                start,
                waypoints,
                OffsetStrategy::Bus {
                    size: *size,
                    spacing: *spacing,
                },
                *vias,
            ),
            Command::GridSearch {
                start,
                end,
                start_layer,
                end_layer,
                layers,
                obstructions,
                bounds,
            } => {
                let start_layer = self.layer(start_layer)?;
                let end_layer = self.layer(end_layer)?;
                let layers = self.layers(layers)?;
                let obstructions = self.obstructions(obstructions)?;

                Ok(Output::Route(self.router.route_grid_search(
                    *start,
                    *end,
                    start_layer,
                    end_layer,
                    &obstructions,
                    &layers,
                    *bounds,
                )?))
            }
            Command::VisibilitySearch {
                start,
                end,
                layer,
                width,
                obstructions,
            } => {
                let layer = self.layer(layer)?;
                let obstructions = self.obstructions(obstructions)?;

                Ok(Output::Route(self.router.route_visibility_search(
                    *start,
                    *end,
                    &obstructions,
                    layer,
                    *width,
                )?))
            }
        }
    }
}

/// Total drawn length of an output, in database units.
pub fn wirelength(output: &Output) -> Coord {
    output.routes().iter().map(|route| route.wirelength()).sum()
}
