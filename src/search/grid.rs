use std::collections::VecDeque;
use std::ops::ControlFlow;

use crate::{
    geometry::{snap_to_pitch, Axis, Coord, GridPoint, Rect, Shape},
    route::Waypoint,
    search::{SearchError, UnreachableTargetError},
    stepper::Step,
    technology::{AccessTechnology, PreferredDirection},
    track::Track,
};

/// Upper bound on the cells of one layer grid.
pub const MAX_GRID_CELLS: usize = 1 << 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Obstructed,
    Start,
    End,
    /// Distance from the start, in moves.
    Label(u32),
    /// Already taken by the backtracked path.
    Visited,
}

impl CellState {
    pub fn label(self) -> Option<u32> {
        match self {
            CellState::Start => Some(0),
            CellState::Label(label) => Some(label),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub layer: usize,
    pub column: i64,
    pub row: i64,
}

#[derive(Debug, Clone)]
struct LayerGrid {
    layer: usize,
    columns: Track,
    rows: Track,
    column_count: i64,
    row_count: i64,
    direction: PreferredDirection,
    width: Coord,
    cells: Vec<CellState>,
}

impl LayerGrid {
    fn contains(&self, column: i64, row: i64) -> bool {
        (0..self.column_count).contains(&column) && (0..self.row_count).contains(&row)
    }

    fn index(&self, column: i64, row: i64) -> Option<usize> {
        self.contains(column, row)
            .then(|| (row * self.column_count + column) as usize)
    }

    fn cell_near(&self, point: GridPoint) -> Option<GridCell> {
        let column = self.columns.nearest(point.x);
        let row = self.rows.nearest(point.y);

        self.contains(column, row).then_some(GridCell {
            layer: self.layer,
            column,
            row,
        })
    }

    fn point(&self, column: i64, row: i64) -> GridPoint {
        GridPoint::new(self.columns.coord(column), self.rows.coord(row))
    }
}

/// Per-layer occupancy grids over a rectangular routing area.
#[derive(Debug, Clone)]
pub struct RoutingGrid {
    layers: Vec<LayerGrid>,
}

impl RoutingGrid {
    pub fn new(
        technology: &impl AccessTechnology,
        layers: &[usize],
        bounds: Rect,
    ) -> Result<Self, SearchError> {
        let mut layers = layers.to_vec();
        layers.sort_unstable();
        layers.dedup();

        let grids = layers
            .into_iter()
            .map(|layer| -> Result<LayerGrid, SearchError> {
                let rules = technology.layer_rules(layer)?;
                let pitch = rules.spacing;

                if pitch <= 0 {
                    return Err(SearchError::InvalidPitch(layer));
                }

                let columns = Track::new(Axis::X, pitch, snap_to_pitch(bounds.ll().x, pitch));
                let rows = Track::new(Axis::Y, pitch, snap_to_pitch(bounds.ll().y, pitch));
                let column_count = columns.nearest(bounds.ur().x) + 1;
                let row_count = rows.nearest(bounds.ur().y) + 1;
                let cell_count = (column_count > 0 && row_count > 0)
                    .then(|| column_count.checked_mul(row_count))
                    .flatten()
                    .and_then(|count| usize::try_from(count).ok())
                    .filter(|&count| count <= MAX_GRID_CELLS)
                    .ok_or(SearchError::InvalidBounds(bounds))?;

                Ok(LayerGrid {
                    layer,
                    columns,
                    rows,
                    column_count,
                    row_count,
                    direction: rules.direction,
                    width: rules.width,
                    cells: vec![CellState::Empty; cell_count],
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { layers: grids })
    }

    fn grid(&self, layer: usize) -> Option<&LayerGrid> {
        self.layers.iter().find(|grid| grid.layer == layer)
    }

    fn grid_mut(&mut self, layer: usize) -> Option<&mut LayerGrid> {
        self.layers.iter_mut().find(|grid| grid.layer == layer)
    }

    pub fn has_layer(&self, layer: usize) -> bool {
        self.grid(layer).is_some()
    }

    /// Cell nearest to `point` on `layer`, if inside the grid.
    pub fn cell_at(&self, layer: usize, point: GridPoint) -> Option<GridCell> {
        self.grid(layer)?.cell_near(point)
    }

    pub fn dimensions(&self, layer: usize) -> Option<(i64, i64)> {
        self.grid(layer)
            .map(|grid| (grid.column_count, grid.row_count))
    }

    pub fn point(&self, cell: GridCell) -> Option<GridPoint> {
        Some(self.grid(cell.layer)?.point(cell.column, cell.row))
    }

    pub fn width(&self, layer: usize) -> Option<Coord> {
        Some(self.grid(layer)?.width)
    }

    pub fn state(&self, cell: GridCell) -> Option<CellState> {
        let grid = self.grid(cell.layer)?;
        Some(grid.cells[grid.index(cell.column, cell.row)?])
    }

    pub fn set_state(&mut self, cell: GridCell, state: CellState) {
        if let Some(grid) = self.grid_mut(cell.layer) {
            if let Some(index) = grid.index(cell.column, cell.row) {
                grid.cells[index] = state;
            }
        }
    }

    /// Marks every cell covered by `shape`, clipped to the grid.
    pub fn obstruct(&mut self, shape: &Shape) {
        let Some(grid) = self.grid_mut(shape.layer) else {
            return;
        };

        let first_column = grid.columns.nearest(shape.rect.ll().x).max(0);
        let last_column = grid.columns.nearest(shape.rect.ur().x).min(grid.column_count - 1);
        let first_row = grid.rows.nearest(shape.rect.ll().y).max(0);
        let last_row = grid.rows.nearest(shape.rect.ur().y).min(grid.row_count - 1);

        for row in first_row..=last_row {
            for column in first_column..=last_column {
                if let Some(index) = grid.index(column, row) {
                    grid.cells[index] = CellState::Obstructed;
                }
            }
        }
    }

    fn adjacent_grids(&self, layer: usize) -> impl Iterator<Item = &LayerGrid> + '_ {
        self.layers
            .iter()
            .filter(move |grid| grid.layer + 1 == layer || layer + 1 == grid.layer)
    }

    /// Cells one move away: along the preferred directions of the layer,
    /// and the nearest cell on each adjacent routing layer.
    pub fn neighbors(&self, cell: GridCell) -> Vec<GridCell> {
        let Some(grid) = self.grid(cell.layer) else {
            return vec![];
        };

        let mut neighbors = vec![];
        let mut offsets = vec![];

        if grid.direction.allows(Axis::X) {
            offsets.extend([(1, 0), (-1, 0)]);
        }
        if grid.direction.allows(Axis::Y) {
            offsets.extend([(0, 1), (0, -1)]);
        }

        for (dc, dr) in offsets {
            let (column, row) = (cell.column + dc, cell.row + dr);

            if grid.contains(column, row) {
                neighbors.push(GridCell {
                    layer: cell.layer,
                    column,
                    row,
                });
            }
        }

        let point = grid.point(cell.column, cell.row);
        neighbors.extend(
            self.adjacent_grids(cell.layer)
                .filter_map(|other| other.cell_near(point)),
        );

        neighbors
    }

    /// Cells on adjacent layers whose nearest cell on this layer is `cell`.
    fn preimages(&self, cell: GridCell) -> Vec<GridCell> {
        let Some(grid) = self.grid(cell.layer) else {
            return vec![];
        };

        let center = grid.point(cell.column, cell.row);
        let reach = GridPoint::new(grid.columns.pitch / 2, grid.rows.pitch / 2);
        let mut preimages = vec![];

        for other in self.adjacent_grids(cell.layer) {
            let low = center - reach;
            let high = center + reach;

            for row in other.rows.nearest(low.y) - 1..=other.rows.nearest(high.y) + 1 {
                for column in other.columns.nearest(low.x) - 1..=other.columns.nearest(high.x) + 1 {
                    if !other.contains(column, row) {
                        continue;
                    }

                    if grid.cell_near(other.point(column, row)) == Some(cell) {
                        preimages.push(GridCell {
                            layer: other.layer,
                            column,
                            row,
                        });
                    }
                }
            }
        }

        preimages
    }

    /// Cells the wave may have reached `cell` from.
    fn predecessors(&self, cell: GridCell) -> Vec<GridCell> {
        let mut candidates: Vec<GridCell> = self
            .neighbors(cell)
            .into_iter()
            .filter(|neighbor| neighbor.layer == cell.layer)
            .collect();
        candidates.extend(self.preimages(cell));
        candidates
    }
}

/// Breadth-first labeling from the start cell until the end cell is
/// reached.
#[derive(Debug, Clone)]
pub struct GridWave {
    start: GridCell,
    end: GridCell,
    frontier: VecDeque<GridCell>,
}

impl GridWave {
    pub fn new(
        grid: &mut RoutingGrid,
        start: GridCell,
        end: GridCell,
    ) -> Result<Self, UnreachableTargetError> {
        for cell in [start, end] {
            if grid.state(cell) != Some(CellState::Empty) {
                return Err(UnreachableTargetError);
            }
        }

        grid.set_state(end, CellState::End);
        grid.set_state(start, CellState::Start);

        Ok(Self {
            start,
            end,
            frontier: VecDeque::from([start]),
        })
    }

    /// Walks back from the end cell to the start, always moving to the
    /// unvisited neighbor with the smallest label.
    pub fn backtrack(&self, grid: &mut RoutingGrid) -> Result<Vec<GridCell>, UnreachableTargetError> {
        let mut current = self.end;
        let mut label = grid
            .state(current)
            .and_then(CellState::label)
            .ok_or(UnreachableTargetError)?;
        let mut path = vec![current];

        while current != self.start {
            grid.set_state(current, CellState::Visited);

            (label, current) = grid
                .predecessors(current)
                .into_iter()
                .filter_map(|cell| Some((grid.state(cell)?.label()?, cell)))
                .filter(|(candidate, _)| *candidate < label)
                .min_by_key(|(candidate, _)| *candidate)
                .ok_or(UnreachableTargetError)?;

            path.push(current);
        }

        path.reverse();
        Ok(path)
    }
}

impl Step<RoutingGrid, u32> for GridWave {
    type Error = UnreachableTargetError;

    fn step(&mut self, grid: &mut RoutingGrid) -> Result<ControlFlow<u32>, UnreachableTargetError> {
        let Some(cell) = self.frontier.pop_front() else {
            return Err(UnreachableTargetError);
        };

        let Some(label) = grid.state(cell).and_then(CellState::label) else {
            return Ok(ControlFlow::Continue(()));
        };

        if cell == self.end {
            return Ok(ControlFlow::Break(label));
        }

        for neighbor in grid.neighbors(cell) {
            match grid.state(neighbor) {
                Some(CellState::Empty) => {
                    grid.set_state(neighbor, CellState::Label(label + 1));
                    self.frontier.push_back(neighbor);
                }
                Some(CellState::End) => {
                    grid.set_state(neighbor, CellState::Label(label + 1));
                    return Ok(ControlFlow::Break(label + 1));
                }
                _ => (),
            }
        }

        Ok(ControlFlow::Continue(()))
    }
}

/// A request for the grid wave router.
#[derive(Debug, Clone, Copy)]
pub struct GridRequest<'a> {
    pub start: GridPoint,
    pub end: GridPoint,
    pub start_layer: usize,
    pub end_layer: usize,
    pub obstructions: &'a [Shape],
    pub layers: &'a [usize],
    /// Routing area, the box spanned by start and end when unset.
    pub bounds: Option<Rect>,
}

/// Finds a shortest cell path and returns it as waypoints at each layer's
/// default width, start first.
pub fn search_grid(
    technology: &impl AccessTechnology,
    request: &GridRequest,
    max_steps: Option<usize>,
) -> Result<Vec<Waypoint>, SearchError> {
    for layer in [request.start_layer, request.end_layer] {
        if !request.layers.contains(&layer) {
            return Err(SearchError::UnusableLayer(layer));
        }
    }

    let start = request
        .start
        .snap_to_pitch(technology.layer_rules(request.start_layer)?.spacing);
    let end = request
        .end
        .snap_to_pitch(technology.layer_rules(request.end_layer)?.spacing);
    let bounds = request.bounds.unwrap_or_else(|| Rect::new(start, end));

    let mut grid = RoutingGrid::new(technology, request.layers, bounds)?;

    for obstruction in request.obstructions {
        grid.obstruct(obstruction);
    }

    let start_cell = grid
        .cell_at(request.start_layer, start)
        .ok_or(SearchError::OutOfBounds(start))?;
    let end_cell = grid
        .cell_at(request.end_layer, end)
        .ok_or(SearchError::OutOfBounds(end))?;

    let mut wave = GridWave::new(&mut grid, start_cell, end_cell)?;

    let length = match max_steps {
        Some(limit) => wave
            .finish_within(&mut grid, limit)?
            .ok_or(SearchError::StepLimit(limit))?,
        None => wave.finish(&mut grid)?,
    };
    log::debug!("grid wave reached the end after {} moves", length);

    let cells = wave.backtrack(&mut grid)?;

    cells
        .into_iter()
        .map(|cell| -> Result<Waypoint, SearchError> {
            let position = grid.point(cell).ok_or(UnreachableTargetError)?;
            Ok(Waypoint::new(position, cell.layer, grid.width(cell.layer)))
        })
        .collect()
}
