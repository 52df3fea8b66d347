use std::collections::HashMap;

use itertools::Itertools;
use petgraph::{
    graph::{NodeIndex, UnGraph},
    visit::{EdgeRef, IntoEdgeReferences},
};
use rstar::RTree;

use crate::{
    geometry::{shape_envelope, Coord, GridPoint, Handle, Rect, Shape},
    search::{
        astar::{Astar, AstarStrategy},
        SearchError,
    },
    stepper::Step,
};

pub type VisibilityGraph = UnGraph<GridPoint, Coord>;

/// Graph over start, end and the obstruction corners, joined wherever the
/// bounding box of the connecting line stays clear of every obstruction.
#[derive(Debug, Clone)]
pub struct Visibility {
    pub graph: VisibilityGraph,
    pub start: NodeIndex,
    pub end: NodeIndex,
}

impl Visibility {
    pub fn new(start: GridPoint, end: GridPoint, obstructions: &[Shape], layer: usize) -> Self {
        let obstacles: Vec<Shape> = obstructions
            .iter()
            .filter(|obstruction| obstruction.layer == layer)
            .copied()
            .collect();

        let mut graph = VisibilityGraph::default();
        let mut nodes: HashMap<GridPoint, NodeIndex> = HashMap::new();
        let mut vertices = vec![];

        let corners = obstacles.iter().flat_map(|obstacle| {
            [
                Handle::LowerLeft,
                Handle::LowerRight,
                Handle::UpperLeft,
                Handle::UpperRight,
            ]
            .map(|handle| obstacle.rect.handle(handle))
        });

        for point in [start, end].into_iter().chain(corners) {
            if !nodes.contains_key(&point) {
                let node = graph.add_node(point);
                nodes.insert(point, node);
                vertices.push(node);
            }
        }

        let rtree = RTree::bulk_load(obstacles);

        for (a, b) in vertices.iter().tuple_combinations() {
            let (from, to) = (graph[*a], graph[*b]);

            if Self::is_visible(&rtree, layer, from, to) {
                graph.add_edge(*a, *b, from.manhattan_distance(&to));
            }
        }

        Self {
            graph,
            start: nodes[&start],
            end: nodes[&end],
        }
    }

    fn is_visible(rtree: &RTree<Shape>, layer: usize, from: GridPoint, to: GridPoint) -> bool {
        let span = Rect::new(from, to);

        !rtree
            .locate_in_envelope_intersecting(&shape_envelope(&span, layer))
            .any(|obstacle| span.meets_interior(&obstacle.rect))
    }
}

struct ManhattanStrategy {
    goal: NodeIndex,
}

impl AstarStrategy<VisibilityGraph, Coord> for ManhattanStrategy {
    fn is_goal(&mut self, _graph: &VisibilityGraph, node: NodeIndex) -> bool {
        node == self.goal
    }

    fn edge_cost<'a>(
        &mut self,
        _graph: &'a VisibilityGraph,
        edge: <&'a VisibilityGraph as IntoEdgeReferences>::EdgeRef,
    ) -> Option<Coord> {
        Some(*edge.weight())
    }

    fn estimate_cost(&mut self, graph: &VisibilityGraph, node: NodeIndex) -> Coord {
        graph[node].manhattan_distance(&graph[self.goal])
    }
}

/// Shortest Manhattan-cost vertex path from `start` to `end` around the
/// obstructions on `layer`.
pub fn search_visibility(
    start: GridPoint,
    end: GridPoint,
    obstructions: &[Shape],
    layer: usize,
    max_steps: Option<usize>,
) -> Result<Vec<GridPoint>, SearchError> {
    let visibility = Visibility::new(start, end, obstructions, layer);
    log::debug!(
        "visibility graph has {} vertices and {} edges",
        visibility.graph.node_count(),
        visibility.graph.edge_count()
    );

    let mut strategy = ManhattanStrategy {
        goal: visibility.end,
    };
    let mut astar = Astar::new(visibility.graph, visibility.start, &mut strategy);

    let path = match max_steps {
        Some(limit) => astar
            .finish_within(&mut strategy, limit)?
            .ok_or(SearchError::StepLimit(limit))?,
        None => astar.finish(&mut strategy)?,
    };

    Ok(path.nodes.iter().map(|node| astar.graph[*node]).collect())
}
