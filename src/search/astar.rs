/**
 *
 * Copied and substantially modified from petgraph's scored.rs and algo/astar.rs.
 *
 * Copyright (c) 2015
 **/
use std::cmp::Ordering;
use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;
use std::ops::ControlFlow;

use petgraph::algo::Measure;
use petgraph::visit::{EdgeRef, GraphBase, IntoEdgeReferences, IntoEdges};

use crate::{search::UnreachableTargetError, stepper::Step};

/// Heap entry ordered so that the lowest score pops first.
#[derive(Copy, Clone, Debug)]
pub struct MinScored<K, T>(pub K, pub T);

impl<K: Ord, T> PartialEq for MinScored<K, T> {
    fn eq(&self, other: &MinScored<K, T>) -> bool {
        self.0 == other.0
    }
}

impl<K: Ord, T> Eq for MinScored<K, T> {}

impl<K: Ord, T> PartialOrd for MinScored<K, T> {
    fn partial_cmp(&self, other: &MinScored<K, T>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, T> Ord for MinScored<K, T> {
    fn cmp(&self, other: &MinScored<K, T>) -> Ordering {
        other.0.cmp(&self.0)
    }
}

pub struct PathTracker<G>
where
    G: GraphBase,
    G::NodeId: Eq + Hash,
{
    came_from: HashMap<G::NodeId, G::NodeId>,
}

impl<G> PathTracker<G>
where
    G: GraphBase,
    G::NodeId: Eq + Hash,
{
    fn new() -> PathTracker<G> {
        PathTracker {
            came_from: HashMap::new(),
        }
    }

    fn set_predecessor(&mut self, node: G::NodeId, previous: G::NodeId) {
        self.came_from.insert(node, previous);
    }

    pub fn reconstruct_path_to(&self, last: G::NodeId) -> Vec<G::NodeId> {
        let mut path = vec![last];

        let mut current = last;
        while let Some(&previous) = self.came_from.get(&current) {
            path.push(previous);
            current = previous;
        }

        path.reverse();

        path
    }
}

pub trait AstarStrategy<G, K>
where
    G: GraphBase,
    G::NodeId: Eq + Hash,
    for<'a> &'a G: IntoEdges<NodeId = G::NodeId>,
    K: Measure + Ord + Copy,
{
    fn is_goal(&mut self, graph: &G, node: G::NodeId) -> bool;
    fn edge_cost<'a>(
        &mut self,
        graph: &'a G,
        edge: <&'a G as IntoEdgeReferences>::EdgeRef,
    ) -> Option<K>;
    fn estimate_cost(&mut self, graph: &G, node: G::NodeId) -> K;
}

/// Total cost and node sequence of a found path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstarPath<K, N> {
    pub cost: K,
    pub nodes: Vec<N>,
}

pub struct Astar<G, K>
where
    G: GraphBase,
    G::NodeId: Eq + Hash,
    for<'a> &'a G: IntoEdges<NodeId = G::NodeId>,
    K: Measure + Ord + Copy,
{
    pub graph: G,
    pub visit_next: BinaryHeap<MinScored<K, G::NodeId>>,
    pub scores: HashMap<G::NodeId, K>,
    pub estimate_scores: HashMap<G::NodeId, K>,
    pub path_tracker: PathTracker<G>,
}

impl<G, K> Astar<G, K>
where
    G: GraphBase,
    G::NodeId: Eq + Hash,
    for<'a> &'a G: IntoEdges<NodeId = G::NodeId>,
    K: Measure + Ord + Copy,
{
    pub fn new(graph: G, start: G::NodeId, strategy: &mut impl AstarStrategy<G, K>) -> Self {
        let mut this = Self {
            graph,
            visit_next: BinaryHeap::new(),
            scores: HashMap::new(),
            estimate_scores: HashMap::new(),
            path_tracker: PathTracker::<G>::new(),
        };

        this.scores.insert(start, K::default());
        this.visit_next
            .push(MinScored(strategy.estimate_cost(&this.graph, start), start));
        this
    }
}

impl<G, K, S> Step<S, AstarPath<K, G::NodeId>> for Astar<G, K>
where
    G: GraphBase,
    G::NodeId: Eq + Hash,
    for<'a> &'a G: IntoEdges<NodeId = G::NodeId>,
    K: Measure + Ord + Copy,
    S: AstarStrategy<G, K>,
{
    type Error = UnreachableTargetError;

    fn step(
        &mut self,
        strategy: &mut S,
    ) -> Result<ControlFlow<AstarPath<K, G::NodeId>>, UnreachableTargetError> {
        let Some(MinScored(estimate_score, node)) = self.visit_next.pop() else {
            return Err(UnreachableTargetError);
        };

        if strategy.is_goal(&self.graph, node) {
            return Ok(ControlFlow::Break(AstarPath {
                cost: self.scores[&node],
                nodes: self.path_tracker.reconstruct_path_to(node),
            }));
        }

        // Every queued node has been scored before being pushed.
        let node_score = self.scores[&node];

        match self.estimate_scores.entry(node) {
            Occupied(mut entry) => {
                // Already expanded through an equal or cheaper path.
                if *entry.get() <= estimate_score {
                    return Ok(ControlFlow::Continue(()));
                }
                entry.insert(estimate_score);
            }
            Vacant(entry) => {
                entry.insert(estimate_score);
            }
        }

        for edge in self.graph.edges(node) {
            let Some(edge_cost) = strategy.edge_cost(&self.graph, edge) else {
                continue;
            };
            let next = edge.target();
            let next_score = node_score + edge_cost;

            match self.scores.entry(next) {
                Occupied(mut entry) => {
                    if *entry.get() <= next_score {
                        continue;
                    }
                    entry.insert(next_score);
                }
                Vacant(entry) => {
                    entry.insert(next_score);
                }
            }

            self.path_tracker.set_predecessor(next, node);
            let next_estimate_score = next_score + strategy.estimate_cost(&self.graph, next);
            self.visit_next.push(MinScored(next_estimate_score, next));
        }

        Ok(ControlFlow::Continue(()))
    }
}
