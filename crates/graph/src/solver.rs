//! Shortest-path solvers: lazy-deletion Dijkstra, A*, and the single-source
//! spanning tree the endpoint-splicing cache is built on.
//!
//! All three share one search loop. Dijkstra and the spanning tree are the
//! same loop with the heuristic fixed at zero; A* supplies a heuristic and
//! the loop stops as soon as the destination is popped rather than running
//! to exhaustion. None of the three keep an explicit visited/closed set —
//! a node popped from the heap with a stale (too-large) priority is simply
//! discarded, since a better entry for it was already pushed later.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use georoute_core::NodeId;

use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;

/// Which named strategy produced a result — carried through to the
/// spanning-tree cache key so entries computed under one algorithm are
/// never handed back for a query that asked for the other.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    DijkstraMakowski,
    AStar,
}

/// A single shortest path between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
    /// Nodes visited in order, origin first, destination last. Always has
    /// at least one element.
    pub path: Vec<NodeId>,
    pub length: f64,
}

/// The result of a single-source search that was run to exhaustion rather
/// than stopped at a single destination: every node's distance from
/// `origin` and the predecessor edge that achieves it.
#[derive(Clone, Debug)]
pub struct SpanningTreeResult {
    pub origin: NodeId,
    /// `predecessors[i]` is the node before `i` on the shortest path from
    /// `origin`, or `None` if `i` is `origin` itself or unreachable.
    pub predecessors: Vec<Option<NodeId>>,
    /// `distances[i]` is the shortest distance from `origin` to `i`, or
    /// `f64::INFINITY` if `i` is unreachable.
    pub distances: Vec<f64>,
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct HeapEntry {
    /// Priority key: `g` for Dijkstra, `g + h(node)` for A*.
    key: f64,
    node: NodeId,
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Edge weights (and therefore every key derived from them) are
        // validated finite and non-negative before a search ever starts, so
        // a total order always exists.
        self.key
            .partial_cmp(&other.key)
            .expect("search keys must be finite, non-NaN")
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Runs the shared search loop from `origin`, optionally stopping as soon
/// as `target` is finalized, optionally guided by `heuristic`.
///
/// `heuristic(node)` must be an admissible (never-overestimating) estimate
/// of the remaining distance from `node` to the eventual destination; pass
/// `None` for plain Dijkstra. The staleness check recovers the true
/// tentative distance `g` by subtracting the heuristic back out of the
/// popped key, so it works identically whether or not a heuristic is in
/// play.
fn search(
    graph: &Graph,
    origin: NodeId,
    target: Option<NodeId>,
    heuristic: Option<&dyn Fn(NodeId) -> f64>,
) -> GraphResult<(Vec<Option<NodeId>>, Vec<f64>)> {
    graph.check_node(origin)?;
    if let Some(t) = target {
        graph.check_node(t)?;
    }

    let n = graph.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred: Vec<Option<NodeId>> = vec![None; n];
    let h = |node: NodeId| heuristic.map_or(0.0, |f| f(node));

    dist[origin.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(Reverse(HeapEntry { key: h(origin), node: origin }));

    while let Some(Reverse(HeapEntry { key, node })) = heap.pop() {
        let g = key - h(node);
        if g > dist[node.index()] {
            continue; // stale entry; a shorter path to `node` was already finalized
        }
        if Some(node) == target {
            break;
        }
        for (&neighbor, &weight) in graph.neighbors(node) {
            let candidate = g + weight;
            if candidate < dist[neighbor.index()] {
                dist[neighbor.index()] = candidate;
                pred[neighbor.index()] = Some(node);
                heap.push(Reverse(HeapEntry { key: candidate + h(neighbor), node: neighbor }));
            }
        }
    }

    Ok((pred, dist))
}

/// Walks `predecessors` backward from `destination` to `origin`, returning
/// the path in forward (origin-first) order.
///
/// Errors with [`GraphError::CorruptState`] if the walk does not terminate
/// at `origin` — this should only happen if `predecessors` was not in fact
/// produced by a search rooted at `origin`.
pub fn reconstruct_path(
    predecessors: &[Option<NodeId>],
    origin: NodeId,
    destination: NodeId,
) -> GraphResult<Vec<NodeId>> {
    let mut path = vec![destination];
    let mut current = destination;
    while current != origin {
        match predecessors.get(current.index()).copied().flatten() {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            None => {
                return Err(GraphError::CorruptState(format!(
                    "predecessor chain from {destination} broke at {current} before reaching origin {origin}"
                )));
            }
        }
    }
    path.reverse();
    Ok(path)
}

/// Shortest path from `origin` to `destination`, lazy-deletion Dijkstra, no
/// heuristic. Stops as soon as `destination` is finalized.
pub fn dijkstra_makowski(graph: &Graph, origin: NodeId, destination: NodeId) -> GraphResult<PathResult> {
    let (pred, dist) = search(graph, origin, Some(destination), None)?;
    let length = dist[destination.index()];
    if length.is_infinite() {
        return Err(GraphError::UnreachableDestination { from: origin, to: destination });
    }
    let path = reconstruct_path(&pred, origin, destination)?;
    Ok(PathResult { path, length })
}

/// Shortest path from `origin` to `destination`, guided by `heuristic`.
///
/// `heuristic` must be admissible with respect to the graph's edge weights
/// (never overestimate the true remaining distance) or the result may not
/// be optimal. Passing a heuristic that is identically zero degenerates to
/// [`dijkstra_makowski`].
pub fn a_star(
    graph: &Graph,
    origin: NodeId,
    destination: NodeId,
    heuristic: impl Fn(NodeId) -> f64,
) -> GraphResult<PathResult> {
    let (pred, dist) = search(graph, origin, Some(destination), Some(&heuristic))?;
    let length = dist[destination.index()];
    if length.is_infinite() {
        return Err(GraphError::UnreachableDestination { from: origin, to: destination });
    }
    let path = reconstruct_path(&pred, origin, destination)?;
    Ok(PathResult { path, length })
}

/// Single-source shortest distances and predecessors to every reachable
/// node, no destination short-circuit. Always plain Dijkstra — the
/// spanning tree is a precomputation artifact shared across algorithms,
/// not itself heuristic-guided.
pub fn makowskis_spanning_tree(graph: &Graph, origin: NodeId) -> GraphResult<SpanningTreeResult> {
    let (predecessors, distances) = search(graph, origin, None, None)?;
    Ok(SpanningTreeResult { origin, predecessors, distances })
}
