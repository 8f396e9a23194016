//! The sparse, undirected, weighted graph: adjacency storage, validation, and
//! the low-level mutators that `GeoGraph` builds its endpoint-splicing
//! protocol on top of.
//!
//! # Representation
//!
//! Each node's adjacency is an [`IndexMap`] from neighbor [`NodeId`] to edge
//! weight. An `IndexMap` (not a plain `HashMap`) was chosen over the
//! teacher's CSR arrays because the endpoint-splicing protocol in
//! `GeoGraph::get_shortest_path` inserts and removes individual arcs on a
//! shared, live graph every query — CSR's sorted, flat edge arrays would
//! need an O(E) re-sort on every insertion. `IndexMap` gives O(1) amortized
//! insert/remove and keeps iteration order stable, which keeps heap
//! tie-breaks (and therefore path choice) deterministic across repeated
//! identical queries.

use indexmap::IndexMap;

use georoute_core::NodeId;

use crate::error::{GraphError, GraphResult};

/// A sparse, undirected, weighted graph over node indices `0..N`.
///
/// Invariants (checked by [`Graph::validate`], not on every mutation):
/// - no self-loops
/// - symmetric (`w(i,j) == w(j,i)`)
/// - weights are finite and non-negative
/// - no parallel edges (guaranteed by the `IndexMap` representation itself)
#[derive(Clone, Debug, Default)]
pub struct Graph {
    adjacency: Vec<IndexMap<NodeId, f64>>,
}

impl Graph {
    /// Build a graph directly from a pre-built adjacency table (the "ordered
    /// sequence of mappings from neighbor id to weight" of the external
    /// interface). Does not validate; call [`Graph::validate`] if the input
    /// is untrusted.
    pub fn new(adjacency: Vec<IndexMap<NodeId, f64>>) -> Self {
        Self { adjacency }
    }

    /// An empty graph with `n` isolated nodes and no edges.
    pub fn with_node_count(n: usize) -> Self {
        Self { adjacency: vec![IndexMap::new(); n] }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        id.index() < self.node_count()
    }

    /// Checks `id` is within `[0, node_count())`.
    pub fn check_node(&self, id: NodeId) -> GraphResult<()> {
        if self.contains_node(id) {
            Ok(())
        } else {
            Err(GraphError::InvalidNode(id))
        }
    }

    /// All (neighbor, weight) pairs for `id`, in insertion order.
    pub fn neighbors(&self, id: NodeId) -> &IndexMap<NodeId, f64> {
        &self.adjacency[id.index()]
    }

    /// The weight of arc `(a, b)`, if it exists.
    pub fn weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.adjacency.get(a.index())?.get(&b).copied()
    }

    /// Appends an isolated node and returns its id. The id is always
    /// `node_count() - 1` after the call — callers inserting transient
    /// endpoints rely on this to splice and unsplice by index alone.
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.adjacency.len() as u32);
        self.adjacency.push(IndexMap::new());
        id
    }

    /// Adds a symmetric arc `a <-> b` with the given weight.
    ///
    /// Errors with [`GraphError::DuplicateArc`] if the arc already exists and
    /// `overwrite` is `false`.
    pub fn add_arc(&mut self, a: NodeId, b: NodeId, weight: f64, overwrite: bool) -> GraphResult<()> {
        self.check_node(a)?;
        self.check_node(b)?;
        if a == b {
            return Err(GraphError::InvalidGraph(format!("self-loop at node {a}")));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidGraph(format!(
                "arc ({a}, {b}) has invalid weight {weight}"
            )));
        }
        if !overwrite && self.adjacency[a.index()].contains_key(&b) {
            return Err(GraphError::DuplicateArc(a, b));
        }
        self.adjacency[a.index()].insert(b, weight);
        self.adjacency[b.index()].insert(a, weight);
        Ok(())
    }

    /// Removes arc `a <-> b`. Errors with [`GraphError::MissingArc`] if absent.
    pub fn remove_arc(&mut self, a: NodeId, b: NodeId) -> GraphResult<()> {
        self.check_node(a)?;
        self.check_node(b)?;
        let removed_ab = self.adjacency[a.index()].shift_remove(&b).is_some();
        let removed_ba = self.adjacency[b.index()].shift_remove(&a).is_some();
        if removed_ab || removed_ba {
            Ok(())
        } else {
            Err(GraphError::MissingArc(a, b))
        }
    }

    /// Removes the last node in the table, along with any incident arcs.
    ///
    /// Callers must only use this when `id` really is `node_count() - 1` —
    /// it is the O(1) fast path of [`Graph::remove_node`] for that case, and
    /// is what the endpoint-splicing undo protocol uses, since synthetic
    /// nodes are always appended last and removed in LIFO order.
    pub fn pop_last_node(&mut self) -> GraphResult<()> {
        let Some(id) = self.adjacency.len().checked_sub(1).map(|i| NodeId(i as u32)) else {
            return Err(GraphError::InvalidGraph("cannot pop from an empty graph".into()));
        };
        let neighbors: Vec<NodeId> = self.adjacency[id.index()].keys().copied().collect();
        for n in neighbors {
            self.adjacency[n.index()].shift_remove(&id);
        }
        self.adjacency.pop();
        Ok(())
    }

    /// Removes `id`, its incident arcs, and renumbers every node above it
    /// down by one (updating all adjacency keys). O(N+E).
    ///
    /// Fast path: if `id` is already the last index, this is exactly
    /// [`Graph::pop_last_node`] — no renumbering is needed since nothing
    /// references an index past it.
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<()> {
        self.check_node(id)?;
        if id.index() == self.adjacency.len() - 1 {
            return self.pop_last_node();
        }
        let neighbors: Vec<NodeId> = self.adjacency[id.index()].keys().copied().collect();
        for n in neighbors {
            self.adjacency[n.index()].shift_remove(&id);
        }
        self.adjacency.remove(id.index());
        for entry in &mut self.adjacency {
            let shifted: IndexMap<NodeId, f64> = std::mem::take(entry)
                .into_iter()
                .map(|(n, w)| {
                    let n = if n.index() > id.index() { NodeId(n.0 - 1) } else { n };
                    (n, w)
                })
                .collect();
            *entry = shifted;
        }
        Ok(())
    }

    /// Checks invariants I1-I4 of the data model:
    /// - I1: every neighbor index is in range and not a self-loop
    /// - I2: the graph is symmetric with matching weights
    /// - I3: weights are finite and non-negative
    /// - I4: no parallel edges (guaranteed by the map representation)
    pub fn validate(&self) -> GraphResult<()> {
        let n = self.node_count();
        for (i, neighbors) in self.adjacency.iter().enumerate() {
            let i = NodeId(i as u32);
            for (&j, &w) in neighbors {
                if j.index() >= n {
                    return Err(GraphError::InvalidGraph(format!(
                        "node {i} has an edge to out-of-range node {j}"
                    )));
                }
                if j == i {
                    return Err(GraphError::InvalidGraph(format!("node {i} has a self-loop")));
                }
                if !w.is_finite() || w < 0.0 {
                    return Err(GraphError::InvalidGraph(format!(
                        "edge ({i}, {j}) has invalid weight {w}"
                    )));
                }
                match self.adjacency[j.index()].get(&i) {
                    None => {
                        return Err(GraphError::InvalidGraph(format!(
                            "edge ({i}, {j}) is not symmetric: no back-edge from {j}"
                        )))
                    }
                    Some(&back_w) if (back_w - w).abs() > 1e-9 * w.max(1.0) => {
                        return Err(GraphError::InvalidGraph(format!(
                            "edge ({i}, {j}) is asymmetric: {w} vs {back_w}"
                        )))
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

/// Free-function alias for [`Graph::validate`], matching the name the
/// external interface gives this operation.
pub fn validate_graph(g: &Graph) -> GraphResult<()> {
    g.validate()
}
