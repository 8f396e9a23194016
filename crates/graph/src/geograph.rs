//! `GeoGraph`: a [`Graph`] addressed by geographic coordinate instead of by
//! raw node index.
//!
//! Queries never operate on a permanent node id directly — a caller hands
//! in two arbitrary `(lat, lon)` points, `GeoGraph` snaps each to one or
//! more existing nodes, transiently splices in a synthetic node connected
//! to those candidates at a circuity-scaled haversine weight, solves on the
//! extended graph, and unsplices before returning. The permanent graph is
//! byte-identical before and after every query.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use georoute_core::{haversine_km, GeoPoint, NodeId, Unit};

use crate::cache::{CacheKey, SpanningTreeCache};
use crate::error::{GraphError, GraphResult};
use crate::graph::Graph;
use crate::line::{build_coordinate_path, AntimeridianStrategy, CoordinatePath};
use crate::solver::{
    a_star, dijkstra_makowski, makowskis_spanning_tree, reconstruct_path, Algorithm, PathResult,
    SpanningTreeResult,
};

/// Default circuity multiplier applied to a synthetic endpoint's
/// haversine distance to each candidate node, modeling the fact that a
/// straight line from an arbitrary point to the network is rarely how
/// traffic actually reaches it.
pub const DEFAULT_CIRCUITY: f64 = 4.0;

/// How candidate nodes are chosen when splicing in a query endpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum NodeAdditionType {
    /// The single nearest existing node.
    Closest,
    /// The nearest existing node in each of the four lat/lon quadrants
    /// around the query point, deduplicated. The default: gives the
    /// solver a choice of approach direction instead of committing to
    /// whichever node happens to be globally nearest.
    #[default]
    Quadrant,
    /// Every existing node. Expensive (`O(N)` synthetic edges per query)
    /// and only sensible for small graphs, but guaranteed to find the true
    /// optimum under the circuity-weighted snapping model.
    All,
}

/// Which synthetic endpoint's spanning tree is cached for reuse.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CacheFor {
    #[default]
    Origin,
    Destination,
}

/// How a solved path's coordinates should be shaped for a caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CoordinateFormat {
    #[default]
    ListOfDicts,
    ListOfLists,
}

/// A single formatted coordinate, shaped per [`CoordinateFormat`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FormattedPoint {
    Dict { latitude: f64, longitude: f64 },
    Pair([f64; 2]),
}

/// Renders `points` per `format`.
pub fn format_points(points: &[GeoPoint], format: CoordinateFormat) -> Vec<FormattedPoint> {
    points
        .iter()
        .map(|p| match format {
            CoordinateFormat::ListOfDicts => FormattedPoint::Dict { latitude: p.lat, longitude: p.lon },
            CoordinateFormat::ListOfLists => FormattedPoint::Pair([p.lat, p.lon]),
        })
        .collect()
}

/// A solved path's coordinates, shaped per [`QueryOptions::output_coordinate_path`]
/// and split or interpolated across the antimeridian per
/// [`QueryOptions::antimeridian_strategy`].
#[derive(Clone, Debug, PartialEq)]
pub enum FormattedCoordinatePath {
    Single(Vec<FormattedPoint>),
    Split(Vec<Vec<FormattedPoint>>),
}

/// Applies `format` to every point of `path`, preserving its `Single`/`Split`
/// shape.
pub fn format_coordinate_path(path: CoordinatePath, format: CoordinateFormat) -> FormattedCoordinatePath {
    match path {
        CoordinatePath::Single(points) => FormattedCoordinatePath::Single(format_points(&points, format)),
        CoordinatePath::Split(segments) => FormattedCoordinatePath::Split(
            segments.iter().map(|segment| format_points(segment, format)).collect(),
        ),
    }
}

/// Per-query knobs for [`GeoGraph::get_shortest_path`].
#[derive(Clone, Debug)]
pub struct QueryOptions {
    pub algorithm: Algorithm,
    pub node_addition_type: NodeAdditionType,
    pub node_addition_circuity: f64,
    pub antimeridian_strategy: AntimeridianStrategy,
    pub output_path: bool,
    pub output_unit: Unit,
    pub output_coordinate_path: CoordinateFormat,
    pub cache: bool,
    pub cache_for: CacheFor,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::DijkstraMakowski,
            node_addition_type: NodeAdditionType::default(),
            node_addition_circuity: DEFAULT_CIRCUITY,
            antimeridian_strategy: AntimeridianStrategy::default(),
            output_path: false,
            output_unit: Unit::default(),
            output_coordinate_path: CoordinateFormat::default(),
            cache: false,
            cache_for: CacheFor::default(),
        }
    }
}

/// The result of a geographic shortest-path query.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPathResult {
    pub coordinate_path: FormattedCoordinatePath,
    pub length: f64,
    /// Present only when `QueryOptions::output_path` was set: the node ids
    /// visited, in order, on the *permanent* graph (the two synthetic
    /// endpoints are never included — they no longer exist by the time
    /// this is returned).
    pub path: Option<Vec<NodeId>>,
}

#[derive(Clone, Copy, Debug)]
struct NodeEntry {
    coord: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coord)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.coord[0] - point[0];
        let dy = self.coord[1] - point[1];
        dx * dx + dy * dy
    }
}

/// A node just transiently spliced into the graph: its id and the
/// candidate edges it was given, kept so the splice can be undone exactly.
struct SyntheticInsertion {
    node_id: NodeId,
    candidates: Vec<(NodeId, f64)>,
}

/// A geographic graph: permanent coordinates plus the sparse [`Graph`] over
/// them, a spatial index for nearest-node queries, a mutation-version
/// counter, and the spanning-tree cache that counter gates.
pub struct GeoGraph {
    nodes: Vec<GeoPoint>,
    graph: Graph,
    spatial_idx: RTree<NodeEntry>,
    version: u64,
    cache: SpanningTreeCache,
}

impl GeoGraph {
    /// Builds a `GeoGraph` from a coordinate table and a matching graph.
    /// Validates both the graph's internal invariants and every
    /// coordinate's WGS-84 range.
    pub fn new(nodes: Vec<GeoPoint>, graph: Graph) -> GraphResult<Self> {
        graph.validate()?;
        if nodes.len() != graph.node_count() {
            return Err(GraphError::InvalidGraph(format!(
                "node table has {} entries but the graph has {} nodes",
                nodes.len(),
                graph.node_count()
            )));
        }
        for p in &nodes {
            p.validate()?;
        }
        let spatial_idx = Self::build_index(&nodes);
        Ok(Self { nodes, graph, spatial_idx, version: 0, cache: SpanningTreeCache::new() })
    }

    fn build_index(nodes: &[GeoPoint]) -> RTree<NodeEntry> {
        RTree::bulk_load(
            nodes
                .iter()
                .enumerate()
                .map(|(i, p)| NodeEntry { coord: [p.lat, p.lon], id: NodeId::try_from(i).expect("node count fits in u32") })
                .collect(),
        )
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn point_at(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn bump_version(&mut self) {
        self.version += 1;
        self.cache.clear();
    }

    // ── Permanent mutators ──────────────────────────────────────────────────

    pub fn mod_add_node(&mut self, point: GeoPoint) -> GraphResult<NodeId> {
        point.validate()?;
        let id = self.graph.add_node();
        self.nodes.push(point);
        self.spatial_idx = Self::build_index(&self.nodes);
        self.bump_version();
        Ok(id)
    }

    pub fn mod_add_arc(&mut self, a: NodeId, b: NodeId, weight: f64, overwrite: bool) -> GraphResult<()> {
        self.graph.add_arc(a, b, weight, overwrite)?;
        self.bump_version();
        Ok(())
    }

    pub fn mod_remove_arc(&mut self, a: NodeId, b: NodeId) -> GraphResult<()> {
        self.graph.remove_arc(a, b)?;
        self.bump_version();
        Ok(())
    }

    pub fn mod_remove_node(&mut self, id: NodeId) -> GraphResult<()> {
        self.graph.remove_node(id)?;
        if id.index() == self.nodes.len() - 1 {
            self.nodes.pop();
        } else {
            self.nodes.remove(id.index());
        }
        self.spatial_idx = Self::build_index(&self.nodes);
        self.bump_version();
        Ok(())
    }

    // ── Endpoint snapping ───────────────────────────────────────────────────

    /// Candidate existing nodes for splicing in `point`, per `kind`. Never
    /// empty on success; errors with [`GraphError::NoSnapCandidate`] if the
    /// graph has no nodes at all.
    fn candidates(&self, point: GeoPoint, kind: NodeAdditionType) -> GraphResult<Vec<NodeId>> {
        if self.nodes.is_empty() {
            return Err(GraphError::NoSnapCandidate);
        }
        let query = [point.lat, point.lon];
        let ids: Vec<NodeId> = match kind {
            NodeAdditionType::Closest => self
                .spatial_idx
                .nearest_neighbor(&query)
                .map(|e| e.id)
                .into_iter()
                .collect(),
            NodeAdditionType::All => (0..self.nodes.len())
                .map(|i| NodeId::try_from(i).expect("node count fits in u32"))
                .collect(),
            NodeAdditionType::Quadrant => {
                let mut found: [Option<NodeId>; 4] = [None; 4];
                let mut remaining = 4;
                for entry in self.spatial_idx.nearest_neighbor_iter(&query) {
                    if remaining == 0 {
                        break;
                    }
                    let candidate = self.nodes[entry.id.index()];
                    let q = quadrant_of(point, candidate);
                    if found[q].is_none() {
                        found[q] = Some(entry.id);
                        remaining -= 1;
                    }
                }
                found.into_iter().flatten().collect()
            }
        };
        if ids.is_empty() {
            Err(GraphError::NoSnapCandidate)
        } else {
            Ok(ids)
        }
    }

    /// Splices a new synthetic node for `point` onto the graph, connected
    /// to its candidates at `haversine * circuity`. The new node is always
    /// `node_count() - 1` on both `self.nodes` and `self.graph`.
    fn insert_synthetic(
        &mut self,
        point: GeoPoint,
        kind: NodeAdditionType,
        circuity: f64,
    ) -> GraphResult<SyntheticInsertion> {
        let candidate_ids = self.candidates(point, kind)?;
        let id = self.graph.add_node();
        self.nodes.push(point);
        debug_assert_eq!(id.index(), self.nodes.len() - 1);

        let mut candidates = Vec::with_capacity(candidate_ids.len());
        for c in candidate_ids {
            let weight = haversine_km(point, self.nodes[c.index()]) * circuity;
            self.graph.add_arc(id, c, weight, false)?;
            candidates.push((c, weight));
        }
        Ok(SyntheticInsertion { node_id: id, candidates })
    }

    /// Undoes exactly one [`insert_synthetic`] splice. The caller is
    /// responsible for undoing splices in LIFO order, since a synthetic
    /// node is only ever removable while it is the last node in the table.
    fn remove_synthetic(&mut self, insertion: &SyntheticInsertion) {
        for &(c, _) in &insertion.candidates {
            let _ = self.graph.remove_arc(insertion.node_id, c);
        }
        let _ = self.graph.pop_last_node();
        self.nodes.pop();
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Finds the shortest path between two arbitrary geographic points.
    ///
    /// Snaps `origin` and `destination` to the existing graph (per
    /// `opts.node_addition_type`), solves on the transiently-extended
    /// graph, and restores the graph to its exact prior state before
    /// returning — on every exit path, including solver errors.
    pub fn get_shortest_path(
        &mut self,
        origin: GeoPoint,
        destination: GeoPoint,
        opts: &QueryOptions,
    ) -> GraphResult<GeoPathResult> {
        origin.validate()?;
        destination.validate()?;

        let mut ext = Extension::new(self);

        let (path_ids, length) = if opts.cache {
            // One endpoint ("root") gets its spanning tree computed and
            // cached; the other ("non-root") never gets indexed into that
            // tree by its own node id — it only ever contributes its own
            // candidate edges. This matters because a synthetic node always
            // lands at the current `node_count()`, so two different query
            // points can reuse the very same id across calls; indexing a
            // cached tree by a reused id would read whichever point was
            // spliced there when the tree was built, not the current query's
            // point. Splicing the root alone, computing its tree, and only
            // then splicing the non-root keeps the tree (and its cache key)
            // entirely free of the non-root's identity.
            let (root_point, non_root_point, root_is_origin) = match opts.cache_for {
                CacheFor::Origin => (origin, destination, true),
                CacheFor::Destination => (destination, origin, false),
            };

            let root_id = ext.insert(root_point, opts.node_addition_type, opts.node_addition_circuity)?;
            let tree = ext.geograph.spanning_tree_for_root(root_id, opts.algorithm)?;

            let (non_root_id, non_root_candidates) = ext.insert_with_candidates(
                non_root_point,
                opts.node_addition_type,
                opts.node_addition_circuity,
            )?;

            let (origin_id, destination_id) =
                if root_is_origin { (root_id, non_root_id) } else { (non_root_id, root_id) };

            let best = non_root_candidates
                .iter()
                .filter(|&&(c, _)| tree.distances[c.index()].is_finite())
                .map(|&(c, w)| (c, tree.distances[c.index()] + w))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let Some((best_candidate, length)) = best else {
                return Err(GraphError::UnreachableDestination { from: origin_id, to: destination_id });
            };

            let mut root_to_candidate = reconstruct_path(&tree.predecessors, root_id, best_candidate)?;
            let path_ids = if root_is_origin {
                root_to_candidate.push(non_root_id);
                root_to_candidate
            } else {
                root_to_candidate.reverse();
                root_to_candidate.insert(0, non_root_id);
                root_to_candidate
            };
            (path_ids, length)
        } else {
            let origin_id = ext.insert(origin, opts.node_addition_type, opts.node_addition_circuity)?;
            let destination_id =
                ext.insert(destination, opts.node_addition_type, opts.node_addition_circuity)?;
            let result = ext.geograph.solve_direct(origin_id, destination_id, opts.algorithm)?;
            (result.path, result.length)
        };

        let coordinates: Vec<GeoPoint> = path_ids.iter().map(|&id| ext.geograph.point_at(id)).collect();
        // `ext` drops here, unsplicing every synthetic node in LIFO order
        // before the coordinates (already captured) are handed back.
        drop(ext);

        let geo_path = build_coordinate_path(&coordinates, opts.antimeridian_strategy);
        let coordinate_path = format_coordinate_path(geo_path, opts.output_coordinate_path);
        let path = opts.output_path.then(|| path_ids[1..path_ids.len() - 1].to_vec());
        Ok(GeoPathResult { coordinate_path, length: opts.output_unit.convert_from_km(length), path })
    }

    /// Solves directly on the (already extended) graph with an early stop
    /// at `destination` — the uncached path, and the only one that ever
    /// runs the solver with both synthetic endpoints present at once.
    fn solve_direct(&self, origin: NodeId, destination: NodeId, algorithm: Algorithm) -> GraphResult<PathResult> {
        match algorithm {
            Algorithm::DijkstraMakowski => dijkstra_makowski(&self.graph, origin, destination),
            Algorithm::AStar => {
                let target = self.nodes[destination.index()];
                a_star(&self.graph, origin, destination, |n| haversine_km(self.nodes[n.index()], target))
            }
        }
    }

    /// Computes, or retrieves from cache, the spanning tree rooted at
    /// `root`. Callers must ensure `root`'s splice is the only transient
    /// addition present in the graph when this runs — the non-root endpoint
    /// must not yet be spliced in, or the tree (and the cache entry it
    /// populates) would silently depend on whichever node happens to be
    /// occupying that index.
    fn spanning_tree_for_root(&mut self, root: NodeId, algorithm: Algorithm) -> GraphResult<SpanningTreeResult> {
        let neighbors: Vec<(NodeId, f64)> =
            self.graph.neighbors(root).iter().map(|(&id, &w)| (id, w)).collect();
        let key = CacheKey::new(self.version, algorithm, &neighbors);

        if let Some(tree) = self.cache.get(&key) {
            log::trace!("spanning-tree cache hit for root {root}");
            return Ok(tree.clone());
        }
        log::trace!("spanning-tree cache miss for root {root}");
        let tree = makowskis_spanning_tree(&self.graph, root)?;
        self.cache.insert(key, tree.clone());
        Ok(tree)
    }
}

/// Which of the four lat/lon quadrants around `center` a `candidate` falls
/// in: 0 = north-east, 1 = north-west, 2 = south-east, 3 = south-west.
///
/// Uses the wrapped (short-way) longitude delta rather than a raw `>=`
/// comparison, so a `center` near the antimeridian (e.g. lon 179) still
/// classifies a candidate just across the dateline (lon -179, geographically
/// a hair to the east) as east rather than west.
fn quadrant_of(center: GeoPoint, candidate: GeoPoint) -> usize {
    match (candidate.lat >= center.lat, center.wrapped_lon_delta(candidate) >= 0.0) {
        (true, true) => 0,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    }
}

/// RAII guard around the endpoint-splicing protocol: every [`insert`] call
/// is unwound by [`Drop`], in reverse order, on every exit path out of
/// [`GeoGraph::get_shortest_path`] — normal return, `?`-propagated error,
/// or panic unwind alike.
struct Extension<'g> {
    geograph: &'g mut GeoGraph,
    inserted: Vec<SyntheticInsertion>,
}

impl<'g> Extension<'g> {
    fn new(geograph: &'g mut GeoGraph) -> Self {
        Self { geograph, inserted: Vec::new() }
    }

    fn insert(&mut self, point: GeoPoint, kind: NodeAdditionType, circuity: f64) -> GraphResult<NodeId> {
        let (id, _) = self.insert_with_candidates(point, kind, circuity)?;
        Ok(id)
    }

    /// Like [`insert`](Self::insert) but also returns the candidate edges
    /// chosen for the new synthetic node, needed by the cached-query path
    /// to combine a cached spanning tree with this endpoint's own edges
    /// without ever indexing the tree by this endpoint's node id.
    fn insert_with_candidates(
        &mut self,
        point: GeoPoint,
        kind: NodeAdditionType,
        circuity: f64,
    ) -> GraphResult<(NodeId, Vec<(NodeId, f64)>)> {
        let insertion = self.geograph.insert_synthetic(point, kind, circuity)?;
        let id = insertion.node_id;
        let candidates = insertion.candidates.clone();
        self.inserted.push(insertion);
        Ok((id, candidates))
    }
}

impl Drop for Extension<'_> {
    fn drop(&mut self) {
        while let Some(insertion) = self.inserted.pop() {
            self.geograph.remove_synthetic(&insertion);
        }
    }
}

