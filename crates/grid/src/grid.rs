//! A regular 2-D grid graph: cells on an `x_size` by `y_size` lattice,
//! 8-connected, with optional blocked cells and an optional solid exterior
//! wall. Built directly on [`georoute_graph::Graph`] rather than
//! [`georoute_graph::geograph::GeoGraph`] — a grid's `(x, y)` cell
//! coordinates are not latitude/longitude and routinely fall outside
//! `GeoPoint`'s validated ranges (a 200-wide grid has cells past the ±180
//! longitude bound), so reusing `GeoGraph`'s coordinate-snapping machinery
//! would either reject valid grids or silently misinterpret cell indices as
//! degrees. Queries here map `(x, y)` straight to a node id: no nearest-node
//! search, no antimeridian handling.

use georoute_core::NodeId;
use georoute_graph::{a_star, dijkstra_makowski, Algorithm, Graph, PathResult};

use crate::error::{GridError, GridResult};

/// Weight of a cardinal (horizontal or vertical) step between adjacent cells.
pub const CARDINAL_WEIGHT: f64 = 1.0;
/// Weight of a diagonal step between adjacent cells.
pub const DIAGONAL_WEIGHT: f64 = std::f64::consts::SQRT_2;

/// The four "forward" neighbor offsets that, swept over every cell in
/// raster order, touch each unordered adjacent pair exactly once. The other
/// four 8-connected offsets are each some earlier cell's forward offset
/// in reverse.
const HALF_STEPS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// Builds a [`GridGraph`].
#[derive(Clone, Debug, Default)]
pub struct GridGraphBuilder {
    x_size: usize,
    y_size: usize,
    blocks: Vec<(usize, usize)>,
    add_exterior_walls: bool,
}

impl GridGraphBuilder {
    pub fn new(x_size: usize, y_size: usize) -> Self {
        Self { x_size, y_size, blocks: Vec::new(), add_exterior_walls: false }
    }

    /// Marks the given cells as impassable. May be called more than once;
    /// blocks accumulate.
    pub fn blocks(mut self, blocks: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    /// When `true`, every cell on the outer ring of the grid is blocked in
    /// addition to `blocks`, sealing the grid's border.
    pub fn add_exterior_walls(mut self, yes: bool) -> Self {
        self.add_exterior_walls = yes;
        self
    }

    pub fn build(self) -> GridResult<GridGraph> {
        GridGraph::build(self.x_size, self.y_size, self.blocks, self.add_exterior_walls)
    }
}

/// A sparse shortest-path graph over the cells of an `x_size` by `y_size`
/// grid. Cell `(x, y)` is node id `y * x_size + x`; each cell is connected to
/// up to 8 neighbors (4 cardinal at weight 1, 4 diagonal at weight √2),
/// excluding any neighbor that is out of bounds or blocked, and excluding
/// diagonal moves that would squeeze between two blocked orthogonal
/// neighbors.
#[derive(Clone, Debug)]
pub struct GridGraph {
    x_size: usize,
    y_size: usize,
    blocked: Vec<bool>,
    graph: Graph,
}

impl GridGraph {
    /// Starts a [`GridGraphBuilder`] for an `x_size` by `y_size` grid.
    pub fn builder(x_size: usize, y_size: usize) -> GridGraphBuilder {
        GridGraphBuilder::new(x_size, y_size)
    }

    fn build(x_size: usize, y_size: usize, blocks: Vec<(usize, usize)>, add_exterior_walls: bool) -> GridResult<Self> {
        let n = x_size.checked_mul(y_size).expect("grid dimensions overflow usize");
        let index = |x: usize, y: usize| y * x_size + x;

        let mut blocked = vec![false; n];
        for (x, y) in blocks {
            if x >= x_size || y >= y_size {
                return Err(GridError::OutOfBounds { x, y, x_size, y_size });
            }
            blocked[index(x, y)] = true;
        }

        if add_exterior_walls && x_size > 0 && y_size > 0 {
            for x in 0..x_size {
                blocked[index(x, 0)] = true;
                blocked[index(x, y_size - 1)] = true;
            }
            for y in 0..y_size {
                blocked[index(0, y)] = true;
                blocked[index(x_size - 1, y)] = true;
            }
        }

        let mut graph = Graph::with_node_count(n);
        for y in 0..y_size {
            for x in 0..x_size {
                if blocked[index(x, y)] {
                    continue;
                }
                for &(dx, dy) in &HALF_STEPS {
                    let nx = x as isize + dx;
                    let ny = y as isize + dy;
                    if nx < 0 || ny < 0 || nx as usize >= x_size || ny as usize >= y_size {
                        continue;
                    }
                    let (nx, ny) = (nx as usize, ny as usize);
                    if blocked[index(nx, ny)] {
                        continue;
                    }
                    if dx != 0 && dy != 0 {
                        // The two cells sharing an edge with both (x, y) and
                        // (nx, ny). If either is blocked the diagonal would
                        // cut through a solid corner.
                        let shared_a = index(nx, y);
                        let shared_b = index(x, ny);
                        if blocked[shared_a] || blocked[shared_b] {
                            continue;
                        }
                    }
                    let weight = if dx != 0 && dy != 0 { DIAGONAL_WEIGHT } else { CARDINAL_WEIGHT };
                    graph.add_arc(NodeId(index(x, y) as u32), NodeId(index(nx, ny) as u32), weight, false)?;
                }
            }
        }

        Ok(Self { x_size, y_size, blocked, graph })
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        y * self.x_size + x
    }

    pub fn x_size(&self) -> usize {
        self.x_size
    }

    pub fn y_size(&self) -> usize {
        self.y_size
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Whether `(x, y)` is out of bounds or listed as blocked.
    pub fn is_blocked(&self, x: usize, y: usize) -> bool {
        x >= self.x_size || y >= self.y_size || self.blocked[self.index(x, y)]
    }

    /// Maps `(x, y)` to the node id of that cell.
    ///
    /// Errors with [`GridError::OutOfBounds`] if the cell is off the grid, or
    /// [`GridError::BlockedCell`] if it is blocked — a blocked cell has no
    /// node of its own to snap to, unlike `GeoGraph`'s nearest-candidate
    /// snapping this is an exact, ungracious lookup.
    pub fn node_id(&self, x: usize, y: usize) -> GridResult<NodeId> {
        if x >= self.x_size || y >= self.y_size {
            return Err(GridError::OutOfBounds { x, y, x_size: self.x_size, y_size: self.y_size });
        }
        let idx = self.index(x, y);
        if self.blocked[idx] {
            return Err(GridError::BlockedCell { x, y });
        }
        Ok(NodeId(idx as u32))
    }

    /// Maps a node id back to its `(x, y)` cell.
    pub fn xy_of(&self, id: NodeId) -> (usize, usize) {
        let idx = id.index();
        (idx % self.x_size, idx / self.x_size)
    }

    /// Shortest path between two cells.
    ///
    /// Unlike [`georoute_graph::GeoGraph::get_shortest_path`] this never
    /// snaps or splices: `origin`/`destination` must name existing,
    /// unblocked cells.
    pub fn shortest_path(
        &self,
        origin: (usize, usize),
        destination: (usize, usize),
        algorithm: Algorithm,
    ) -> GridResult<PathResult> {
        let o = self.node_id(origin.0, origin.1)?;
        let d = self.node_id(destination.0, destination.1)?;
        let result = match algorithm {
            Algorithm::DijkstraMakowski => dijkstra_makowski(&self.graph, o, d)?,
            Algorithm::AStar => {
                let (dx, dy) = destination;
                a_star(&self.graph, o, d, move |node| {
                    let (nx, ny) = self.xy_of(node);
                    let ex = nx as f64 - dx as f64;
                    let ey = ny as f64 - dy as f64;
                    // Euclidean distance is admissible here: an unobstructed
                    // straight line costs exactly this under the cardinal=1,
                    // diagonal=√2 weighting, so the search never overestimates.
                    (ex * ex + ey * ey).sqrt()
                })?
            }
        };
        Ok(result)
    }
}
