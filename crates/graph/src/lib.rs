//! `georoute-graph` — the sparse shortest-path engine and its geographic
//! wrapper.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-------------------------------------------------------------------|
//! | [`graph`]   | `Graph` (adjacency-map storage), `validate_graph`                 |
//! | [`solver`]  | `dijkstra_makowski`, `a_star`, `makowskis_spanning_tree`, `reconstruct_path` |
//! | [`geograph`]| `GeoGraph`, endpoint snapping, `QueryOptions`, `GeoPathResult`     |
//! | [`cache`]   | `SpanningTreeCache`, `CacheKey`                                   |
//! | [`line`]    | Antimeridian-aware coordinate-path shaping                        |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                             |
//! |---------|-----------------------------------------------------|
//! | `serde` | Derives `Serialize` on public output types.        |

pub mod cache;
pub mod error;
pub mod geograph;
pub mod graph;
pub mod line;
pub mod solver;

#[cfg(test)]
mod tests;

pub use cache::{CacheKey, SpanningTreeCache};
pub use error::{GraphError, GraphResult};
pub use geograph::{
    format_coordinate_path, format_points, CacheFor, CoordinateFormat, FormattedCoordinatePath,
    FormattedPoint, GeoGraph, GeoPathResult, NodeAdditionType, QueryOptions, DEFAULT_CIRCUITY,
};
pub use graph::{validate_graph, Graph};
pub use line::{build_coordinate_path, AntimeridianStrategy, CoordinatePath};
pub use solver::{a_star, dijkstra_makowski, makowskis_spanning_tree, reconstruct_path, Algorithm, PathResult, SpanningTreeResult};
