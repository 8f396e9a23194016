//! Shared error type for the workspace.
//!
//! Sub-crates define their own error enums and convert `CoreError` into a
//! variant via `From`, the way `georoute-graph::GraphError` does — kept
//! separate here because `georoute-core` has no notion of "unreachable
//! destination" or "stale cache entry", only coordinate validity. Node-index
//! bounds checks are a graph-level concern (`georoute-graph::GraphError`
//! owns `InvalidNode`) since `georoute-core` has no graph to check an index
//! against.
use thiserror::Error;

/// Errors produced by `georoute-core` primitives: coordinate validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon}): {reason}")]
    InvalidCoordinate { lat: f64, lon: f64, reason: &'static str },
}

/// Shorthand result type for `georoute-core`.
pub type CoreResult<T> = Result<T, CoreError>;
