//! Error type for `georoute-grid`.

use thiserror::Error;

use georoute_graph::GraphError;

/// Errors produced while building or querying a [`crate::grid::GridGraph`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("cell ({x}, {y}) is out of bounds for a {x_size}x{y_size} grid")]
    OutOfBounds { x: usize, y: usize, x_size: usize, y_size: usize },

    #[error("cell ({x}, {y}) is blocked")]
    BlockedCell { x: usize, y: usize },
}

/// Shorthand result type for `georoute-grid`.
pub type GridResult<T> = Result<T, GridError>;
