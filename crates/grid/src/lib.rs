//! `georoute-grid` — a regular 2-D grid graph (8-connected, with obstacles)
//! over the same sparse shortest-path engine `georoute-graph` uses for
//! geographic networks.
//!
//! # Crate layout
//!
//! | Module  | Contents                                |
//! |---------|--------------------------------------------|
//! | [`grid`]  | `GridGraph`, `GridGraphBuilder`           |
//! | [`error`] | `GridError`, `GridResult<T>`              |

pub mod error;
pub mod grid;


pub use error::{GridError, GridResult};
pub use grid::{GridGraph, GridGraphBuilder, CARDINAL_WEIGHT, DIAGONAL_WEIGHT};
