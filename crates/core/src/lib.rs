//! `georoute-core` — foundational types for the `georoute` shortest-path
//! workspace.
//!
//! This crate is a dependency of every other crate in the workspace. It
//! intentionally has no workspace-internal dependencies and a minimal
//! external footprint (only `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                    |
//! |-----------|----------------------------------------------|
//! | [`ids`]   | `NodeId`                                     |
//! | [`geo`]   | `GeoPoint`, the haversine distance kernel     |
//! | [`units`] | `Unit` (km/m/mi/ft) and its conversion table  |
//! | [`error`] | `CoreError`, `CoreResult`                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod units;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{haversine, haversine_km, GeoPoint};
pub use ids::NodeId;
pub use units::Unit;
