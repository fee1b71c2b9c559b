//! Shared types and utilities used across the stackworld crates.

pub mod angle;
pub mod types;

pub use angle::{normalize_angle, shortest_arc};
pub use types::{EntityId, Rgba};
