//! Index structures used by the store.
//!
//! - [`adjacency`] - Per-vertex edge lists for outbound and inbound lookups

pub mod adjacency;

pub use adjacency::AdjacencyIndex;
