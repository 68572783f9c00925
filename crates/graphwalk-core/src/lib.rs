//! # graphwalk-core
//!
//! Core layer for Graphwalk: the property graph store, adjacency indexes,
//! graph definitions, and the traversal engine.
//!
//! This crate depends only on `graphwalk-common`.
//!
//! ## Modules
//!
//! - [`graph`] - Documents, the [`GraphStore`] trait, the in-memory store,
//!   and graph definitions
//! - [`index`] - Adjacency index used by the store
//! - [`traversal`] - Breadth-first and depth-first traversal

pub mod graph;
pub mod index;
pub mod traversal;

// Re-export commonly used types
pub use graph::{
    CollectionInfo, Direction, Edge, EdgeDefinition, EdgeScope, GraphDefinition, GraphRead,
    GraphStore, MemoryStore, MemoryStoreConfig, Vertex,
};
pub use index::AdjacencyIndex;
pub use traversal::{
    CancelToken, Path, Strategy, TraversalFilter, TraversalOptions, TraversalResult,
    TraversalStats, Traverser, Uniqueness, Visited, VisitAction,
};
