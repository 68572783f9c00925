//! # graphwalk-engine
//!
//! The main entry point for Graphwalk: the database, the named graph
//! registry, and traversal requests.
//!
//! ## Modules
//!
//! - [`database`] - GraphWalkDB struct and document operations
//! - [`manager`] - Named graph creation and removal
//! - [`model`] - A handle bound to one graph name
//! - [`request`] - Validation of loosely-typed traversal options
//! - [`dataset`] - JSON dataset import
//! - [`config`] - Configuration options

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod database;
pub mod dataset;
pub mod manager;
pub mod model;
pub mod request;

pub use config::Config;
pub use database::{DatabaseInfo, GraphWalkDB};
pub use dataset::{Dataset, DatasetError, DatasetIssue, LoadSummary, ValidationReport};
pub use manager::{Graph, GraphManager};
pub use model::GraphModel;
pub use request::TraversalRequest;
