//! # graphwalk-common
//!
//! Foundation layer for Graphwalk: identifiers, property values, and errors.
//!
//! This crate provides the building blocks shared by every other Graphwalk
//! crate. It has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Core type definitions (DocumentHandle, Value, CollectionKind)
//! - [`utils`] - Utility functions and helpers (hashing, errors)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{CollectionKind, DocumentHandle, PropertyKey, PropertyMap, Value};
pub use utils::error::{Error, ErrorBody, ErrorKind, Result};
