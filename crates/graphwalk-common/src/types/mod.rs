//! Core type definitions for Graphwalk.
//!
//! This module contains the fundamental types used throughout the crates:
//! - Identifier types ([`DocumentHandle`])
//! - Property types ([`Value`], [`PropertyKey`], [`PropertyMap`])
//! - Collection kinds ([`CollectionKind`])

mod collection;
mod handle;
mod value;

pub use collection::{CollectionKind, validate_collection_name};
pub use handle::{DocumentHandle, validate_key};
pub use value::{PropertyKey, PropertyMap, SYSTEM_ATTRIBUTES, Value, is_system_attribute};
