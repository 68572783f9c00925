//! Property graph model and storage.
//!
//! - [`Vertex`] and [`Edge`] documents addressed by handles
//! - [`GraphStore`]: the pluggable storage interface, with [`GraphRead`]
//!   snapshots for consistent reads
//! - [`MemoryStore`]: the in-memory implementation
//! - [`GraphDefinition`]: the logical view a named graph puts over
//!   collections

mod definition;
mod document;
mod memory;
mod store;

pub use definition::{EdgeDefinition, EdgeScope, GraphDefinition};
pub use document::{Edge, Vertex};
pub use memory::{MemorySnapshot, MemoryStore, MemoryStoreConfig};
pub use store::{CollectionInfo, EdgeIter, GraphRead, GraphStore};

use graphwalk_common::utils::error::Error;
use serde::{Deserialize, Serialize};

/// Which edges a traversal follows from a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow `from -> to` (edges leaving the vertex).
    #[default]
    Outbound,
    /// Follow `to -> from` (edges entering the vertex).
    Inbound,
    /// Both directions; outbound edges are listed first.
    Any,
}

impl Direction {
    /// Returns the lowercase name used in requests and output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outbound => "outbound",
            Self::Inbound => "inbound",
            Self::Any => "any",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "outbound" | "out" => Ok(Self::Outbound),
            "inbound" | "in" => Ok(Self::Inbound),
            "any" | "both" => Ok(Self::Any),
            other => Err(Error::InvalidOption(format!(
                "unknown direction '{}' (expected: outbound, inbound, any)",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
