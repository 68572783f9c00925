//! Database configuration.

use std::time::Duration;

use graphwalk_core::MemoryStoreConfig;
use graphwalk_core::traversal::TraversalOptions;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Depth bound applied when a traversal request gives none.
    /// `None` leaves such traversals unbounded.
    pub default_max_depth: Option<usize>,
    /// Iteration cap applied when a traversal request gives none.
    pub max_iterations: usize,
    /// Deadline applied to every traversal, if set.
    pub traversal_timeout: Option<Duration>,
    /// Whether creating a graph creates missing vertex collections.
    pub auto_create_collections: bool,
    /// Settings for the in-memory store.
    pub store: MemoryStoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_max_depth: None,
            max_iterations: TraversalOptions::DEFAULT_MAX_ITERATIONS,
            traversal_timeout: None,
            auto_create_collections: false,
            store: MemoryStoreConfig::default(),
        }
    }
}

impl Config {
    /// Creates a configuration for an in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Sets the default traversal depth bound.
    #[must_use]
    pub fn with_default_max_depth(mut self, depth: usize) -> Self {
        self.default_max_depth = Some(depth);
        self
    }

    /// Sets the default iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets a deadline for every traversal.
    #[must_use]
    pub fn with_traversal_timeout(mut self, timeout: Duration) -> Self {
        self.traversal_timeout = Some(timeout);
        self
    }

    /// Lets graph creation create missing vertex collections.
    #[must_use]
    pub fn with_auto_create_collections(mut self, enabled: bool) -> Self {
        self.auto_create_collections = enabled;
        self
    }

    /// Sets the in-memory store settings.
    #[must_use]
    pub fn with_store_config(mut self, store: MemoryStoreConfig) -> Self {
        self.store = store;
        self
    }
}
