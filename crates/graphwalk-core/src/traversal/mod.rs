//! Graph traversal.
//!
//! A [`Traverser`] walks the graph from one start vertex, breadth-first or
//! depth-first, and collects the vertices it reaches plus the path that led
//! to each of them.
//!
//! ```ignore
//! let snapshot = store.snapshot();
//! let result = Traverser::new(&snapshot, TraversalOptions::new().with_max_depth(2))
//!     .run(&start)?;
//! ```

mod cancel;
mod engine;
mod filter;
mod result;

pub use cancel::CancelToken;
pub use engine::Traverser;
pub use filter::{CompareOp, PropertyFilter, TraversalFilter, VisitAction};
pub use result::{Path, TraversalResult, TraversalStats, Visited};

use graphwalk_common::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::graph::Direction;

/// Order in which the frontier is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Level by level.
    #[default]
    BreadthFirst,
    /// Pre-order, following edges in insertion order.
    DepthFirst,
}

impl std::str::FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "breadthfirst" | "bfs" => Ok(Self::BreadthFirst),
            "depthfirst" | "dfs" => Ok(Self::DepthFirst),
            other => Err(Error::InvalidOption(format!(
                "unknown strategy '{other}' (expected: breadthfirst, depthfirst)"
            ))),
        }
    }
}

/// How often a vertex may be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Uniqueness {
    /// Once per traversal: the first path reaching a vertex is the only one.
    #[default]
    Global,
    /// Once per path: every simple path is reported.
    Path,
}

impl std::str::FromStr for Uniqueness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "path" => Ok(Self::Path),
            other => Err(Error::InvalidOption(format!(
                "unknown uniqueness '{other}' (expected: global, path)"
            ))),
        }
    }
}

/// Knobs of one traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TraversalOptions {
    /// Edge direction to follow.
    pub direction: Direction,
    /// Expansion order.
    pub strategy: Strategy,
    /// Vertex uniqueness.
    pub uniqueness: Uniqueness,
    /// Vertices shallower than this are expanded but not reported.
    pub min_depth: usize,
    /// Vertices at this depth are not expanded. `None` is unbounded.
    pub max_depth: Option<usize>,
    /// Upper bound on expanded frontier entries.
    pub max_iterations: usize,
}

impl TraversalOptions {
    /// Default iteration cap.
    pub const DEFAULT_MAX_ITERATIONS: usize = 10_000_000;

    /// Outbound, breadth-first, global uniqueness, unbounded depth.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the uniqueness.
    #[must_use]
    pub fn with_uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }

    /// Sets the minimum reported depth.
    #[must_use]
    pub fn with_min_depth(mut self, depth: usize) -> Self {
        self.min_depth = depth;
        self
    }

    /// Sets the maximum depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Checks the options are consistent.
    ///
    /// # Errors
    ///
    /// `InvalidOption` if `min_depth > max_depth` or `max_iterations` is 0.
    pub fn validate(&self) -> Result<()> {
        if let Some(max) = self.max_depth
            && self.min_depth > max
        {
            return Err(Error::InvalidOption(format!(
                "minDepth {} is greater than maxDepth {max}",
                self.min_depth
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidOption("maxIterations must be positive".into()));
        }
        Ok(())
    }
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            strategy: Strategy::default(),
            uniqueness: Uniqueness::default(),
            min_depth: 0,
            max_depth: None,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_validate() {
        assert!(TraversalOptions::new().validate().is_ok());
        assert!(
            TraversalOptions::new()
                .with_min_depth(2)
                .with_max_depth(2)
                .validate()
                .is_ok()
        );

        let err = TraversalOptions::new()
            .with_min_depth(3)
            .with_max_depth(1)
            .validate()
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_TRAVERSAL_OPTION");
        assert!(
            TraversalOptions::new()
                .with_max_iterations(0)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("DFS".parse::<Strategy>().unwrap(), Strategy::DepthFirst);
        assert_eq!("breadthfirst".parse::<Strategy>().unwrap(), Strategy::BreadthFirst);
        assert_eq!("path".parse::<Uniqueness>().unwrap(), Uniqueness::Path);
        assert!("none".parse::<Uniqueness>().is_err());
    }

    #[test]
    fn test_options_serde() {
        let opts: TraversalOptions =
            serde_json::from_str(r#"{"direction":"any","maxDepth":2,"strategy":"depthfirst"}"#)
                .unwrap();
        assert_eq!(opts.direction, Direction::Any);
        assert_eq!(opts.max_depth, Some(2));
        assert_eq!(opts.strategy, Strategy::DepthFirst);
        assert_eq!(opts.uniqueness, Uniqueness::Global);
        assert_eq!(opts.max_iterations, TraversalOptions::DEFAULT_MAX_ITERATIONS);
    }
}
