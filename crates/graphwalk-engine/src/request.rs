//! Traversal requests.
//!
//! A hosting layer receives traversal parameters as a loose JSON object
//! (`graphOptions`). [`TraversalRequest::from_json`] validates it: the start
//! vertex is checked first, so a bad request never reaches the store.

use std::time::Duration;

use graphwalk_common::types::DocumentHandle;
use graphwalk_common::utils::error::{Error, Result};
use graphwalk_core::graph::Direction;
use graphwalk_core::traversal::{Strategy, TraversalOptions, Uniqueness};
use serde_json::{Map, Value as JsonValue};

use crate::config::Config;

/// A validated traversal request.
///
/// Fields left `None` fall back to the database [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalRequest {
    /// Where the walk starts.
    pub start_vertex: DocumentHandle,
    /// Edge direction.
    pub direction: Direction,
    /// Expansion order.
    pub strategy: Strategy,
    /// Vertex uniqueness.
    pub uniqueness: Uniqueness,
    /// Minimum reported depth.
    pub min_depth: usize,
    /// Maximum depth.
    pub max_depth: Option<usize>,
    /// Iteration cap.
    pub max_iterations: Option<usize>,
    /// Deadline for this traversal.
    pub timeout: Option<Duration>,
}

impl TraversalRequest {
    /// An outbound breadth-first request from `start_vertex`.
    #[must_use]
    pub fn new(start_vertex: DocumentHandle) -> Self {
        Self {
            start_vertex,
            direction: Direction::default(),
            strategy: Strategy::default(),
            uniqueness: Uniqueness::default(),
            min_depth: 0,
            max_depth: None,
            max_iterations: None,
            timeout: None,
        }
    }

    /// Parses the start vertex from a string.
    ///
    /// # Errors
    ///
    /// `StartVertexRequired` if `start` is empty or not a document handle.
    pub fn parse(start: &str) -> Result<Self> {
        parse_start_vertex(start).map(Self::new)
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
        self.max_iterations = Some(iterations);
        self
    }

    /// Sets a deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validates a `graphOptions` object.
    ///
    /// Recognized keys: `startVertex`, `direction`, `strategy`,
    /// `uniqueness`, `minDepth`, `maxDepth`, `maxIterations`. Other keys are
    /// ignored, and `null` counts as absent.
    ///
    /// # Errors
    ///
    /// `InvalidOption` if `options` is not an object or an option has the
    /// wrong type or value; `StartVertexRequired` if `startVertex` is
    /// missing, not a string, or not a document handle.
    pub fn from_json(options: &JsonValue) -> Result<Self> {
        let Some(object) = options.as_object() else {
            return Err(Error::InvalidOption("graphOptions must be an object".into()));
        };

        let start = match object.get("startVertex") {
            Some(JsonValue::String(s)) => parse_start_vertex(s)?,
            _ => return Err(Error::StartVertexRequired),
        };
        let mut request = Self::new(start);

        if let Some(s) = string_option(object, "direction")? {
            request.direction = s.parse()?;
        }
        if let Some(s) = string_option(object, "strategy")? {
            request.strategy = s.parse()?;
        }
        if let Some(s) = string_option(object, "uniqueness")? {
            request.uniqueness = s.parse()?;
        }
        if let Some(n) = count_option(object, "minDepth")? {
            request.min_depth = n;
        }
        request.max_depth = count_option(object, "maxDepth")?;
        request.max_iterations = count_option(object, "maxIterations")?;
        Ok(request)
    }

    /// Resolves defaults from `config` into engine options.
    #[must_use]
    pub fn options(&self, config: &Config) -> TraversalOptions {
        TraversalOptions {
            direction: self.direction,
            strategy: self.strategy,
            uniqueness: self.uniqueness,
            min_depth: self.min_depth,
            max_depth: self.max_depth.or(config.default_max_depth),
            max_iterations: self.max_iterations.unwrap_or(config.max_iterations),
        }
    }

    /// The deadline for this request, if any.
    #[must_use]
    pub fn timeout(&self, config: &Config) -> Option<Duration> {
        self.timeout.or(config.traversal_timeout)
    }
}

impl TryFrom<&JsonValue> for TraversalRequest {
    type Error = Error;

    fn try_from(value: &JsonValue) -> Result<Self> {
        Self::from_json(value)
    }
}

fn parse_start_vertex(start: &str) -> Result<DocumentHandle> {
    DocumentHandle::parse(start).map_err(|err| {
        tracing::debug!(start, %err, "rejecting start vertex");
        Error::StartVertexRequired
    })
}

fn string_option<'a>(object: &'a Map<String, JsonValue>, key: &str) -> Result<Option<&'a str>> {
    match object.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s)),
        Some(other) => Err(Error::InvalidOption(format!(
            "{key} must be a string, got {other}"
        ))),
    }
}

fn count_option(object: &Map<String, JsonValue>, key: &str) -> Result<Option<usize>> {
    match object.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                Error::InvalidOption(format!("{key} must be a non-negative integer, got {value}"))
            }),
    }
}
