//! The traversal loop.

use std::collections::VecDeque;

use graphwalk_common::types::DocumentHandle;
use graphwalk_common::utils::error::{Error, Result};
use graphwalk_common::utils::hash::FastHashSet;

use super::cancel::CancelToken;
use super::filter::{TraversalFilter, VisitAction};
use super::result::{Path, TraversalResult};
use super::{Strategy, TraversalOptions, Uniqueness};
use crate::graph::{EdgeScope, GraphRead, Vertex};

/// One frontier entry.
struct Frame<'a> {
    vertex: &'a Vertex,
    depth: usize,
    path: Path,
}

/// Walks a [`GraphRead`] view from a start vertex.
///
/// The frontier is a deque: breadth-first pops from the front, depth-first
/// from the back. With [`Uniqueness::Global`] a vertex is marked visited when
/// it is popped, so the first path to reach it in expansion order is the
/// only one reported.
pub struct Traverser<'a, G: GraphRead + ?Sized> {
    graph: &'a G,
    options: TraversalOptions,
    scope: Option<&'a EdgeScope>,
    filter: Option<&'a dyn TraversalFilter>,
    cancel: CancelToken,
}

impl<'a, G: GraphRead + ?Sized> Traverser<'a, G> {
    /// Creates a traverser over `graph`.
    pub fn new(graph: &'a G, options: TraversalOptions) -> Self {
        Self {
            graph,
            options,
            scope: None,
            filter: None,
            cancel: CancelToken::new(),
        }
    }

    /// Only follows edges the scope allows.
    #[must_use]
    pub fn with_scope(mut self, scope: &'a EdgeScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Consults `filter` for every vertex reached.
    #[must_use]
    pub fn with_filter(mut self, filter: &'a dyn TraversalFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Stops early when `cancel` fires.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the options this traverser runs with.
    pub fn options(&self) -> &TraversalOptions {
        &self.options
    }

    /// Runs the traversal from `start`.
    ///
    /// # Errors
    ///
    /// `InvalidOption` for inconsistent options, `VertexNotFound` if `start`
    /// does not exist, and `Cancelled`, `Timeout` or
    /// `IterationLimitExceeded` if the walk is stopped.
    pub fn run(&self, start: &DocumentHandle) -> Result<TraversalResult> {
        self.options.validate()?;
        let start_vertex = self
            .graph
            .vertex(start)
            .ok_or_else(|| Error::VertexNotFound(start.clone()))?;

        let opts = &self.options;
        tracing::debug!(
            start = %start,
            direction = %opts.direction,
            strategy = ?opts.strategy,
            uniqueness = ?opts.uniqueness,
            max_depth = ?opts.max_depth,
            "starting traversal"
        );

        let mut result = TraversalResult::default();
        let mut visited: FastHashSet<&'a DocumentHandle> = FastHashSet::default();
        let mut reported: FastHashSet<&'a DocumentHandle> = FastHashSet::default();
        let mut frontier = VecDeque::new();
        frontier.push_back(Frame {
            vertex: start_vertex,
            depth: 0,
            path: Path::start(start_vertex.handle.clone()),
        });

        while let Some(frame) = self.pop(&mut frontier) {
            if opts.uniqueness == Uniqueness::Global && !visited.insert(&frame.vertex.handle) {
                continue;
            }
            self.cancel.check()?;

            let stats = &mut result.stats;
            stats.iterations += 1;
            if stats.iterations > opts.max_iterations {
                tracing::warn!(limit = opts.max_iterations, "traversal hit iteration limit");
                return Err(Error::IterationLimitExceeded(opts.max_iterations));
            }
            stats.max_depth_reached = stats.max_depth_reached.max(frame.depth);

            let action = self
                .filter
                .map_or(VisitAction::Accept, |f| f.visit(frame.vertex, &frame.path));
            if !action.includes() {
                stats.excluded += 1;
            }
            let report = action.includes() && frame.depth >= opts.min_depth;
            let within_depth = opts.max_depth.is_none_or(|max| frame.depth < max);

            if action.expands() && within_depth {
                let children = self.expand(&frame, &visited, &mut result.stats.edges_examined);
                match opts.strategy {
                    Strategy::BreadthFirst => frontier.extend(children),
                    // reversed so the first edge is popped first
                    Strategy::DepthFirst => frontier.extend(children.into_iter().rev()),
                }
            }

            if report {
                if reported.insert(&frame.vertex.handle) {
                    result.visited.vertices.push(frame.vertex.clone());
                }
                if !frame.path.is_empty() {
                    result.visited.paths.push(frame.path);
                }
            }
        }

        tracing::debug!(
            start = %start,
            vertices = result.visited.vertices.len(),
            paths = result.visited.paths.len(),
            iterations = result.stats.iterations,
            "traversal finished"
        );
        Ok(result)
    }

    fn pop(&self, frontier: &mut VecDeque<Frame<'a>>) -> Option<Frame<'a>> {
        match self.options.strategy {
            Strategy::BreadthFirst => frontier.pop_front(),
            Strategy::DepthFirst => frontier.pop_back(),
        }
    }

    /// Frames for the neighbors of `frame`, in edge order.
    fn expand(
        &self,
        frame: &Frame<'a>,
        visited: &FastHashSet<&'a DocumentHandle>,
        edges_examined: &mut usize,
    ) -> Vec<Frame<'a>> {
        let here = &frame.vertex.handle;
        let mut children = Vec::new();

        for edge in self.graph.edges(here, self.options.direction) {
            *edges_examined += 1;
            if let Some(scope) = self.scope
                && let Err(reason) = scope.check(edge)
            {
                tracing::trace!(edge = %edge.handle, %reason, "edge outside graph");
                continue;
            }
            let Some(next) = edge.opposite(here) else {
                continue;
            };
            let seen = match self.options.uniqueness {
                Uniqueness::Global => visited.contains(next),
                Uniqueness::Path => frame.path.contains_vertex(next),
            };
            if seen {
                continue;
            }
            let Some(vertex) = self.graph.vertex(next) else {
                tracing::warn!(edge = %edge.handle, vertex = %next, "edge points to a missing vertex");
                continue;
            };
            children.push(Frame {
                vertex,
                depth: frame.depth + 1,
                path: frame.path.extended(&edge.handle, next),
            });
        }
        children
    }
}
