//! Traversal output.

use std::fmt;

use graphwalk_common::types::DocumentHandle;
use serde::Serialize;

use crate::graph::Vertex;

/// Alternating vertex and edge handles from the start vertex.
///
/// `vertices.len() == edges.len() + 1` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Path {
    /// Vertices in walk order; the first is the start vertex.
    pub vertices: Vec<DocumentHandle>,
    /// Edges between consecutive vertices.
    pub edges: Vec<DocumentHandle>,
}

impl Path {
    /// The zero-length path at `start`.
    #[must_use]
    pub fn start(start: DocumentHandle) -> Self {
        Self {
            vertices: vec![start],
            edges: Vec::new(),
        }
    }

    /// Returns a copy extended by one hop.
    #[must_use]
    pub fn extended(&self, edge: &DocumentHandle, vertex: &DocumentHandle) -> Self {
        let mut next = Self {
            vertices: Vec::with_capacity(self.vertices.len() + 1),
            edges: Vec::with_capacity(self.edges.len() + 1),
        };
        next.vertices.extend_from_slice(&self.vertices);
        next.vertices.push(vertex.clone());
        next.edges.extend_from_slice(&self.edges);
        next.edges.push(edge.clone());
        next
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether this is the zero-length start path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The vertex the path ends at.
    #[must_use]
    pub fn last(&self) -> &DocumentHandle {
        // never empty: constructed with the start vertex
        &self.vertices[self.vertices.len() - 1]
    }

    /// Whether `vertex` lies on the path.
    #[must_use]
    pub fn contains_vertex(&self, vertex: &DocumentHandle) -> bool {
        self.vertices.contains(vertex)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.vertices[0])?;
        for (edge, vertex) in self.edges.iter().zip(&self.vertices[1..]) {
            write!(f, " -[{edge}]-> {vertex}")?;
        }
        Ok(())
    }
}

/// What a traversal reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Visited {
    /// Reported vertices, deduplicated, in discovery order.
    pub vertices: Vec<Vertex>,
    /// Reported paths, in discovery order.
    pub paths: Vec<Path>,
}

/// Counters collected while traversing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraversalStats {
    /// Frontier entries expanded.
    pub iterations: usize,
    /// Edges looked at, including skipped ones.
    pub edges_examined: usize,
    /// Deepest depth any entry reached.
    pub max_depth_reached: usize,
    /// Vertices a filter excluded.
    pub excluded: usize,
}

/// Result of one traversal call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraversalResult {
    /// Vertices and paths.
    pub visited: Visited,
    /// Counters; not part of the serialized result.
    #[serde(skip)]
    pub stats: TraversalStats,
}

impl TraversalResult {
    /// Handles of the visited vertices.
    #[must_use]
    pub fn vertex_handles(&self) -> Vec<&DocumentHandle> {
        self.visited.vertices.iter().map(|v| &v.handle).collect()
    }

    /// Whether `vertex` was reported.
    #[must_use]
    pub fn contains(&self, vertex: &DocumentHandle) -> bool {
        self.visited.vertices.iter().any(|v| &v.handle == vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(s: &str) -> DocumentHandle {
        DocumentHandle::parse(s).unwrap()
    }

    #[test]
    fn test_path_extend() {
        let start = Path::start(h("P/a"));
        assert!(start.is_empty());
        assert_eq!(start.last(), &h("P/a"));

        let one = start.extended(&h("F/x"), &h("P/b"));
        let two = one.extended(&h("F/y"), &h("P/d"));
        assert_eq!(start.len(), 0);
        assert_eq!(two.len(), 2);
        assert_eq!(two.vertices.len(), two.edges.len() + 1);
        assert!(two.contains_vertex(&h("P/b")));
        assert!(!one.contains_vertex(&h("P/d")));
        assert_eq!(two.to_string(), "P/a -[F/x]-> P/b -[F/y]-> P/d");
    }

    #[test]
    fn test_result_serialization_skips_stats() {
        let result = TraversalResult {
            visited: Visited {
                vertices: vec![Vertex::new(h("P/a"))],
                paths: vec![Path::start(h("P/a")).extended(&h("F/x"), &h("P/b"))],
            },
            stats: TraversalStats {
                iterations: 3,
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "visited": {
                    "vertices": [{"_id": "P/a", "_key": "a"}],
                    "paths": [{"vertices": ["P/a", "P/b"], "edges": ["F/x"]}]
                }
            })
        );
        assert!(result.contains(&h("P/a")));
        assert_eq!(result.vertex_handles(), [&h("P/a")]);
    }
}
