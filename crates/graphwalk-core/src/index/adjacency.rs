//! Adjacency lists keyed by vertex handle.
//!
//! The store keeps one index for outgoing edges and, optionally, one for
//! incoming edges. Lists keep insertion order so traversals are
//! reproducible. Locking is the store's job; this structure is plain data.

use graphwalk_common::types::DocumentHandle;
use graphwalk_common::utils::hash::{FastHashMap, FastHashSet};
use smallvec::SmallVec;

/// Most vertices have a handful of edges; keep those inline.
const INLINE_EDGES: usize = 4;

/// One entry: the vertex on the other side and the edge leading there.
type AdjacencyEntry = (DocumentHandle, DocumentHandle);

/// Adjacency list for a single vertex.
#[derive(Debug, Default, Clone)]
struct AdjacencyList {
    entries: SmallVec<[AdjacencyEntry; INLINE_EDGES]>,
}

impl AdjacencyList {
    fn push(&mut self, neighbor: DocumentHandle, edge: DocumentHandle) {
        self.entries.push((neighbor, edge));
    }

    fn remove(&mut self, edge: &DocumentHandle) -> bool {
        match self.entries.iter().position(|(_, e)| e == edge) {
            Some(pos) => {
                // keep insertion order
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drops every entry whose edge is in `removed`, keeping order.
    fn retain_edges(&mut self, removed: &FastHashSet<DocumentHandle>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !removed.contains(&entry.1));
        before - self.entries.len()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Adjacency lists for every vertex that has at least one edge.
#[derive(Debug, Default)]
pub struct AdjacencyIndex {
    /// Lists indexed by the vertex they start from.
    lists: FastHashMap<DocumentHandle, AdjacencyList>,
    /// Total number of entries.
    edge_count: usize,
}

impl AdjacencyIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index with room for `vertices` lists.
    #[must_use]
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            lists: FastHashMap::with_capacity_and_hasher(vertices, Default::default()),
            edge_count: 0,
        }
    }

    /// Records `edge` from `vertex` to `neighbor`.
    pub fn add_edge(
        &mut self,
        vertex: DocumentHandle,
        neighbor: DocumentHandle,
        edge: DocumentHandle,
    ) {
        self.lists.entry(vertex).or_default().push(neighbor, edge);
        self.edge_count += 1;
    }

    /// Removes `edge` from the list of `vertex`. Returns false if absent.
    pub fn remove_edge(&mut self, vertex: &DocumentHandle, edge: &DocumentHandle) -> bool {
        let Some(list) = self.lists.get_mut(vertex) else {
            return false;
        };
        if !list.remove(edge) {
            return false;
        }
        if list.is_empty() {
            self.lists.remove(vertex);
        }
        self.edge_count -= 1;
        true
    }

    /// Removes every edge in `removed` from the lists of `vertices`.
    ///
    /// Each list is rewritten once however many of its edges go, so the
    /// cost is linear in the affected lists. Returns the entries dropped.
    pub fn remove_edges<'v>(
        &mut self,
        vertices: impl IntoIterator<Item = &'v DocumentHandle>,
        removed: &FastHashSet<DocumentHandle>,
    ) -> usize {
        let vertices: FastHashSet<&DocumentHandle> = vertices.into_iter().collect();
        let mut dropped = 0;
        for vertex in vertices {
            let Some(list) = self.lists.get_mut(vertex) else {
                continue;
            };
            dropped += list.retain_edges(removed);
            if list.is_empty() {
                self.lists.remove(vertex);
            }
        }
        self.edge_count -= dropped;
        dropped
    }

    /// Edge handles leaving `vertex`, in insertion order.
    pub fn edges<'a>(
        &'a self,
        vertex: &DocumentHandle,
    ) -> impl Iterator<Item = &'a DocumentHandle> + use<'a> {
        self.entries(vertex).iter().map(|(_, edge)| edge)
    }

    /// Neighbor handles of `vertex`, in insertion order (may repeat).
    pub fn neighbors<'a>(
        &'a self,
        vertex: &DocumentHandle,
    ) -> impl Iterator<Item = &'a DocumentHandle> + use<'a> {
        self.entries(vertex).iter().map(|(neighbor, _)| neighbor)
    }

    fn entries(&self, vertex: &DocumentHandle) -> &[AdjacencyEntry] {
        self.lists
            .get(vertex)
            .map(|list| list.entries.as_slice())
            .unwrap_or_default()
    }

    /// Number of edges recorded for `vertex`.
    #[must_use]
    pub fn degree(&self, vertex: &DocumentHandle) -> usize {
        self.lists.get(vertex).map_or(0, AdjacencyList::len)
    }

    /// Total number of edges in the index.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of vertices with at least one edge.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.lists.len()
    }
}
