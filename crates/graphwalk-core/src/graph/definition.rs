//! Named graph definitions.
//!
//! A graph owns no data. It names the edge collections it spans and, for
//! each, the vertex collections allowed on either end.

use graphwalk_common::types::validate_collection_name;
use graphwalk_common::utils::error::{Error, Result};
use graphwalk_common::utils::hash::{FastHashMap, FastHashSet};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use super::document::Edge;

/// One edge collection and the vertex collections it may connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDefinition {
    /// Edge collection name.
    pub collection: String,
    /// Allowed source vertex collections.
    pub from: Vec<String>,
    /// Allowed target vertex collections.
    pub to: Vec<String>,
}

impl EdgeDefinition {
    /// Creates an edge definition.
    pub fn new(
        collection: impl Into<String>,
        from: impl IntoIterator<Item = impl Into<String>>,
        to: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            collection: collection.into(),
            from: from.into_iter().map(Into::into).collect(),
            to: to.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `from`/`to` list the same collections as `other`, ignoring
    /// order and repeats.
    #[must_use]
    pub fn same_endpoints(&self, other: &EdgeDefinition) -> bool {
        fn set(names: &[String]) -> FastHashSet<&str> {
            names.iter().map(String::as_str).collect()
        }
        set(&self.from) == set(&other.from) && set(&self.to) == set(&other.to)
    }
}

/// Edge definitions plus vertex collections not reached by any edge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDefinition {
    /// Edge collections of the graph.
    pub edge_definitions: Vec<EdgeDefinition>,
    /// Vertex collections that belong to the graph without edges.
    #[serde(default)]
    pub orphan_collections: Vec<String>,
}

impl GraphDefinition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an edge definition.
    #[must_use]
    pub fn with_edge_definition(mut self, definition: EdgeDefinition) -> Self {
        self.edge_definitions.push(definition);
        self
    }

    /// Adds an orphan vertex collection.
    #[must_use]
    pub fn with_orphan(mut self, collection: impl Into<String>) -> Self {
        self.orphan_collections.push(collection.into());
        self
    }

    /// Checks the rules that do not depend on store contents.
    ///
    /// # Errors
    ///
    /// `InvalidEdgeDefinition` on a bad name, an empty `from`/`to`, a repeated
    /// edge collection, or a name used both as edge and vertex collection.
    pub fn validate(&self) -> Result<()> {
        let mut seen = FastHashSet::default();
        for def in &self.edge_definitions {
            check_name(&def.collection)?;
            if def.from.is_empty() || def.to.is_empty() {
                return Err(Error::InvalidEdgeDefinition(format!(
                    "edge collection '{}' needs at least one 'from' and one 'to' collection",
                    def.collection
                )));
            }
            if !seen.insert(def.collection.as_str()) {
                return Err(Error::InvalidEdgeDefinition(format!(
                    "edge collection '{}' is defined twice",
                    def.collection
                )));
            }
        }

        for name in self.vertex_collections() {
            check_name(name)?;
            if seen.contains(name) {
                return Err(Error::InvalidEdgeDefinition(format!(
                    "'{name}' is used as both edge and vertex collection"
                )));
            }
        }
        Ok(())
    }

    /// Edge collection names, in definition order.
    pub fn edge_collections(&self) -> impl Iterator<Item = &str> {
        self.edge_definitions.iter().map(|d| d.collection.as_str())
    }

    /// Vertex collection names (from, to, orphans), deduplicated, in first
    /// appearance order.
    #[must_use]
    pub fn vertex_collections(&self) -> IndexSet<&str> {
        self.edge_definitions
            .iter()
            .flat_map(|d| d.from.iter().chain(&d.to))
            .chain(&self.orphan_collections)
            .map(String::as_str)
            .collect()
    }

    /// Every collection the graph refers to.
    #[must_use]
    pub fn collections(&self) -> IndexSet<&str> {
        let mut all: IndexSet<&str> = self.edge_collections().collect();
        all.extend(self.vertex_collections());
        all
    }

    /// Looks up the definition of one edge collection.
    #[must_use]
    pub fn edge_definition(&self, collection: &str) -> Option<&EdgeDefinition> {
        self.edge_definitions
            .iter()
            .find(|d| d.collection == collection)
    }

    /// Builds the edge filter a traversal through this graph uses.
    #[must_use]
    pub fn edge_scope(&self) -> EdgeScope {
        let rules = self
            .edge_definitions
            .iter()
            .map(|d| {
                let rule = ScopeRule {
                    from: d.from.iter().cloned().collect(),
                    to: d.to.iter().cloned().collect(),
                };
                (d.collection.clone(), rule)
            })
            .collect();
        EdgeScope { rules }
    }
}

fn check_name(name: &str) -> Result<()> {
    validate_collection_name(name)
        .map_err(|_| Error::InvalidEdgeDefinition(format!("invalid collection name '{name}'")))
}

#[derive(Debug, Clone)]
struct ScopeRule {
    from: FastHashSet<String>,
    to: FastHashSet<String>,
}

/// Which edges a graph lets a traversal follow.
#[derive(Debug, Clone)]
pub struct EdgeScope {
    rules: FastHashMap<String, ScopeRule>,
}

impl EdgeScope {
    /// Whether `edge` belongs to the graph and connects allowed collections.
    #[must_use]
    pub fn allows(&self, edge: &Edge) -> bool {
        self.check(edge).is_ok()
    }

    /// Like [`allows`](Self::allows), explaining a rejection.
    ///
    /// # Errors
    ///
    /// Returns the reason the edge is outside the graph.
    pub fn check(&self, edge: &Edge) -> std::result::Result<(), String> {
        let Some(rule) = self.rules.get(edge.collection()) else {
            return Err(format!(
                "edge collection '{}' is not part of the graph",
                edge.collection()
            ));
        };
        if !rule.from.contains(edge.from.collection()) {
            return Err(format!(
                "'{}' is not an allowed 'from' collection",
                edge.from.collection()
            ));
        }
        if !rule.to.contains(edge.to.collection()) {
            return Err(format!(
                "'{}' is not an allowed 'to' collection",
                edge.to.collection()
            ));
        }
        Ok(())
    }
}
