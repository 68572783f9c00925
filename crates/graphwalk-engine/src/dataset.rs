//! JSON datasets.
//!
//! A dataset lists vertices and edges per collection, plus graph
//! definitions:
//!
//! ```json
//! {
//!   "vertices": { "Person": [{ "_key": "a", "firstName": "A" }] },
//!   "edges": { "Friend": [{ "_key": "x", "_from": "Person/a", "_to": "Person/b" }] },
//!   "graphs": { "social": { "edgeDefinitions": [
//!     { "collection": "Friend", "from": ["Person"], "to": ["Person"] }
//!   ] } }
//! }
//! ```
//!
//! `id` is accepted in place of `_key`. Vertices load first, then edges,
//! then graphs.

use std::path::Path;

use graphwalk_common::types::{DocumentHandle, PropertyMap};
use graphwalk_common::utils::error::Error;
use graphwalk_core::graph::{Edge, GraphDefinition, GraphStore, Vertex};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::GraphWalkDB;

/// Errors raised while reading or loading a dataset.
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid dataset.
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),

    /// A document or graph was rejected.
    #[error("{context}: {source}")]
    Load {
        /// What was being loaded.
        context: String,
        /// Why it failed.
        #[source]
        source: Error,
    },
}

/// One vertex record.
#[derive(Debug, Clone, Deserialize)]
pub struct VertexRecord {
    /// Key within the collection.
    #[serde(rename = "_key", alias = "id")]
    pub key: String,
    /// Remaining attributes.
    #[serde(flatten)]
    pub properties: PropertyMap,
}

/// One edge record.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    /// Key within the collection.
    #[serde(rename = "_key", alias = "id")]
    pub key: String,
    /// Source vertex handle.
    #[serde(rename = "_from")]
    pub from: String,
    /// Target vertex handle.
    #[serde(rename = "_to")]
    pub to: String,
    /// Remaining attributes.
    #[serde(flatten)]
    pub properties: PropertyMap,
}

/// A parsed dataset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    /// Vertex records per collection.
    #[serde(default)]
    pub vertices: IndexMap<String, Vec<VertexRecord>>,
    /// Edge records per collection.
    #[serde(default)]
    pub edges: IndexMap<String, Vec<EdgeRecord>>,
    /// Graph definitions per name.
    #[serde(default)]
    pub graphs: IndexMap<String, GraphDefinition>,
}

/// What [`Dataset::load_into`] inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Vertices inserted.
    pub vertices: usize,
    /// Edges inserted.
    pub edges: usize,
    /// Graphs created.
    pub graphs: usize,
}

impl Dataset {
    /// Parses a dataset from JSON text.
    ///
    /// # Errors
    ///
    /// `DatasetError::Json` if the text is not a dataset.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a dataset file.
    ///
    /// # Errors
    ///
    /// `DatasetError::Io` or `DatasetError::Json`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Inserts everything into `db`.
    ///
    /// Stops at the first rejected record; what was inserted before stays.
    ///
    /// # Errors
    ///
    /// `DatasetError::Load` naming the record that failed.
    pub fn load_into<S: GraphStore>(&self, db: &GraphWalkDB<S>) -> Result<LoadSummary, DatasetError> {
        let summary = self.insert_all(db, |context, source| {
            Err(DatasetError::Load { context, source })
        })?;
        tracing::debug!(
            vertices = summary.vertices,
            edges = summary.edges,
            graphs = summary.graphs,
            "loaded dataset"
        );
        Ok(summary)
    }

    /// Loads the dataset into a scratch database and reports every problem.
    ///
    /// Rejected records are errors. Collections and edges that no graph
    /// covers are warnings.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        self.validate_with(Config::default())
    }

    /// Like [`validate`](Self::validate), loading under `config`.
    #[must_use]
    pub fn validate_with(&self, config: Config) -> ValidationReport {
        let db = GraphWalkDB::with_config(config);
        let mut report = ValidationReport::default();
        // `on_error` never fails, so the load always runs to the end.
        let _summary = self.insert_all(&db, |context, source| {
            report.errors.push(DatasetIssue::from_error(context, &source));
            Ok(())
        });

        let graphs = db.graphs().list();
        if graphs.is_empty() {
            return report;
        }
        for collection in self.vertices.keys() {
            let covered = graphs
                .iter()
                .any(|g| g.definition().vertex_collections().contains(collection.as_str()));
            if !covered {
                report.warnings.push(DatasetIssue {
                    code: "COLLECTION_OUTSIDE_GRAPHS".into(),
                    message: "vertex collection is not part of any graph".into(),
                    context: Some(collection.clone()),
                });
            }
        }
        for (collection, records) in &self.edges {
            for record in records {
                // Rejected edges are already reported as errors.
                let Ok(handle) = DocumentHandle::new(collection, &record.key) else {
                    continue;
                };
                let Ok(edge) = db.get_edge(&handle) else {
                    continue;
                };
                if !graphs.iter().any(|g| g.edge_scope().allows(&edge)) {
                    report.warnings.push(DatasetIssue {
                        code: "EDGE_OUTSIDE_GRAPHS".into(),
                        message: "edge is not followed by any graph".into(),
                        context: Some(handle.to_string()),
                    });
                }
            }
        }
        report
    }

    /// Inserts vertices, then edges, then graphs; `on_error` decides whether
    /// a rejected record stops the load.
    fn insert_all<S, F>(&self, db: &GraphWalkDB<S>, mut on_error: F) -> Result<LoadSummary, DatasetError>
    where
        S: GraphStore,
        F: FnMut(String, Error) -> Result<(), DatasetError>,
    {
        let mut summary = LoadSummary::default();

        for (collection, records) in &self.vertices {
            for record in records {
                let inserted = DocumentHandle::new(collection, &record.key).and_then(|handle| {
                    db.insert_vertex(Vertex {
                        handle,
                        properties: record.properties.clone(),
                    })
                });
                match inserted {
                    Ok(()) => summary.vertices += 1,
                    Err(err) => on_error(format!("vertex {collection}/{}", record.key), err)?,
                }
            }
        }

        for (collection, records) in &self.edges {
            for record in records {
                match record.to_edge(collection).and_then(|edge| db.insert_edge(edge)) {
                    Ok(()) => summary.edges += 1,
                    Err(err) => on_error(format!("edge {collection}/{}", record.key), err)?,
                }
            }
        }

        for (name, definition) in &self.graphs {
            match db.create_graph(name, definition.clone()) {
                Ok(_) => summary.graphs += 1,
                Err(err) => on_error(format!("graph {name}"), err)?,
            }
        }
        Ok(summary)
    }
}

impl EdgeRecord {
    fn to_edge(&self, collection: &str) -> graphwalk_common::utils::error::Result<Edge> {
        Ok(Edge {
            handle: DocumentHandle::new(collection, &self.key)?,
            from: DocumentHandle::parse(&self.from)?,
            to: DocumentHandle::parse(&self.to)?,
            properties: self.properties.clone(),
        })
    }
}

/// One problem found by [`Dataset::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetIssue {
    /// Machine code, e.g. `VERTEX_NOT_FOUND`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// The record or collection concerned.
    pub context: Option<String>,
}

impl DatasetIssue {
    fn from_error(context: String, err: &Error) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            context: Some(context),
        }
    }
}

/// Outcome of [`Dataset::validate`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Records that could not be loaded.
    pub errors: Vec<DatasetIssue>,
    /// Loadable data no graph reaches.
    pub warnings: Vec<DatasetIssue>,
}

impl ValidationReport {
    /// Whether the dataset loads without errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphwalk_common::types::Value;

    const SOCIAL: &str = r#"{
        "vertices": {
            "Person": [
                {"_key": "a", "firstName": "A", "age": 30},
                {"id": "b", "firstName": "B"},
                {"_key": "c"},
                {"_key": "d", "tags": ["x", "y"]}
            ]
        },
        "edges": {
            "Friend": [
                {"_key": "x", "_from": "Person/a", "_to": "Person/b", "type": 1},
                {"_key": "y", "_from": "Person/b", "_to": "Person/d"},
                {"_key": "z", "_from": "Person/c", "_to": "Person/a"},
                {"_key": "h", "_from": "Person/a", "_to": "Person/d"}
            ]
        },
        "graphs": {
            "social": {"edgeDefinitions": [{"collection": "Friend", "from": ["Person"], "to": ["Person"]}]}
        }
    }"#;

    #[test]
    fn test_load_dataset() {
        let db = GraphWalkDB::new_in_memory();
        let summary = Dataset::from_json_str(SOCIAL).unwrap().load_into(&db).unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                vertices: 4,
                edges: 4,
                graphs: 1
            }
        );
        let a = db.get_vertex(&DocumentHandle::parse("Person/a").unwrap()).unwrap();
        assert_eq!(a.get_property("age"), Some(&Value::Int(30)));
        assert!(a.get_property("_key").is_none());
        let d = db.get_vertex(&DocumentHandle::parse("Person/d").unwrap()).unwrap();
        assert_eq!(d.get_property("tags").and_then(Value::as_list).map(<[Value]>::len), Some(2));
        assert!(db.graphs().contains("social"));
    }

    #[test]
    fn test_dangling_edge_is_reported() {
        let json = r#"{
            "vertices": {"Person": [{"_key": "a"}]},
            "edges": {"Friend": [{"_key": "x", "_from": "Person/a", "_to": "Person/zz"}]}
        }"#;
        let db = GraphWalkDB::new_in_memory();
        let err = Dataset::from_json_str(json).unwrap().load_into(&db).unwrap_err();

        match err {
            DatasetError::Load { context, source } => {
                assert_eq!(context, "edge Friend/x");
                assert_eq!(source.code(), "VERTEX_NOT_FOUND");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_clean_dataset() {
        let report = Dataset::from_json_str(SOCIAL).unwrap().validate();
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let json = r#"{
            "vertices": {
                "Person": [{"_key": "a"}, {"_key": "a"}, {"_key": "b"}],
                "City": [{"_key": "rome"}]
            },
            "edges": {
                "Friend": [
                    {"_key": "x", "_from": "Person/a", "_to": "Person/zz"},
                    {"_key": "y", "_from": "Person/a", "_to": "Person/b"}
                ],
                "LivesIn": [{"_key": "l", "_from": "Person/a", "_to": "City/rome"}]
            },
            "graphs": {
                "social": {"edgeDefinitions": [{"collection": "Friend", "from": ["Person"], "to": ["Person"]}]},
                "broken": {"edgeDefinitions": [{"collection": "Friend", "from": [], "to": ["Person"]}]}
            }
        }"#;
        let report = Dataset::from_json_str(json).unwrap().validate();

        assert!(!report.is_valid());
        let contexts: Vec<_> = report
            .errors
            .iter()
            .filter_map(|issue| issue.context.as_deref())
            .collect();
        assert_eq!(contexts, ["vertex Person/a", "edge Friend/x", "graph broken"]);
        assert_eq!(report.errors[1].code, "VERTEX_NOT_FOUND");

        let warnings: Vec<_> = report
            .warnings
            .iter()
            .map(|issue| (issue.code.as_str(), issue.context.as_deref()))
            .collect();
        assert_eq!(
            warnings,
            [
                ("COLLECTION_OUTSIDE_GRAPHS", Some("City")),
                ("EDGE_OUTSIDE_GRAPHS", Some("LivesIn/l")),
            ]
        );
    }

    #[test]
    fn test_validate_with_auto_create() {
        let json = r#"{
            "graphs": {"g": {"edgeDefinitions": [{"collection": "E", "from": ["A"], "to": ["B"]}]}}
        }"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        let strict = dataset.validate();
        assert_eq!(strict.errors.len(), 1);
        assert_eq!(strict.errors[0].code, "INVALID_EDGE_DEFINITION");

        let relaxed = dataset.validate_with(Config::in_memory().with_auto_create_collections(true));
        assert!(relaxed.is_valid());
    }

    #[test]
    fn test_malformed_json() {
        let err = Dataset::from_json_str(r#"{"vertices": {"Person": [{"name": "no key"}]}}"#)
            .unwrap_err();
        assert!(matches!(err, DatasetError::Json(_)));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("social.json");
        std::fs::write(&path, SOCIAL).unwrap();

        let dataset = Dataset::from_path(&path).unwrap();
        assert_eq!(dataset.vertices["Person"].len(), 4);
        assert!(matches!(
            Dataset::from_path(dir.path().join("missing.json")),
            Err(DatasetError::Io(_))
        ));
    }
}
