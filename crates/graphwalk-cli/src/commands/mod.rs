//! CLI command implementations.

pub mod info;
pub mod schema;
pub mod traverse;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use graphwalk_engine::{Config, Dataset, GraphWalkDB};

/// Builds the database configuration from global flags.
pub fn config(auto_create: bool) -> Config {
    Config::in_memory().with_auto_create_collections(auto_create)
}

/// Reads a dataset file.
pub fn read_dataset(path: &Path) -> Result<Dataset> {
    Dataset::from_path(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Loads a dataset file into a fresh in-memory database.
pub fn open(path: &Path, config: &Config) -> Result<GraphWalkDB> {
    let dataset = read_dataset(path)?;
    let db = GraphWalkDB::with_config(config.clone());
    let summary = dataset
        .load_into(&db)
        .with_context(|| format!("cannot load {}", path.display()))?;
    tracing::info!(
        vertices = summary.vertices,
        edges = summary.edges,
        graphs = summary.graphs,
        "loaded {}",
        path.display()
    );
    Ok(db)
}
