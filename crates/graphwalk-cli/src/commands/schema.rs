//! Graph schema command.

use std::path::Path;

use anyhow::Result;
use comfy_table::Cell;
use graphwalk_engine::{Config, GraphWalkDB};
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{self, Format};

/// One named graph.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphOutput {
    name: String,
    edge_definitions: Vec<EdgeDefinitionOutput>,
    orphan_collections: Vec<String>,
}

/// One edge definition with its edge count.
#[derive(Serialize)]
struct EdgeDefinitionOutput {
    collection: String,
    from: Vec<String>,
    to: Vec<String>,
    count: usize,
}

/// Run the schema command.
pub fn run(path: &Path, config: &Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let db = super::open(path, config)?;
    let graphs = describe(&db);

    match Format::from(format) {
        Format::Json => output::print_json(&graphs, quiet)?,
        Format::Table => {
            if !quiet {
                if graphs.is_empty() {
                    println!("No graphs defined");
                }
                for graph in &graphs {
                    println!("Graph: {}\n", graph.name);

                    let mut table = output::create_table();
                    output::add_header(&mut table, &["Edge Collection", "From", "To", "Edges"]);
                    for def in &graph.edge_definitions {
                        table.add_row(vec![
                            Cell::new(&def.collection),
                            Cell::new(def.from.join(", ")),
                            Cell::new(def.to.join(", ")),
                            Cell::new(def.count),
                        ]);
                    }
                    println!("{table}\n");

                    if !graph.orphan_collections.is_empty() {
                        let mut table = output::create_table();
                        output::add_header(&mut table, &["Orphan Collections"]);
                        for name in &graph.orphan_collections {
                            table.add_row(vec![Cell::new(name)]);
                        }
                        println!("{table}\n");
                    }
                }
            }
        }
    }

    Ok(())
}

fn describe(db: &GraphWalkDB) -> Vec<GraphOutput> {
    let counts = db.info().collections;
    let count_of = |name: &str| {
        counts
            .iter()
            .find(|c| c.name == name)
            .map_or(0, |c| c.count)
    };

    db.graphs()
        .list()
        .iter()
        .map(|graph| {
            let definition = graph.definition();
            GraphOutput {
                name: graph.name().to_string(),
                edge_definitions: definition
                    .edge_definitions
                    .iter()
                    .map(|d| EdgeDefinitionOutput {
                        collection: d.collection.clone(),
                        from: d.from.clone(),
                        to: d.to.clone(),
                        count: count_of(&d.collection),
                    })
                    .collect(),
                orphan_collections: definition.orphan_collections.clone(),
            }
        })
        .collect()
}
