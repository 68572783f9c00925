//! Dataset info command.

use std::path::Path;

use anyhow::Result;
use comfy_table::Cell;
use graphwalk_engine::{Config, DatabaseInfo};

use crate::OutputFormat;
use crate::output::{self, Format};

/// Run the info command.
pub fn run(path: &Path, config: &Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let db = super::open(path, config)?;
    let info = db.info();

    match Format::from(format) {
        Format::Json => output::print_json(&info, quiet)?,
        Format::Table => {
            if !quiet {
                println!("{}\n", output::key_value_table(&summary(&info)));
                if !info.collections.is_empty() {
                    let mut table = output::create_table();
                    output::add_header(&mut table, &["Collection", "Kind", "Documents"]);
                    for collection in &info.collections {
                        table.add_row(vec![
                            Cell::new(&collection.name),
                            Cell::new(collection.kind),
                            Cell::new(collection.count),
                        ]);
                    }
                    println!("{table}");
                }
            }
        }
    }

    Ok(())
}

fn summary(info: &DatabaseInfo) -> Vec<(&'static str, String)> {
    let graphs = if info.graphs.is_empty() {
        "(none)".to_string()
    } else {
        info.graphs.join(", ")
    };
    vec![
        ("Graphs", graphs),
        ("Collections", info.collections.len().to_string()),
        ("Vertices", info.vertex_count.to_string()),
        ("Edges", info.edge_count.to_string()),
        ("Version", env!("CARGO_PKG_VERSION").to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;

    #[test]
    fn test_summary() {
        let (_dir, path) = fixtures::dataset(fixtures::SOCIAL);
        let db = crate::commands::open(&path, &Config::in_memory()).unwrap();

        let items = summary(&db.info());
        assert_eq!(items[0], ("Graphs", "GraphFriend".to_string()));
        assert_eq!(items[1], ("Collections", "3".to_string()));
        assert_eq!(items[2], ("Vertices", "4".to_string()));
        assert_eq!(items[3], ("Edges", "2".to_string()));
    }

    #[test]
    fn test_summary_without_graphs() {
        let db = graphwalk_engine::GraphWalkDB::new_in_memory();
        assert_eq!(summary(&db.info())[0].1, "(none)");
    }
}
