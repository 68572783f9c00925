//! Graph traversal command.

use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::Cell;
use graphwalk_core::traversal::{TraversalResult, TraversalStats};
use graphwalk_engine::{Config, TraversalRequest};
use serde::Serialize;

use crate::output::{self, Format};
use crate::{OutputFormat, TraverseArgs};

/// Traversal output: the result plus its counters.
#[derive(Serialize)]
struct TraversalOutput<'a> {
    graph: &'a str,
    #[serde(flatten)]
    result: &'a TraversalResult,
    stats: TraversalStats,
}

/// Run the traverse command.
pub fn run(args: &TraverseArgs, config: Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let config = match args.timeout_ms {
        Some(ms) => config.with_traversal_timeout(Duration::from_millis(ms)),
        None => config,
    };
    let db = super::open(&args.path, &config)?;
    let request = request(args)?;

    let result = db
        .traverse(&args.graph, &request)
        .with_context(|| format!("traversal of '{}' failed", args.graph))?;
    tracing::debug!(
        iterations = result.stats.iterations,
        edges_examined = result.stats.edges_examined,
        "traversal finished"
    );

    let output = TraversalOutput {
        graph: &args.graph,
        result: &result,
        stats: result.stats,
    };

    match Format::from(format) {
        Format::Json => output::print_json(&output, quiet)?,
        Format::Table => {
            if !quiet {
                let mut table = output::create_table();
                output::add_header(&mut table, &["Vertex", "Properties"]);
                for vertex in &result.visited.vertices {
                    table.add_row(vec![
                        Cell::new(&vertex.handle),
                        Cell::new(serde_json::to_string(&vertex.properties)?),
                    ]);
                }
                println!("{table}\n");

                let mut table = output::create_table();
                output::add_header(&mut table, &["Depth", "Path"]);
                for path in &result.visited.paths {
                    table.add_row(vec![Cell::new(path.len()), Cell::new(path)]);
                }
                println!("{table}\n");

                println!(
                    "Vertices: {}, Paths: {}, Iterations: {}",
                    result.visited.vertices.len(),
                    result.visited.paths.len(),
                    result.stats.iterations
                );
            }
        }
    }

    Ok(())
}

fn request(args: &TraverseArgs) -> Result<TraversalRequest> {
    let mut request = TraversalRequest::parse(&args.start)
        .with_context(|| format!("bad start vertex '{}'", args.start))?
        .with_direction(args.direction)
        .with_strategy(args.strategy)
        .with_uniqueness(args.uniqueness)
        .with_min_depth(args.min_depth);
    if let Some(depth) = args.max_depth {
        request = request.with_max_depth(depth);
    }
    if let Some(iterations) = args.max_iterations {
        request = request.with_max_iterations(iterations);
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use clap::Parser;

    fn parse(argv: &[&str]) -> TraverseArgs {
        match crate::Cli::try_parse_from(argv).unwrap().command {
            crate::Commands::Traverse(args) => args,
            _ => panic!("expected traverse"),
        }
    }

    #[test]
    fn test_request_from_flags() {
        let args = parse(&[
            "graphwalk",
            "traverse",
            "data.json",
            "--graph",
            "GraphFriend",
            "--start",
            "Person/matteo",
            "--direction",
            "any",
            "--strategy",
            "dfs",
            "--max-depth",
            "2",
        ]);
        let request = request(&args).unwrap();

        assert_eq!(request.start_vertex.to_string(), "Person/matteo");
        assert_eq!(request.direction, graphwalk_core::graph::Direction::Any);
        assert_eq!(request.strategy, graphwalk_core::traversal::Strategy::DepthFirst);
        assert_eq!(request.max_depth, Some(2));
        assert_eq!(request.max_iterations, None);
    }

    #[test]
    fn test_bad_flags_rejected() {
        assert!(
            crate::Cli::try_parse_from([
                "graphwalk", "traverse", "d.json", "-g", "G", "-s", "P/a", "--direction", "up",
            ])
            .is_err()
        );

        let args = parse(&["graphwalk", "traverse", "d.json", "-g", "G", "-s", "nope"]);
        let err = request(&args).unwrap_err();
        assert!(format!("{err:#}").contains("startVertex is required"));
    }

    #[test]
    fn test_traversal_output() {
        let (_dir, path) = fixtures::dataset(fixtures::SOCIAL);
        let path = path.to_string_lossy().into_owned();
        let args = parse(&[
            "graphwalk",
            "traverse",
            &path,
            "-g",
            "GraphFriend",
            "-s",
            "Person/matteo",
        ]);
        let db = crate::commands::open(&args.path, &Config::in_memory()).unwrap();
        let result = db.traverse(&args.graph, &request(&args).unwrap()).unwrap();

        let output = TraversalOutput {
            graph: &args.graph,
            result: &result,
            stats: result.stats,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["graph"], "GraphFriend");
        assert_eq!(json["visited"]["vertices"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["visited"]["paths"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["stats"]["iterations"], 3);
    }
}
