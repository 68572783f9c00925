//! Graphwalk CLI - inspect and traverse JSON graph datasets.
//!
//! Every command loads a dataset file into an in-memory database first, so
//! the CLI doubles as a loader check and a way to try traversals by hand.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use graphwalk_core::graph::Direction;
use graphwalk_core::traversal::{Strategy, Uniqueness};
use std::path::PathBuf;

/// Graphwalk dataset tool.
///
/// A command-line interface for loading, validating, and traversing
/// Graphwalk datasets.
#[derive(Parser)]
#[command(name = "graphwalk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Create missing vertex collections when a graph is defined
    #[arg(long, global = true)]
    auto_create: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Display dataset information (graphs, collections, counts)
    Info {
        /// Path to the dataset
        path: PathBuf,
    },

    /// Display graph definitions (edge definitions, orphan collections)
    Schema {
        /// Path to the dataset
        path: PathBuf,
    },

    /// Check that every record and graph of a dataset loads
    Validate {
        /// Path to the dataset
        path: PathBuf,
    },

    /// Traverse a graph from a start vertex
    Traverse(TraverseArgs),
}

/// Arguments of the traverse command.
#[derive(clap::Args)]
struct TraverseArgs {
    /// Path to the dataset
    path: PathBuf,

    /// Graph to traverse
    #[arg(long, short)]
    graph: String,

    /// Start vertex handle (collection/key)
    #[arg(long, short)]
    start: String,

    /// Edge direction (outbound, inbound, any)
    #[arg(long, default_value = "outbound")]
    direction: Direction,

    /// Expansion order (breadthfirst, depthfirst)
    #[arg(long, default_value = "breadthfirst")]
    strategy: Strategy,

    /// Vertex uniqueness (global, path)
    #[arg(long, default_value = "global")]
    uniqueness: Uniqueness,

    /// Minimum depth of reported vertices
    #[arg(long, default_value_t = 0)]
    min_depth: usize,

    /// Maximum depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum number of expanded vertices
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Abort the traversal after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = commands::config(cli.auto_create);
    let result = match cli.command {
        Commands::Info { path } => commands::info::run(&path, &config, cli.format, cli.quiet),
        Commands::Schema { path } => commands::schema::run(&path, &config, cli.format, cli.quiet),
        Commands::Validate { path } => commands::validate::run(&path, &config, cli.format, cli.quiet),
        Commands::Traverse(args) => commands::traverse::run(&args, config, cli.format, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
