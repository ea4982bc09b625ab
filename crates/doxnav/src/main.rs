//! doxnav CLI - Doxygen navigation tree toolkit.
//!
//! Provides commands for:
//! - `versions`: list documentation builds
//! - `check`: validate navigation trees
//! - `show`: print a tree as outline, JSON, HTML or script
//! - `locate`: resolve a deep link
//! - `diff`: compare two builds
//! - `index`: write `navtreeindexN.js` chunks
//! - `fmt`: rewrite a `navtreedata.js` in canonical layout
//! - `serve`: start the JSON API

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{
    CheckArgs, DiffArgs, FmtArgs, IndexArgs, LocateArgs, ServeArgs, ShowArgs, VersionsArgs,
};
use output::Output;

/// doxnav - Doxygen navigation tree toolkit.
#[derive(Parser)]
#[command(name = "doxnav", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List documentation builds with node counts.
    Versions(VersionsArgs),
    /// Validate one or all builds.
    Check(CheckArgs),
    /// Print the navigation tree of a build.
    Show(ShowArgs),
    /// Print where an href sits in the tree.
    Locate(LocateArgs),
    /// Compare the trees of two builds.
    Diff(DiffArgs),
    /// Write navtreeindexN.js chunks for a build.
    Index(IndexArgs),
    /// Rewrite a navtreedata.js in canonical layout.
    Fmt(FmtArgs),
    /// Start the JSON API server.
    Serve(ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Versions(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Show(args) => args.execute(),
        Commands::Locate(args) => args.execute(),
        Commands::Diff(args) => args.execute(),
        Commands::Index(args) => args.execute(),
        Commands::Fmt(args) => args.execute(),
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
