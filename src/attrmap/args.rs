use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "attrmap", version)]
#[command(about = "Build and inspect typed attribute maps", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding schema.json (defaults to the user config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub schema_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a map from assignments and print its snapshot
    #[command(alias = "b")]
    Build {
        /// Assignments such as count=5, one per declared attribute
        #[arg(value_name = "NAME=VALUE")]
        assignments: Vec<String>,

        /// Wrap the map in an unmodifiable view
        #[arg(long)]
        frozen: bool,

        /// Store a single assignment in a singleton map
        #[arg(long)]
        singleton: bool,

        /// Write the snapshot to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Restore a snapshot and print every declared attribute's value
    #[command(alias = "s")]
    Show {
        /// Snapshot file written by `build -o`
        snapshot: PathBuf,
    },

    /// List the declared attributes
    #[command(alias = "ls")]
    Schema,
}
