use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Packsmith - dependency resolver and compiler for versioned game content
#[derive(Parser, Debug)]
#[command(name = "packsmith")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to ./packsmith.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Content root to process; repeat to process several in order.
    /// Replaces the configured roots.
    #[arg(long = "root", global = true)]
    pub roots: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve all content roots and report dropped modules (exits non-zero on diagnostics)
    Check,

    /// List compiled packs with their dependency sets and deferred references
    Packs {
        /// Only show versions of this pack (namespace:name)
        #[arg(long)]
        pack: Option<String>,
    },
}
