//! CLI argument definitions using clap
//!
//! Commands:
//! - criteria-engine explain --schema <path> --criteria <path> --root <entity>
//! - criteria-engine query --schema <path> --data <path> --criteria <path> --root <entity>
//! - criteria-engine products list --data <path> [--page N] [--limit N]
//! - criteria-engine products search --data <path> --search <path>
//! - criteria-engine products create --data <path> --product <path>
//!
//! A criteria or search path of `-` reads one JSON line from stdin.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Criteria engine - translate filter criteria into executable queries
#[derive(Parser, Debug)]
#[command(name = "criteria-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Which translation target builds the query
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Builder,
    Specification,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate criteria and print the explain plan
    Explain {
        /// Path to the entity schema file
        #[arg(long)]
        schema: PathBuf,

        /// Path to the criteria file
        #[arg(long)]
        criteria: PathBuf,

        /// Root entity name
        #[arg(long)]
        root: String,

        /// Print the plain-text plan instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Translate criteria and run it against a data file
    Query {
        /// Path to the entity schema file
        #[arg(long)]
        schema: PathBuf,

        /// Path to the data file
        #[arg(long)]
        data: PathBuf,

        /// Path to the criteria file
        #[arg(long)]
        criteria: PathBuf,

        /// Root entity name
        #[arg(long)]
        root: String,

        /// Page number; with or without --limit, the result is paginated
        #[arg(long)]
        page: Option<u32>,

        /// Page size, clamped to the configured maximum
        #[arg(long)]
        limit: Option<u32>,

        /// Translation target
        #[arg(long, value_enum, default_value_t = Target::Builder)]
        target: Target,

        /// Path to the engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Product catalog over a data file
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductAction {
    /// List one page of products
    List {
        /// Path to the data file
        #[arg(long)]
        data: PathBuf,

        /// Page number
        #[arg(long)]
        page: Option<u32>,

        /// Page size, clamped to the configured maximum
        #[arg(long)]
        limit: Option<u32>,

        /// Path to the engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Search products
    Search {
        /// Path to the data file
        #[arg(long)]
        data: PathBuf,

        /// Path to the product search file
        #[arg(long)]
        search: PathBuf,

        /// Path to the engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a product and write it back to the data file
    Create {
        /// Path to the data file
        #[arg(long)]
        data: PathBuf,

        /// Path to the new product file: {"name", "price", "quantity"}
        #[arg(long)]
        product: PathBuf,

        /// Path to the engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
