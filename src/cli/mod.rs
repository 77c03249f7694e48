//! CLI module for the criteria engine
//!
//! Provides command-line interface for:
//! - explain: translate criteria and print the plan
//! - query: translate and run criteria against a JSON data file
//! - products: product listing, search and creation

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ProductAction, Target};
pub use commands::{
    create_product, explain, load_config, load_registry, products, query, run, run_command,
    QueryRequest,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, read_request, write_error, write_response};
