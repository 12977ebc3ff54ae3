//! Catalog CLI library.
//!
//! Configuration, command execution, output formatting and the REPL behind
//! the `catalog` binary. Queue commands (`recommend`, `queue`, `save`,
//! `clear`) act on a controller that lives for one process, so they are
//! most useful inside the REPL.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
