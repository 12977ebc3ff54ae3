//! Command implementations.

pub mod catalog;
pub mod profile;
pub mod recommend;

pub use self::catalog::{execute_create, execute_delete, execute_list};
pub use self::profile::execute_profile;
pub use self::recommend::{execute_clear, execute_queue, execute_recommend, execute_save};

use crate::cli::Command;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use catalog_curator::Controller;
use catalog_sdk::CatalogService;

/// Dispatch a parsed command against a controller.
pub async fn execute<S: CatalogService>(
    cmd: Command,
    controller: &Controller<S>,
    config: &mut Config,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        Command::List => execute_list(controller, formatter).await,
        Command::Create => execute_create(controller, formatter).await,
        Command::Delete(args) => execute_delete(args, controller, formatter).await,
        Command::Recommend(args) => execute_recommend(args, controller, formatter).await,
        Command::Queue => execute_queue(controller, formatter).await,
        Command::Save(args) => execute_save(args, controller, formatter).await,
        Command::Clear => execute_clear(controller, formatter).await,
        Command::Profile(args) => execute_profile(args, config, formatter).await,
        Command::Repl => Err(CliError::NotPermitted("Already in the REPL".to_string())),
    }
}
