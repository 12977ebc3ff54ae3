//! Catalog commands: list, create, delete.

use crate::cli::DeleteArgs;
use crate::error::{CliError, Result};
use crate::output::{find_product, Formatter};
use catalog_curator::Controller;
use catalog_domain::ProductId;
use catalog_sdk::CatalogService;

/// Execute the list command.
pub async fn execute_list<S: CatalogService>(
    controller: &Controller<S>,
    formatter: &Formatter,
) -> Result<()> {
    controller.refresh_catalog().await?;
    println!("{}", formatter.format_catalog(&controller.current_state())?);
    Ok(())
}

/// Execute the create command.
pub async fn execute_create<S: CatalogService>(
    controller: &Controller<S>,
    formatter: &Formatter,
) -> Result<()> {
    controller.create_product().await?;
    println!("{}", formatter.success("Product created"));
    println!("{}", formatter.format_catalog(&controller.current_state())?);
    Ok(())
}

/// Execute the delete command.
///
/// Every id is attempted. Failures are not printed here; they come back
/// together once all ids have been tried, and the REPL leaves reporting
/// them to its notice watcher.
pub async fn execute_delete<S: CatalogService>(
    args: DeleteArgs,
    controller: &Controller<S>,
    formatter: &Formatter,
) -> Result<()> {
    let mut failures = Vec::new();

    for id in args.ids {
        let label = find_product(&controller.current_state(), id)
            .and_then(|p| p.name.clone())
            .map(|name| format!("{} ({})", name, id))
            .unwrap_or_else(|| id.to_string());

        match controller.delete_product(ProductId::new(id)).await {
            Ok(()) => println!("{}", formatter.success(&format!("Deleted product {}", label))),
            Err(e) => failures.push(e),
        }
    }

    match failures.len() {
        0 => Ok(()),
        1 => Err(CliError::Curator(failures.remove(0))),
        _ => Err(CliError::Curators(failures)),
    }
}
