//! Recommendation queue commands: recommend, queue, save, clear.

use crate::cli::{RecommendArgs, SaveArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use catalog_curator::Controller;
use catalog_domain::{EntryId, EntryKey};
use catalog_sdk::CatalogService;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};

/// Execute the recommend command.
///
/// A JSON array queues each element in order.
pub async fn execute_recommend<S: CatalogService>(
    args: RecommendArgs,
    controller: &Controller<S>,
    formatter: &Formatter,
) -> Result<()> {
    let payloads = split_payloads(read_payload(&args.payload)?);
    if payloads.is_empty() {
        return Err(CliError::InvalidInput("No recommendations in payload".to_string()));
    }

    for payload in payloads {
        let id = controller.add(payload)?;

        let snapshot = controller.current_state();
        if let Some((row, entry)) = snapshot
            .entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.id == id)
        {
            println!("{}", formatter.queued(row + 1, entry));
        }

        if args.save {
            let outcome = controller.save(EntryKey::Entry(id)).await?;
            println!("{}", formatter.saved(&outcome));
            wait_until_removed(controller, id).await;
        }
    }

    Ok(())
}

/// Execute the queue command.
pub async fn execute_queue<S: CatalogService>(
    controller: &Controller<S>,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", formatter.format_queue(&controller.current_state())?);
    Ok(())
}

/// Execute the save command.
pub async fn execute_save<S: CatalogService>(
    args: SaveArgs,
    controller: &Controller<S>,
    formatter: &Formatter,
) -> Result<()> {
    let snapshot = controller.current_state();
    let entry = args
        .row
        .checked_sub(1)
        .and_then(|index| snapshot.entry_at(index))
        .ok_or_else(|| CliError::InvalidInput(format!("No recommendation in row {}", args.row)))?;

    let outcome = controller.save(EntryKey::Entry(entry.id)).await?;
    println!("{}", formatter.saved(&outcome));
    Ok(())
}

/// Execute the clear command.
pub async fn execute_clear<S: CatalogService>(
    controller: &Controller<S>,
    formatter: &Formatter,
) -> Result<()> {
    let removed = controller.clear();
    println!(
        "{}",
        formatter.success(&format!("Cleared {} recommendation(s)", removed))
    );
    Ok(())
}

/// Resolve a payload argument: inline JSON, `@path`, or `-` for stdin.
pub fn read_payload(arg: &str) -> Result<Value> {
    let text = if arg == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else if let Some(path) = arg.strip_prefix('@') {
        fs::read_to_string(path)?
    } else {
        arg.to_string()
    };

    Ok(serde_json::from_str(text.trim())?)
}

/// One payload per array element; anything else is a single payload.
pub fn split_payloads(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Resolve once `id` is no longer queued.
pub async fn wait_until_removed<S: CatalogService>(controller: &Controller<S>, id: EntryId) {
    let mut updates = controller.subscribe();
    while updates.borrow_and_update().entries.iter().any(|e| e.id == id) {
        if updates.changed().await.is_err() {
            break;
        }
    }
}
