//! Interactive REPL (Read-Eval-Print Loop) mode.
//!
//! The REPL owns one controller for its whole session, so the
//! recommendation queue and its timers live as long as the prompt does.

use crate::cli::{Command, DeleteArgs, ProfileAction, ProfileArgs, RecommendArgs, SaveArgs};
use crate::commands;
use crate::config::{config_dir, Config};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use catalog_curator::{Controller, EntrySnapshot};
use catalog_domain::EntryStatus;
use catalog_sdk::{CatalogClient, CatalogService};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tokio::task::JoinHandle;

/// A controller and the task reporting its background events.
struct Session {
    url: String,
    controller: Controller<CatalogClient>,
    watcher: JoinHandle<()>,
}

impl Session {
    fn start(url: String, config: &Config, formatter: &Formatter) -> Self {
        let controller = Controller::new(CatalogClient::new(&url), config.curator.clone());
        let watcher = spawn_watcher(&controller, formatter.clone());
        tracing::debug!(url = %url, "REPL session started");
        Self {
            url,
            controller,
            watcher,
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

/// Run the interactive REPL.
///
/// `url_override` pins the service URL; otherwise it follows the active
/// profile, and switching to a profile with another URL starts a fresh
/// session.
pub async fn run_repl(
    config: &mut Config,
    url_override: Option<&str>,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", formatter.info("Catalog REPL - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut session = Session::start(config.service_url(url_override)?, config, formatter);
    if let Err(e) = session.controller.refresh_catalog().await {
        tracing::debug!(error = %e, "Initial catalog load failed");
    }

    loop {
        let queued = session.controller.current_state().entries.len();
        let prompt = if queued == 0 {
            "catalog> ".to_string()
        } else {
            format!("catalog ({} queued)> ", queued)
        };

        match tokio::task::block_in_place(|| editor.readline(&prompt)) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(ReplCommand::Command(cmd)) => {
                        let switches_profile = matches!(cmd, Command::Profile(_));
                        match commands::execute(cmd, &session.controller, config, formatter).await {
                            // Controller failures are reported by the watcher
                            Err(e) if e.is_controller_notice() => {}
                            Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                            Ok(()) => {}
                        }

                        if switches_profile {
                            let url = config.service_url(url_override)?;
                            if url != session.url {
                                session = Session::start(url, config, formatter);
                                println!(
                                    "{}",
                                    formatter.info(&format!(
                                        "Now using {} (recommendation queue reset)",
                                        session.url
                                    ))
                                );
                            }
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Print notices and queue removals as the controller publishes them.
fn spawn_watcher<S: CatalogService>(controller: &Controller<S>, formatter: Formatter) -> JoinHandle<()> {
    let mut updates = controller.subscribe();

    tokio::spawn(async move {
        let initial = updates.borrow_and_update().clone();
        let mut last_notice = initial.notice.map(|n| n.id);
        let mut previous = initial.entries;

        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();

            if let Some(notice) = &snapshot.notice {
                if last_notice != Some(notice.id) {
                    eprintln!("{}", formatter.notice(notice));
                    last_notice = Some(notice.id);
                }
            }

            for entry in faded_out(&previous, &snapshot.entries) {
                println!("{}", formatter.removed(entry));
            }

            previous = snapshot.entries;
        }
    })
}

/// Entries that were fading in `before` and are gone from `after`.
fn faded_out<'a>(before: &'a [EntrySnapshot], after: &[EntrySnapshot]) -> Vec<&'a EntrySnapshot> {
    before
        .iter()
        .filter(|e| e.status == EntryStatus::Fading)
        .filter(|e| !after.iter().any(|a| a.id == e.id))
        .collect()
}

/// REPL command type.
#[derive(Debug)]
enum ReplCommand {
    Exit,
    Help,
    Command(Command),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "list" | "ls" | "refresh" => Ok(ReplCommand::Command(Command::List)),
        "create" => Ok(ReplCommand::Command(Command::Create)),
        "delete" | "rm" => parse_delete_command(&parts[1..]),
        "recommend" | "rec" => parse_recommend_command(line),
        "queue" => Ok(ReplCommand::Command(Command::Queue)),
        "save" => parse_save_command(&parts[1..]),
        "clear" => Ok(ReplCommand::Command(Command::Clear)),
        "profile" => parse_profile_command(&parts[1..]),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

fn parse_delete_command(args: &[&str]) -> Result<ReplCommand> {
    if args.is_empty() {
        return Err(CliError::InvalidInput("Usage: delete <id> [id2] ...".to_string()));
    }

    let ids = args
        .iter()
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| CliError::InvalidInput(format!("Invalid product ID '{}'", s)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ReplCommand::Command(Command::Delete(DeleteArgs { ids })))
}

/// The payload is everything after the command word, untouched.
fn parse_recommend_command(line: &str) -> Result<ReplCommand> {
    let payload = line
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or("");

    if payload.is_empty() {
        return Err(CliError::InvalidInput(
            "Usage: recommend <json> | recommend @<file>".to_string(),
        ));
    }

    Ok(ReplCommand::Command(Command::Recommend(RecommendArgs {
        payload: payload.to_string(),
        save: false,
    })))
}

fn parse_save_command(args: &[&str]) -> Result<ReplCommand> {
    let row = args
        .first()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|row| *row > 0)
        .ok_or_else(|| CliError::InvalidInput("Usage: save <row>".to_string()))?;

    Ok(ReplCommand::Command(Command::Save(SaveArgs { row })))
}

fn parse_profile_command(args: &[&str]) -> Result<ReplCommand> {
    if args.is_empty() {
        return Ok(ReplCommand::Command(Command::Profile(ProfileArgs {
            action: ProfileAction::Show,
        })));
    }

    let action = match args[0] {
        "list" => ProfileAction::List,
        "show" => ProfileAction::Show,
        "switch" => {
            if args.len() < 2 {
                return Err(CliError::InvalidInput("Usage: profile switch <name>".to_string()));
            }
            ProfileAction::Switch {
                name: args[1].to_string(),
            }
        }
        "set" => {
            if args.len() < 3 {
                return Err(CliError::InvalidInput("Usage: profile set <name> <url>".to_string()));
            }
            ProfileAction::Set {
                name: args[1].to_string(),
                url: args[2].to_string(),
            }
        }
        "delete" => {
            if args.len() < 2 {
                return Err(CliError::InvalidInput("Usage: profile delete <name>".to_string()));
            }
            ProfileAction::Delete {
                name: args[1].to_string(),
            }
        }
        _ => return Err(CliError::InvalidInput(format!("Unknown profile action: {}", args[0]))),
    };

    Ok(ReplCommand::Command(Command::Profile(ProfileArgs { action })))
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!("Failed to initialize editor: {}", e)))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  list                           - Refresh and show the catalog");
    println!("  create                         - Create an empty product");
    println!("  delete <id> [id2] ...          - Delete products");
    println!("  recommend <json> | @<file>     - Queue a recommendation");
    println!("    json: {{\"sourceProductId\": .., \"recommendedProduct\": {{..}}}}");
    println!("          or a flat product (shown, but cannot be saved)");
    println!("  queue                          - Show queued recommendations");
    println!("  save <row>                     - Save a queued recommendation");
    println!("  clear                          - Empty the queue");
    println!("  profile [list|show|switch|set|delete] - Manage profiles");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit                     - Exit REPL");
    println!();
}
