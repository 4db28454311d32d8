//! # Console Commands Module
//!
//! Everything the operator can type at the `goodlink>` prompt.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (parsing + dispatch)
//! ├── inventory.rs  ◄─── list, activity
//! └── sync.rs       ◄─── status, sync, retry
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Console Command Flow                                 │
//! │                                                                         │
//! │  goodlink> sync Amazon                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command::parse ──► Command::Sync { marketplace: Some("Amazon") }       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  execute(&SyncState, command)                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  sync::sync_inventory(..) -> Result<SyncReport, ApiError>               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CommandOutput::Message("3 attempted, 2 synced, 1 failed")              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod inventory;
pub mod sync;

use crate::error::ApiError;
use crate::state::SyncState;

pub const HELP: &str = "\
Commands:
  status                      connection health, last sync, counters
  list [marketplace]          inventory records
  sync [marketplace]          manual sync (all marketplaces if omitted)
  retry <sku> <marketplace>   retry one record
  activity [limit]            newest live activity entries
  help                        this text
  quit                        stop timers and exit";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    List { marketplace: Option<String> },
    Sync { marketplace: Option<String> },
    Retry { sku: String, marketplace: String },
    Activity { limit: Option<usize> },
    Help,
    Quit,
}

/// What the console loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Message(String),
    Quit,
}

impl Command {
    /// Parses one non-empty input line.
    pub fn parse(line: &str) -> Result<Self, ApiError> {
        let mut words = line.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| ApiError::unknown_command("empty command"))?;
        let args: Vec<&str> = words.collect();

        let command = match (name.to_lowercase().as_str(), args.as_slice()) {
            ("status", []) => Command::Status,
            ("list", []) => Command::List { marketplace: None },
            ("list", [m]) => Command::List {
                marketplace: Some(m.to_string()),
            },
            ("sync", []) => Command::Sync { marketplace: None },
            ("sync", [m]) => Command::Sync {
                marketplace: Some(m.to_string()),
            },
            ("retry", [sku, m]) => Command::Retry {
                sku: sku.to_string(),
                marketplace: m.to_string(),
            },
            ("activity", []) => Command::Activity { limit: None },
            ("activity", [n]) => Command::Activity {
                limit: Some(
                    n.parse()
                        .map_err(|_| ApiError::validation(format!("invalid limit: {}", n)))?,
                ),
            },
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            (
                "status" | "list" | "sync" | "retry" | "activity" | "help" | "?" | "quit" | "exit",
                _,
            ) => {
                return Err(ApiError::unknown_command(format!(
                    "wrong arguments for '{}', type 'help'",
                    name
                )))
            }
            _ => {
                return Err(ApiError::unknown_command(format!(
                    "unknown command '{}', type 'help'",
                    name
                )))
            }
        };

        Ok(command)
    }
}

/// Runs one command against the engine.
pub async fn execute(state: &SyncState, command: Command) -> Result<CommandOutput, ApiError> {
    let message = match command {
        Command::Status => sync::get_sync_status(state).await?.to_string(),
        Command::List { marketplace } => {
            inventory::render_records(&inventory::list_inventory(state, marketplace).await?)
        }
        Command::Sync { marketplace } => {
            let report = sync::sync_inventory(state, marketplace).await?;
            format!(
                "{} attempted, {} synced, {} failed",
                report.attempted, report.synced, report.failed
            )
        }
        Command::Retry { sku, marketplace } => {
            sync::retry_sync(state, sku, marketplace).await?.to_string()
        }
        Command::Activity { limit } => {
            inventory::render_activities(&inventory::list_activities(state, limit).await?)
        }
        Command::Help => HELP.to_string(),
        Command::Quit => return Ok(CommandOutput::Quit),
    };

    Ok(CommandOutput::Message(message))
}
