//! # Goodlink Sync Runner
//!
//! Headless host for the inventory sync engine: loads configuration, opens
//! the store, mounts the engine and reads commands from stdin.
//!
//! ## Module Organization
//! ```text
//! goodlink_runner_lib/
//! ├── lib.rs          ◄─── You are here (startup & console loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── sync.rs     ◄─── Engine + timer handles
//! ├── commands/
//! │   ├── mod.rs      ◄─── Parsing and dispatch
//! │   ├── inventory.rs◄─── list, activity
//! │   └── sync.rs     ◄─── status, sync, retry
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use commands::{Command, CommandOutput};
use goodlink_core::{Notification, NotificationLevel};
use goodlink_store::{DbConfig, Storage};
use goodlink_sync::SyncConfig;
use state::SyncState;

const PROMPT: &str = "goodlink> ";

/// Runs the console application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: info,goodlink=debug,sqlx=warn; override with RUST_LOG   │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • sync.toml in the platform config dir, GOODLINK_* overrides       │
/// │                                                                         │
/// │  3. Open Store ───────────────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │                                                                         │
/// │  4. Mount Engine ─────────────────────────────────────────────────────► │
/// │     • Seed sample records if empty                                      │
/// │     • Start mutation simulator and activity feed                        │
/// │                                                                         │
/// │  5. Console Loop ─────────────────────────────────────────────────────► │
/// │     • Until `quit`, end of input or Ctrl-C, then unmount                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Goodlink sync runner");

    let config = SyncConfig::load_or_default(None);
    let db_path = get_database_path(&config)?;
    info!(?db_path, "Database path determined");

    let storage = Storage::open(DbConfig::new(db_path)).await?;
    info!("Store opened and migrations applied");

    let state = SyncState::new(config, storage);
    state.mount().await?;

    let printer = tokio::spawn(print_notifications(state.subscribe()));

    let result = console_loop(&state).await;

    printer.abort();
    state.unmount().await?;
    info!("Goodlink sync runner stopped");

    result
}

async fn console_loop(state: &SyncState) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("{}", commands::HELP);

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                None
            }
        };

        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = match Command::parse(&line) {
            Ok(command) => commands::execute(state, command).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(CommandOutput::Message(message)) => println!("{}", message),
            Ok(CommandOutput::Quit) => break,
            Err(e) => println!("error: {}", e),
        }
    }

    Ok(())
}

async fn print_notifications(mut rx: tokio::sync::broadcast::Receiver<Notification>) {
    loop {
        match rx.recv().await {
            Ok(notification) => println!("\n{}", format_notification(&notification)),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Notification printer lagged"),
            Err(RecvError::Closed) => break,
        }
    }
}

fn format_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    match &notification.description {
        Some(description) => format!("[{}] {}: {}", tag, notification.title, description),
        None => format!("[{}] {}", tag, notification.title),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=goodlink=trace` - Show trace for goodlink crates only
/// - Default: `info,goodlink=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,goodlink=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/de.goodlink.sync/goodlink.db`
/// - **Windows**: `%APPDATA%\goodlink\sync\data\goodlink.db`
/// - **Linux**: `~/.local/share/sync/goodlink.db`
///
/// ## Development Override
/// Set `GOODLINK_DB_PATH` (or `storage.database_path` in sync.toml).
fn get_database_path(config: &SyncConfig) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = config
        .database_path()
        .ok_or("Could not determine app data directory")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_notification() {
        let n = Notification::success("Inventory synced: GL-001 on Amazon")
            .with_description("Quantity increased by 4");
        assert_eq!(
            format_notification(&n),
            "[ok] Inventory synced: GL-001 on Amazon: Quantity increased by 4"
        );
        assert_eq!(
            format_notification(&Notification::error("Retry failed for GL-002 on OTTO")),
            "[error] Retry failed for GL-002 on OTTO"
        );
    }

    #[test]
    fn test_configured_database_path_wins() {
        let mut config = SyncConfig::default();
        let dir = std::env::temp_dir().join("goodlink-runner-test");
        config.storage.database_path = Some(dir.join("goodlink.db"));

        let path = get_database_path(&config).unwrap();
        assert_eq!(path, dir.join("goodlink.db"));
        assert!(dir.exists());
    }
}
