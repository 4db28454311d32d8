//! Handle for a background timer task.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{SyncError, SyncResult};

/// Controls one spawned timer loop.
///
/// `stop()` shuts the loop down gracefully. Dropping the handle without
/// stopping aborts the task.
#[derive(Debug)]
pub struct TaskHandle {
    name: &'static str,
    shutdown_tx: mpsc::Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl TaskHandle {
    pub(crate) fn new(name: &'static str, shutdown_tx: mpsc::Sender<()>, join: JoinHandle<()>) -> Self {
        TaskHandle {
            name,
            shutdown_tx,
            join: Some(join),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true while the loop has not exited.
    pub fn is_running(&self) -> bool {
        self.join.as_ref().is_some_and(|join| !join.is_finished())
    }

    /// Signals shutdown and waits for the loop to exit.
    pub async fn stop(mut self) -> SyncResult<()> {
        let Some(join) = self.join.take() else {
            return Ok(());
        };

        if self.shutdown_tx.send(()).await.is_err() {
            debug!(task = self.name, "Task already exited");
        }

        join.await
            .map_err(|e| SyncError::ChannelError(format!("{} task failed: {}", self.name, e)))
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}
