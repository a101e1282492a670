//! Debounced mirroring of the roster to storage.
//!
//! Every edit submits a full snapshot. The background task keeps only the
//! newest one and writes it once the editor has been quiet for the debounce
//! window, so a burst of keystrokes costs a single write. Write failures are
//! reported on the status channel and never reach the editing path.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::character::roster::Roster;
use crate::character::store::{RosterStore, StoreError};

/// Destination for roster snapshots.
pub trait RosterSink: Send + Sync + 'static {
    fn persist(&self, roster: &Roster) -> Result<(), StoreError>;
}

impl RosterSink for RosterStore {
    fn persist(&self, roster: &Roster) -> Result<(), StoreError> {
        self.save(roster)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Saved { characters: usize },
    Failed(String),
}

enum SyncCommand {
    Submit(Roster),
    Flush(oneshot::Sender<Result<(), String>>),
    Shutdown(oneshot::Sender<()>),
}

pub struct SyncHandle {
    tx: mpsc::UnboundedSender<SyncCommand>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Start the sync task. Status updates for each write attempt arrive on
    /// the returned receiver.
    pub fn spawn(
        sink: Arc<dyn RosterSink>,
        debounce: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SyncStatus>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = mpsc::unbounded_channel();
        let worker = SyncWorker {
            sink,
            debounce,
            pending: None,
            status_tx,
        };
        let task = tokio::spawn(worker.run(rx));
        (Self { tx, task }, status_rx)
    }

    /// Queue a snapshot, replacing any snapshot not yet written.
    pub fn submit(&self, roster: Roster) {
        if self.tx.send(SyncCommand::Submit(roster)).is_err() {
            warn!("roster sync task is gone; edit not persisted");
        }
    }

    /// Write any pending snapshot now and wait for the result.
    pub async fn flush(&self) -> Result<(), String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(SyncCommand::Flush(reply_tx))
            .map_err(|_| "roster sync task is not running".to_string())?;
        reply_rx
            .await
            .map_err(|_| "roster sync task stopped before flushing".to_string())?
    }

    /// Flush pending work and stop the task.
    pub async fn shutdown(self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(SyncCommand::Shutdown(reply_tx)).is_ok() {
            let _ = reply_rx.await;
        }
        let _ = self.task.await;
    }
}

struct SyncWorker {
    sink: Arc<dyn RosterSink>,
    debounce: Duration,
    pending: Option<Roster>,
    status_tx: mpsc::UnboundedSender<SyncStatus>,
}

impl SyncWorker {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<SyncCommand>) {
        let mut deadline: Option<Instant> = None;

        loop {
            let armed = deadline;
            let timer = async move {
                match armed {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                command = rx.recv() => match command {
                    Some(SyncCommand::Submit(roster)) => {
                        self.pending = Some(roster);
                        deadline = Some(Instant::now() + self.debounce);
                    }
                    Some(SyncCommand::Flush(reply)) => {
                        deadline = None;
                        let result = self.write_pending().await;
                        let _ = reply.send(result);
                    }
                    Some(SyncCommand::Shutdown(reply)) => {
                        let _ = self.write_pending().await;
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        let _ = self.write_pending().await;
                        break;
                    }
                },
                _ = timer => {
                    deadline = None;
                    let _ = self.write_pending().await;
                }
            }
        }
        debug!("roster sync task stopped");
    }

    async fn write_pending(&mut self) -> Result<(), String> {
        let Some(roster) = self.pending.take() else {
            return Ok(());
        };
        let characters = roster.len();
        let sink = Arc::clone(&self.sink);

        let outcome = tokio::task::spawn_blocking(move || {
            let result = sink.persist(&roster).map_err(|err| err.to_string());
            (roster, result)
        })
        .await;

        let result = match outcome {
            Ok((_, Ok(()))) => {
                debug!(characters, "roster synced");
                let _ = self.status_tx.send(SyncStatus::Saved { characters });
                return Ok(());
            }
            Ok((roster, Err(message))) => {
                // Keep the snapshot for the next timer, flush or shutdown.
                if self.pending.is_none() {
                    self.pending = Some(roster);
                }
                message
            }
            Err(err) => err.to_string(),
        };
        warn!(error = %result, "roster sync failed");
        let _ = self.status_tx.send(SyncStatus::Failed(result.clone()));
        Err(result)
    }
}
