//! The tail monitor.
//!
//! Poll-based on purpose: inotify-style push notifications are unreliable
//! on network and virtual filesystems, and the source format has no byte
//! offset index to seek by anyway. Each change notification triggers one
//! delta load against the shared cursor; the cursor lock is held for the
//! whole load, so deltas are serialized and duplicate notifications
//! resolve to empty deltas.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify::{Config, PollWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ingest::{IngestEngine, IngestionCursor, ViewerEvent};

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Failed to watch {path}: {message}")]
    Establish { path: PathBuf, message: String },
}

/// Notifications crossing from the watcher callback into the async task.
enum WatchSignal {
    Changed,
    Failed(String),
}

pub struct TailMonitor {
    // Dropping the watcher ends the poll loop; kept for the watch lifetime.
    _watcher: PollWatcher,
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl TailMonitor {
    /// Establish the watch and spawn the delta-forwarding task.
    pub fn spawn(
        path: PathBuf,
        poll_interval: Duration,
        engine: Arc<IngestEngine>,
        cursor: Arc<Mutex<IngestionCursor>>,
        events: mpsc::Sender<ViewerEvent>,
    ) -> Result<Self, WatchError> {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let config = Config::default().with_poll_interval(poll_interval);
        let mut watcher = PollWatcher::new(
            move |result: Result<notify::Event, notify::Error>| match result {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        let _ = signal_tx.send(WatchSignal::Changed);
                    }
                }
                Err(err) => {
                    let _ = signal_tx.send(WatchSignal::Failed(err.to_string()));
                }
            },
            config,
        )
        .map_err(|e| WatchError::Establish {
            path: path.clone(),
            message: e.to_string(),
        })?;

        watcher
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Establish {
                path: path.clone(),
                message: e.to_string(),
            })?;

        info!(path = %path.display(), interval_ms = poll_interval.as_millis() as u64, "tail watch started");

        let task = tokio::spawn(run(path, signal_rx, stop_rx, engine, cursor, events));

        Ok(Self {
            _watcher: watcher,
            stop_tx,
            task,
        })
    }

    /// Stop watching. An in-flight delta load finishes first, so the
    /// cursor is never left mid-advance.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.task.await;
        debug!("tail watch stopped");
    }
}

async fn run(
    path: PathBuf,
    mut signals: mpsc::UnboundedReceiver<WatchSignal>,
    mut stop_rx: oneshot::Receiver<()>,
    engine: Arc<IngestEngine>,
    cursor: Arc<Mutex<IngestionCursor>>,
    events: mpsc::Sender<ViewerEvent>,
) {
    loop {
        let signal = tokio::select! {
            _ = &mut stop_rx => break,
            signal = signals.recv() => match signal {
                Some(signal) => signal,
                None => break,
            },
        };

        match signal {
            WatchSignal::Changed => {
                let mut cursor = cursor.lock().await;
                match engine.load_delta(&path, &mut cursor, &events).await {
                    // Duplicate or already-consumed notification
                    Ok(records) if records.is_empty() => {}
                    Ok(records) => {
                        if events.send(ViewerEvent::Delta(records)).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "delta load failed");
                        if events.send(ViewerEvent::IoError(err.to_string())).await.is_err() {
                            break;
                        }
                    }
                }
            }
            WatchSignal::Failed(message) => {
                warn!(path = %path.display(), %message, "watch failed, stopping tail");
                let _ = events.send(ViewerEvent::WatchError(message)).await;
                break;
            }
        }
    }
}
