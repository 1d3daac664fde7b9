//! The per-file viewer session.
//!
//! One session owns everything tied to the currently open file: the
//! accepted path, the ingestion cursor, the engine, the consumer event
//! channel, and the optional tail watch. Hosts create one session per
//! viewer; independent sessions never share state.
//!
//! The cursor lives behind an async mutex held for the duration of any
//! load, so a full load and a tail delta can never interleave their reads
//! of the consumed-line counter.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::conf::ViewerConfig;
use crate::ingest::{IngestEngine, IngestError, IngestionCursor, ViewerEvent};
use crate::tail::{TailMonitor, WatchError};

/// The only accepted log-file extension, matched case-insensitively.
pub const CLEF_EXTENSION: &str = "clef";

#[derive(Debug, Error)]
pub enum SessionError {
    /// Rejected before any I/O is attempted.
    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("No file is open")]
    NoFileOpen,

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Watch(#[from] WatchError),
}

pub struct Session {
    config: ViewerConfig,
    engine: Arc<IngestEngine>,
    cursor: Arc<Mutex<IngestionCursor>>,
    events_tx: mpsc::Sender<ViewerEvent>,
    current: Option<PathBuf>,
    monitor: Option<TailMonitor>,
}

impl Session {
    /// Create a session and the consumer's end of its event channel.
    pub fn new(config: ViewerConfig) -> (Self, ReceiverStream<ViewerEvent>) {
        let (events_tx, events_rx) = mpsc::channel(config.event_channel_capacity);
        let session = Self {
            engine: Arc::new(IngestEngine::new(config.batch_size)),
            cursor: Arc::new(Mutex::new(IngestionCursor::new())),
            events_tx,
            current: None,
            monitor: None,
            config,
        };
        (session, ReceiverStream::new(events_rx))
    }

    /// Whether a path carries the accepted log-file extension.
    pub fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| ext.eq_ignore_ascii_case(CLEF_EXTENSION))
            .unwrap_or(false)
    }

    /// Open a file and run a full load, delivering batches over the event
    /// channel. Any prior watch is released and the prior cursor discarded.
    pub async fn open_full(&mut self, path: &Path) -> Result<(), SessionError> {
        if !Self::is_supported(path) {
            return Err(SessionError::UnsupportedFileType(path.to_path_buf()));
        }

        self.stop_watch().await;
        self.current = Some(path.to_path_buf());
        info!(path = %path.display(), "opening file");

        let mut cursor = self.cursor.lock().await;
        match self.engine.load_full(path, &mut cursor, &self.events_tx).await {
            Ok(()) => Ok(()),
            Err(err) => {
                // Fatal to this operation only; prior records and cursor
                // state stay intact on the consumer side.
                let _ = self
                    .events_tx
                    .send(ViewerEvent::IoError(err.to_string()))
                    .await;
                Err(err.into())
            }
        }
    }

    /// Start tailing the open file. A second call replaces the prior
    /// watch without leaking it.
    pub async fn start_watch(&mut self) -> Result<(), SessionError> {
        let path = self.current.clone().ok_or(SessionError::NoFileOpen)?;
        self.stop_watch().await;

        let monitor = TailMonitor::spawn(
            path,
            Duration::from_millis(self.config.poll_interval_ms),
            Arc::clone(&self.engine),
            Arc::clone(&self.cursor),
            self.events_tx.clone(),
        )?;
        self.monitor = Some(monitor);
        Ok(())
    }

    /// Stop tailing. Safe to call when no watch is running.
    pub async fn stop_watch(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            monitor.stop().await;
        }
    }

    pub fn is_watching(&self) -> bool {
        self.monitor.is_some()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub async fn lines_consumed(&self) -> u64 {
        self.cursor.lock().await.lines_consumed()
    }
}
