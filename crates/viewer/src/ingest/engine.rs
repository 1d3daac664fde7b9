//! The ingestion engine: full loads and tail deltas.
//!
//! Both operations read the file as a line stream and normalize line by
//! line. Per-line failures are reported individually and never abort the
//! stream; only open/read failures are fatal to an operation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::fs::File;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::{debug, info};

use crate::record::{self, LogRecord};

use super::cursor::IngestionCursor;
use super::event::ViewerEvent;
use super::lines::stream_lines;
use super::metrics::IngestMetrics;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read failed: {0}")]
    Read(#[from] std::io::Error),

    /// The consumer dropped its end of the event channel; the load stops
    /// promptly and releases the file handle.
    #[error("Event channel closed by consumer")]
    ChannelClosed,
}

pub struct IngestEngine {
    batch_size: usize,
    metrics: Arc<IngestMetrics>,
}

impl IngestEngine {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            metrics: Arc::new(IngestMetrics::new()),
        }
    }

    pub fn metrics(&self) -> &Arc<IngestMetrics> {
        &self.metrics
    }

    /// Full load: reset the cursor, read every line, deliver records in
    /// batches of `batch_size` as they fill, then a final partial batch and
    /// a completion event.
    ///
    /// Malformed lines emit [`ViewerEvent::LineError`] and do not advance
    /// the cursor or occupy a batch slot.
    pub async fn load_full(
        &self,
        path: &Path,
        cursor: &mut IngestionCursor,
        events: &mpsc::Sender<ViewerEvent>,
    ) -> Result<(), IngestError> {
        cursor.reset();

        let file = File::open(path).await.map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "starting full load");

        let stream = stream_lines(file);
        tokio::pin!(stream);

        let mut batch = Vec::with_capacity(self.batch_size);
        let mut ordinal: u64 = 0;

        while let Some(line) = stream.next().await {
            let line = line?;
            ordinal += 1;
            self.metrics.record_line(line.len());

            match record::parse_line(&line) {
                Ok(rec) => {
                    cursor.advance();
                    self.metrics.record_ok();
                    batch.push(rec);
                    if batch.len() == self.batch_size {
                        let full = std::mem::replace(&mut batch, Vec::with_capacity(self.batch_size));
                        send(events, ViewerEvent::Batch(full)).await?;
                    }
                }
                Err(err) => {
                    self.metrics.record_malformed();
                    send(
                        events,
                        ViewerEvent::LineError {
                            line: ordinal,
                            message: err.to_string(),
                        },
                    )
                    .await?;
                }
            }
        }

        if !batch.is_empty() {
            send(events, ViewerEvent::Batch(batch)).await?;
        }
        send(events, ViewerEvent::Completed).await?;

        let snap = self.metrics.snapshot();
        info!(
            lines = snap.lines_read,
            records = snap.records_produced,
            malformed = snap.lines_malformed,
            bytes = snap.bytes_read,
            "full load complete"
        );
        Ok(())
    }

    /// Tail delta: re-read from the start, skip the first
    /// `cursor.lines_consumed()` lines without parsing, and return the rest
    /// as a single batch, advancing the cursor per successfully normalized
    /// line.
    ///
    /// At-least-once-safe only while the file is append-only between calls;
    /// truncation or in-place edits before the cursor line yield undefined
    /// content.
    pub async fn load_delta(
        &self,
        path: &Path,
        cursor: &mut IngestionCursor,
        events: &mpsc::Sender<ViewerEvent>,
    ) -> Result<Vec<LogRecord>, IngestError> {
        let file = File::open(path).await.map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let skip = cursor.lines_consumed();
        let stream = stream_lines(file);
        tokio::pin!(stream);

        let mut records = Vec::new();
        let mut ordinal: u64 = 0;

        while let Some(line) = stream.next().await {
            let line = line?;
            ordinal += 1;
            if ordinal <= skip {
                continue;
            }
            self.metrics.record_line(line.len());

            match record::parse_line(&line) {
                Ok(rec) => {
                    cursor.advance();
                    self.metrics.record_ok();
                    records.push(rec);
                }
                Err(err) => {
                    self.metrics.record_malformed();
                    send(
                        events,
                        ViewerEvent::LineError {
                            line: ordinal,
                            message: err.to_string(),
                        },
                    )
                    .await?;
                }
            }
        }

        debug!(
            path = %path.display(),
            skipped = skip,
            new_records = records.len(),
            "delta load complete"
        );
        Ok(records)
    }
}

async fn send(
    events: &mpsc::Sender<ViewerEvent>,
    event: ViewerEvent,
) -> Result<(), IngestError> {
    events.send(event).await.map_err(|_| IngestError::ChannelClosed)
}
