//! Incremental log ingestion.
//!
//! Streams a CLEF file as lines, normalizes each one, and delivers records
//! in bounded batches (full load) or as a tail delta. The line-ordinal
//! [`IngestionCursor`] is the resumption bookmark for tail follows.

pub mod cursor;
pub mod engine;
pub mod event;
pub mod lines;
pub mod metrics;

// Re-export commonly used types
pub use cursor::IngestionCursor;
pub use engine::{IngestEngine, IngestError};
pub use event::ViewerEvent;

/// Records per delivered batch during a full load.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Bytes requested per read when streaming a file.
pub const READ_CHUNK_SIZE: usize = 64 * 1024;
