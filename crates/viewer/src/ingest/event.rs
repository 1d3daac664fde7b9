//! Events the core emits to its consumer.
//!
//! Abstracted from any specific transport; the host forwards these over
//! whatever process boundary it owns. Delivery is over a bounded channel,
//! and the channel send is the backpressure point: the engine never buffers
//! more than one undelivered batch ahead of a slow consumer.

use crate::record::LogRecord;

#[derive(Debug, Clone)]
pub enum ViewerEvent {
    /// A batch from a full load, delivered as soon as it fills. The final
    /// batch may be partial.
    Batch(Vec<LogRecord>),

    /// Newly appended records picked up by the tail monitor.
    Delta(Vec<LogRecord>),

    /// One line failed JSON parsing or normalization. Never fatal; the
    /// line is skipped and the stream continues.
    LineError {
        /// 1-based line ordinal in the source file.
        line: u64,
        message: String,
    },

    /// A full load reached the end of the file.
    Completed,

    /// Opening or reading the file failed; the operation is aborted.
    /// Already-delivered records and the cursor are left intact.
    IoError(String),

    /// The filesystem watch failed; tail mode is stopped.
    WatchError(String),
}
