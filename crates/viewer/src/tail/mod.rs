//! Live tail following.
//!
//! Watches the open file with a poll-based filesystem watcher and feeds
//! the ingestion engine's delta path on each change notification.

pub mod monitor;

pub use monitor::{TailMonitor, WatchError};
