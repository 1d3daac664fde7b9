//! The CLI consumer loop.
//!
//! A stand-in for the real presentation shell: opens one file through a
//! [`Session`], prints passing records to stdout, and rebuilds the filter
//! index the way a UI host would on load completion and on every tail
//! delta.

use std::path::PathBuf;

use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use crate::conf::ViewerConfig;
use crate::filter::{build_index, record_passes, FilterSelection, SearchFilter, TreeIndex};
use crate::ingest::ViewerEvent;
use crate::record::LogRecord;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub path: PathBuf,
    pub follow: bool,
    pub grep: Option<String>,
    pub levels: Vec<String>,
    pub contexts: Vec<String>,
}

/// Parse command-line arguments.
///
/// Usage: `viewer <file.clef> [--follow] [--grep PATTERN]
/// [--level LEVEL]... [--context PATH]...`
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<CliArgs, String> {
    let mut path: Option<PathBuf> = None;
    let mut follow = false;
    let mut grep = None;
    let mut levels = Vec::new();
    let mut contexts = Vec::new();

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--follow" | "-f" => follow = true,
            "--grep" => {
                grep = Some(iter.next().ok_or("--grep requires a pattern")?);
            }
            "--level" => {
                levels.push(iter.next().ok_or("--level requires a name")?);
            }
            "--context" => {
                contexts.push(iter.next().ok_or("--context requires a path")?);
            }
            flag if flag.starts_with('-') => {
                return Err(format!("Unknown flag: {}", flag));
            }
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => return Err("Only one file may be given".to_string()),
        }
    }

    Ok(CliArgs {
        path: path.ok_or("Usage: viewer <file.clef> [--follow] [--grep PATTERN] [--level LEVEL]... [--context PATH]...")?,
        follow,
        grep,
        levels,
        contexts,
    })
}

/// Drive one session to completion (or until Ctrl-C in follow mode).
pub async fn run(config: ViewerConfig, args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let search = match &args.grep {
        Some(pattern) => Some(SearchFilter::new(pattern, false)?),
        None => None,
    };

    let (mut session, events) = Session::new(config);
    let printer = tokio::spawn(consume(
        events,
        args.levels.clone(),
        args.contexts.clone(),
        search,
    ));

    session.open_full(&args.path).await?;

    if args.follow {
        session.start_watch().await?;
        info!("following file changes, press Ctrl-C to stop");
        tokio::signal::ctrl_c().await?;
        session.stop_watch().await;
    }

    // Closing the session ends the event stream and the printer with it
    drop(session);
    printer.await?;
    Ok(())
}

async fn consume(
    mut events: ReceiverStream<ViewerEvent>,
    levels: Vec<String>,
    contexts: Vec<String>,
    search: Option<SearchFilter>,
) {
    let mut log: Vec<LogRecord> = Vec::new();
    let mut selection = FilterSelection::new();
    for level in &levels {
        selection.toggle_level(level);
    }

    while let Some(event) = events.next().await {
        match event {
            ViewerEvent::Batch(records) => {
                print_records(&records, &contexts, selection.selected_levels(), search.as_ref());
                log.extend(records);
            }
            ViewerEvent::Delta(records) => {
                print_records(&records, &contexts, selection.selected_levels(), search.as_ref());
                log.extend(records);
                rebuild_filter_index(&log, &contexts, &mut selection);
            }
            ViewerEvent::LineError { line, message } => {
                warn!(line, %message, "skipped malformed line");
            }
            ViewerEvent::Completed => {
                info!(records = log.len(), "log loaded");
                rebuild_filter_index(&log, &contexts, &mut selection);
            }
            ViewerEvent::IoError(message) => {
                error!(%message, "load failed");
            }
            ViewerEvent::WatchError(message) => {
                error!(%message, "watch failed, tail stopped");
            }
        }
    }
}

fn print_records(
    records: &[LogRecord],
    contexts: &[String],
    levels: &[String],
    search: Option<&SearchFilter>,
) {
    for record in records {
        if !record_passes(record, contexts, levels) {
            continue;
        }
        if let Some(search) = search {
            if !search.matches(record) {
                continue;
            }
        }
        println!(
            "{} [{}] {}",
            record.timestamp.to_rfc3339(),
            record.level,
            record.rendered_message
        );
    }
}

/// Rebuild the namespace tree and re-derive the selection against it, the
/// way a UI host does after every load or delta.
fn rebuild_filter_index(log: &[LogRecord], contexts: &[String], selection: &mut FilterSelection) {
    let index = build_index(log);
    let tree = TreeIndex::build(&index.tree);
    selection.restore_from_paths(&tree, contexts);
    let resolved = selection.resolve_selected_paths(&tree);
    debug!(
        nodes = tree.len(),
        levels = ?index.levels,
        selected = ?resolved,
        "filter index rebuilt"
    );
}
