//! Free-text search over normalized records.
//!
//! Compiled once per search term, tested per record against the rendered
//! message and the level label. Combined with the structural namespace and
//! level filters by logical AND in the host.

use std::sync::atomic::{AtomicU64, Ordering};

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use thiserror::Error;

use crate::record::LogRecord;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),
}

#[derive(Debug, Default)]
pub struct SearchStats {
    pub records_scanned: AtomicU64,
    pub records_matched: AtomicU64,
}

pub struct SearchFilter {
    matcher: RegexMatcher,
    stats: SearchStats,
}

impl SearchFilter {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, SearchError> {
        let matcher = RegexMatcherBuilder::new()
            .case_insensitive(!case_sensitive)
            .multi_line(false)
            .build(pattern)
            .map_err(|e| SearchError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            matcher,
            stats: SearchStats::default(),
        })
    }

    #[inline]
    pub fn matches(&self, record: &LogRecord) -> bool {
        self.stats.records_scanned.fetch_add(1, Ordering::Relaxed);

        let hit = self
            .matcher
            .is_match(record.rendered_message.as_bytes())
            .unwrap_or(false)
            || self.matcher.is_match(record.level.as_bytes()).unwrap_or(false);

        if hit {
            self.stats.records_matched.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    pub fn stats(&self) -> (u64, u64) {
        (
            self.stats.records_scanned.load(Ordering::Relaxed),
            self.stats.records_matched.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::normalize;
    use serde_json::json;

    fn record(message: &str, level: &str) -> LogRecord {
        normalize(json!({ "@m": message, "@l": level })).unwrap()
    }

    #[test]
    fn test_matches_message_text() {
        let filter = SearchFilter::new("timeout", false).unwrap();
        assert!(filter.matches(&record("request timeout after 30s", "Warning")));
        assert!(!filter.matches(&record("request completed", "Warning")));
    }

    #[test]
    fn test_matches_level_label() {
        let filter = SearchFilter::new("error", false).unwrap();
        assert!(filter.matches(&record("all fine", "Error")));
    }

    #[test]
    fn test_case_sensitivity() {
        let sensitive = SearchFilter::new("Timeout", true).unwrap();
        assert!(!sensitive.matches(&record("timeout", "Informational")));

        let insensitive = SearchFilter::new("Timeout", false).unwrap();
        assert!(insensitive.matches(&record("timeout", "Informational")));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            SearchFilter::new("[unclosed", false),
            Err(SearchError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_stats_tracking() {
        let filter = SearchFilter::new("hit", false).unwrap();
        filter.matches(&record("hit one", "Informational"));
        filter.matches(&record("miss", "Informational"));
        filter.matches(&record("hit two", "Informational"));

        let (scanned, matched) = filter.stats();
        assert_eq!(scanned, 3);
        assert_eq!(matched, 2);
    }
}
