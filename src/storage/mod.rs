//! Storage layer for the feedback service
//!
//! Defines the store abstraction handed to request handlers, plus the report
//! filter and scan ordering used by its read operations.

pub mod sqlite;

use crate::error::Result;
use crate::types::{AttendantAverages, FeedbackId, FeedbackRecord, NewFeedback};
use async_trait::async_trait;

/// Sort order for scanning feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    /// Id ascending, i.e. insertion order
    Oldest,
    /// Id descending, most recent first
    Newest,
}

/// Narrows records by attendant name
///
/// Matching is case-insensitive substring containment. The needle is taken
/// literally, so `%` and `_` have no special meaning. An empty needle matches
/// every record.
///
/// Case is compared after `to_lowercase` on both sides, which is not full
/// Unicode case folding: "ß" finds "Straße" but not "STRASSE".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    needle: Option<String>,
}

impl ReportFilter {
    /// Filter that keeps every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn attendant(substring: &str) -> Self {
        if substring.is_empty() {
            return Self::all();
        }

        Self {
            needle: Some(substring.to_lowercase()),
        }
    }

    pub fn is_all(&self) -> bool {
        self.needle.is_none()
    }

    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        match &self.needle {
            Some(needle) => record.attendant_name.to_lowercase().contains(needle.as_str()),
            None => true,
        }
    }
}

/// Feedback store trait defining all required operations
///
/// Records are append-only: there is no update or delete.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Validate and append a record, returning its new id
    async fn insert(&self, feedback: &NewFeedback) -> Result<FeedbackId>;

    /// Records accepted by `filter`, in the given order
    async fn scan(&self, filter: &ReportFilter, order: ScanOrder) -> Result<Vec<FeedbackRecord>>;

    /// Mean rating per distinct attendant name over the whole table
    async fn average_by_attendant(&self) -> Result<AttendantAverages>;

    /// Total number of stored records
    async fn count(&self) -> Result<usize>;

    /// Report view: records whose attendant contains `substring`, newest first
    async fn filter_by_attendant(&self, substring: &str) -> Result<Vec<FeedbackRecord>> {
        self.scan(&ReportFilter::attendant(substring), ScanOrder::Newest)
            .await
    }

    /// Every record in insertion order, as consumed by the export
    async fn export_all(&self) -> Result<Vec<FeedbackRecord>> {
        self.scan(&ReportFilter::all(), ScanOrder::Oldest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeedbackId;

    fn record(attendant: &str) -> FeedbackRecord {
        FeedbackRecord {
            id: FeedbackId(1),
            respondent_name: None,
            attendant_name: attendant.to_string(),
            rating: 4,
            comment: None,
            timestamp: "2024-01-01 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let filter = ReportFilter::attendant("an");
        assert!(filter.matches(&record("Ana")));
        assert!(filter.matches(&record("JOANA")));
        assert!(!filter.matches(&record("Bruno")));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ReportFilter::attendant("");
        assert!(filter.is_all());
        assert!(filter.matches(&record("Ana")));
        assert!(filter.matches(&record("")));
    }

    #[test]
    fn test_filter_treats_wildcards_literally() {
        let filter = ReportFilter::attendant("a%");
        assert!(!filter.matches(&record("Ana")));
        assert!(filter.matches(&record("Sala%1")));

        let filter = ReportFilter::attendant("_");
        assert!(!filter.matches(&record("Ana")));
    }

    #[test]
    fn test_filter_lowercases_without_case_folding() {
        let filter = ReportFilter::attendant("ß");
        assert!(filter.matches(&record("Straße")));
        assert!(!filter.matches(&record("STRASSE")));
    }

    #[test]
    fn test_filter_handles_non_ascii_case() {
        let filter = ReportFilter::attendant("ÂNGELA");
        assert!(filter.matches(&record("ângela souza")));
    }
}
