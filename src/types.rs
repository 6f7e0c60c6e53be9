//! Core data types for the feedback service
//!
//! Feedback records, the insert payload, and the aggregation shapes consumed
//! by the report chart. These are plain data: no I/O happens here.

use crate::error::{AvaliacaoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;

/// Highest accepted rating
pub const MAX_RATING: i64 = 5;

/// Display text for feedback left without a respondent name
pub const ANONYMOUS: &str = "Anonymous";

/// Timestamp layout used for stored and exported records
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Unique identifier for feedback records
///
/// Assigned by the store on insert. Ids grow monotonically, so ordering by id
/// is ordering by insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub i64);

impl std::fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Feedback as submitted, before the store assigns an id and timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub respondent_name: Option<String>,
    pub attendant_name: String,
    pub rating: i64,
    pub comment: Option<String>,
}

impl NewFeedback {
    pub fn new(
        respondent_name: Option<String>,
        attendant_name: impl Into<String>,
        rating: i64,
        comment: Option<String>,
    ) -> Self {
        Self {
            respondent_name,
            attendant_name: attendant_name.into(),
            rating,
            comment,
        }
    }

    /// Presence and range checks applied before anything is written
    pub fn validate(&self) -> Result<()> {
        if self.attendant_name.trim().is_empty() {
            return Err(AvaliacaoError::Validation(
                "attendant name is required".to_string(),
            ));
        }

        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(AvaliacaoError::Validation(format!(
                "rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, self.rating
            )));
        }

        Ok(())
    }
}

/// One stored evaluation event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    pub respondent_name: Option<String>,
    pub attendant_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
}

impl FeedbackRecord {
    /// Respondent name as shown in reports; blank or missing becomes "Anonymous"
    pub fn respondent_display(&self) -> &str {
        match self.respondent_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => ANONYMOUS,
        }
    }

    /// Comment as shown in reports, empty when missing
    pub fn comment_display(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}

/// Mean rating per attendant, iterated in ascending name order
pub type AttendantAverages = BTreeMap<String, f64>;

/// Chart feed: attendant names and their mean ratings, index-aligned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub names: Vec<String>,
    pub averages: Vec<f64>,
}

impl From<AttendantAverages> for ChartData {
    fn from(averages: AttendantAverages) -> Self {
        let (names, averages) = averages.into_iter().unzip();
        Self { names, averages }
    }
}
