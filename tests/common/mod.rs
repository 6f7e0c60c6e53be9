//! Common test utilities and helpers

#![allow(dead_code)]

use avaliacao_core::{api::AppState, NewFeedback, SqliteFeedbackStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Create a file-backed store in a fresh temporary directory
///
/// Pooled connections each open the file, so an in-memory database would
/// give every connection its own empty table. Keep the TempDir alive for the
/// duration of the test.
pub async fn create_test_store() -> (Arc<SqliteFeedbackStore>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = SqliteFeedbackStore::open(temp_dir.path().join("feedback.db"))
        .await
        .expect("Failed to create test store");

    (Arc::new(store), temp_dir)
}

/// Router state over a fresh test store
pub async fn create_test_state() -> (AppState, Arc<SqliteFeedbackStore>, TempDir) {
    let (store, temp_dir) = create_test_store().await;
    let state = AppState::new(store.clone());
    (state, store, temp_dir)
}

pub fn feedback(
    respondent: Option<&str>,
    attendant: &str,
    rating: i64,
    comment: Option<&str>,
) -> NewFeedback {
    NewFeedback::new(
        respondent.map(str::to_string),
        attendant,
        rating,
        comment.map(str::to_string),
    )
}
