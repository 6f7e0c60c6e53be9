//! Avaliacao - Service Feedback Collection
//!
//! A small web application for rating service interactions:
//! - A form captures a 1-5 rating and an optional comment about an attendant
//! - A report lists feedback filtered by attendant, newest first
//! - A chart feed exposes the mean rating per attendant
//! - A spreadsheet export downloads every record
//!
//! # Architecture
//!
//! - **Types**: Core data structures (FeedbackRecord, NewFeedback, ChartData)
//! - **Storage**: The `FeedbackStore` trait and its SQLite implementation,
//!   holding the report filter and aggregation queries
//! - **Export**: Spreadsheet rendering
//! - **API**: axum router, handlers and HTML views
//!
//! # Example
//!
//! ```ignore
//! use avaliacao_core::{FeedbackStore, NewFeedback, SqliteFeedbackStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SqliteFeedbackStore::open("feedback.db").await?;
//!
//!     store.insert(&NewFeedback::new(None, "Ana", 5, Some("great".into()))).await?;
//!
//!     let report = store.filter_by_attendant("an").await?;
//!     let averages = store.average_by_attendant().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{AvaliacaoError, Result};
pub use storage::{sqlite::SqliteFeedbackStore, FeedbackStore, ReportFilter, ScanOrder};
pub use types::{AttendantAverages, ChartData, FeedbackId, FeedbackRecord, NewFeedback};
