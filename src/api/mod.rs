//! HTTP surface for feedback collection and reporting
//!
//! Provides:
//! - Feedback form and submission
//! - Filtered report page with an embedded rating chart
//! - JSON aggregation feed for the chart
//! - Spreadsheet export download

pub mod error;
pub mod server;
pub mod views;

pub use error::ApiError;
pub use server::{build_router, ApiServer, AppState};
