//! View history and feedback models.
//!
//! Both tables are append-only from the API's point of view; the only
//! deletes are the unconditional history deletions scoped by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A view history row joined with episode and series names, as returned
/// by `GET /api/history/:account_id`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ViewHistoryEntry {
    pub view_id: i64,
    pub episode_id: i64,
    pub episode_title: String,
    pub series_name: String,
    pub view_timestamp: DateTime<Utc>,
}

/// Request body for `POST /api/view`. The timestamp is server-assigned.
#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    pub account_id: i64,
    pub episode_id: i64,
}

/// Request body for `POST /api/feedback`.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub account_id: i64,
    pub webseries_id: i64,
    pub feedback_text: Option<String>,
    pub rating: i32,
}
