//! View recording, feedback, and history management handlers.
//!
//! - POST /api/view - record a view (server-assigned timestamp)
//! - POST /api/feedback - record feedback with rating and free text
//! - GET /api/history/:account_id - view history for an account
//! - DELETE /api/history/:account_id - clear an account's full history
//! - DELETE /api/history/:account_id/:view_id - delete one history item
//!
//! The recorders are append-only inserts; deletion is unconditional and
//! scoped by id. No soft-delete, no audit trail.

use crate::{
    db::DbPool,
    error::AppError,
    extract::AppJson,
    models::engagement::{FeedbackRequest, RecordViewRequest, ViewHistoryEntry},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

/// Record that an account watched an episode.
pub async fn record_view(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<RecordViewRequest>,
) -> Result<impl IntoResponse, AppError> {
    sqlx::query(
        "INSERT INTO view_history (account_id, episode_id, view_timestamp) VALUES ($1, $2, NOW())",
    )
    .bind(request.account_id)
    .bind(request.episode_id)
    .execute(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "View recorded" })),
    ))
}

/// Record feedback for a series. Rating must fall within 1..=5.
pub async fn submit_feedback(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<FeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !(1..=5).contains(&request.rating) {
        return Err(AppError::InvalidRequest(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    sqlx::query(
        r#"
        INSERT INTO viewer_feedback (account_id, webseries_id, feedback_text, rating, feedback_date)
        VALUES ($1, $2, $3, $4, NOW())
        "#,
    )
    .bind(request.account_id)
    .bind(request.webseries_id)
    .bind(&request.feedback_text)
    .bind(request.rating)
    .execute(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback submitted" })),
    ))
}

/// View history for one account, most recent first.
pub async fn get_history(
    State(pool): State<DbPool>,
    Path(account_id): Path<i64>,
) -> Result<Json<Vec<ViewHistoryEntry>>, AppError> {
    let entries = sqlx::query_as::<_, ViewHistoryEntry>(
        r#"
        SELECT vh.view_id, vh.episode_id, e.episode_title, ws.series_name, vh.view_timestamp
        FROM view_history vh
        JOIN episodes e ON vh.episode_id = e.episode_id
        JOIN web_series ws ON e.webseries_id = ws.webseries_id
        WHERE vh.account_id = $1
        ORDER BY vh.view_timestamp DESC
        "#,
    )
    .bind(account_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(entries))
}

/// Clear the entire view history of one account.
pub async fn clear_history(
    State(pool): State<DbPool>,
    Path(account_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = sqlx::query("DELETE FROM view_history WHERE account_id = $1")
        .bind(account_id)
        .execute(&pool)
        .await?
        .rows_affected();

    Ok(Json(json!({
        "message": "History cleared",
        "deleted": deleted
    })))
}

/// Delete a single history item belonging to the given account.
pub async fn delete_history_item(
    State(pool): State<DbPool>,
    Path((account_id, view_id)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = sqlx::query("DELETE FROM view_history WHERE view_id = $1 AND account_id = $2")
        .bind(view_id)
        .bind(account_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound("History item"));
    }

    Ok(Json(json!({ "message": "History item deleted" })))
}
