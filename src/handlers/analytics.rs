//! Aggregate catalog listings.
//!
//! - GET /api/analytics/top-series - the five most-viewed series
//! - GET /api/analytics/genre-distribution - series counts per genre

use crate::{db::DbPool, error::AppError};
use axum::{Json, extract::State};
use serde::Serialize;

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct SeriesViewCount {
    pub series_name: String,
    pub total_views: i64,
}

#[derive(Debug, sqlx::FromRow, Serialize)]
pub struct GenreSeriesCount {
    pub genre_name: String,
    pub series_count: i64,
}

/// Top 5 series by recorded views.
pub async fn top_series(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<SeriesViewCount>>, AppError> {
    let rows = sqlx::query_as::<_, SeriesViewCount>(
        r#"
        SELECT ws.series_name, COUNT(vh.view_id) AS total_views
        FROM web_series ws
        JOIN episodes e ON ws.webseries_id = e.webseries_id
        JOIN view_history vh ON e.episode_id = vh.episode_id
        GROUP BY ws.series_name
        ORDER BY total_views DESC
        LIMIT 5
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows))
}

/// How many series carry each genre (content supply), top 10.
pub async fn genre_distribution(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<GenreSeriesCount>>, AppError> {
    let rows = sqlx::query_as::<_, GenreSeriesCount>(
        r#"
        SELECT g.genre_name, COUNT(wsg.webseries_id) AS series_count
        FROM genres g
        JOIN webseries_genres wsg ON g.genre_id = wsg.genre_id
        GROUP BY g.genre_name
        ORDER BY series_count DESC
        LIMIT 10
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows))
}
