//! Series HTTP handlers.
//!
//! - GET /api/series - listing with production house and language names
//! - POST /api/series - simple insert
//! - POST /api/series/full - transactional multi-table creation
//! - DELETE /api/series/:id - cascade delete
//! - GET /api/series/:id/episodes - episode listing for one series
//! - GET /api/browse - denormalized listing with aggregated associations

use crate::{
    db::DbPool,
    error::AppError,
    extract::AppJson,
    models::catalog::{
        BrowseRow, CreateSeriesFullRequest, CreateSeriesRequest, Episode, SeriesListing,
    },
    services::series_service,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

/// List all series, newest release first.
pub async fn list_series(State(pool): State<DbPool>) -> Result<Json<Vec<SeriesListing>>, AppError> {
    let series = sqlx::query_as::<_, SeriesListing>(
        r#"
        SELECT ws.webseries_id, ws.series_name, ph.ph_name, l.language_name, ws.release_date
        FROM web_series ws
        JOIN production_houses ph ON ws.production_house_id = ph.production_house_id
        JOIN languages l ON ws.original_language_id = l.language_id
        ORDER BY ws.release_date DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(series))
}

/// Create a series without contract or associations.
///
/// For the full transactional creation use `POST /api/series/full`.
pub async fn create_series(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<CreateSeriesRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.series_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "series_name is required".to_string(),
        ));
    }

    let series_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO web_series (production_house_id, series_name, original_language_id, release_date)
        VALUES ($1, $2, $3, $4)
        RETURNING webseries_id
        "#,
    )
    .bind(request.production_house_id)
    .bind(request.series_name.trim())
    .bind(request.original_language_id)
    .bind(request.release_date)
    .fetch_one(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Series created", "id": series_id })),
    ))
}

/// Create a series with contract and associations in one unit of work.
///
/// # Endpoint
///
/// `POST /api/series/full`
///
/// # Response
///
/// - **201 Created**: `{"message": "...", "id": <new series id>}`
/// - **400**: invalid payload (checked before the transaction opens)
/// - **500**: any dependent insert failed; nothing was persisted
pub async fn create_series_full(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<CreateSeriesFullRequest>,
) -> Result<impl IntoResponse, AppError> {
    let series_id = series_service::create_series_full(&pool, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Series created successfully with all details",
            "id": series_id
        })),
    ))
}

/// Delete a series. Episodes, contracts, and associations cascade away
/// with it.
pub async fn delete_series(
    State(pool): State<DbPool>,
    Path(series_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = sqlx::query("DELETE FROM web_series WHERE webseries_id = $1")
        .bind(series_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound("Series"));
    }

    Ok(Json(json!({ "message": "Series deleted" })))
}

/// List the episodes of one series in episode order.
///
/// Returns 404 for an unknown series and an empty list for a series
/// without episodes (a fresh `/api/series/full` creation has none).
pub async fn series_episodes(
    State(pool): State<DbPool>,
    Path(series_id): Path<i64>,
) -> Result<Json<Vec<Episode>>, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM web_series WHERE webseries_id = $1)")
        .bind(series_id)
        .fetch_one(&pool)
        .await?;

    if !exists {
        return Err(AppError::NotFound("Series"));
    }

    let episodes = sqlx::query_as::<_, Episode>(
        r#"
        SELECT episode_id, webseries_id, episode_number, episode_title, duration_min
        FROM episodes
        WHERE webseries_id = $1
        ORDER BY episode_number
        "#,
    )
    .bind(series_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(episodes))
}

/// Browse the catalog: every series with its genres, dubbing languages,
/// and release countries aggregated into comma-separated strings.
pub async fn browse(State(pool): State<DbPool>) -> Result<Json<Vec<BrowseRow>>, AppError> {
    let rows = sqlx::query_as::<_, BrowseRow>(
        r#"
        SELECT ws.webseries_id, ws.series_name, ws.release_date,
               STRING_AGG(DISTINCT g.genre_name, ', ') AS genres,
               STRING_AGG(DISTINCT dl.language_name, ', ') AS dubbing_languages,
               STRING_AGG(DISTINCT c.country_name, ', ') AS release_countries
        FROM web_series ws
        LEFT JOIN webseries_genres wsg ON ws.webseries_id = wsg.webseries_id
        LEFT JOIN genres g ON wsg.genre_id = g.genre_id
        LEFT JOIN webseries_dubbing wd ON ws.webseries_id = wd.webseries_id
        LEFT JOIN languages dl ON wd.language_id = dl.language_id
        LEFT JOIN release_countries rc ON ws.webseries_id = rc.webseries_id
        LEFT JOIN countries c ON rc.country_id = c.country_id
        GROUP BY ws.webseries_id, ws.series_name, ws.release_date
        ORDER BY ws.release_date DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(rows))
}
