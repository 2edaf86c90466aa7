//! Episode HTTP handlers.

use crate::{
    db::DbPool,
    error::AppError,
    extract::AppJson,
    models::catalog::{CreateEpisodeRequest, Episode},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// List every episode, grouped by series and ordered by episode number.
pub async fn list_episodes(State(pool): State<DbPool>) -> Result<Json<Vec<Episode>>, AppError> {
    let episodes = sqlx::query_as::<_, Episode>(
        r#"
        SELECT episode_id, webseries_id, episode_number, episode_title, duration_min
        FROM episodes
        ORDER BY webseries_id, episode_number
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(episodes))
}

/// Create an episode.
///
/// The episode number is unique within a series; a duplicate returns 409.
pub async fn create_episode(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<CreateEpisodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.episode_title.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "episode_title is required".to_string(),
        ));
    }
    if request.episode_number <= 0 || request.duration_min <= 0 {
        return Err(AppError::InvalidRequest(
            "episode_number and duration_min must be positive".to_string(),
        ));
    }

    let episode = sqlx::query_as::<_, Episode>(
        r#"
        INSERT INTO episodes (webseries_id, episode_number, episode_title, duration_min)
        VALUES ($1, $2, $3, $4)
        RETURNING episode_id, webseries_id, episode_number, episode_title, duration_min
        "#,
    )
    .bind(request.webseries_id)
    .bind(request.episode_number)
    .bind(request.episode_title.trim())
    .bind(request.duration_min)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        AppError::conflict_on_unique(e, "This episode number already exists for the series")
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Episode created", "episode": episode })),
    ))
}
