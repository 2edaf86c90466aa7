//! Viewer profile and admin viewer-management handlers.
//!
//! - GET /api/viewers - admin listing with optional country/status filters
//! - GET/PUT/DELETE /api/profile/:id - viewer self-service
//! - GET/PUT /api/admin/viewers/:id/charge - monthly charge management
//! - GET/PUT /api/admin/viewers/:id/status - account status management

use crate::{
    db::DbPool,
    error::AppError,
    extract::{AppJson, AppQuery},
    models::viewer::{
        ChargeUpdateRequest, StatusUpdateRequest, UpdateProfileRequest, ViewerListFilter,
        ViewerProfile,
    },
    services::country_service,
};
use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde_json::json;

const PROFILE_COLUMNS: &str = r#"
    va.account_id, va.first_name, va.last_name, va.email,
    va.street_address, va.city, va.zip_code, va.phone,
    va.country_id, c.country_name, va.suggested_country_name,
    va.monthly_charge, va.account_status
"#;

/// Admin listing of viewer accounts with country names, optionally
/// filtered by `?country_id=` and/or `?status=`.
pub async fn list_viewers(
    State(pool): State<DbPool>,
    AppQuery(filter): AppQuery<ViewerListFilter>,
) -> Result<Json<Vec<ViewerProfile>>, AppError> {
    let viewers = sqlx::query_as::<_, ViewerProfile>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM viewer_accounts va
        JOIN countries c ON va.country_id = c.country_id
        WHERE ($1::BIGINT IS NULL OR va.country_id = $1)
          AND ($2::TEXT IS NULL OR va.account_status = $2)
        ORDER BY va.account_id
        "#
    ))
    .bind(filter.country_id)
    .bind(filter.status)
    .fetch_all(&pool)
    .await?;

    Ok(Json(viewers))
}

/// Fetch one viewer profile.
pub async fn get_profile(
    State(pool): State<DbPool>,
    Path(account_id): Path<i64>,
) -> Result<Json<ViewerProfile>, AppError> {
    let profile = sqlx::query_as::<_, ViewerProfile>(&format!(
        r#"
        SELECT {PROFILE_COLUMNS}
        FROM viewer_accounts va
        JOIN countries c ON va.country_id = c.country_id
        WHERE va.account_id = $1
        "#
    ))
    .bind(account_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Viewer account"))?;

    Ok(Json(profile))
}

/// Update a viewer profile.
///
/// Re-validates the suggestion rule: a suggested country name is only
/// allowed while the account sits on the sentinel country.
pub async fn update_profile(
    State(pool): State<DbPool>,
    Path(account_id): Path<i64>,
    AppJson(request): AppJson<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "First and last name are required".to_string(),
        ));
    }
    country_service::validate_country_selection(
        request.country_id,
        request.suggested_country_name.as_deref(),
    )?;

    let suggested = request
        .suggested_country_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let updated = sqlx::query(
        r#"
        UPDATE viewer_accounts
        SET first_name = $1, last_name = $2, street_address = $3, city = $4,
            zip_code = $5, phone = $6, country_id = $7, suggested_country_name = $8
        WHERE account_id = $9
        "#,
    )
    .bind(request.first_name.trim())
    .bind(request.last_name.trim())
    .bind(&request.street_address)
    .bind(&request.city)
    .bind(&request.zip_code)
    .bind(&request.phone)
    .bind(request.country_id)
    .bind(suggested)
    .bind(account_id)
    .execute(&pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(AppError::NotFound("Viewer account"));
    }

    Ok(Json(json!({ "message": "Profile updated" })))
}

/// Close a viewer account. The login credential, view history, and
/// feedback rows cascade away with it.
pub async fn delete_profile(
    State(pool): State<DbPool>,
    Path(account_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = sqlx::query("DELETE FROM viewer_accounts WHERE account_id = $1")
        .bind(account_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound("Viewer account"));
    }

    Ok(Json(json!({ "message": "Account deleted" })))
}

/// Current monthly charge for one viewer.
pub async fn get_charge(
    State(pool): State<DbPool>,
    Path(account_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let charge: Decimal =
        sqlx::query_scalar("SELECT monthly_charge FROM viewer_accounts WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Viewer account"))?;

    Ok(Json(json!({
        "account_id": account_id,
        "monthly_charge": charge
    })))
}

/// Set the monthly charge for one viewer. Must be non-negative.
pub async fn update_charge(
    State(pool): State<DbPool>,
    Path(account_id): Path<i64>,
    AppJson(request): AppJson<ChargeUpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.monthly_charge < Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "monthly_charge cannot be negative".to_string(),
        ));
    }

    let updated = sqlx::query("UPDATE viewer_accounts SET monthly_charge = $1 WHERE account_id = $2")
        .bind(request.monthly_charge)
        .bind(account_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(AppError::NotFound("Viewer account"));
    }

    Ok(Json(json!({ "message": "Monthly charge updated" })))
}

/// Current status for one viewer.
pub async fn get_status(
    State(pool): State<DbPool>,
    Path(account_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let status: crate::models::viewer::AccountStatus =
        sqlx::query_scalar("SELECT account_status FROM viewer_accounts WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Viewer account"))?;

    Ok(Json(json!({
        "account_id": account_id,
        "account_status": status
    })))
}

/// Set the account status (ACTIVE, LOCKED, or FLAGGED) for one viewer.
/// Takes effect at the next login attempt.
pub async fn update_status(
    State(pool): State<DbPool>,
    Path(account_id): Path<i64>,
    AppJson(request): AppJson<StatusUpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = sqlx::query("UPDATE viewer_accounts SET account_status = $1 WHERE account_id = $2")
        .bind(request.account_status)
        .bind(account_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(AppError::NotFound("Viewer account"));
    }

    Ok(Json(json!({ "message": "Account status updated" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{Role, SignupRequest};
    use crate::services::signup_service;
    use sqlx::PgPool;

    async fn seed_viewer(pool: &PgPool, email: &str) -> i64 {
        signup_service::signup(
            pool,
            SignupRequest {
                role: Role::Viewer,
                email: email.to_string(),
                password: "password123".to_string(),
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                street_address: None,
                city: None,
                zip_code: None,
                phone: None,
                country_id: Some(1),
                suggested_country_name: None,
            },
        )
        .await
        .unwrap();

        sqlx::query_scalar("SELECT account_id FROM viewer_accounts WHERE email = $1")
            .bind(email)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn seed_watched_episode(pool: &PgPool, account_id: i64) {
        let series_id: i64 = sqlx::query_scalar(
            r#"
            WITH ph AS (
                INSERT INTO production_houses (ph_name, ph_country_id)
                VALUES ('Moonlight Studios', 1)
                RETURNING production_house_id
            )
            INSERT INTO web_series (series_name, production_house_id, original_language_id, release_date)
            SELECT 'Night Shift', production_house_id, 1, '2024-03-01' FROM ph
            RETURNING webseries_id
            "#,
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let episode_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO episodes (webseries_id, episode_number, episode_title, duration_min)
            VALUES ($1, 1, 'Pilot', 42)
            RETURNING episode_id
            "#,
        )
        .bind(series_id)
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query("INSERT INTO view_history (account_id, episode_id) VALUES ($1, $2)")
            .bind(account_id)
            .bind(episode_id)
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO viewer_feedback (account_id, webseries_id, feedback_text, rating) VALUES ($1, $2, 'Great pilot', 5)",
        )
        .bind(account_id)
        .bind(series_id)
        .execute(pool)
        .await
        .unwrap();
    }

    async fn rows_for_account(pool: &PgPool, table: &str, account_id: i64) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE account_id = $1"))
            .bind(account_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn deleting_an_account_removes_its_dependents(pool: PgPool) {
        let account_id = seed_viewer(&pool, "jane@example.com").await;
        seed_watched_episode(&pool, account_id).await;

        delete_profile(State(pool.clone()), Path(account_id))
            .await
            .unwrap();

        assert_eq!(rows_for_account(&pool, "viewer_accounts", account_id).await, 0);
        assert_eq!(rows_for_account(&pool, "users", account_id).await, 0);
        assert_eq!(rows_for_account(&pool, "view_history", account_id).await, 0);
        assert_eq!(rows_for_account(&pool, "viewer_feedback", account_id).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn deleting_an_unknown_account_is_a_404(pool: PgPool) {
        let result = delete_profile(State(pool.clone()), Path(12345)).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
