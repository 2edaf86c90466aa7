//! Admin HTTP handlers: country management, the reconciliation workflow,
//! and production house CRUD.
//!
//! There is no authentication layer in front of these routes (out of
//! scope for this service); the namespace only marks intent.

use crate::{
    db::DbPool,
    error::AppError,
    extract::AppJson,
    models::{
        catalog::{ProductionHouse, ProductionHouseRequest},
        reference::{
            ApproveCountryRequest, ApproveCountryResponse, Country, CountryRequest,
            SENTINEL_COUNTRY_ID, SuggestionSummary,
        },
    },
    services::country_service,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

// --- Countries ---

/// Full country listing for the admin screen, sentinel included last so
/// the placeholder population is visible.
pub async fn list_countries(State(pool): State<DbPool>) -> Result<Json<Vec<Country>>, AppError> {
    let countries = sqlx::query_as::<_, Country>(
        r#"
        SELECT country_id, country_name, country_code_iso
        FROM countries
        ORDER BY (country_id = $1), country_name
        "#,
    )
    .bind(SENTINEL_COUNTRY_ID)
    .fetch_all(&pool)
    .await?;

    Ok(Json(countries))
}

/// Create an official country with a freshly allocated id.
pub async fn create_country(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<CountryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let country = country_service::create_country(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(country)))
}

/// Rename a country or fix its ISO code. The sentinel is not editable.
pub async fn update_country(
    State(pool): State<DbPool>,
    Path(country_id): Path<i64>,
    AppJson(request): AppJson<CountryRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if country_id == SENTINEL_COUNTRY_ID {
        return Err(AppError::InvalidRequest(
            "The sentinel country cannot be modified".to_string(),
        ));
    }
    let name = request.country_name.trim();
    let code = request.country_code_iso.trim().to_uppercase();
    if name.is_empty() || code.len() != 2 {
        return Err(AppError::InvalidRequest(
            "A country name and 2-letter ISO code are required".to_string(),
        ));
    }

    let updated =
        sqlx::query("UPDATE countries SET country_name = $1, country_code_iso = $2 WHERE country_id = $3")
            .bind(name)
            .bind(&code)
            .bind(country_id)
            .execute(&pool)
            .await?
            .rows_affected();

    if updated == 0 {
        return Err(AppError::NotFound("Country"));
    }

    Ok(Json(json!({ "message": "Country updated" })))
}

/// Delete a country. The sentinel is not deletable; a country still
/// referenced by accounts or series fails on the foreign key.
pub async fn delete_country(
    State(pool): State<DbPool>,
    Path(country_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    if country_id == SENTINEL_COUNTRY_ID {
        return Err(AppError::InvalidRequest(
            "The sentinel country cannot be deleted".to_string(),
        ));
    }

    let deleted = sqlx::query("DELETE FROM countries WHERE country_id = $1")
        .bind(country_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound("Country"));
    }

    Ok(Json(json!({ "message": "Country deleted" })))
}

// --- Reconciliation ---

/// Pending country suggestions: each distinct free-text name with the
/// number of viewer accounts still parked on the sentinel with it.
pub async fn list_suggestions(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<SuggestionSummary>>, AppError> {
    let suggestions = sqlx::query_as::<_, SuggestionSummary>(
        r#"
        SELECT suggested_country_name, COUNT(*) AS viewer_count
        FROM viewer_accounts
        WHERE country_id = $1 AND suggested_country_name IS NOT NULL
        GROUP BY suggested_country_name
        ORDER BY viewer_count DESC, suggested_country_name
        "#,
    )
    .bind(SENTINEL_COUNTRY_ID)
    .fetch_all(&pool)
    .await?;

    Ok(Json(suggestions))
}

/// Promote a suggestion into an official country and retarget the
/// accounts that proposed it. See the country service for the
/// transactional contract.
///
/// # Response
///
/// - **201 Created**: `{"country_id": <new id>, "users_updated": <count>}`
/// - **400**: missing names or malformed ISO code
/// - **409**: id allocation raced with a concurrent approval; retry
pub async fn approve_country(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<ApproveCountryRequest>,
) -> Result<(StatusCode, Json<ApproveCountryResponse>), AppError> {
    let response = country_service::approve_country(&pool, request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// --- Production houses ---

pub async fn list_production_houses(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<ProductionHouse>>, AppError> {
    let houses = sqlx::query_as::<_, ProductionHouse>(
        "SELECT production_house_id, ph_name, ph_country_id FROM production_houses ORDER BY ph_name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(houses))
}

pub async fn create_production_house(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<ProductionHouseRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.ph_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "ph_name is required".to_string(),
        ));
    }

    let house = sqlx::query_as::<_, ProductionHouse>(
        r#"
        INSERT INTO production_houses (ph_name, ph_country_id)
        VALUES ($1, $2)
        RETURNING production_house_id, ph_name, ph_country_id
        "#,
    )
    .bind(request.ph_name.trim())
    .bind(request.ph_country_id)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(house)))
}

pub async fn update_production_house(
    State(pool): State<DbPool>,
    Path(house_id): Path<i64>,
    AppJson(request): AppJson<ProductionHouseRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if request.ph_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "ph_name is required".to_string(),
        ));
    }

    let updated = sqlx::query(
        "UPDATE production_houses SET ph_name = $1, ph_country_id = $2 WHERE production_house_id = $3",
    )
    .bind(request.ph_name.trim())
    .bind(request.ph_country_id)
    .bind(house_id)
    .execute(&pool)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(AppError::NotFound("Production house"));
    }

    Ok(Json(json!({ "message": "Production house updated" })))
}

pub async fn delete_production_house(
    State(pool): State<DbPool>,
    Path(house_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = sqlx::query("DELETE FROM production_houses WHERE production_house_id = $1")
        .bind(house_id)
        .execute(&pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(AppError::NotFound("Production house"));
    }

    Ok(Json(json!({ "message": "Production house deleted" })))
}
