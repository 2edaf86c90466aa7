//! Reference data listings: genres, languages, countries, production houses.

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        catalog::ProductionHouse,
        reference::{Country, Genre, Language, SENTINEL_COUNTRY_ID},
    },
};
use axum::{Json, extract::State};

pub async fn list_genres(State(pool): State<DbPool>) -> Result<Json<Vec<Genre>>, AppError> {
    let genres =
        sqlx::query_as::<_, Genre>("SELECT genre_id, genre_name FROM genres ORDER BY genre_name")
            .fetch_all(&pool)
            .await?;

    Ok(Json(genres))
}

pub async fn list_languages(State(pool): State<DbPool>) -> Result<Json<Vec<Language>>, AppError> {
    let languages = sqlx::query_as::<_, Language>(
        "SELECT language_id, language_name FROM languages ORDER BY language_name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(languages))
}

/// List the official countries. The sentinel row is a placeholder, not a
/// country, so it never appears here.
pub async fn list_countries(State(pool): State<DbPool>) -> Result<Json<Vec<Country>>, AppError> {
    let countries = sqlx::query_as::<_, Country>(
        r#"
        SELECT country_id, country_name, country_code_iso
        FROM countries
        WHERE country_id <> $1
        ORDER BY country_name
        "#,
    )
    .bind(SENTINEL_COUNTRY_ID)
    .fetch_all(&pool)
    .await?;

    Ok(Json(countries))
}

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
