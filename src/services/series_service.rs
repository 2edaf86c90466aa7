//! Series creation service - the multi-table transaction orchestrator.
//!
//! Creating a series "in full" touches up to six tables: the series row
//! itself, an optional contract, and the genre / dubbing / subtitle /
//! release-country association tables. All of it is one unit of work:
//! the id generated by the first insert is reused as a foreign key in
//! every dependent insert, and on any failure none of the rows persist.

use rust_decimal::Decimal;

use crate::{db::DbPool, error::AppError, models::catalog::CreateSeriesFullRequest};

/// Validate the parts of a full-creation payload that do not need the
/// database: the series name and a non-negative contract charge.
fn validate(request: &CreateSeriesFullRequest) -> Result<(), AppError> {
    if request.series_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "series_name is required".to_string(),
        ));
    }
    if let Some(charge) = request.charge_per_episode {
        if charge < Decimal::ZERO {
            return Err(AppError::InvalidRequest(
                "charge_per_episode cannot be negative".to_string(),
            ));
        }
    }
    Ok(())
}

/// Create a series with its contract and associations as one atomic unit.
///
/// # Process
///
/// 1. Insert the series row, obtaining the new id via `RETURNING`
/// 2. If both contract fields are present, insert a contract row
/// 3. Bulk-insert each non-empty association array against the new id
/// 4. Commit (any failed step drops the transaction, rolling back all of it)
///
/// # Returns
///
/// The id of the newly created series.
///
/// # Errors
///
/// - `InvalidRequest`: empty name or negative charge (checked before the
///   transaction opens)
/// - `Database`: any constraint violation or driver failure; the caller
///   sees a generic creation failure, never partial state
pub async fn create_series_full(
    pool: &DbPool,
    request: CreateSeriesFullRequest,
) -> Result<i64, AppError> {
    validate(&request)?;

    // One dedicated connection for the whole unit of work.
    let mut tx = pool.begin().await?;

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
    .fetch_one(&mut *tx)
    .await?;

    // Contract only when both terms were supplied.
    if let (Some(contract_date), Some(charge)) = (request.contract_date, request.charge_per_episode)
    {
        sqlx::query(
            "INSERT INTO contracts (webseries_id, contract_date, charge_per_episode) VALUES ($1, $2, $3)",
        )
        .bind(series_id)
        .bind(contract_date)
        .bind(charge)
        .execute(&mut *tx)
        .await?;
    }

    if !request.genre_ids.is_empty() {
        sqlx::query(
            "INSERT INTO webseries_genres (webseries_id, genre_id) SELECT $1, g FROM UNNEST($2::BIGINT[]) AS g",
        )
        .bind(series_id)
        .bind(&request.genre_ids)
        .execute(&mut *tx)
        .await?;
    }

    if !request.dubbing_language_ids.is_empty() {
        sqlx::query(
            "INSERT INTO webseries_dubbing (webseries_id, language_id) SELECT $1, l FROM UNNEST($2::BIGINT[]) AS l",
        )
        .bind(series_id)
        .bind(&request.dubbing_language_ids)
        .execute(&mut *tx)
        .await?;
    }

    if !request.subtitle_language_ids.is_empty() {
        sqlx::query(
            "INSERT INTO webseries_subtitles (webseries_id, language_id) SELECT $1, l FROM UNNEST($2::BIGINT[]) AS l",
        )
        .bind(series_id)
        .bind(&request.subtitle_language_ids)
        .execute(&mut *tx)
        .await?;
    }

    if !request.release_country_ids.is_empty() {
        sqlx::query(
            "INSERT INTO release_countries (webseries_id, country_id) SELECT $1, c FROM UNNEST($2::BIGINT[]) AS c",
        )
        .bind(series_id)
        .bind(&request.release_country_ids)
        .execute(&mut *tx)
        .await?;
    }

    // Commit ALL changes atomically.
    tx.commit().await?;

    tracing::info!(series_id, "series created with full details");

    Ok(series_id)
}
