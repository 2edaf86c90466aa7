//! Country reconciliation service.
//!
//! Two linked operations over the sentinel country: viewers who cannot
//! find their country park on the sentinel row with a free-text
//! suggestion, and an admin later promotes a suggestion into an official
//! country row, retargeting every matching account in one transaction.

use crate::{
    db::DbPool,
    error::AppError,
    models::reference::{
        ApproveCountryRequest, ApproveCountryResponse, Country, CountryRequest,
        SENTINEL_COUNTRY_ID,
    },
};

/// Country id allocation policy: one greater than the current maximum
/// non-sentinel id. Gaps left by deleted countries are never refilled;
/// only the ceiling advances.
///
/// Kept as a pure function so the policy can be swapped (e.g. for a
/// sequence) without touching callers. Concurrent allocations can hand
/// out the same id; the primary key turns that race into a reported
/// conflict and the caller retries.
pub fn next_country_id(current_max: Option<i64>) -> i64 {
    current_max.unwrap_or(0) + 1
}

/// Validate a country selection against the suggestion rule: a free-text
/// suggested name is only meaningful alongside the sentinel country.
pub fn validate_country_selection(
    country_id: i64,
    suggested_name: Option<&str>,
) -> Result<(), AppError> {
    match suggested_name {
        Some(name) if country_id != SENTINEL_COUNTRY_ID => Err(AppError::InvalidRequest(format!(
            "A suggested country name ('{name}') is only allowed with country id {SENTINEL_COUNTRY_ID}"
        ))),
        Some(name) if name.trim().is_empty() => Err(AppError::InvalidRequest(
            "Suggested country name cannot be empty".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Fetch the current maximum non-sentinel country id on the given
/// transaction, so the read and the dependent insert share one unit.
async fn max_official_id(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> Result<Option<i64>, AppError> {
    let max: Option<i64> =
        sqlx::query_scalar("SELECT MAX(country_id) FROM countries WHERE country_id <> $1")
            .bind(SENTINEL_COUNTRY_ID)
            .fetch_one(&mut **tx)
            .await?;
    Ok(max)
}

/// Create an official country row with a freshly allocated id.
///
/// Used by the plain admin create endpoint; approval goes through
/// [`approve_country`] instead because it also retargets accounts.
pub async fn create_country(pool: &DbPool, request: CountryRequest) -> Result<Country, AppError> {
    let name = request.country_name.trim();
    let code = request.country_code_iso.trim().to_uppercase();
    if name.is_empty() {
        return Err(AppError::InvalidRequest(
            "Country name is required".to_string(),
        ));
    }
    if code.len() != 2 {
        return Err(AppError::InvalidRequest(
            "Country code must be a 2-letter ISO code".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let country_id = next_country_id(max_official_id(&mut tx).await?);

    let country = sqlx::query_as::<_, Country>(
        r#"
        INSERT INTO countries (country_id, country_name, country_code_iso)
        VALUES ($1, $2, $3)
        RETURNING country_id, country_name, country_code_iso
        "#,
    )
    .bind(country_id)
    .bind(name)
    .bind(&code)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "Country id allocation raced; please retry"))?;

    tx.commit().await?;

    Ok(country)
}

/// Promote a suggested country name into an official country row and
/// retarget every account that proposed it.
///
/// One unit of work:
/// 1. allocate the next official id ([`next_country_id`]);
/// 2. insert the new country row with that id;
/// 3. update every viewer account parked on the sentinel whose suggested
///    name exactly matches, pointing it at the new id and clearing the
///    suggestion.
///
/// If any step fails the whole unit rolls back: a country row must never
/// persist orphaned from the accounts that justified creating it.
pub async fn approve_country(
    pool: &DbPool,
    request: ApproveCountryRequest,
) -> Result<ApproveCountryResponse, AppError> {
    // Signup stores suggested names trimmed; trim here too so a padded
    // approval request still matches the stored rows.
    let suggested = request.suggested_name.trim();
    let official_name = request.official_name.trim();
    let official_code = request.official_code.trim().to_uppercase();

    if suggested.is_empty() || official_name.is_empty() {
        return Err(AppError::InvalidRequest(
            "suggested_name and official_name are required".to_string(),
        ));
    }
    if official_code.len() != 2 {
        return Err(AppError::InvalidRequest(
            "official_code must be a 2-letter ISO code".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let country_id = next_country_id(max_official_id(&mut tx).await?);

    sqlx::query("INSERT INTO countries (country_id, country_name, country_code_iso) VALUES ($1, $2, $3)")
        .bind(country_id)
        .bind(official_name)
        .bind(&official_code)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Country id allocation raced; please retry"))?;

    let users_updated = sqlx::query(
        r#"
        UPDATE viewer_accounts
        SET country_id = $1,
            suggested_country_name = NULL
        WHERE country_id = $2
          AND suggested_country_name = $3
        "#,
    )
    .bind(country_id)
    .bind(SENTINEL_COUNTRY_ID)
    .bind(suggested)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    // Commit all three steps atomically; any earlier `?` dropped the
    // transaction and rolled everything back.
    tx.commit().await?;

    tracing::info!(country_id, users_updated, suggested, "country approved");

    Ok(ApproveCountryResponse {
        country_id,
        users_updated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    async fn seed_suggesting_viewer(pool: &PgPool, email: &str, suggestion: &str) -> i64 {
        sqlx::query_scalar(
            r#"
            INSERT INTO viewer_accounts
                (first_name, last_name, email, country_id, suggested_country_name)
            VALUES ('Jane', 'Doe', $1, $2, $3)
            RETURNING account_id
            "#,
        )
        .bind(email)
        .bind(SENTINEL_COUNTRY_ID)
        .bind(suggestion)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn approval(suggested: &str, official: &str, code: &str) -> ApproveCountryRequest {
        ApproveCountryRequest {
            suggested_name: suggested.to_string(),
            official_name: official.to_string(),
            official_code: code.to_string(),
        }
    }

    #[test]
    fn allocation_starts_at_one_on_an_empty_table() {
        assert_eq!(next_country_id(None), 1);
    }

    #[test]
    fn allocation_advances_the_ceiling() {
        assert_eq!(next_country_id(Some(8)), 9);
        assert_eq!(next_country_id(Some(42)), 43);
    }

    #[test]
    fn suggestion_requires_the_sentinel_country() {
        assert!(validate_country_selection(1, Some("Wakanda")).is_err());
        assert!(validate_country_selection(SENTINEL_COUNTRY_ID, Some("Wakanda")).is_ok());
    }

    #[test]
    fn blank_suggestion_is_rejected() {
        assert!(validate_country_selection(SENTINEL_COUNTRY_ID, Some("   ")).is_err());
    }

    #[test]
    fn no_suggestion_is_fine_with_any_country() {
        assert!(validate_country_selection(1, None).is_ok());
        assert!(validate_country_selection(SENTINEL_COUNTRY_ID, None).is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn approval_retargets_matching_accounts(pool: PgPool) {
        let account_id = seed_suggesting_viewer(&pool, "jane@example.com", "Wakanda").await;

        let response = approve_country(&pool, approval("Wakanda", "Wakanda", "wk"))
            .await
            .unwrap();

        // Seed data tops out at country id 8, so the first approval gets 9.
        assert_eq!(response.country_id, 9);
        assert_eq!(response.users_updated, 1);

        let (country_id, suggestion): (i64, Option<String>) = sqlx::query_as(
            "SELECT country_id, suggested_country_name FROM viewer_accounts WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(country_id, 9);
        assert_eq!(suggestion, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn second_approval_finds_no_accounts_and_still_advances_the_id(pool: PgPool) {
        seed_suggesting_viewer(&pool, "jane@example.com", "Wakanda").await;

        let first = approve_country(&pool, approval("Wakanda", "Wakanda", "WK"))
            .await
            .unwrap();
        let second = approve_country(&pool, approval("Wakanda", "Wakanda Redux", "WR"))
            .await
            .unwrap();

        assert_eq!(first.users_updated, 1);
        assert_eq!(second.country_id, first.country_id + 1);
        assert_eq!(second.users_updated, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn padded_suggested_name_still_matches(pool: PgPool) {
        seed_suggesting_viewer(&pool, "jane@example.com", "Wakanda").await;

        let response = approve_country(&pool, approval("  Wakanda  ", "Wakanda", "WK"))
            .await
            .unwrap();

        assert_eq!(response.users_updated, 1);
    }
}
