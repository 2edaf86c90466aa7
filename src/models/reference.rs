//! Reference data models: countries, genres, languages.

use serde::{Deserialize, Serialize};

/// The fixed placeholder country id representing "country not yet in the
/// reference table". Always present (seeded by migration), excluded from
/// normal listings, and never editable or deletable.
pub const SENTINEL_COUNTRY_ID: i64 = 999;

/// A row from the `countries` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Country {
    pub country_id: i64,
    pub country_name: String,
    pub country_code_iso: String,
}

/// A row from the `genres` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Genre {
    pub genre_id: i64,
    pub genre_name: String,
}

/// A row from the `languages` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Language {
    pub language_id: i64,
    pub language_name: String,
}

/// Request body for creating or updating an official country.
#[derive(Debug, Deserialize)]
pub struct CountryRequest {
    pub country_name: String,
    pub country_code_iso: String,
}

/// One pending suggestion: a free-text country name and how many viewer
/// accounts are still parked on the sentinel with it.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SuggestionSummary {
    pub suggested_country_name: String,
    pub viewer_count: i64,
}

/// Request body for `POST /api/admin/approve-country`.
#[derive(Debug, Deserialize)]
pub struct ApproveCountryRequest {
    pub suggested_name: String,
    pub official_name: String,
    pub official_code: String,
}

/// Result of an approval: the freshly allocated id and the number of
/// viewer accounts retargeted from the sentinel.
#[derive(Debug, Serialize)]
pub struct ApproveCountryResponse {
    pub country_id: i64,
    pub users_updated: u64,
}
