//! Catalog models: web series, episodes, contracts, production houses.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A series listing row with the production house and language names
/// joined in, as returned by `GET /api/series`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SeriesListing {
    pub webseries_id: i64,
    pub series_name: String,
    pub ph_name: String,
    pub language_name: String,
    pub release_date: NaiveDate,
}

/// Request body for `POST /api/series` (simple insert, no associations).
#[derive(Debug, Deserialize)]
pub struct CreateSeriesRequest {
    pub production_house_id: i64,
    pub series_name: String,
    pub original_language_id: i64,
    pub release_date: NaiveDate,
}

/// Request body for `POST /api/series/full`, the transactional
/// multi-table creation.
///
/// The contract is inserted only when both `contract_date` and
/// `charge_per_episode` are present; each association array is inserted
/// only when non-empty. Everything happens in one unit of work.
#[derive(Debug, Deserialize)]
pub struct CreateSeriesFullRequest {
    pub production_house_id: i64,
    pub series_name: String,
    pub original_language_id: i64,
    pub release_date: NaiveDate,
    pub contract_date: Option<NaiveDate>,
    pub charge_per_episode: Option<Decimal>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub dubbing_language_ids: Vec<i64>,
    #[serde(default)]
    pub subtitle_language_ids: Vec<i64>,
    #[serde(default)]
    pub release_country_ids: Vec<i64>,
}

/// A row from the `episodes` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Episode {
    pub episode_id: i64,
    pub webseries_id: i64,
    pub episode_number: i32,
    pub episode_title: String,
    pub duration_min: i32,
}

/// Request body for `POST /api/episodes`.
#[derive(Debug, Deserialize)]
pub struct CreateEpisodeRequest {
    pub webseries_id: i64,
    pub episode_number: i32,
    pub episode_title: String,
    pub duration_min: i32,
}

/// A contract listing row with series and production house names joined in.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ContractListing {
    pub contract_id: i64,
    pub series_name: String,
    pub ph_name: String,
    pub contract_date: NaiveDate,
    pub charge_per_episode: Decimal,
}

/// Request body for `POST /api/contracts/renew`.
///
/// Renewal appends a new contract row at 1.05x the old charge; the old
/// row is kept so the charge history survives.
#[derive(Debug, Deserialize)]
pub struct RenewContractRequest {
    pub webseries_id: i64,
    pub old_charge: Decimal,
}

/// A row from the `production_houses` table.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ProductionHouse {
    pub production_house_id: i64,
    pub ph_name: String,
    pub ph_country_id: Option<i64>,
}

/// Request body for creating or updating a production house.
#[derive(Debug, Deserialize)]
pub struct ProductionHouseRequest {
    pub ph_name: String,
    pub ph_country_id: Option<i64>,
}

/// A denormalized browse row: one series with its genres, dubbing
/// languages, and release countries aggregated into comma-separated
/// strings. Series without associations show NULL for that column.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct BrowseRow {
    pub webseries_id: i64,
    pub series_name: String,
    pub release_date: NaiveDate,
    pub genres: Option<String>,
    pub dubbing_languages: Option<String>,
    pub release_countries: Option<String>,
}
