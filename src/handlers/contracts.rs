//! Contract HTTP handlers.
//!
//! Contracts are append-only: a renewal inserts a new row at the renewed
//! rate rather than mutating the old one, so the charge history survives.

use crate::{
    db::DbPool,
    error::AppError,
    extract::AppJson,
    models::catalog::{ContractListing, RenewContractRequest},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

/// Renewal pricing: 5% on top of the previous per-episode charge,
/// rounded to cents.
fn renewal_charge(old_charge: Decimal) -> Decimal {
    (old_charge * dec!(1.05)).round_dp(2)
}

/// List all contracts with series and production house names, newest first.
pub async fn list_contracts(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<ContractListing>>, AppError> {
    let contracts = sqlx::query_as::<_, ContractListing>(
        r#"
        SELECT c.contract_id, ws.series_name, ph.ph_name, c.contract_date, c.charge_per_episode
        FROM contracts c
        JOIN web_series ws ON c.webseries_id = ws.webseries_id
        JOIN production_houses ph ON ws.production_house_id = ph.production_house_id
        ORDER BY c.contract_date DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(contracts))
}

/// Renew a contract for a series: append a new row dated today at the
/// renewed rate.
///
/// # Response
///
/// - **201 Created**: `{"message": ..., "new_charge": "105.00"}`
/// - **400**: negative old charge
/// - **404**: unknown series
pub async fn renew_contract(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<RenewContractRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.old_charge < Decimal::ZERO {
        return Err(AppError::InvalidRequest(
            "old_charge cannot be negative".to_string(),
        ));
    }

    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM web_series WHERE webseries_id = $1)")
            .bind(request.webseries_id)
            .fetch_one(&pool)
            .await?;
    if !exists {
        return Err(AppError::NotFound("Series"));
    }

    let new_charge = renewal_charge(request.old_charge);

    sqlx::query(
        "INSERT INTO contracts (webseries_id, contract_date, charge_per_episode) VALUES ($1, CURRENT_DATE, $2)",
    )
    .bind(request.webseries_id)
    .bind(new_charge)
    .execute(&pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Contract renewed at new rate: ${new_charge}"),
            "new_charge": new_charge
        })),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renewal_adds_five_percent() {
        assert_eq!(renewal_charge(dec!(100.00)), dec!(105.00));
        assert_eq!(renewal_charge(dec!(19.99)), dec!(20.99));
    }

    #[test]
    fn renewal_rounds_to_cents() {
        // 10.99 * 1.05 = 11.5395
        assert_eq!(renewal_charge(dec!(10.99)), dec!(11.54));
    }

    #[test]
    fn zero_stays_zero() {
        assert_eq!(renewal_charge(Decimal::ZERO), Decimal::ZERO);
    }
}
