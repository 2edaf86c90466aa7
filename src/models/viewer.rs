//! Viewer account models and API request/response types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Viewer account status, checked by the login gate.
///
/// - `Active`: login proceeds normally
/// - `Locked`: login is rejected with 403
/// - `Flagged`: login succeeds but the status is surfaced to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    Locked,
    Flagged,
}

/// Viewer profile joined with the country name, as returned by
/// `GET /api/profile/:id` and the admin listing.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ViewerProfile {
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub country_id: i64,
    pub country_name: String,
    pub suggested_country_name: Option<String>,
    pub monthly_charge: Decimal,
    pub account_status: AccountStatus,
}

/// Request body for `PUT /api/profile/:id`.
///
/// The email is not editable; it is the credential key.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub country_id: i64,
    pub suggested_country_name: Option<String>,
}

/// Request body for `PUT /api/admin/viewers/:id/charge`.
#[derive(Debug, Deserialize)]
pub struct ChargeUpdateRequest {
    pub monthly_charge: Decimal,
}

/// Request body for `PUT /api/admin/viewers/:id/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub account_status: AccountStatus,
}

/// Optional filters for the admin viewer listing.
#[derive(Debug, Default, Deserialize)]
pub struct ViewerListFilter {
    pub country_id: Option<i64>,
    pub status: Option<AccountStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&AccountStatus::Locked).unwrap(),
            "\"LOCKED\""
        );
        assert_eq!(
            serde_json::from_str::<AccountStatus>("\"FLAGGED\"").unwrap(),
            AccountStatus::Flagged
        );
    }

    #[test]
    fn lowercase_status_is_rejected() {
        assert!(serde_json::from_str::<AccountStatus>("\"locked\"").is_err());
    }
}
