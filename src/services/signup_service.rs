//! Signup service.
//!
//! A signup creates two rows in one transaction: the role-side account
//! (viewer account or producer) and the login credential referencing it.
//! Either both exist afterwards or neither does.

use crate::{
    db::DbPool,
    error::AppError,
    models::user::{Role, SignupRequest},
    services::{country_service, password},
};

const DUPLICATE_EMAIL: &str = "An account with this email already exists";

/// Check the field combination before touching the database.
fn validate(request: &SignupRequest) -> Result<(), AppError> {
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(AppError::InvalidRequest(
            "A valid email is required".to_string(),
        ));
    }
    if request.password.is_empty() {
        return Err(AppError::InvalidRequest("Password is required".to_string()));
    }
    if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "First and last name are required".to_string(),
        ));
    }

    match request.role {
        Role::Admin => Err(AppError::InvalidRequest(
            "Admin credentials cannot be created through signup".to_string(),
        )),
        Role::Viewer => {
            let country_id = request.country_id.ok_or_else(|| {
                AppError::InvalidRequest("country_id is required for viewer signup".to_string())
            })?;
            country_service::validate_country_selection(
                country_id,
                request.suggested_country_name.as_deref(),
            )
        }
        Role::Employee => Ok(()),
    }
}

/// Create the account row and the credential row as one unit of work.
///
/// # Returns
///
/// The new credential's `user_id`.
///
/// # Errors
///
/// - `InvalidRequest`: missing/invalid fields for the requested role
/// - `Conflict`: the email already has an account or credential
/// - `Database`: anything else; the transaction rolls back as a whole
pub async fn signup(pool: &DbPool, request: SignupRequest) -> Result<i64, AppError> {
    validate(&request)?;

    let email = request.email.trim().to_lowercase();
    let password_hash = password::hash_password(&request.password)?;

    let mut tx = pool.begin().await?;

    let user_id = match request.role {
        Role::Viewer => {
            let country_id = request.country_id.ok_or_else(|| {
                AppError::InvalidRequest("country_id is required for viewer signup".to_string())
            })?;
            let suggested = request
                .suggested_country_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty());

            let account_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO viewer_accounts
                    (first_name, last_name, email, street_address, city, zip_code, phone,
                     country_id, suggested_country_name)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING account_id
                "#,
            )
            .bind(request.first_name.trim())
            .bind(request.last_name.trim())
            .bind(&email)
            .bind(&request.street_address)
            .bind(&request.city)
            .bind(&request.zip_code)
            .bind(&request.phone)
            .bind(country_id)
            .bind(suggested)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_EMAIL))?;

            sqlx::query_scalar(
                r#"
                INSERT INTO users (email, password_hash, role, account_id, producer_id)
                VALUES ($1, $2, 'VIEWER', $3, NULL)
                RETURNING user_id
                "#,
            )
            .bind(&email)
            .bind(&password_hash)
            .bind(account_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_EMAIL))?
        }
        Role::Employee => {
            let producer_name = format!(
                "{} {}",
                request.first_name.trim(),
                request.last_name.trim()
            );

            let producer_id: i64 = sqlx::query_scalar(
                "INSERT INTO producers (producer_name, email) VALUES ($1, $2) RETURNING producer_id",
            )
            .bind(&producer_name)
            .bind(&email)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_EMAIL))?;

            sqlx::query_scalar(
                r#"
                INSERT INTO users (email, password_hash, role, account_id, producer_id)
                VALUES ($1, $2, 'EMPLOYEE', NULL, $3)
                RETURNING user_id
                "#,
            )
            .bind(&email)
            .bind(&password_hash)
            .bind(producer_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_EMAIL))?
        }
        // Also rejected by validate(); an admin credential carries no
        // account reference to create.
        Role::Admin => {
            return Err(AppError::InvalidRequest(
                "Admin credentials cannot be created through signup".to_string(),
            ));
        }
    };

    tx.commit().await?;

    tracing::info!(user_id, role = ?request.role, "signup complete");

    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer_request() -> SignupRequest {
        SignupRequest {
            role: Role::Viewer,
            email: "jane@example.com".to_string(),
            password: "password123".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            street_address: Some("1 Main St".to_string()),
            city: Some("Springfield".to_string()),
            zip_code: Some("12345".to_string()),
            phone: None,
            country_id: Some(1),
            suggested_country_name: None,
        }
    }

    #[test]
    fn viewer_signup_validates() {
        assert!(validate(&viewer_request()).is_ok());
    }

    #[test]
    fn admin_signup_is_rejected() {
        let mut request = viewer_request();
        request.role = Role::Admin;
        assert!(matches!(
            validate(&request),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn viewer_without_country_is_rejected() {
        let mut request = viewer_request();
        request.country_id = None;
        assert!(validate(&request).is_err());
    }

    #[test]
    fn suggestion_with_real_country_is_rejected() {
        let mut request = viewer_request();
        request.suggested_country_name = Some("Wakanda".to_string());
        // country_id = 1, not the sentinel
        assert!(validate(&request).is_err());
    }

    #[test]
    fn suggestion_with_sentinel_country_is_accepted() {
        let mut request = viewer_request();
        request.country_id = Some(crate::models::reference::SENTINEL_COUNTRY_ID);
        request.suggested_country_name = Some("Wakanda".to_string());
        assert!(validate(&request).is_ok());
    }

    #[test]
    fn employee_needs_no_country() {
        let mut request = viewer_request();
        request.role = Role::Employee;
        request.country_id = None;
        assert!(validate(&request).is_ok());
    }

    #[test]
    fn bad_email_is_rejected() {
        let mut request = viewer_request();
        request.email = "not-an-email".to_string();
        assert!(validate(&request).is_err());
    }
}
