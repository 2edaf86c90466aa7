//! Signup and login HTTP handlers.
//!
//! - POST /api/signup - create an account plus its login credential
//! - POST /api/login - verify a password and run the account status gate

use crate::{
    db::DbPool,
    error::AppError,
    extract::AppJson,
    models::{
        user::{Identity, LoginRequest, LoginResponse, SignupRequest, UserDescriptor, UserRecord},
        viewer::AccountStatus,
    },
    services::{password, signup_service},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// Create a viewer or employee account.
///
/// # Endpoint
///
/// `POST /api/signup`
///
/// # Request Body
///
/// ```json
/// {
///   "role": "VIEWER",
///   "email": "jane@example.com",
///   "password": "secret",
///   "first_name": "Jane",
///   "last_name": "Doe",
///   "country_id": 999,
///   "suggested_country_name": "Wakanda"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: `{"message": "...", "user_id": <id>}`
/// - **400**: missing or invalid fields (including ADMIN role, or a
///   suggested country name without the sentinel country)
/// - **409**: email already registered
pub async fn signup(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = signup_service::signup(&pool, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Signup successful", "user_id": user_id })),
    ))
}

/// Verify credentials and build the user descriptor.
///
/// # Endpoint
///
/// `POST /api/login`
///
/// # Account status gate
///
/// Runs exactly once per login attempt, after password verification
/// succeeds and before the success response is built. Only viewer
/// identities are gated:
///
/// - ACTIVE → 200, descriptor carries `account_status: "ACTIVE"`
/// - LOCKED → 403 with `status: "LOCKED"` in the error body
/// - FLAGGED → 200, descriptor carries `account_status: "FLAGGED"` so the
///   client can render a warning
///
/// # Errors
///
/// Unknown email and wrong password both return 401 with the same body.
pub async fn login(
    State(pool): State<DbPool>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidRequest(
            "Email and password are required".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, UserRecord>(
        "SELECT user_id, email, password_hash, role, account_id, producer_id FROM users WHERE email = $1",
    )
    .bind(request.email.trim().to_lowercase())
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::InvalidCredentials)?;

    if !password::verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let identity = user.identity().ok_or_else(|| {
        AppError::Internal(format!(
            "credential row {} violates the role/reference invariant",
            user.user_id
        ))
    })?;

    let account_status = match identity {
        Identity::Viewer { account_id } => {
            let status: AccountStatus = sqlx::query_scalar(
                "SELECT account_status FROM viewer_accounts WHERE account_id = $1",
            )
            .bind(account_id)
            .fetch_optional(&pool)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "credential row {} references missing viewer account {account_id}",
                    user.user_id
                ))
            })?;

            if status == AccountStatus::Locked {
                return Err(AppError::AccountLocked);
            }
            Some(status)
        }
        Identity::Admin | Identity::Employee { .. } => None,
    };

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: UserDescriptor {
            id: user.user_id,
            email: user.email,
            role: user.role,
            account_id: user.account_id,
            producer_id: user.producer_id,
            account_status,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;
    use sqlx::PgPool;

    async fn signup_viewer(pool: &PgPool, email: &str) -> i64 {
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
        .unwrap()
    }

    async fn set_status(pool: &PgPool, email: &str, status: &str) {
        sqlx::query(
            "UPDATE viewer_accounts SET account_status = $1 WHERE email = $2",
        )
        .bind(status)
        .bind(email)
        .execute(pool)
        .await
        .unwrap();
    }

    fn credentials(email: &str) -> AppJson<LoginRequest> {
        AppJson(LoginRequest {
            email: email.to_string(),
            password: "password123".to_string(),
        })
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn locked_account_cannot_log_in(pool: PgPool) {
        signup_viewer(&pool, "locked@example.com").await;
        set_status(&pool, "locked@example.com", "LOCKED").await;

        let result = login(State(pool.clone()), credentials("locked@example.com")).await;

        assert!(matches!(result, Err(AppError::AccountLocked)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn flagged_account_logs_in_with_its_status(pool: PgPool) {
        signup_viewer(&pool, "flagged@example.com").await;
        set_status(&pool, "flagged@example.com", "FLAGGED").await;

        let Json(response) = login(State(pool.clone()), credentials("flagged@example.com"))
            .await
            .unwrap();

        assert_eq!(response.user.account_status, Some(AccountStatus::Flagged));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn active_account_logs_in_normally(pool: PgPool) {
        let user_id = signup_viewer(&pool, "active@example.com").await;

        let Json(response) = login(State(pool.clone()), credentials("active@example.com"))
            .await
            .unwrap();

        assert_eq!(response.user.id, user_id);
        assert_eq!(response.user.account_status, Some(AccountStatus::Active));
    }
}
