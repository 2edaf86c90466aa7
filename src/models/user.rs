//! Login credential models and the role/identity mapping.
//!
//! The `users` table stores two nullable account references plus a role
//! column. Application code never works with that shape directly: a
//! credential row is mapped into the tagged [`Identity`] enum, and rows
//! that violate the "role determines which reference is populated"
//! invariant are rejected at the boundary.

use serde::{Deserialize, Serialize};

/// Credential role stored in the `users.role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Employee,
    Viewer,
}

/// A row from the `users` table.
///
/// The two account references are nullable at the storage boundary only;
/// use [`UserRecord::identity`] to get the validated form.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub account_id: Option<i64>,
    pub producer_id: Option<i64>,
}

/// What a credential actually identifies, with the dual-nullable-column
/// ambiguity eliminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Admin,
    Employee { producer_id: i64 },
    Viewer { account_id: i64 },
}

impl UserRecord {
    /// Map the role and reference columns into an [`Identity`].
    ///
    /// Returns `None` when the row violates the invariant (e.g. a VIEWER
    /// with no linked account, or an ADMIN carrying a producer reference).
    /// The schema CHECK constraint should make this unreachable, but a
    /// corrupt row must not be silently treated as some other identity.
    pub fn identity(&self) -> Option<Identity> {
        match (self.role, self.account_id, self.producer_id) {
            (Role::Admin, None, None) => Some(Identity::Admin),
            (Role::Employee, None, Some(producer_id)) => Some(Identity::Employee { producer_id }),
            (Role::Viewer, Some(account_id), None) => Some(Identity::Viewer { account_id }),
            _ => None,
        }
    }
}

/// Request body for `POST /api/signup`.
///
/// Which fields are required depends on the role: VIEWER signups need the
/// name/address/country block, EMPLOYEE signups need only the name. The
/// signup service validates the combination.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub role: Role,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub country_id: Option<i64>,
    pub suggested_country_name: Option<String>,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User descriptor returned on successful login.
///
/// `account_status` is present only for viewers; a FLAGGED status reaches
/// the client here so it can render a warning.
#[derive(Debug, Serialize)]
pub struct UserDescriptor {
    pub id: i64,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_status: Option<crate::models::viewer::AccountStatus>,
}

/// Response body for `POST /api/login`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(role: Role, account_id: Option<i64>, producer_id: Option<i64>) -> UserRecord {
        UserRecord {
            user_id: 1,
            email: "user@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            account_id,
            producer_id,
        }
    }

    #[test]
    fn valid_rows_map_to_their_identity() {
        assert_eq!(
            record(Role::Admin, None, None).identity(),
            Some(Identity::Admin)
        );
        assert_eq!(
            record(Role::Employee, None, Some(7)).identity(),
            Some(Identity::Employee { producer_id: 7 })
        );
        assert_eq!(
            record(Role::Viewer, Some(3), None).identity(),
            Some(Identity::Viewer { account_id: 3 })
        );
    }

    #[test]
    fn rows_violating_the_invariant_are_rejected() {
        // viewer with no linked account
        assert_eq!(record(Role::Viewer, None, None).identity(), None);
        // employee pointing at a viewer account
        assert_eq!(record(Role::Employee, Some(3), None).identity(), None);
        // admin carrying a reference
        assert_eq!(record(Role::Admin, None, Some(7)).identity(), None);
        // both references populated
        assert_eq!(record(Role::Viewer, Some(3), Some(7)).identity(), None);
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Viewer).unwrap(), "\"VIEWER\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"EMPLOYEE\"").unwrap(),
            Role::Employee
        );
    }
}
