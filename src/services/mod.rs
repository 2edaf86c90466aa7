//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They own the multi-statement database transactions, validation, and
//! the country id allocation policy.

pub mod country_service;
pub mod password;
pub mod series_service;
pub mod signup_service;
