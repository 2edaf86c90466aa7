//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (database queries, validation)
//! 3. Returns HTTP response (JSON, status code)

/// Admin endpoints: country management, reconciliation, production houses
pub mod admin;
/// Aggregate listings recovered from the reporting routes
pub mod analytics;
/// Signup and login
pub mod auth;
/// Contract listing and renewal
pub mod contracts;
/// View/feedback recorders and history management
pub mod engagement;
/// Episode listing and creation
pub mod episodes;
/// Service liveness probe
pub mod health;
/// Reference data listings (genres, languages, countries)
pub mod reference;
/// Series CRUD, full transactional creation, and browsing
pub mod series;
/// Viewer self-service profile and admin viewer management
pub mod viewers;
