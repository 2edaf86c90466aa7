//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response types the API exchanges with clients.

/// Web series, episodes, contracts, and production houses
pub mod catalog;
/// View history and feedback records
pub mod engagement;
/// Reference data: countries, genres, languages
pub mod reference;
/// Login credentials and the role/identity mapping
pub mod user;
/// Viewer accounts and their status
pub mod viewer;
