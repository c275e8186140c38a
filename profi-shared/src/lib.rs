//! # ProFi Shared Library
//!
//! Shared types and the data layer used across the ProFi API server and chat
//! collaborator.
//!
//! ## Module Organization
//!
//! - `models`: credential store, budget ledger, goal tracker, quote store
//! - `auth`: password hashing
//! - `db`: SQLite pool and migrations
//! - `error`: store-layer error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;

/// Current version of the ProFi shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
