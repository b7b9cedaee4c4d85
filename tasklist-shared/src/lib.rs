//! # Tasklist Shared Library
//!
//! This crate contains the types, storage queries and authentication
//! primitives used by the Tasklist web server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their queries (users, tasks)
//! - `auth`: Password hashing, session tokens, session cookies and the
//!   task ownership guard
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Tasklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
