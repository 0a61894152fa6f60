//! Shared application state.
//!
//! Cloned into the readiness handler and used to build the domain services;
//! every clone shares the same connection pool.

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
}
