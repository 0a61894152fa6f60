//! PostgreSQL connectivity for the inventory services.
//!
//! - [`postgres`]: pool configuration, connecting (optionally with retry),
//!   migrations and health checks, all on top of SeaORM
//! - [`common`]: error type and retry/backoff helpers
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use core_config::FromEnv;
//! use migration::Migrator;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "inventory_api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::DatabaseError;
