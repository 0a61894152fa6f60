//! Inventory Domain
//!
//! Products with a unit price, current stock and the stock level they started
//! with, plus the valuation and low-stock rules built on top of them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← JSON endpoints, action notices
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← validation, merge rules, aggregates
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← query set (trait + in-memory + Postgres)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, derived values, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_inventory::{
//!     handlers,
//!     repository::InMemoryProductRepository,
//!     service::InventoryService,
//! };
//!
//! let service = InventoryService::new(InMemoryProductRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use handlers::{ProductsApiDoc, REPORTS_URL, ReportsApiDoc};
pub use models::{
    ActionResponse, ActionStatus, AdjustQuantity, Dashboard, FieldViolation, InventoryReport,
    Product, ProductDraft, ProductInput, ProductView, SeedOutcome,
};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::InventoryService;
