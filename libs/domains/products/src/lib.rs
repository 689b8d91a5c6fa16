//! Products Domain
//!
//! Inventory records: create, update, delete, and list with a category
//! filter and price/expiry ordering.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, status codes, message bodies
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation order, update merge, empty-result rule
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │ Repository  │ ──▶ │    Query    │  ← query string → filter + sort
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Product, drafts, partial updates, sea-orm entity
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, InMemoryProductRepository, ProductService};
//!
//! let service = ProductService::new(InMemoryProductRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod service;

pub use error::{ProductError, ProductResult};
pub use models::{DeleteAck, NewProduct, Product, UpdateProduct, WriteAck};
pub use postgres::PgProductRepository;
pub use query::{CategoryFilter, ProductQuery, QueryParams, SortColumn, SortDirection, SortOrder};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
