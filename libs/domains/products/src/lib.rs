//! Products Domain
//!
//! Create, read, update and delete products, list them by category one page
//! at a time, and list the distinct categories.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, response projections
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, not-found policy, deadline
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Storage port + units of work (Postgres, in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entity, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, PgProductRepository, ProductService};
//! use sea_orm::Database;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://localhost/products").await?;
//! domain_products::ensure_schema(&db).await?;
//!
//! let service = ProductService::new(PgProductRepository::new(db))
//!     .with_deadline(Duration::from_secs(5));
//!
//! let router = axum::Router::new().nest("/products", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod schema;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryProductRepository;
pub use models::{
    CreateProduct, ListProducts, NewProduct, Page, PageRequest, Product, ProductId,
    ProductPageResponse, ProductResponse, SortDirection, SortKey, UpdateProduct,
};
pub use postgres::PgProductRepository;
pub use repository::{ProductRepository, ProductTransaction};
pub use schema::ensure_schema;
pub use service::ProductService;
