//! Products Domain
//!
//! Product catalog backed by MongoDB, with password-gated mutation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, response envelope
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Blank checks, uniqueness, password gating
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Stored document, request and response DTOs
//! └─────────────┘
//! ```
//!
//! Failures travel as [`ProductError`]; its `From` impl into
//! [`axum_helpers::AppError`] is the single place that picks status codes and
//! user-facing messages.
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_products::{handlers, MongoProductRepository, ProductService};
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoProductRepository::new(&db);
//! let service = ProductService::new(repository);
//!
//! let router = axum::Router::new().nest("/products", handlers::router(service));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{BlankField, ErrorKind, ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use models::{
    CreateProduct, DeleteProduct, DeletedProduct, Product, ProductResponse, ProductStatus,
    UpdateProduct,
};
pub use self::mongodb::{MongoProductRepository, PRODUCTS_COLLECTION};
pub use repository::ProductRepository;
pub use service::ProductService;
