//! # Axum Helpers
//!
//! Utilities shared by the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`envelope`]**: The `{status, message, data}` body every endpoint returns
//! - **[`errors`]**: `AppError`, rendered as an error envelope
//! - **[`extractors`]**: Lenient JSON body extractor
//! - **[`middleware`]**: CORS and security headers
//! - **[`server`]**: Router assembly, health checks, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_routes = Router::new(); // Add your routes
//!     let router = create_router::<ApiDoc>(api_routes)?;
//!
//!     create_production_app(router, &ServerConfig::default(), Duration::from_secs(30), async {})
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod envelope;
pub mod errors;
pub mod extractors;
pub mod middleware;
pub mod server;

pub use envelope::ApiResponse;

pub use errors::{AppError, ErrorResponse};

pub use extractors::{JsonBody, JsonBodyRejection};

pub use middleware::{cors_layer_from_env, create_cors_layer, security_headers};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
