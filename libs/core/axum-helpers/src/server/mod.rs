//! Server infrastructure module.
//!
//! This module provides:
//! - Application setup with OpenAPI documentation
//! - Health endpoint
//! - Graceful shutdown
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_app, create_router};
//! use core_config::{server::ServerConfig, app_info};
//!
//! // Create router with API documentation and the health endpoint
//! let app = create_router::<ApiDoc>(api_routes, app_info!())?;
//!
//! // Start server with graceful shutdown
//! create_app(app, &ServerConfig::default()).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{build_router, create_app, create_router};
pub use health::{HealthResponse, health_router};
pub use shutdown::shutdown_signal;
