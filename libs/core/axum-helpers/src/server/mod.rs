//! Server infrastructure.
//!
//! - Router assembly with OpenAPI documentation and common layers
//! - Liveness endpoint and readiness check aggregation
//! - Graceful shutdown with a bounded cleanup phase

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::ShutdownCoordinator;
