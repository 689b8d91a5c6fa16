//! PostgreSQL connection pool, startup retry and readiness checks.

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{connect, connect_from_config, connect_from_config_with_retry, connect_with_retry};
pub use health::{check_health, check_health_detailed, HealthStatus};

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
