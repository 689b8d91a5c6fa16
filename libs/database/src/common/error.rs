/// Failures raised by the database crate itself
///
/// Query-level failures stay [`sea_orm::DbErr`] and are classified by the
/// calling domain (a unique violation means something different per table).
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// The readiness probe could not reach the pool
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
