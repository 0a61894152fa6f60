/// Errors raised by connection management (not by domain queries, which
/// surface `sea_orm::DbErr` directly).
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),
}
