use sea_orm::{Database, DatabaseConnection, DbErr};
use tracing::info;

use super::PostgresConfig;
use crate::retry::{RetryPolicy, retry_with_backoff};

/// Open a connection pool using `config`.
pub async fn connect(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(config.into_connect_options()).await?;
    info!("Connected to PostgreSQL");
    Ok(db)
}

/// Open a connection pool, retrying with backoff while the server is unreachable.
///
/// ```ignore
/// use database::postgres::{PostgresConfig, connect_with_retry};
/// use database::retry::RetryPolicy;
///
/// let db = connect_with_retry(PostgresConfig::from_env()?, &RetryPolicy::default()).await?;
/// ```
pub async fn connect_with_retry(
    config: PostgresConfig,
    policy: &RetryPolicy,
) -> Result<DatabaseConnection, DbErr> {
    retry_with_backoff(|| connect(config.clone()), policy).await
}
