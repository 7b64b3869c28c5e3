use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::repository::Store;

/// Errors raised by store implementations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Unique constraint violation; the payload names the constraint
    #[error("Duplicate value violates {0}")]
    Duplicate(String),

    #[error("Corrupt document: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Translate PostgreSQL unique violations into [`DatabaseError::Duplicate`]
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique constraint").to_string();
                return DatabaseError::Duplicate(constraint);
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Open the store selected by configuration: PostgreSQL when a URL is
/// configured, otherwise the in-memory store.
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
    let Some(url) = config.url.as_deref() else {
        warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(url)
        .await?;

    let store = PgStore::new(pool);
    store.ensure_schema().await?;

    info!("Connected to PostgreSQL store");
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_url_selects_memory_store() {
        let config = crate::config::AppConfig::development().database;
        let store = open_store(&config).await.unwrap();
        assert!(store.ping().await.is_ok());
        assert!(store.list_users().await.unwrap().is_empty());
    }
}
