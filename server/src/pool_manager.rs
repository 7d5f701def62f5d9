//! Provider connection pools.
//!
//! One pool per provider, created lazily on first use and cached for the
//! process lifetime. A pool that fails to connect is not cached, so the
//! next request simply tries again.

use std::collections::HashMap;
use std::time::Duration;

use common::config::AppConfig;
use common::errors::{AppError, AppResult};
use common::models::Provider;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{MySqlPool, PgPool, SqlitePool};
use tokio::sync::RwLock;

/// Connection pool wrapper for the supported providers.
#[derive(Clone)]
pub enum DatabasePool {
    /// MySQL connection pool.
    MySql(MySqlPool),
    /// PostgreSQL connection pool.
    Postgres(PgPool),
    /// SQLite connection pool.
    Sqlite(SqlitePool),
}

/// Manages one lazily-created pool per provider.
pub struct PoolManager {
    config: AppConfig,
    pools: RwLock<HashMap<Provider, DatabasePool>>,
}

impl PoolManager {
    /// Creates a pool manager; no connections are opened yet.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            pools: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the pool for a provider, creating it on first use.
    pub async fn pool_for(&self, provider: Provider) -> AppResult<DatabasePool> {
        if let Some(pool) = self.pools.read().await.get(&provider) {
            return Ok(pool.clone());
        }

        let pool = self.create_pool(provider).await?;
        self.pools.write().await.insert(provider, pool.clone());
        tracing::info!(provider = %provider, "connection pool created");
        Ok(pool)
    }

    async fn create_pool(&self, provider: Provider) -> AppResult<DatabasePool> {
        let timeout = Duration::from_secs(self.config.connect_timeout_secs);
        let max_connections = self.config.max_connections;

        match provider {
            Provider::MySql => {
                let pool = MySqlPoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(timeout)
                    .connect(&self.mysql_url())
                    .await
                    .map_err(|e| AppError::DatabaseConnection(e.to_string()))?;
                Ok(DatabasePool::MySql(pool))
            }
            Provider::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(max_connections)
                    .acquire_timeout(timeout)
                    .connect(&self.postgres_url())
                    .await
                    .map_err(|e| AppError::DatabaseConnection(e.to_string()))?;
                Ok(DatabasePool::Postgres(pool))
            }
            Provider::Sqlite => {
                // A single connection keeps in-memory databases coherent.
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .acquire_timeout(timeout)
                    .connect(&self.sqlite_url())
                    .await
                    .map_err(|e| AppError::DatabaseConnection(e.to_string()))?;
                Ok(DatabasePool::Sqlite(pool))
            }
        }
    }

    fn mysql_url(&self) -> String {
        let settings = &self.config.mysql;
        format!(
            "mysql://{}:{}@{}:{}/{}",
            settings.username, settings.password, settings.host, settings.port, settings.database
        )
    }

    fn postgres_url(&self) -> String {
        let settings = &self.config.postgres;
        format!(
            "postgres://{}:{}@{}:{}/{}",
            settings.username, settings.password, settings.host, settings.port, settings.database
        )
    }

    fn sqlite_url(&self) -> String {
        if self.config.sqlite_path == ":memory:" {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite:{}?mode=rwc", self.config.sqlite_path)
        }
    }
}
