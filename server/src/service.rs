//! Query execution service.

use std::sync::Arc;

use common::errors::{AppError, AppResult};
use common::models::query::{QueryRequest, StatementSummary};
use common::models::Provider;
use common::utils::{clean_sql, is_read_statement};
use serde_json::Value;

use crate::pool_manager::{DatabasePool, PoolManager};
use crate::rows;

/// Executes free-text SQL against the provider named by the request.
pub struct QueryService {
    pool_manager: Arc<PoolManager>,
}

impl QueryService {
    /// Creates a new query service instance.
    pub fn new(pool_manager: Arc<PoolManager>) -> Self {
        Self { pool_manager }
    }

    /// Executes the request and returns the raw response value: an array
    /// of row objects for reads, a [`StatementSummary`] object for
    /// writes.
    pub async fn execute(&self, req: QueryRequest) -> AppResult<Value> {
        let sql = clean_sql(&req.sql);
        let provider = Provider::from_name(&req.db);
        tracing::info!(provider = %provider, sql = %sql, "executing statement");

        let pool = self.pool_manager.pool_for(provider).await?;

        if is_read_statement(&sql) {
            let rows = fetch_rows(&pool, &sql).await?;
            tracing::debug!(rows = rows.len(), "read statement finished");
            Ok(Value::Array(rows))
        } else {
            let affected = run_statement(&pool, &sql).await?;
            tracing::debug!(affected_rows = affected, "write statement finished");
            serde_json::to_value(StatementSummary::success(affected))
                .map_err(|e| AppError::DatabaseQuery(e.to_string()))
        }
    }
}

async fn fetch_rows(pool: &DatabasePool, sql: &str) -> AppResult<Vec<Value>> {
    match pool {
        DatabasePool::MySql(pool) => {
            let rows = sqlx::query(sql)
                .fetch_all(pool)
                .await
                .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;
            Ok(rows
                .iter()
                .map(|row| Value::Object(rows::mysql_row_to_object(row)))
                .collect())
        }
        DatabasePool::Postgres(pool) => {
            let rows = sqlx::query(sql)
                .fetch_all(pool)
                .await
                .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;
            Ok(rows
                .iter()
                .map(|row| Value::Object(rows::pg_row_to_object(row)))
                .collect())
        }
        DatabasePool::Sqlite(pool) => {
            let rows = sqlx::query(sql)
                .fetch_all(pool)
                .await
                .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;
            Ok(rows
                .iter()
                .map(|row| Value::Object(rows::sqlite_row_to_object(row)))
                .collect())
        }
    }
}

async fn run_statement(pool: &DatabasePool, sql: &str) -> AppResult<u64> {
    match pool {
        DatabasePool::MySql(pool) => sqlx::query(sql)
            .execute(pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::DatabaseQuery(e.to_string())),
        DatabasePool::Postgres(pool) => sqlx::query(sql)
            .execute(pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::DatabaseQuery(e.to_string())),
        DatabasePool::Sqlite(pool) => sqlx::query(sql)
            .execute(pool)
            .await
            .map(|r| r.rows_affected())
            .map_err(|e| AppError::DatabaseQuery(e.to_string())),
    }
}
