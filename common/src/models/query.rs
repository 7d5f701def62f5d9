//! SQL query models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for `POST /query`.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct QueryRequest {
    /// Provider selector (`mysql`, `sqlite`, anything else is postgres).
    #[validate(length(min = 1, message = "db is required"))]
    pub db: String,

    /// SQL statement to execute, free text.
    #[validate(length(min = 1, message = "sql is required"))]
    pub sql: String,
}

/// Response body for statements that do not return rows
/// (INSERT/UPDATE/DELETE/DDL).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatementSummary {
    /// Outcome marker, always `success` when this shape is returned.
    pub status: String,

    /// Number of rows the statement affected.
    pub affected_rows: u64,

    /// Human-readable outcome message.
    pub message: String,
}

impl StatementSummary {
    /// Summary for a successfully executed statement.
    pub fn success(affected_rows: u64) -> Self {
        Self {
            status: "success".to_string(),
            affected_rows,
            message: "Statement executed successfully".to_string(),
        }
    }
}
