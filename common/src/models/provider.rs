//! Database provider selection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Database provider a query is routed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// MySQL database.
    MySql,
    /// PostgreSQL database.
    Postgres,
    /// SQLite database.
    Sqlite,
}

impl Provider {
    /// Selects a provider from the request's `db` field.
    ///
    /// `mysql` and `sqlite` are matched case-insensitively; every other
    /// value, including the empty string, routes to PostgreSQL.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("mysql") {
            Provider::MySql
        } else if name.eq_ignore_ascii_case("sqlite") {
            Provider::Sqlite
        } else {
            Provider::Postgres
        }
    }

    /// Default port for network providers.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Provider::MySql => Some(3306),
            Provider::Postgres => Some(5432),
            Provider::Sqlite => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::MySql => write!(f, "mysql"),
            Provider::Postgres => write!(f, "postgres"),
            Provider::Sqlite => write!(f, "sqlite"),
        }
    }
}
