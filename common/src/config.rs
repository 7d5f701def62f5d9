//! Service configuration.
//!
//! Settings resolve in layers, highest priority first: process
//! environment, then the `db.properties` file in the working directory,
//! then built-in defaults. A `.env` file can seed the environment at
//! startup but never overrides variables that are already set.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Properties file consulted after the environment.
pub const PROPERTIES_FILE: &str = "db.properties";

/// Connection settings for one network database provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

/// Resolved configuration for the middleware process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// MySQL provider settings.
    pub mysql: ProviderSettings,
    /// PostgreSQL provider settings.
    pub postgres: ProviderSettings,
    /// SQLite database file path (`:memory:` for an in-memory database).
    pub sqlite_path: String,
    /// Maximum connections per provider pool.
    pub max_connections: u32,
    /// Pool acquire timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl AppConfig {
    /// Loads configuration from the environment and `db.properties`.
    pub fn load() -> Self {
        Self::from_file_values(&load_properties(Path::new(PROPERTIES_FILE)))
    }

    fn from_file_values(file: &HashMap<String, String>) -> Self {
        Self {
            host: lookup(file, "SERVER_HOST", "server.host", "0.0.0.0"),
            port: lookup_parsed(file, "SERVER_PORT", "server.port", 8000),
            mysql: ProviderSettings {
                host: lookup(file, "MYSQL_HOST", "mysql.host", "localhost"),
                port: lookup_parsed(file, "MYSQL_PORT", "mysql.port", 3306),
                database: lookup(file, "MYSQL_DB", "mysql.dbname", "demo"),
                username: lookup(file, "MYSQL_USER", "mysql.user", "root"),
                password: lookup(file, "MYSQL_PASS", "mysql.password", "password"),
            },
            postgres: ProviderSettings {
                host: lookup(file, "PGHOST", "postgres.host", "localhost"),
                port: lookup_parsed(file, "PGPORT", "postgres.port", 5432),
                database: lookup(file, "PGDATABASE", "postgres.dbname", "postgres"),
                username: lookup(file, "PGUSER", "postgres.user", "postgres"),
                password: lookup(file, "PGPASSWORD", "postgres.password", "postgres"),
            },
            sqlite_path: lookup(file, "SQLITE_PATH", "sqlite.path", "demo.db"),
            max_connections: lookup_parsed(file, "MAX_CONNECTIONS", "pool.max_connections", 5),
            connect_timeout_secs: lookup_parsed(
                file,
                "CONNECT_TIMEOUT_SECS",
                "pool.connect_timeout_secs",
                30,
            ),
        }
    }
}

/// Resolves one setting: environment, then file, then default.
fn lookup(file: &HashMap<String, String>, env_key: &str, file_key: &str, default: &str) -> String {
    if let Ok(value) = std::env::var(env_key) {
        if !value.is_empty() {
            return value;
        }
    }
    if let Some(value) = file.get(file_key) {
        if !value.is_empty() {
            return value.clone();
        }
    }
    default.to_string()
}

/// Like [`lookup`], parsing the resolved string; unparseable values fall
/// back to the default.
fn lookup_parsed<T: FromStr + ToString>(
    file: &HashMap<String, String>,
    env_key: &str,
    file_key: &str,
    default: T,
) -> T {
    let raw = lookup(file, env_key, file_key, &default.to_string());
    raw.parse().unwrap_or(default)
}

/// Reads a properties file, returning an empty map when missing.
pub fn load_properties(path: &Path) -> HashMap<String, String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            tracing::debug!(path = %path.display(), "loaded properties file");
            parse_properties(&content)
        }
        Err(_) => HashMap::new(),
    }
}

/// Parses `KEY=value` lines; `#` lines and blank lines are skipped.
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    values
}

/// Loads a `.env` file from the working directory into the process
/// environment (best-effort, no error if missing). Variables already set
/// by the environment win.
pub fn load_dotenv() {
    let env_path = Path::new(".env");
    if let Ok(content) = std::fs::read_to_string(env_path) {
        for (key, value) in parse_properties(&content) {
            if std::env::var(&key).is_err() {
                std::env::set_var(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties_skips_comments_and_blanks() {
        let values = parse_properties("# comment\n\nmysql.host = db.internal\nserver.port=9000\n");
        assert_eq!(values.get("mysql.host").map(String::as_str), Some("db.internal"));
        assert_eq!(values.get("server.port").map(String::as_str), Some("9000"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_lookup_prefers_env_over_file() {
        std::env::set_var("GESTOR_TEST_LOOKUP_ENV", "from-env");
        let mut file = HashMap::new();
        file.insert("test.lookup".to_string(), "from-file".to_string());
        assert_eq!(
            lookup(&file, "GESTOR_TEST_LOOKUP_ENV", "test.lookup", "from-default"),
            "from-env"
        );
    }

    #[test]
    fn test_lookup_prefers_file_over_default() {
        let mut file = HashMap::new();
        file.insert("test.lookup.file".to_string(), "from-file".to_string());
        assert_eq!(
            lookup(&file, "GESTOR_TEST_LOOKUP_UNSET", "test.lookup.file", "from-default"),
            "from-file"
        );
    }

    #[test]
    fn test_lookup_falls_back_to_default() {
        let file = HashMap::new();
        assert_eq!(
            lookup(&file, "GESTOR_TEST_LOOKUP_UNSET_2", "test.missing", "from-default"),
            "from-default"
        );
    }

    #[test]
    fn test_lookup_parsed_rejects_garbage() {
        let mut file = HashMap::new();
        file.insert("test.port".to_string(), "not-a-port".to_string());
        let port: u16 = lookup_parsed(&file, "GESTOR_TEST_LOOKUP_UNSET_3", "test.port", 8000);
        assert_eq!(port, 8000);
    }

    #[test]
    fn test_defaults_match_provider_conventions() {
        // The host environment may carry PG*/MYSQL_* variables.
        for key in ["SERVER_PORT", "MYSQL_PORT", "PGPORT", "PGUSER"] {
            std::env::remove_var(key);
        }
        let config = AppConfig::from_file_values(&HashMap::new());
        assert_eq!(config.port, 8000);
        assert_eq!(config.mysql.port, 3306);
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.postgres.username, "postgres");
    }
}
