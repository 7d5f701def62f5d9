//! Query submission and response classification.
//!
//! One-shot flow: post `{db, sql}` to the server, read the body as text
//! and classify it. The HTTP status code is deliberately ignored — an
//! `{"error": ...}` body renders as a one-row table like any other JSON,
//! which is exactly how the service's error shape is meant to surface.

use common::models::QueryRequest;
use serde_json::Value;

use crate::render;

/// Terminal display state for one request/response cycle.
///
/// Mirrors the three display panels of the generated document plus the
/// details disclosure flag.
#[derive(Debug)]
pub struct ViewState {
    /// Status line (`OK`, `Respuesta no-JSON`, or `Error: ...`).
    pub message: String,
    /// Table panel markup; empty when cleared.
    pub table_html: String,
    /// Raw panel: pretty-printed JSON or the verbatim body text.
    pub json_panel: String,
    /// Whether the raw-JSON details panel starts open. Collapsed when
    /// the table already shows rows.
    pub details_open: bool,
}

impl ViewState {
    /// Classifies a response body: JSON renders as a table, anything
    /// else shows verbatim.
    pub fn from_body(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(parsed) => {
                let rows = normalize_rows(&parsed);
                Self {
                    message: "OK".to_string(),
                    table_html: render::render_table(&rows),
                    json_panel: serde_json::to_string_pretty(&parsed)
                        .unwrap_or_else(|_| text.to_string()),
                    details_open: rows.is_empty(),
                }
            }
            Err(_) => Self {
                message: "Respuesta no-JSON".to_string(),
                table_html: String::new(),
                json_panel: text.to_string(),
                details_open: true,
            },
        }
    }

    /// Terminal state for a failed network call: both panels empty.
    pub fn transport_error(err: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Error: {err}"),
            table_html: String::new(),
            json_panel: String::new(),
            details_open: false,
        }
    }
}

/// Normalizes a parsed response into a row sequence: an array is taken
/// as-is, null is zero rows, and a bare value becomes a single-row
/// sequence.
pub fn normalize_rows(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

/// HTTP client for the middleware's `/query` endpoint.
pub struct QueryClient {
    http: reqwest::Client,
    base_url: String,
}

impl QueryClient {
    /// Creates a client for the given server base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Posts the query and resolves to a terminal [`ViewState`].
    pub async fn run_query(&self, db: &str, sql: &str) -> ViewState {
        let request = QueryRequest {
            db: db.to_string(),
            sql: sql.to_string(),
        };
        tracing::info!(db = %db, "executing query");

        let response = match self
            .http
            .post(format!("{}/query", self.base_url))
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return ViewState::transport_error(err),
        };

        match response.text().await {
            Ok(text) => ViewState::from_body(&text),
            Err(err) => ViewState::transport_error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_normalizes_as_is() {
        let rows = normalize_rows(&json!([{"a": 1}, {"a": 2}]));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_bare_object_wraps_as_single_row() {
        let rows = normalize_rows(&json!({"a": 1}));
        assert_eq!(rows, vec![json!({"a": 1})]);
    }

    #[test]
    fn test_null_normalizes_to_zero_rows() {
        assert!(normalize_rows(&Value::Null).is_empty());
    }

    #[test]
    fn test_json_body_renders_table_and_echo() {
        let view = ViewState::from_body(r#"[{"a":1}]"#);
        assert_eq!(view.message, "OK");
        assert!(view.table_html.contains("<th>a</th>"));
        assert!(view.table_html.contains("<td>1</td>"));
        assert!(view.json_panel.contains("\"a\": 1"));
        assert!(!view.details_open);
    }

    #[test]
    fn test_null_body_shows_placeholder() {
        let view = ViewState::from_body("null");
        assert_eq!(view.message, "OK");
        assert!(view.table_html.contains(render::NO_ROWS_PLACEHOLDER));
        assert!(view.details_open);
    }

    #[test]
    fn test_non_json_body_shows_raw_text() {
        let view = ViewState::from_body("plain text");
        assert_eq!(view.message, "Respuesta no-JSON");
        assert_eq!(view.table_html, "");
        assert_eq!(view.json_panel, "plain text");
    }

    #[test]
    fn test_transport_error_clears_both_panels() {
        let view = ViewState::transport_error("connection refused");
        assert!(view.message.starts_with("Error: "));
        assert_eq!(view.table_html, "");
        assert_eq!(view.json_panel, "");
    }

    mod live {
        use super::super::*;
        use axum::{routing::post, Json, Router};
        use serde_json::json;

        async fn serve(app: Router) -> String {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });
            format!("http://{addr}")
        }

        #[tokio::test]
        async fn test_json_response_end_to_end() {
            let app = Router::new()
                .route("/query", post(|| async { Json(json!([{"a": 1}])) }));
            let client = QueryClient::new(serve(app).await);

            let view = client.run_query("postgres", "SELECT 1").await;
            assert_eq!(view.message, "OK");
            assert!(view.table_html.contains("<th>a</th>"));
            assert!(view.table_html.contains("<td>1</td>"));
        }

        #[tokio::test]
        async fn test_plain_text_response_end_to_end() {
            let app = Router::new()
                .route("/query", post(|| async { "plain text".to_string() }));
            let client = QueryClient::new(serve(app).await);

            let view = client.run_query("postgres", "SELECT 1").await;
            assert_eq!(view.message, "Respuesta no-JSON");
            assert_eq!(view.json_panel, "plain text");
            assert_eq!(view.table_html, "");
        }

        #[tokio::test]
        async fn test_unreachable_server_is_a_transport_error() {
            // Grab a port that nothing listens on.
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let client = QueryClient::new(format!("http://{addr}"));
            let view = client.run_query("postgres", "SELECT 1").await;
            assert!(view.message.starts_with("Error: "));
            assert_eq!(view.table_html, "");
            assert_eq!(view.json_panel, "");
        }
    }
}
