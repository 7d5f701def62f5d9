//! HTTP handlers.

use axum::{extract::State, response::Html, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use common::errors::AppError;
use common::models::query::QueryRequest;

use crate::service::QueryService;
use crate::state::AppState;

/// Executes a SQL statement against the provider named in the body.
///
/// The body is parsed by hand so that a missing or malformed payload
/// answers exactly `400 {"error":"invalid request"}`, the shape clients
/// of this endpoint rely on.
#[utoipa::path(
    post,
    path = "/query",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Row array for reads, summary object for writes"),
        (status = 400, description = "Missing or malformed request body"),
        (status = 500, description = "Connection or execution failure")
    )
)]
pub async fn execute_query(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Value>, AppError> {
    let req: QueryRequest =
        serde_json::from_str(&body).map_err(|_| AppError::InvalidRequest)?;
    req.validate().map_err(|_| AppError::InvalidRequest)?;

    let service = QueryService::new(state.pool_manager.clone());
    let result = service.execute(req).await?;
    Ok(Json(result))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: crate::SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// Landing page so the service root is not a 404.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check response body.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>gestor</title></head>
<body>
<h1>gestor</h1>
<p>Middleware SQL sobre HTTP.</p>
<ul>
<li><code>POST /query</code> — body <code>{"db": "...", "sql": "..."}</code></li>
<li><code>GET /health</code></li>
<li><code>GET /api-docs/openapi.json</code></li>
</ul>
<p>Para consultas interactivas use <code>gestor-console</code>.</p>
</body>
</html>
"#;
