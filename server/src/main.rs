//! SQL-over-HTTP middleware server.
//!
//! Exposes `POST /query`: the body names a provider and carries free-text
//! SQL, the response is the bare JSON the statement produced (row array
//! for reads, affected-rows summary for writes, `{"error": ...}` on
//! failure).

mod handlers;
mod pool_manager;
mod routes;
mod rows;
mod service;
mod state;

use axum::{middleware, routing::get, Json, Router};
use common::config::AppConfig;
use common::middleware::request_id::request_id_middleware;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "gestor-server";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "gestor API",
        version = "0.1.0",
        description = "SQL-over-HTTP middleware"
    ),
    paths(handlers::execute_query, handlers::health_check),
    components(schemas(
        common::models::QueryRequest,
        common::models::StatementSummary,
        handlers::HealthResponse,
    )),
    tags(
        (name = "query", description = "Query execution endpoint"),
        (name = "health", description = "Health check endpoint")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Seed the environment from .env before reading any configuration
    common::config::load_dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::load();
    let state = AppState::new(config.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!(service = SERVICE_NAME, address = %addr, "starting server");

    let listener = TcpListener::bind(&addr).await.expect("failed to bind address");
    axum::serve(listener, app).await.expect("server error");
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use common::config::ProviderSettings;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(AppConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mysql: ProviderSettings {
                host: "localhost".to_string(),
                port: 3306,
                database: "demo".to_string(),
                username: "root".to_string(),
                password: "password".to_string(),
            },
            postgres: ProviderSettings {
                host: "localhost".to_string(),
                port: 5432,
                database: "postgres".to_string(),
                username: "postgres".to_string(),
                password: "postgres".to_string(),
            },
            sqlite_path: ":memory:".to_string(),
            max_connections: 1,
            connect_timeout_secs: 5,
        })
    }

    fn query_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_fields_answer_invalid_request() {
        let app = create_router(test_state());
        let response = app.oneshot(query_request("{}")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, r#"{"error":"invalid request"}"#);
    }

    #[tokio::test]
    async fn test_malformed_body_answers_invalid_request() {
        let app = create_router(test_state());
        let response = app.oneshot(query_request("not json at all")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, r#"{"error":"invalid request"}"#);
    }

    #[tokio::test]
    async fn test_query_round_trip_over_sqlite() {
        let app = create_router(test_state());
        let response = app
            .oneshot(query_request(r#"{"db":"sqlite","sql":"SELECT 1 AS uno"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(value, serde_json::json!([{"uno": 1}]));
    }

    #[tokio::test]
    async fn test_health_reports_service_name() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["service"], SERVICE_NAME);
    }

    #[tokio::test]
    async fn test_root_serves_landing_page() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("gestor"));
    }
}
