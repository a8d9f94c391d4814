//! HTTP front end.
//!
//! | Method | Path       | Response                                   |
//! |--------|------------|--------------------------------------------|
//! | GET    | `/`        | service name, version and endpoint list    |
//! | GET    | `/health`  | `{"status": "healthy", "timestamp": ...}`  |
//! | GET    | `/tools`   | registered tools with parameter specs      |
//! | POST   | `/process` | the JSON report for `{"task": "..."}`      |
//!
//! A report is returned with 200 whatever its status; only a malformed body
//! or an empty task is rejected, with 400 and `{"error": ...}`.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use jiff::Timestamp;
use log::{debug, error, info};
use relay_core::{params::ProcessTask, Orchestrator, Report, ToolInfo};
use serde::Serialize;
use serde_json::{json, Value};

pub type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: Timestamp,
}

pub fn build_router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/tools", get(tools))
        .route("/process", post(process))
        .with_state(orchestrator)
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "relay",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec!["GET /", "GET /health", "GET /tools", "POST /process"],
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Timestamp::now(),
    })
}

async fn tools(State(orchestrator): State<Arc<Orchestrator>>) -> Json<Vec<ToolInfo>> {
    Json(orchestrator.tools())
}

async fn process(
    State(orchestrator): State<Arc<Orchestrator>>,
    body: Result<Json<ProcessTask>, JsonRejection>,
) -> Result<Json<Report>, ApiError> {
    let Json(params) = body.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;
    params
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    if let Some(user) = &params.user_id {
        debug!("Task submitted by {user}");
    }

    let report = orchestrator.process(&params.task).await;
    Ok(Json(report))
}

/// Serves the API until SIGINT or SIGTERM.
pub async fn run_server(orchestrator: Arc<Orchestrator>, host: &str, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind server listener on {host}:{port}"))?;
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;

    info!("HTTP server listening on http://{addr}");
    println!("Relay listening on http://{addr} (health: /health, process: POST /process)");

    axum::serve(listener, build_router(orchestrator))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server runtime failed")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use relay_core::{models::ReportStatus, OutcomeSource, RelayConfig};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    fn unreachable_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe socket");
        let addr = listener.local_addr().expect("Failed to read probe address");
        format!("http://{addr}")
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });
        addr.to_string()
    }

    /// Minimal HTTP/1.1 POST returning the status code and body.
    async fn post_json(addr: &str, body: &str) -> (u16, String) {
        let mut stream = tokio::net::TcpStream::connect(addr)
            .await
            .expect("Failed to connect");
        let request = format!(
            "POST /process HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(request.as_bytes())
            .await
            .expect("Failed to send request");
        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .await
            .expect("Failed to read response");

        let status = response
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse().ok())
            .expect("status line");
        let body = response
            .split_once("\r\n\r\n")
            .map(|(_, body)| body.to_string())
            .unwrap_or_default();
        (status, body)
    }

    fn orchestrator() -> Arc<Orchestrator> {
        let base = unreachable_url();
        let config = RelayConfig {
            max_retries: 1,
            retry_delay_ms: 0,
            pacing_delay_ms: 0,
            request_timeout_secs: 2,
            github_api_base: base.clone(),
            geocoding_api_base: base.clone(),
            weather_api_base: base.clone(),
            openweather_api_base: base,
            openweather_api_key: None,
            ..RelayConfig::default()
        };
        Arc::new(
            Orchestrator::builder()
                .with_config(config)
                .build()
                .expect("Failed to build orchestrator"),
        )
    }

    #[tokio::test]
    async fn test_health() {
        let Json(body) = health().await;
        assert_eq!(body.status, "healthy");
    }

    #[tokio::test]
    async fn test_service_info_lists_endpoints() {
        let Json(info) = service_info().await;
        assert_eq!(info.name, "relay");
        assert!(info.endpoints.contains(&"POST /process"));
    }

    #[tokio::test]
    async fn test_tools_lists_registry() {
        let Json(tools) = tools(State(orchestrator())).await;
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["github_search", "weather_lookup"]);
    }

    #[tokio::test]
    async fn test_process_rejects_empty_task() {
        let result = process(State(orchestrator()), Ok(Json(ProcessTask::new("   ")))).await;
        let (status, Json(body)) = result.expect_err("empty task should be rejected");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap_or_default().contains("task"));
    }

    #[tokio::test]
    async fn test_process_rejects_body_without_task() {
        let base = spawn(build_router(orchestrator())).await;
        let (status, body) = post_json(&base, r#"{"user_id": "alice"}"#).await;
        assert_eq!(status, 400);
        let body: Value = serde_json::from_str(&body).expect("JSON error body");
        assert!(body["error"].as_str().is_some_and(|e| e.contains("task")));

        let (status, _) = post_json(&base, "not json").await;
        assert_eq!(status, 400);
    }

    #[tokio::test]
    async fn test_process_returns_degraded_report() {
        let result = process(
            State(orchestrator()),
            Ok(Json(ProcessTask::new("weather in Paris"))),
        )
        .await;
        let Json(report) = result.expect("report should be returned");
        assert_eq!(report.status, ReportStatus::Completed);
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].source(), OutcomeSource::Fallback);
    }
}
