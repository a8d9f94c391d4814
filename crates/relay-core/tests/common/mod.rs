#![allow(dead_code)]

use std::{
    net::TcpListener,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::Router;
use relay_core::{
    models::Parameters,
    tools::{ManualClock, ParameterSpec, ResultCache, Tool},
    Orchestrator, ProviderError, RelayConfig, ToolRegistry,
};
use serde_json::Value;

/// Configuration pointing every provider at `base` with no waits.
pub fn test_config(base: &str) -> RelayConfig {
    RelayConfig {
        retry_delay_ms: 0,
        pacing_delay_ms: 0,
        request_timeout_secs: 5,
        github_api_base: base.to_string(),
        geocoding_api_base: base.to_string(),
        weather_api_base: base.to_string(),
        openweather_api_base: base.to_string(),
        openweather_api_key: None,
        ..RelayConfig::default()
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Mock server failed");
    });
    format!("http://{addr}")
}

/// Base URL of a local port with nothing listening on it.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe socket");
    let port = listener
        .local_addr()
        .expect("Failed to read local address")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Orchestrator over the given tools, with a manual clock and no waits.
pub fn orchestrator_with(tools: Vec<Arc<dyn Tool>>, max_retries: u32) -> Orchestrator {
    let clock = Arc::new(ManualClock::default());
    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(
            tool,
            ResultCache::new(Duration::from_secs(300), 64, clock.clone()),
        );
    }
    Orchestrator::builder()
        .with_config(RelayConfig {
            max_retries,
            ..test_config("http://unused.invalid")
        })
        .with_registry(registry)
        .build()
        .expect("Failed to build orchestrator")
}

/// In-process tool with scripted behaviour.
pub struct ScriptedTool {
    pub name: &'static str,
    pub required: &'static [ParameterSpec],
    pub response: Option<Value>,
    pub fallback: Option<Value>,
    pub calls: AtomicU32,
}

impl ScriptedTool {
    /// Always answers with `response`.
    pub fn answering(name: &'static str, response: Value) -> Arc<Self> {
        Arc::new(Self {
            name,
            required: &[],
            response: Some(response),
            fallback: None,
            calls: AtomicU32::new(0),
        })
    }

    /// Always fails; degrades to `fallback` when given.
    pub fn failing(name: &'static str, fallback: Option<Value>) -> Arc<Self> {
        Arc::new(Self {
            name,
            required: &[],
            response: None,
            fallback,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Tool for ScriptedTool {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Scripted test tool"
    }

    fn parameters(&self) -> &[ParameterSpec] {
        self.required
    }

    async fn fetch(&self, _params: &Parameters) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone().ok_or_else(|| ProviderError::Transport {
            provider: self.name.to_string(),
            message: "connection refused".to_string(),
        })
    }

    fn fallback(&self, _params: &Parameters) -> Option<Value> {
        self.fallback.clone()
    }
}
