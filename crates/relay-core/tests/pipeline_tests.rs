use std::sync::Arc;

use relay_core::{
    tools::{Tool, GITHUB_SEARCH, WEATHER_LOOKUP},
    verifier::{ALL_FAILED, ALL_SATISFIED, REMEDIATION},
    Orchestrator, OutcomeSource, ReportStatus,
};
use serde_json::json;

mod common;

use common::{orchestrator_with, test_config, unreachable_url, ScriptedTool};

#[tokio::test]
async fn test_language_search_completes_when_provider_answers() {
    let search = ScriptedTool::answering(GITHUB_SEARCH, json!({"repositories": []}));
    let orchestrator = orchestrator_with(vec![search.clone() as Arc<dyn Tool>], 3);

    let report = orchestrator.process("Find Python repositories").await;

    assert_eq!(report.status, ReportStatus::Completed);
    assert_eq!(report.completeness_score, 100.0);
    assert_eq!(report.steps.len(), 1);
    assert_eq!(report.steps[0].step.parameters()["query"], json!("python"));
    assert_eq!(report.steps[0].source(), OutcomeSource::Live);
    assert_eq!(report.suggestions, vec![ALL_SATISFIED]);
    assert_eq!(search.calls(), 1);
}

#[tokio::test]
async fn test_two_step_plan_runs_search_then_weather() {
    let orchestrator = orchestrator_with(
        vec![
            ScriptedTool::answering(GITHUB_SEARCH, json!({})) as Arc<dyn Tool>,
            ScriptedTool::answering(WEATHER_LOOKUP, json!({})) as Arc<dyn Tool>,
        ],
        3,
    );

    let report = orchestrator.process("weather in Tokyo and repositories").await;

    let tools: Vec<&str> = report.steps.iter().map(|r| r.step.tool_name()).collect();
    assert_eq!(tools, vec![GITHUB_SEARCH, WEATHER_LOOKUP]);
    assert_eq!(report.summary.live_steps, 2);
}

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let search = ScriptedTool::answering(GITHUB_SEARCH, json!({"count": 0}));
    let orchestrator = orchestrator_with(vec![search.clone() as Arc<dyn Tool>], 3);

    orchestrator.process("find rust repos").await;
    let report = orchestrator.process("find rust repos").await;

    assert_eq!(report.steps[0].source(), OutcomeSource::Cached);
    assert_eq!(report.summary.cached_steps, 1);
    assert_eq!(report.status, ReportStatus::Completed);
    assert_eq!(search.calls(), 1);
}

#[tokio::test]
async fn test_retry_bound_per_step() {
    let search = ScriptedTool::failing(GITHUB_SEARCH, None);
    let orchestrator = orchestrator_with(vec![search.clone() as Arc<dyn Tool>], 4);

    let report = orchestrator.process("find go code").await;

    assert_eq!(search.calls(), 4);
    assert_eq!(report.steps[0].attempts, 4);
    assert_eq!(report.steps[0].retry_count, 3);
    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(report.issues[0], ALL_FAILED);
    assert_eq!(
        report.issues[1],
        "Step 1 (github_search): failed after 4 attempts: github_search request failed: connection refused"
    );
    assert_eq!(report.suggestions, REMEDIATION.to_vec());
}

#[tokio::test]
async fn test_tool_without_fallback_yields_partial_report() {
    let orchestrator = orchestrator_with(
        vec![
            ScriptedTool::failing(GITHUB_SEARCH, Some(json!({"synthetic": true}))) as Arc<dyn Tool>,
            ScriptedTool::failing(WEATHER_LOOKUP, None) as Arc<dyn Tool>,
        ],
        2,
    );

    let report = orchestrator.process("weather in Paris and rust repos").await;

    assert_eq!(report.status, ReportStatus::Partial);
    assert_eq!(report.completeness_score, 50.0);
    assert_eq!(report.steps[0].source(), OutcomeSource::Fallback);
    assert!(!report.steps[1].is_success());
    assert_eq!(report.issues.len(), 1);
    assert!(report.issues[0].starts_with("Step 2 (weather_lookup): failed after 2 attempts"));
    assert_eq!(report.suggestions.len(), 2);
}

#[tokio::test]
async fn test_unregistered_tool_is_reported_not_called() {
    let weather = ScriptedTool::answering(WEATHER_LOOKUP, json!({}));
    let orchestrator = orchestrator_with(vec![weather.clone() as Arc<dyn Tool>], 3);

    let report = orchestrator.process("find repos and the weather").await;

    assert_eq!(report.status, ReportStatus::Partial);
    assert_eq!(report.issues, vec!["Step 1 (github_search): unknown tool"]);
    assert_eq!(report.steps[0].attempts, 0);
    assert_eq!(weather.calls(), 1);
}

#[tokio::test]
async fn test_no_keywords_runs_default_step() {
    let search = ScriptedTool::answering(GITHUB_SEARCH, json!({}));
    let orchestrator = orchestrator_with(vec![search.clone() as Arc<dyn Tool>], 3);

    let report = orchestrator.process("good morning").await;

    assert_eq!(report.steps.len(), 1);
    assert_eq!(
        report.steps[0].step.parameters()["query"],
        json!("artificial intelligence")
    );
    assert!(report.reasoning.starts_with("No specific task mentioned"));
}

#[tokio::test]
async fn test_unreachable_providers_degrade_to_fallback() {
    let orchestrator = Orchestrator::builder()
        .with_config(test_config(&unreachable_url()))
        .build()
        .expect("Failed to build orchestrator");

    let report = orchestrator
        .process("weather in Tokyo and python repositories")
        .await;

    assert_eq!(report.status, ReportStatus::Completed);
    assert_eq!(report.completeness_score, 100.0);
    assert_eq!(report.summary.fallback_steps, 2);
    for result in &report.steps {
        assert_eq!(result.source(), OutcomeSource::Fallback);
        assert_eq!(result.attempts, 3);
    }

    let repos = report.steps[0].outcome.data().expect("fallback data");
    assert_eq!(repos["repositories"][0]["name"], "python-project-1");
    let weather = report.steps[1].outcome.data().expect("fallback data");
    assert_eq!(weather["temperature"], 25.5);
    assert!(report.is_degraded());
}

#[tokio::test]
async fn test_report_serializes_for_front_ends() {
    let orchestrator = orchestrator_with(
        vec![ScriptedTool::answering(WEATHER_LOOKUP, json!({"city": "Rome"})) as Arc<dyn Tool>],
        3,
    );

    let report = orchestrator.process("forecast for Rome").await;
    let value = serde_json::to_value(&report).expect("serialize report");

    assert_eq!(value["status"], "completed");
    assert_eq!(value["steps"][0]["outcome"]["source"], "live");
    assert_eq!(value["steps"][0]["step"]["tool_name"], "weather_lookup");
    assert_eq!(value["summary"]["total_steps"], 1);
    assert!(value["execution_time_ms"].is_u64());
}
