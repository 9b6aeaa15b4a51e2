/*
[INPUT]:  Mock server requirements for panel and binary tests
[OUTPUT]: Shared mock endpoints, fixtures, and config file helpers
[POS]:    Test infrastructure - shared across integration tests
[UPDATE]: When adding new endpoints or fixtures
*/

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use jobmon_adapter::{ClientConfig, JobmonClient, RetryPolicy};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const WORKFLOW_ID: u64 = 1;
pub const TEMPLATE_ID: u64 = 2;

/// Client against `server` that tries each request once
pub fn single_attempt_client(server: &MockServer) -> JobmonClient {
    let config = ClientConfig {
        retry: RetryPolicy {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_jitter: Duration::ZERO,
            ..RetryPolicy::default()
        },
        ..ClientConfig::default()
    };
    JobmonClient::with_config(config, &server.uri()).expect("client init")
}

/// Mounts the OOM scenario: one group over task instances 11, 12, 13, with
/// an empty record for 12.
pub async fn mount_oom_scenario(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/error_log_viz/{WORKFLOW_ID}/{TEMPLATE_ID}")))
        .and(query_param("cluster_errors", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error_logs": [{
                "sample_error": "OOM",
                "first_error_time": "2024-01-01T00:00:00",
                "group_instance_count": 3,
                "task_instance_ids": [11, 12, 13]
            }]
        })))
        .mount(server)
        .await;

    for task_instance_id in [11u64, 13] {
        Mock::given(method("GET"))
            .and(path(format!(
                "/api/v2/error_log_viz/{WORKFLOW_ID}/{TEMPLATE_ID}/{task_instance_id}"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(task_instance_id)))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("/api/v2/error_log_viz/{WORKFLOW_ID}/{TEMPLATE_ID}/12")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error_logs": [] })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/v2/workflow_details_viz/{WORKFLOW_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "wf_name": "nightly-model",
            "wf_status": "E",
            "tool_name": "modeling"
        }])))
        .mount(server)
        .await;
}

pub fn detail_body(task_instance_id: u64) -> serde_json::Value {
    serde_json::json!({
        "error_logs": [{
            "error_time": "2024-01-01T00:05:00",
            "task_id": task_instance_id + 100,
            "task_instance_err_id": task_instance_id * 10,
            "workflow_id": WORKFLOW_ID,
            "workflow_run_id": 4,
            "error": "MemoryError: out of memory",
            "task_instance_stderr_log": "oom-killer invoked"
        }]
    })
}

/// YAML config file pointing at `service_url`, unique per test name
pub fn write_config(name: &str, service_url: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "jobmon-clustered-errors-{}-{name}.yaml",
        std::process::id()
    ));
    let contents = format!(
        "http:\n  service_url: {service_url}\n  retries_attempts: 1\n  request_timeout: 5\n"
    );
    std::fs::write(&path, contents).expect("write config");
    path
}
