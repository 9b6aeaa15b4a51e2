/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for jobmon-adapter tests

use std::time::Duration;

use jobmon_adapter::{ClientConfig, JobmonClient, RetryPolicy};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server that retries without sleeping
pub fn fast_retry_client(server: &MockServer, max_attempts: u32) -> JobmonClient {
    let config = ClientConfig {
        retry: RetryPolicy {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_jitter: Duration::ZERO,
            ..RetryPolicy::default()
        },
        ..ClientConfig::default()
    };
    JobmonClient::with_config(config, &server.uri()).expect("client init")
}

/// Clustered-errors payload with a single OOM group
pub fn oom_groups_body() -> serde_json::Value {
    serde_json::json!({
        "error_logs": [
            {
                "sample_error": "OOM",
                "first_error_time": "2024-01-01T00:00:00",
                "group_instance_count": 3,
                "task_instance_ids": [11, 12, 13]
            }
        ]
    })
}
