/*
[INPUT]:  Mock HTTP responses
[OUTPUT]: Test results for HTTP client
[POS]:    Integration tests - HTTP routes
[UPDATE]: When HTTP routes change
*/

mod common;

use common::{fast_retry_client, oom_groups_body, setup_mock_server};
use jobmon_adapter::{ClientConfig, JobmonClient, JobmonError};
use rstest::rstest;
use tokio_test::assert_ok;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let _client = assert_ok!(JobmonClient::new("http://localhost:5000"));
}

#[test]
fn test_client_with_config() {
    let config = ClientConfig::default();
    let client = assert_ok!(JobmonClient::with_config(config, "http://localhost:5000"));
    assert_eq!(client.base_url().as_str(), "http://localhost:5000/api/v2/");
}

#[tokio::test]
async fn test_requests_carry_json_content_type() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/error_log_viz/3/4"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oom_groups_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = fast_retry_client(&server, 1);
    let groups = assert_ok!(client.query_error_groups(3, 4).await);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].task_instance_ids, vec![11, 12, 13]);
}

#[tokio::test]
async fn test_transient_failure_recovers() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/error_log_viz/3/4"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/error_log_viz/3/4"))
        .and(query_param("cluster_errors", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(oom_groups_body()))
        .mount(&server)
        .await;

    let client = fast_retry_client(&server, 3);
    let groups = assert_ok!(client.query_error_groups(3, 4).await);
    assert_eq!(groups[0].sample_error, "OOM");
}

#[rstest]
#[case(500, true)]
#[case(502, true)]
#[case(423, true)]
#[case(400, false)]
#[case(403, false)]
#[case(404, false)]
#[tokio::test]
async fn test_status_classification(#[case] status: u16, #[case] retryable: bool) {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/error_log_viz/3/4/12"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    let client = fast_retry_client(&server, 1);
    let err = client
        .query_error_detail(3, 4, 12)
        .await
        .expect_err("error status must fail");

    assert_eq!(err.status(), Some(status));
    assert_eq!(err.is_retryable(), retryable);
    if retryable {
        assert!(matches!(err, JobmonError::InvalidResponse { .. }));
    } else {
        assert!(matches!(err, JobmonError::InvalidRequest { .. }));
    }
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    let uri = format!("http://127.0.0.1:{port}");

    let client = assert_ok!(JobmonClient::with_config(
        ClientConfig {
            retry: jobmon_adapter::RetryPolicy::none(),
            ..ClientConfig::default()
        },
        &uri,
    ));
    let err = client
        .query_error_groups(1, 1)
        .await
        .expect_err("connection refused");
    assert!(matches!(err, JobmonError::Http(_)));
    assert!(err.is_retryable());
}
