use std::time::Duration;

use dashboard_core::{ActionFailure, BatchMode, BatchRequest, Config, MessageKind};
use dashboard_engine::{ApiSettings, DashboardApi, FailureKind, ReqwestApi};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestApi {
    ReqwestApi::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .expect("valid base url")
}

#[test]
fn base_url_gets_trailing_slash() {
    let api = ReqwestApi::new(ApiSettings {
        base_url: "http://localhost:5000/dashboard".to_string(),
        ..ApiSettings::default()
    })
    .unwrap();
    assert_eq!(api.base_url().as_str(), "http://localhost:5000/dashboard/");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestApi::new(ApiSettings {
        base_url: "not a url".to_string(),
        ..ApiSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn list_messages_sends_limit_and_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/messages"))
        .and(query_param("limit", "50"))
        .and(query_param("type", "error"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 9,
                "type": "error",
                "source": "/in/a.mkv",
                "message": "disk full",
                "timestamp": "2024-05-01T10:00:00"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let messages = api_for(&server)
        .list_messages(50, Some(MessageKind::Error))
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind, MessageKind::Error);
    assert_eq!(messages[0].text(), Some("disk full"));
    assert_eq!(messages[0].destination(), None);
}

#[tokio::test]
async fn get_config_keeps_unknown_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tmdb_api_key": "k",
            "max_retries": 5,
            "directories": [{"name": "movies", "source": "/in", "target": "/out"}],
            "monitor_enabled": true,
            "proxy": "socks5://127.0.0.1:1080"
        })))
        .mount(&server)
        .await;

    let config = api_for(&server).get_config().await.unwrap();
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.cache_expiry_days, 30);
    assert!(config.monitor_enabled);
    assert_eq!(config.extra.get("proxy"), Some(&json!("socks5://127.0.0.1:1080")));
}

#[tokio::test]
async fn save_config_reports_server_rejection_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/config"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({"success": false, "error": "配置文件不可写"})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .save_config(&Config::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Rejected(Some("配置文件不可写".to_string())));
    assert_eq!(
        ActionFailure::from(err),
        ActionFailure::rejected("配置文件不可写")
    );
}

#[tokio::test]
async fn error_status_without_envelope_is_a_silent_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/toggle_monitor"))
        .and(body_json(json!({"enabled": true})))
        .respond_with(ResponseTemplate::new(502).set_body_raw("<html>bad gateway</html>", "text/html"))
        .mount(&server)
        .await;

    let err = api_for(&server).toggle_monitor(true).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(502));
    assert_eq!(ActionFailure::from(err), ActionFailure::Rejected { error: None });
}

#[tokio::test]
async fn clear_all_sends_null_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clear_messages"))
        .and(body_json(json!({"type": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).clear_messages(None).await.unwrap();
}

#[tokio::test]
async fn clear_one_kind_sends_its_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clear_messages"))
        .and(body_json(json!({"type": "file_process"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server)
        .clear_messages(Some(MessageKind::FileProcess))
        .await
        .unwrap();
}

#[tokio::test]
async fn run_batch_returns_counts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/run_batch_process"))
        .and(body_json(json!({
            "source_dir": "/in",
            "target_dir": "/out",
            "mode": "compare"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "success_count": 4,
            "error_count": 1,
            "total": 5
        })))
        .mount(&server)
        .await;

    let summary = api_for(&server)
        .run_batch(&BatchRequest {
            source_dir: "/in".to_string(),
            target_dir: "/out".to_string(),
            mode: BatchMode::Compare,
        })
        .await
        .unwrap();
    assert_eq!(summary.success_count, 4);
    assert_eq!(summary.error_count, 1);
    assert_eq!(summary.total, Some(5));
}

#[tokio::test]
async fn execute_redo_posts_to_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/execute_redo/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).execute_redo(42).await.unwrap();
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/redo_commands"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = api_for(&server).list_redo_commands().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
    assert!(matches!(ActionFailure::from(err), ActionFailure::Network(_)));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/redo_commands"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let api = ReqwestApi::new(ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    })
    .unwrap();
    let err = api.list_redo_commands().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}
