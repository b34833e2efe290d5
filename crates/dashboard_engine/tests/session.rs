use std::sync::Arc;
use std::time::{Duration, Instant};

use dashboard_core::{Filter, Msg, Severity, SweepReport, UiEvent};
use dashboard_engine::{ApiSettings, DashboardApi, ReqwestApi, Session};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_for(server: &MockServer) -> Session {
    let api = ReqwestApi::new(ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    })
    .unwrap();
    let api: Arc<dyn DashboardApi> = Arc::new(api);
    Session::new(api, 50)
}

async fn mount_messages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "type": "file_process", "success": true, "source": "/in/c.mkv",
             "destination": "/out/c.mkv", "timestamp": "2024-05-01T10:02:00"},
            {"id": 2, "type": "error", "source": "/in/b.mkv", "message": "no match",
             "timestamp": "2024-05-01T10:01:00"},
            {"id": 1, "type": "system", "message": "monitor started",
             "timestamp": "2024-05-01T10:00:00"}
        ])))
        .mount(server)
        .await;
}

async fn mount_redo_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/redo_commands"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 11, "message": "process_file /in/a /out/a", "timestamp": "2024-05-01T09:00:00"},
            {"id": 12, "message": "process_file /in/b /out/b", "timestamp": "2024-05-01T09:01:00"},
            {"id": 13, "message": "process_file /in/c /out/c", "timestamp": "2024-05-01T09:02:00"}
        ])))
        .mount(server)
        .await;
}

/// Drives the session until `done` sees a matching event.
async fn run_until(session: &mut Session, mut done: impl FnMut(&UiEvent) -> bool) -> Vec<UiEvent> {
    let mut seen = Vec::new();
    let drive = async {
        loop {
            assert!(session.next().await, "message channel closed");
            let events = session.take_events();
            let finished = events.iter().any(&mut done);
            seen.extend(events);
            if finished {
                break;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(15), drive)
        .await
        .expect("session did not reach the expected event");
    seen
}

#[tokio::test]
async fn refresh_replaces_snapshot() {
    let server = MockServer::start().await;
    mount_messages(&server).await;

    let mut session = session_for(&server);
    session.dispatch(Msg::RefreshClicked);
    run_until(&mut session, |event| {
        matches!(event, UiEvent::PollCompleted { .. })
    })
    .await;

    let view = session.view();
    assert_eq!(view.items.len(), 3);
    assert_eq!(view.stats.error_count, 1);
    assert_eq!(session.state().store().revision(), 1);
    assert!(!session.state().poll_gate().in_flight());
}

#[tokio::test]
async fn redo_sweep_executes_each_command_once_in_order() {
    let server = MockServer::start().await;
    mount_messages(&server).await;
    mount_redo_list(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/execute_redo/12"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"success": false, "error": "源文件不存在"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/execute_redo/1[13]$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.dispatch(Msg::FilterChanged(Filter::Redo));
    session.dispatch(Msg::RedoViewOpened);
    while session.state().redo_commands().len() < 3 {
        tokio::time::timeout(Duration::from_secs(5), session.next())
            .await
            .expect("redo list never loaded");
    }

    let started = Instant::now();
    session.dispatch(Msg::ProcessAllRedoClicked);
    let events = run_until(&mut session, |event| {
        matches!(event, UiEvent::RedoSweepFinished(_))
    })
    .await;
    assert!(started.elapsed() >= Duration::from_secs(2));

    let report = events.iter().find_map(|event| match event {
        UiEvent::RedoSweepFinished(report) => Some(*report),
        _ => None,
    });
    assert_eq!(
        report,
        Some(SweepReport {
            total: 3,
            attempted: 3,
            succeeded: 2,
            failed: 1,
            cancelled: false,
        })
    );

    let executed: Vec<String> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|request| request.url.path().to_string())
        .filter(|p| p.starts_with("/api/execute_redo/"))
        .collect();
    assert_eq!(
        executed,
        vec![
            "/api/execute_redo/11",
            "/api/execute_redo/12",
            "/api/execute_redo/13"
        ]
    );

    let notices: Vec<_> = session
        .state()
        .notifications()
        .iter()
        .map(|n| (n.text.clone(), n.severity))
        .collect();
    assert!(notices.contains(&(
        "Redo command 12 failed: 源文件不存在".to_string(),
        Severity::Error
    )));
    assert!(notices.contains(&(
        "All redo commands processed: 2 succeeded, 1 failed".to_string(),
        Severity::Warning
    )));
    assert!(session.state().sweep().is_none());
}

#[tokio::test]
async fn cancel_stops_sweep_after_current_command() {
    let server = MockServer::start().await;
    mount_messages(&server).await;
    mount_redo_list(&server).await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/execute_redo/\d+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.dispatch(Msg::RedoViewOpened);
    while session.state().redo_commands().len() < 3 {
        tokio::time::timeout(Duration::from_secs(5), session.next())
            .await
            .expect("redo list never loaded");
    }

    session.dispatch(Msg::ProcessAllRedoClicked);
    run_until(&mut session, |event| {
        matches!(event, UiEvent::RedoStepCompleted { id: 11, .. })
    })
    .await;
    session.dispatch(Msg::CancelRedoClicked);
    let events = session.take_events();
    let report = events.iter().find_map(|event| match event {
        UiEvent::RedoSweepFinished(report) => Some(*report),
        _ => None,
    });
    assert_eq!(
        report,
        Some(SweepReport {
            total: 3,
            attempted: 1,
            succeeded: 1,
            failed: 0,
            cancelled: true,
        })
    );

    // Give a stray step timer the chance to fire; it must not execute anything.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    session.drain();
    let executed = server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path().starts_with("/api/execute_redo/"))
        .count();
    assert_eq!(executed, 1);
}

#[tokio::test]
async fn monitor_toggle_rolls_back_on_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/toggle_monitor"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": false, "error": "目录不存在"})),
        )
        .mount(&server)
        .await;

    let mut session = session_for(&server);
    session.dispatch(Msg::MonitorToggled(true));
    assert!(session.view().monitor_enabled);
    assert!(session.view().monitor_pending);

    tokio::time::timeout(Duration::from_secs(5), session.next())
        .await
        .expect("toggle never settled");

    let view = session.view();
    assert!(!view.monitor_enabled);
    assert!(!view.monitor_pending);
    assert_eq!(
        view.notifications.last().map(|n| n.text.as_str()),
        Some("Operation failed: 目录不存在")
    );
}
