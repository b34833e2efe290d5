use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use dashboard_core::Msg;
use dashboard_engine::{DashboardApi, ReqwestApi, Session};
use engine_logging::{engine_info, engine_warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use super::input::{self, Command, HELP};
use super::logging;
use super::render::{self, NoticeTracker, StatusTracker};
use super::settings::{self, DashboardSettings, SettingsSource, SERVER_URL_ENV};

/// Front-end requests that do not go through `update`.
enum Control {
    Show,
    Help,
}

enum Wake {
    Session(bool),
    Control(Option<Control>),
    Shutdown,
}

pub async fn run_app() -> anyhow::Result<()> {
    let (settings, source) = settings::load_or_create(Path::new("."));
    logging::initialize(settings.log_destination);
    match &source {
        SettingsSource::Loaded(path) => engine_info!("Loaded settings from {:?}", path),
        SettingsSource::Created(path) => engine_info!("Wrote default settings to {:?}", path),
        SettingsSource::Defaults(reason) => engine_warn!("Using default settings: {}", reason),
    }
    let settings = settings.with_server_override(std::env::var(SERVER_URL_ENV).ok());

    run(settings).await
}

async fn run(settings: DashboardSettings) -> anyhow::Result<()> {
    let api = ReqwestApi::new(settings.api_settings())
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    engine_info!("Dashboard talking to {}", api.base_url());
    let api: Arc<dyn DashboardApi> = Arc::new(api);

    let mut session = Session::new(api, settings.message_limit);
    let shutdown = CancellationToken::new();
    let (control_tx, mut control_rx) = mpsc::unbounded_channel();
    let reader = tokio::spawn(read_commands(
        session.sender(),
        control_tx,
        shutdown.clone(),
    ));

    session.start(settings.poll_interval());
    println!("{HELP}");

    let mut notices = NoticeTracker::default();
    let mut status = StatusTracker::default();
    loop {
        let wake = next_wake(&mut session, &mut control_rx, &shutdown).await;
        match wake {
            Wake::Shutdown | Wake::Session(false) | Wake::Control(None) => break,
            Wake::Session(true) => {}
            Wake::Control(Some(Control::Show)) => print!("{}", render::render_view(&session.view())),
            Wake::Control(Some(Control::Help)) => println!("{HELP}"),
        }

        for event in session.take_events() {
            if let Some(line) = render::render_event(&event) {
                println!("{line}");
            }
        }
        if session.consume_dirty() {
            let view = session.view();
            if let Some(line) = status.changed(&view) {
                println!("{line}");
            }
            for line in notices.fresh(&view.notifications) {
                println!("{line}");
            }
        }
    }

    engine_info!("Shutting down");
    session.stop();
    reader.abort();
    Ok(())
}

async fn next_wake(
    session: &mut Session,
    control_rx: &mut UnboundedReceiver<Control>,
    shutdown: &CancellationToken,
) -> Wake {
    tokio::select! {
        _ = shutdown.cancelled() => Wake::Shutdown,
        control = control_rx.recv() => Wake::Control(control),
        alive = session.next() => Wake::Session(alive),
    }
}

async fn read_commands(
    msg_tx: UnboundedSender<Msg>,
    control_tx: UnboundedSender<Control>,
    shutdown: CancellationToken,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                engine_warn!("Reading stdin failed: {}", err);
                break;
            }
        };
        let sent = match input::parse(&line) {
            Ok(None) => true,
            Ok(Some(Command::Dispatch(msg))) => msg_tx.send(msg).is_ok(),
            Ok(Some(Command::Show)) => control_tx.send(Control::Show).is_ok(),
            Ok(Some(Command::Help)) => control_tx.send(Control::Help).is_ok(),
            Ok(Some(Command::Quit)) => break,
            Err(problem) => {
                println!("{problem}");
                true
            }
        };
        if !sent {
            break;
        }
    }
    shutdown.cancel();
}
