use std::fmt::Write as _;

use dashboard_core::{
    AppViewModel, Message, MessageKind, Notification, NotificationId, Projection, RedoCommand,
    Severity, TrendPoint, UiEvent,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Full dashboard, printed on `show` and at start-up.
pub(crate) fn render_view(view: &AppViewModel) -> String {
    let mut out = String::new();
    let stats = &view.stats;
    let dist = &view.charts.distribution;

    let _ = writeln!(
        out,
        "== dashboard [{}] == messages: {}  errors: {}  done today: {}",
        view.filter.label(),
        stats.badge_count,
        stats.error_count,
        stats.today_success
    );
    let _ = writeln!(
        out,
        "types: system {}  file {} ({} ok)  error {}",
        dist.system, dist.file_process, dist.success, dist.error
    );
    let trend: Vec<String> = view.charts.trend.iter().map(render_trend_point).collect();
    let _ = writeln!(out, "trend: {}", trend.join("  "));
    let _ = writeln!(
        out,
        "{}{}",
        render_status(view),
        if view.poll_in_flight { " | syncing" } else { "" }
    );

    if view.config_loaded {
        for (index, dir) in view.directories.iter().enumerate() {
            let _ = writeln!(
                out,
                "dir {index}: {} {} -> {}",
                or_dash(&dir.name),
                or_dash(&dir.source),
                or_dash(&dir.target)
            );
        }
    } else {
        let _ = writeln!(out, "configuration not loaded");
    }

    let _ = writeln!(out, "--");
    match &view.items {
        Projection::Messages(messages) if messages.is_empty() => {
            let _ = writeln!(out, "(no messages)");
        }
        Projection::Messages(messages) => {
            for message in messages {
                let _ = writeln!(out, "{}", render_message(message));
            }
        }
        Projection::Redo(commands) if commands.is_empty() => {
            let _ = writeln!(out, "(no redo commands)");
        }
        Projection::Redo(commands) => {
            for command in commands {
                let _ = writeln!(out, "{}", render_redo(command));
            }
        }
    }

    for notification in &view.notifications {
        let _ = writeln!(out, "{}", render_notification(notification));
    }
    out
}

/// One-line summary of the toggles and busy flags.
pub(crate) fn render_status(view: &AppViewModel) -> String {
    let mut parts = vec![format!(
        "monitor {}{}",
        if view.monitor_enabled { "on" } else { "off" },
        if view.monitor_pending { " (pending)" } else { "" }
    )];
    if view.batch_busy.all {
        parts.push("batch running".to_string());
    }
    if view.batch_busy.compare {
        parts.push("compare running".to_string());
    }
    if view.redo_view_open {
        parts.push(format!("redo view: {} commands", view.redo_commands.len()));
    }
    if let Some(progress) = view.redo_progress {
        parts.push(format!(
            "redo sweep {}/{}{}",
            progress.started,
            progress.total,
            if progress.cancelling { " cancelling" } else { "" }
        ));
    }
    if let Some(id) = view.single_redo {
        parts.push(format!("redo command {id} running"));
    }
    parts.join(" | ")
}

pub(crate) fn render_event(event: &UiEvent) -> Option<String> {
    match event {
        UiEvent::PollCompleted { .. } | UiEvent::NotificationsChanged => None,
        UiEvent::FilterChanged(filter) => Some(format!("filter: {}", filter.label())),
        UiEvent::ConfigLoaded => Some("configuration loaded".to_string()),
        UiEvent::RedoStepCompleted {
            id,
            ok,
            position,
            total,
        } => Some(format!(
            "redo {position}/{total}: command {id} {}",
            if *ok { "ok" } else { "failed" }
        )),
        UiEvent::RedoSweepFinished(report) => Some(format!(
            "redo sweep done: {} of {} attempted",
            report.attempted, report.total
        )),
    }
}

fn render_trend_point(point: &TrendPoint) -> String {
    format!(
        "{} {}/{}{}",
        point.day.label(),
        point.successes,
        point.errors,
        if point.estimated { " (est.)" } else { "" }
    )
}

fn render_message(message: &Message) -> String {
    let time = message.timestamp.format(TIME_FORMAT);
    match message.kind {
        MessageKind::FileProcess => {
            let outcome = if message.success { "ok" } else { "FAILED" };
            match message.destination() {
                Some(dest) => format!("[{time}] file {outcome} {} -> {dest}", message.source),
                None => format!("[{time}] file {outcome} {}", message.source),
            }
        }
        MessageKind::Error => format!(
            "[{time}] error {}: {}",
            message.source,
            message.text().unwrap_or("unknown error")
        ),
        kind => format!("[{time}] {kind} {}", message.text().unwrap_or_default()),
    }
}

fn render_redo(command: &RedoCommand) -> String {
    format!(
        "#{} [{}] {}",
        command.id,
        command.timestamp.format(TIME_FORMAT),
        command.message.as_deref().unwrap_or_default()
    )
}

fn render_notification(notification: &Notification) -> String {
    let tag = match notification.severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Error => "error",
        Severity::Warning => "warn",
    };
    format!("({}) {tag}: {}", notification.id, notification.text)
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

/// Reports the status line only when it reads differently from the last one.
#[derive(Debug, Default)]
pub(crate) struct StatusTracker {
    last: Option<String>,
}

impl StatusTracker {
    pub fn changed(&mut self, view: &AppViewModel) -> Option<String> {
        let line = render_status(view);
        if self.last.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last = Some(line.clone());
        Some(line)
    }
}

/// Prints each notification once, when it first appears.
#[derive(Debug, Default)]
pub(crate) struct NoticeTracker {
    last_seen: NotificationId,
}

impl NoticeTracker {
    pub fn fresh(&mut self, notifications: &[Notification]) -> Vec<String> {
        let lines = notifications
            .iter()
            .filter(|n| n.id > self.last_seen)
            .map(render_notification)
            .collect();
        if let Some(newest) = notifications.iter().map(|n| n.id).max() {
            self.last_seen = self.last_seen.max(newest);
        }
        lines
    }
}
