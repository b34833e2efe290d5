use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::view_model::UiEvent;
use crate::{
    ActionFailure, AppState, BatchMode, BatchSummary, Effect, Filter, Message, Msg, RedoCommand,
    RedoId, RedoSweep, RowError, Severity, SweepReport, SweepStep, TimerKey, REDO_STEP_INTERVAL,
};

/// Wait after a successful batch before re-polling, so the backend has
/// finished logging the events it produced.
pub const BATCH_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();

    match msg {
        Msg::Started => {
            effects.push(Effect::LoadConfig);
            state.request_poll(&mut effects);
        }
        Msg::PollTick => {
            if state.poll.try_begin() {
                effects.push(state.poll_effect());
            } else {
                engine_debug!("Poll tick skipped: previous cycle still in flight");
            }
        }
        Msg::PollCompleted { messages, redo } => {
            apply_poll(&mut state, messages, redo, &mut effects);
        }
        Msg::RefreshClicked => {
            effects.push(Effect::LoadConfig);
            state.request_poll(&mut effects);
            state.notify("Data refreshed", Severity::Success, &mut effects);
        }
        Msg::FilterChanged(filter) => {
            if state.filter != filter {
                state.filter = filter;
                state.emit(UiEvent::FilterChanged(filter));
                if filter == Filter::Redo {
                    effects.push(Effect::FetchRedoCommands);
                }
            }
        }
        Msg::ClearMessagesClicked => match state.filter {
            Filter::Redo => {
                state.notify(
                    "Redo commands cannot be cleared",
                    Severity::Warning,
                    &mut effects,
                );
            }
            other => effects.push(Effect::ClearMessages {
                kind: other.message_kind(),
            }),
        },
        Msg::MessagesCleared(Ok(())) => {
            state.notify("Messages cleared", Severity::Success, &mut effects);
            state.request_poll(&mut effects);
        }
        Msg::MessagesCleared(Err(failure)) => {
            let text = failure.notice("Clear failed", "Failed to clear messages");
            state.notify(text, Severity::Error, &mut effects);
        }

        Msg::ConfigLoaded(Ok(config)) => {
            let monitor_enabled = config.monitor_enabled;
            state.form.load(config);
            state.monitor.load(monitor_enabled);
            state.emit(UiEvent::ConfigLoaded);
        }
        Msg::ConfigLoaded(Err(failure)) => {
            engine_warn!("Loading configuration failed: {}", failure);
            state.notify(
                "Failed to load configuration",
                Severity::Error,
                &mut effects,
            );
        }
        Msg::ConfigFieldEdited(field) => {
            state.form.edit(field);
            state.mark_dirty();
        }
        Msg::DirectoryAdded => {
            state.form.add_row();
            state.mark_dirty();
        }
        Msg::DirectoryRemoved(index) => match state.form.remove_row(index) {
            Ok(()) => state.mark_dirty(),
            Err(RowError::LastRow) => {
                state.notify(
                    "At least one directory mapping is required",
                    Severity::Warning,
                    &mut effects,
                );
            }
            Err(RowError::OutOfRange) => {
                engine_warn!("Ignoring removal of unknown directory row {}", index);
            }
        },
        Msg::DirectoryEdited {
            index,
            field,
            value,
        } => {
            if state.form.edit_row(index, field, value) {
                state.mark_dirty();
            }
        }
        Msg::SaveConfigClicked => {
            let config = state.form.to_config(state.monitor.displayed());
            effects.push(Effect::SaveConfig(config));
        }
        Msg::ConfigSaved(Ok(())) => {
            state.notify("Configuration saved", Severity::Success, &mut effects);
        }
        Msg::ConfigSaved(Err(failure)) => {
            let text = failure.notice("Save failed", "Failed to save configuration");
            state.notify(text, Severity::Error, &mut effects);
        }
        Msg::MonitorToggled(enabled) => {
            if state.monitor.request(enabled) {
                state.mark_dirty();
                effects.push(Effect::ToggleMonitor { enabled });
            } else {
                engine_debug!("Monitor toggle to {} ignored", enabled);
            }
        }
        Msg::MonitorToggleSettled(result) => {
            apply_monitor_settled(&mut state, result, &mut effects);
        }

        Msg::BatchClicked(mode) => start_batch(&mut state, mode, &mut effects),
        Msg::BatchFinished { mode, result } => {
            finish_batch(&mut state, mode, result, &mut effects);
        }

        Msg::RedoViewOpened => {
            state.redo_view_open = true;
            state.mark_dirty();
            effects.push(Effect::FetchRedoCommands);
        }
        Msg::RedoViewClosed => {
            if state.redo_view_open {
                state.redo_view_open = false;
                state.mark_dirty();
                if let Some(step) = state.sweep.as_mut().map(RedoSweep::cancel) {
                    apply_sweep_step(&mut state, step, &mut effects);
                }
            }
        }
        Msg::RedoCommandsLoaded(Ok(commands)) => {
            state.redo_commands = commands;
            state.mark_dirty();
        }
        Msg::RedoCommandsLoaded(Err(failure)) => {
            engine_warn!("Loading redo commands failed: {}", failure);
            state.notify(
                "Failed to load redo commands",
                Severity::Error,
                &mut effects,
            );
        }
        Msg::ExecuteRedoClicked(id) => {
            if state.sweep.is_some() {
                state.notify(
                    "Wait for the running redo sweep to finish",
                    Severity::Warning,
                    &mut effects,
                );
            } else if state.single_redo.is_some() {
                state.notify(
                    "Wait for the running redo command to finish",
                    Severity::Warning,
                    &mut effects,
                );
            } else {
                state.single_redo = Some(id);
                state.mark_dirty();
                effects.push(Effect::ExecuteRedo { id });
            }
        }
        Msg::RedoExecuted { id, result } => {
            apply_redo_result(&mut state, id, result, &mut effects);
        }
        Msg::ProcessAllRedoClicked => start_sweep(&mut state, &mut effects),
        Msg::CancelRedoClicked => {
            if let Some(step) = state.sweep.as_mut().map(RedoSweep::cancel) {
                engine_info!("Redo sweep cancellation requested");
                state.mark_dirty();
                apply_sweep_step(&mut state, step, &mut effects);
            }
        }

        Msg::NotificationDismissed(id) => {
            if state.notifications.dismiss(id) {
                effects.push(Effect::CancelTimer {
                    key: TimerKey::NotificationExpiry(id),
                });
                state.emit(UiEvent::NotificationsChanged);
            }
        }
        Msg::TimerFired(key) => match key {
            TimerKey::NotificationExpiry(id) => {
                if state.notifications.dismiss(id) {
                    state.emit(UiEvent::NotificationsChanged);
                }
            }
            TimerKey::BatchSettle(_) => state.request_poll(&mut effects),
            TimerKey::RedoStep => {
                if let Some(step) = state.sweep.as_mut().map(RedoSweep::on_step_due) {
                    apply_sweep_step(&mut state, step, &mut effects);
                }
            }
        },
        Msg::NoOp => {}
    }

    (state, effects)
}

fn apply_poll(
    state: &mut AppState,
    messages: Result<Vec<Message>, ActionFailure>,
    redo: Option<Result<Vec<RedoCommand>, ActionFailure>>,
    effects: &mut Vec<Effect>,
) {
    let promoted = state.poll.finish();

    // Background failures are logged only; the previous snapshot stays.
    match messages {
        Ok(snapshot) => {
            let message_count = snapshot.len();
            state.store.replace(snapshot);
            state.emit(UiEvent::PollCompleted {
                message_count,
                revision: state.store.revision(),
            });
        }
        Err(failure) => engine_warn!("Message poll failed: {}", failure),
    }
    match redo {
        Some(Ok(commands)) => {
            state.redo_commands = commands;
            state.mark_dirty();
        }
        Some(Err(failure)) => engine_warn!("Redo list poll failed: {}", failure),
        None => {}
    }

    if promoted {
        effects.push(state.poll_effect());
    }
}

fn apply_monitor_settled(
    state: &mut AppState,
    result: Result<(), ActionFailure>,
    effects: &mut Vec<Effect>,
) {
    if !state.monitor.is_pending() {
        engine_warn!("Monitor toggle response arrived with no toggle pending");
        return;
    }
    state.monitor.settle(result.is_ok());
    state.mark_dirty();
    match result {
        Ok(()) => {
            let text = if state.monitor.displayed() {
                "Monitoring enabled"
            } else {
                "Monitoring disabled"
            };
            state.notify(text, Severity::Success, effects);
        }
        Err(failure) => {
            engine_warn!("Monitor toggle rolled back: {}", failure);
            let text = failure.notice("Operation failed", "Operation failed");
            state.notify(text, Severity::Error, effects);
        }
    }
}

fn start_batch(state: &mut AppState, mode: BatchMode, effects: &mut Vec<Effect>) {
    if *state.batch_busy_mut(mode) {
        engine_debug!("{:?} batch already running; click ignored", mode);
        return;
    }
    match state.form.batch_request(mode) {
        Ok(request) => {
            engine_info!(
                "Starting {:?} batch source={} target={}",
                mode,
                request.source_dir,
                request.target_dir
            );
            *state.batch_busy_mut(mode) = true;
            state.mark_dirty();
            effects.push(Effect::RunBatch(request));
        }
        Err(failure) => state.notify(failure.to_string(), Severity::Error, effects),
    }
}

fn finish_batch(
    state: &mut AppState,
    mode: BatchMode,
    result: Result<BatchSummary, ActionFailure>,
    effects: &mut Vec<Effect>,
) {
    *state.batch_busy_mut(mode) = false;
    state.mark_dirty();
    match result {
        Ok(summary) => {
            let text = format!(
                "{} finished: {} succeeded, {} failed",
                mode.label(),
                summary.success_count,
                summary.error_count
            );
            state.notify(text, Severity::Success, effects);
            effects.push(Effect::StartTimer {
                key: TimerKey::BatchSettle(mode),
                after: BATCH_SETTLE_DELAY,
            });
        }
        Err(failure) => {
            let text = failure.notice("Processing failed", "Processing failed");
            state.notify(text, Severity::Error, effects);
        }
    }
}

fn start_sweep(state: &mut AppState, effects: &mut Vec<Effect>) {
    if state.sweep.is_some() {
        engine_debug!("Redo sweep already running");
        return;
    }
    if state.single_redo.is_some() {
        state.notify(
            "Wait for the running redo command to finish",
            Severity::Warning,
            effects,
        );
        return;
    }
    // Only the list the user is looking at may be replayed.
    if !state.redo_list_visible() {
        state.notify(
            "Open the redo command list first",
            Severity::Warning,
            effects,
        );
        return;
    }
    let ids: Vec<RedoId> = state.redo_commands.iter().map(|cmd| cmd.id).collect();
    match RedoSweep::start(ids) {
        Some((sweep, first)) => {
            engine_info!("Starting redo sweep over {} commands", sweep.total());
            state.sweep = Some(sweep);
            state.mark_dirty();
            push_sweep_step(first, effects);
        }
        None => state.notify("No redo commands to process", Severity::Info, effects),
    }
}

fn apply_redo_result(
    state: &mut AppState,
    id: RedoId,
    result: Result<(), ActionFailure>,
    effects: &mut Vec<Effect>,
) {
    let ok = result.is_ok();
    if state.single_redo == Some(id) {
        state.single_redo = None;
        state.mark_dirty();
        match result {
            Ok(()) => {
                state.notify("Redo command executed", Severity::Success, effects);
                effects.push(Effect::FetchRedoCommands);
                state.request_poll(effects);
            }
            Err(failure) => {
                let text = failure.notice("Execution failed", "Execution failed");
                state.notify(text, Severity::Error, effects);
            }
        }
        return;
    }

    let in_sweep = state
        .sweep
        .as_ref()
        .is_some_and(|sweep| sweep.in_flight() == Some(id));
    if !in_sweep {
        engine_warn!("Ignoring response for redo command {} nobody is waiting on", id);
        return;
    }

    match &result {
        Ok(()) => state.notify(
            format!("Redo command {id} executed"),
            Severity::Success,
            effects,
        ),
        Err(failure) => {
            let prefix = format!("Redo command {id} failed");
            let text = failure.notice(&prefix, &prefix);
            state.notify(text, Severity::Error, effects);
        }
    }

    let Some(sweep) = state.sweep.as_mut() else {
        return;
    };
    let position = sweep.started();
    let total = sweep.total();
    let step = sweep.on_result(id, ok);
    state.emit(UiEvent::RedoStepCompleted {
        id,
        ok,
        position,
        total,
    });
    apply_sweep_step(state, step, effects);
}

fn apply_sweep_step(state: &mut AppState, step: SweepStep, effects: &mut Vec<Effect>) {
    match step {
        SweepStep::Execute(id) => {
            state.mark_dirty();
            push_sweep_step(id, effects);
        }
        SweepStep::Wait => {}
        SweepStep::Finished(report) => finish_sweep(state, report, effects),
    }
}

fn push_sweep_step(id: RedoId, effects: &mut Vec<Effect>) {
    effects.push(Effect::ExecuteRedo { id });
    effects.push(Effect::StartTimer {
        key: TimerKey::RedoStep,
        after: REDO_STEP_INTERVAL,
    });
}

fn finish_sweep(state: &mut AppState, report: SweepReport, effects: &mut Vec<Effect>) {
    engine_info!(
        "Redo sweep finished: {} of {} attempted, {} succeeded, {} failed, cancelled={}",
        report.attempted,
        report.total,
        report.succeeded,
        report.failed,
        report.cancelled
    );
    state.sweep = None;
    state.redo_view_open = false;
    effects.push(Effect::CancelTimer {
        key: TimerKey::RedoStep,
    });
    state.request_poll(effects);

    let (text, severity) = if report.cancelled {
        (
            format!(
                "Redo sweep cancelled after {} of {} commands: {} succeeded, {} failed",
                report.attempted, report.total, report.succeeded, report.failed
            ),
            Severity::Warning,
        )
    } else {
        let severity = if report.failed == 0 {
            Severity::Success
        } else {
            Severity::Warning
        };
        (
            format!(
                "All redo commands processed: {} succeeded, {} failed",
                report.succeeded, report.failed
            ),
            severity,
        )
    };
    state.notify(text, severity, effects);
    state.emit(UiEvent::RedoSweepFinished(report));
}
