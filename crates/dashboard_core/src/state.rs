use chrono::{Local, NaiveDate};

use crate::chart::{aggregate, stats};
use crate::view_model::{AppViewModel, BatchBusy, RedoProgress, UiEvent};
use crate::{
    project, BatchMode, ConfigForm, Effect, Filter, Message, MonitorFlag, NotificationQueue,
    PollGate, RedoCommand, RedoId, RedoSweep, Severity, TimerKey, DEFAULT_MESSAGE_LIMIT, NOTIFICATION_TTL,
};

/// Latest snapshot of backend events. Replaced whole on each successful poll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageStore {
    snapshot: Vec<Message>,
    revision: u64,
}

impl MessageStore {
    pub fn snapshot(&self) -> &[Message] {
        &self.snapshot
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn replace(&mut self, snapshot: Vec<Message>) {
        self.snapshot = snapshot;
        self.revision += 1;
    }
}

/// Whole dashboard session. Owned by one driver; mutated only by `update`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub(crate) store: MessageStore,
    pub(crate) redo_commands: Vec<RedoCommand>,
    pub(crate) filter: Filter,
    pub(crate) poll: PollGate,
    pub(crate) message_limit: usize,
    pub(crate) form: ConfigForm,
    pub(crate) monitor: MonitorFlag,
    pub(crate) batch_busy: BatchBusy,
    pub(crate) redo_view_open: bool,
    pub(crate) sweep: Option<RedoSweep>,
    /// A single redo execution awaiting its response.
    pub(crate) single_redo: Option<RedoId>,
    pub(crate) notifications: NotificationQueue,
    events: Vec<UiEvent>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_message_limit(DEFAULT_MESSAGE_LIMIT)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message_limit(message_limit: usize) -> Self {
        Self {
            store: MessageStore::default(),
            redo_commands: Vec::new(),
            filter: Filter::All,
            poll: PollGate::default(),
            message_limit: message_limit.max(1),
            form: ConfigForm::default(),
            monitor: MonitorFlag::default(),
            batch_busy: BatchBusy::default(),
            redo_view_open: false,
            sweep: None,
            single_redo: None,
            notifications: NotificationQueue::default(),
            events: Vec::new(),
            dirty: false,
        }
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn form(&self) -> &ConfigForm {
        &self.form
    }

    pub fn monitor(&self) -> MonitorFlag {
        self.monitor
    }

    pub fn poll_gate(&self) -> PollGate {
        self.poll
    }

    pub fn redo_commands(&self) -> &[RedoCommand] {
        &self.redo_commands
    }

    pub fn sweep(&self) -> Option<&RedoSweep> {
        self.sweep.as_ref()
    }

    pub fn single_redo(&self) -> Option<RedoId> {
        self.single_redo
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn view(&self) -> AppViewModel {
        self.view_at(Local::now().date_naive())
    }

    /// View model with "today" pinned, for deterministic stats.
    pub fn view_at(&self, today: NaiveDate) -> AppViewModel {
        let snapshot = self.store.snapshot();
        AppViewModel {
            filter: self.filter,
            items: project(snapshot, &self.redo_commands, self.filter),
            snapshot_revision: self.store.revision(),
            charts: aggregate(snapshot),
            stats: stats(snapshot, today),
            notifications: self.notifications.iter().cloned().collect(),
            monitor_enabled: self.monitor.displayed(),
            monitor_pending: self.monitor.is_pending(),
            config_loaded: self.form.is_loaded(),
            directories: self.form.rows().to_vec(),
            batch_busy: self.batch_busy,
            redo_view_open: self.redo_view_open,
            redo_commands: self.redo_commands.clone(),
            redo_progress: self.sweep.as_ref().map(|sweep| RedoProgress {
                started: sweep.started(),
                total: sweep.total(),
                cancelling: sweep.is_cancelled(),
            }),
            single_redo: self.single_redo,
            poll_in_flight: self.poll.in_flight(),
            dirty: self.dirty,
        }
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn take_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn emit(&mut self, event: UiEvent) {
        self.events.push(event);
        self.dirty = true;
    }

    pub(crate) fn redo_list_visible(&self) -> bool {
        self.redo_view_open || self.filter == Filter::Redo
    }

    pub(crate) fn poll_effect(&self) -> Effect {
        Effect::PollCycle {
            limit: self.message_limit,
            include_redo: self.redo_list_visible(),
        }
    }

    /// Explicit refresh: runs now or after the in-flight cycle.
    pub(crate) fn request_poll(&mut self, effects: &mut Vec<Effect>) {
        if self.poll.request() {
            effects.push(self.poll_effect());
        }
    }

    pub(crate) fn notify(
        &mut self,
        text: impl Into<String>,
        severity: Severity,
        effects: &mut Vec<Effect>,
    ) {
        let enqueued = self.notifications.enqueue(text, severity);
        if let Some(evicted) = enqueued.evicted {
            effects.push(Effect::CancelTimer {
                key: TimerKey::NotificationExpiry(evicted),
            });
        }
        effects.push(Effect::StartTimer {
            key: TimerKey::NotificationExpiry(enqueued.id),
            after: NOTIFICATION_TTL,
        });
        self.emit(UiEvent::NotificationsChanged);
    }

    pub(crate) fn batch_busy_mut(&mut self, mode: BatchMode) -> &mut bool {
        match mode {
            BatchMode::All => &mut self.batch_busy.all,
            BatchMode::Compare => &mut self.batch_busy.compare,
        }
    }
}
