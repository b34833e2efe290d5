use std::sync::Arc;
use std::time::Duration;

use dashboard_core::{update, AppState, AppViewModel, Msg, UiEvent};
use engine_logging::engine_debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{DashboardApi, EffectRunner, SyncScheduler};

/// Owns the dashboard state and drives it: messages go through `update`,
/// effects go to the runner, completions come back on the same channel.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    msg_tx: UnboundedSender<Msg>,
    msg_rx: UnboundedReceiver<Msg>,
    scheduler: Option<SyncScheduler>,
}

impl Session {
    pub fn new(api: Arc<dyn DashboardApi>, message_limit: usize) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::with_message_limit(message_limit),
            runner: EffectRunner::new(api, msg_tx.clone()),
            msg_tx,
            msg_rx,
            scheduler: None,
        }
    }

    /// Handle for feeding user input into the session from other tasks.
    pub fn sender(&self) -> UnboundedSender<Msg> {
        self.msg_tx.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn dispatch(&mut self, msg: Msg) {
        engine_debug!("Dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (next, effects) = update(state, msg);
        self.state = next;
        self.runner.run(effects);
    }

    /// Waits for the next message and applies it. Returns `false` once every
    /// sender is gone, which cannot happen while the session holds its own.
    pub async fn next(&mut self) -> bool {
        match self.msg_rx.recv().await {
            Some(msg) => {
                self.dispatch(msg);
                true
            }
            None => false,
        }
    }

    /// Applies every message that is already queued without waiting.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
            applied += 1;
        }
        applied
    }

    /// Loads config, runs the first poll and starts periodic sync.
    pub fn start(&mut self, period: Duration) {
        self.dispatch(Msg::Started);
        self.scheduler = Some(SyncScheduler::start(period, self.msg_tx.clone()));
    }

    pub fn stop(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.scheduler
            .as_ref()
            .is_some_and(SyncScheduler::is_running)
    }

    pub fn pending_timers(&self) -> usize {
        self.runner.pending_timers()
    }

    pub fn take_events(&mut self) -> Vec<UiEvent> {
        self.state.take_events()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }
}
