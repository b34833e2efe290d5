use std::collections::HashMap;
use std::time::Duration;

use dashboard_core::{Msg, TimerKey};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Keyed one-shot timers reporting back as `Msg::TimerFired`.
///
/// Starting a key that is already armed re-arms it; cancelling aborts the
/// sleeping task so it never reports.
#[derive(Default)]
pub struct TimerRegistry {
    armed: HashMap<TimerKey, JoinHandle<()>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, key: TimerKey, after: Duration, tx: UnboundedSender<Msg>) {
        self.armed.retain(|_, handle| !handle.is_finished());
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(Msg::TimerFired(key));
        });
        if let Some(previous) = self.armed.insert(key, handle) {
            previous.abort();
        }
    }

    pub fn cancel(&mut self, key: TimerKey) {
        if let Some(handle) = self.armed.remove(&key) {
            handle.abort();
        }
    }

    /// Timers that have not fired or been cancelled yet.
    pub fn pending(&self) -> usize {
        self.armed
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

impl Drop for TimerRegistry {
    fn drop(&mut self) {
        for handle in self.armed.values() {
            handle.abort();
        }
    }
}
