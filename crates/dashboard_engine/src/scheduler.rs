use std::time::Duration;

use dashboard_core::Msg;
use engine_logging::{engine_debug, engine_info};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Emits `Msg::PollTick` every `period` until stopped.
///
/// The scheduler only produces ticks; whether a tick starts a fetch is
/// decided by the poll gate in the session state, which drops ticks while a
/// cycle is still in flight.
pub struct SyncScheduler {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SyncScheduler {
    /// Starts ticking. The first tick fires one `period` from now.
    pub fn start(period: Duration, tx: UnboundedSender<Msg>) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            engine_info!("Sync scheduler started with period {:?}", period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        engine_debug!("Sync tick");
                        if tx.send(Msg::PollTick).is_err() {
                            break;
                        }
                    }
                }
            }
            engine_info!("Sync scheduler stopped");
        });

        Self { cancel, handle }
    }

    /// Stops future ticks. A cycle already in flight is left to finish.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
