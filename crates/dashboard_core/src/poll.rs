use std::time::Duration;

/// Period of the background sync cycle.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Server-side `limit` for `GET /api/messages`.
pub const DEFAULT_MESSAGE_LIMIT: usize = 50;

/// At-most-one-in-flight guard for poll cycles.
///
/// Scheduler ticks that land on a busy gate are dropped. Explicit refresh
/// requests are remembered and start as soon as the current cycle ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollGate {
    in_flight: bool,
    queued: bool,
}

impl PollGate {
    pub fn in_flight(self) -> bool {
        self.in_flight
    }

    pub fn queued(self) -> bool {
        self.queued
    }

    /// Scheduler tick: begins a cycle only if none is running.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Explicit refresh: begins now, or queues behind the running cycle.
    pub fn request(&mut self) -> bool {
        if self.in_flight {
            self.queued = true;
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Ends the running cycle. Returns true when a queued refresh was
    /// promoted to a new in-flight cycle.
    pub fn finish(&mut self) -> bool {
        self.in_flight = false;
        if self.queued {
            self.queued = false;
            self.in_flight = true;
            return true;
        }
        false
    }
}
