use std::time::Duration;

use crate::RedoId;

/// Minimum spacing between the starts of two sweep steps.
pub const REDO_STEP_INTERVAL: Duration = Duration::from_secs(1);

/// What the caller must do after feeding the sweep an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStep {
    /// Execute this command and arm the step timer.
    Execute(RedoId),
    /// Waiting on the in-flight response or the step timer.
    Wait,
    Finished(SweepReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepReport {
    pub total: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Sequential best-effort replay of a fixed list of redo commands.
///
/// A step starts only when the previous response has arrived and the step
/// timer has fired, so two commands are never in flight together. Failures
/// do not stop the sweep; cancellation is honored between steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedoSweep {
    queue: Vec<RedoId>,
    next: usize,
    in_flight: Option<RedoId>,
    step_due: bool,
    cancelled: bool,
    succeeded: usize,
    failed: usize,
}

impl RedoSweep {
    /// Snapshots `ids` and returns the first command to execute.
    pub fn start(ids: Vec<RedoId>) -> Option<(Self, RedoId)> {
        let first = *ids.first()?;
        let sweep = Self {
            queue: ids,
            next: 1,
            in_flight: Some(first),
            step_due: false,
            cancelled: false,
            succeeded: 0,
            failed: 0,
        };
        Some((sweep, first))
    }

    pub fn in_flight(&self) -> Option<RedoId> {
        self.in_flight
    }

    pub fn total(&self) -> usize {
        self.queue.len()
    }

    /// Number of commands started so far, including the in-flight one.
    pub fn started(&self) -> usize {
        self.next
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Records the response for `id`. Responses for other ids are ignored.
    pub fn on_result(&mut self, id: RedoId, ok: bool) -> SweepStep {
        if self.in_flight != Some(id) {
            return SweepStep::Wait;
        }
        self.in_flight = None;
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.advance()
    }

    pub fn on_step_due(&mut self) -> SweepStep {
        self.step_due = true;
        self.advance()
    }

    pub fn cancel(&mut self) -> SweepStep {
        self.cancelled = true;
        self.advance()
    }

    fn advance(&mut self) -> SweepStep {
        if self.in_flight.is_some() {
            return SweepStep::Wait;
        }
        if self.cancelled || self.next >= self.queue.len() {
            // The last step still honors its spacing before the sweep closes.
            if self.cancelled || self.step_due {
                return SweepStep::Finished(self.report());
            }
            return SweepStep::Wait;
        }
        if !self.step_due {
            return SweepStep::Wait;
        }
        let id = self.queue[self.next];
        self.next += 1;
        self.in_flight = Some(id);
        self.step_due = false;
        SweepStep::Execute(id)
    }

    fn report(&self) -> SweepReport {
        let attempted = self.succeeded + self.failed;
        SweepReport {
            total: self.queue.len(),
            attempted,
            succeeded: self.succeeded,
            failed: self.failed,
            cancelled: self.cancelled && attempted < self.queue.len(),
        }
    }
}
