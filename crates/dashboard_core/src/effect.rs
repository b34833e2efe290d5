use std::time::Duration;

use crate::{BatchMode, BatchRequest, Config, MessageKind, NotificationId, RedoId};

/// IO the engine must perform on behalf of `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// One sync cycle: the message snapshot, plus the redo list when shown.
    PollCycle { limit: usize, include_redo: bool },
    LoadConfig,
    SaveConfig(Config),
    ToggleMonitor { enabled: bool },
    RunBatch(BatchRequest),
    ClearMessages { kind: Option<MessageKind> },
    FetchRedoCommands,
    ExecuteRedo { id: RedoId },
    /// Arms (or re-arms) the timer; it reports back as `Msg::TimerFired`.
    StartTimer { key: TimerKey, after: Duration },
    CancelTimer { key: TimerKey },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    NotificationExpiry(NotificationId),
    BatchSettle(BatchMode),
    RedoStep,
}
