use crate::{
    ActionFailure, BatchMode, BatchSummary, Config, ConfigField, DirectoryField, Filter, Message,
    NotificationId, RedoCommand, RedoId, TimerKey,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Session start: load config and take the first snapshot.
    Started,
    /// Background scheduler tick.
    PollTick,
    /// Both calls of a sync cycle have finished.
    PollCompleted {
        messages: Result<Vec<Message>, ActionFailure>,
        redo: Option<Result<Vec<RedoCommand>, ActionFailure>>,
    },
    /// User asked to reload config and messages.
    RefreshClicked,
    FilterChanged(Filter),
    ClearMessagesClicked,
    MessagesCleared(Result<(), ActionFailure>),

    ConfigLoaded(Result<Config, ActionFailure>),
    ConfigFieldEdited(ConfigField),
    DirectoryAdded,
    DirectoryRemoved(usize),
    DirectoryEdited {
        index: usize,
        field: DirectoryField,
        value: String,
    },
    SaveConfigClicked,
    ConfigSaved(Result<(), ActionFailure>),
    /// User flipped the monitor switch.
    MonitorToggled(bool),
    MonitorToggleSettled(Result<(), ActionFailure>),

    BatchClicked(BatchMode),
    BatchFinished {
        mode: BatchMode,
        result: Result<BatchSummary, ActionFailure>,
    },

    RedoViewOpened,
    RedoViewClosed,
    RedoCommandsLoaded(Result<Vec<RedoCommand>, ActionFailure>),
    ExecuteRedoClicked(RedoId),
    RedoExecuted {
        id: RedoId,
        result: Result<(), ActionFailure>,
    },
    ProcessAllRedoClicked,
    CancelRedoClicked,

    NotificationDismissed(NotificationId),
    TimerFired(TimerKey),
    /// Fallback for placeholder wiring.
    NoOp,
}
