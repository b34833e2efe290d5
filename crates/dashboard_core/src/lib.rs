//! Dashboard core: pure state machine, projections and chart aggregation.
mod chart;
mod effect;
mod failure;
mod form;
mod model;
mod monitor;
mod msg;
mod notify;
mod poll;
mod projection;
mod redo;
mod state;
mod update;
mod view_model;

pub use chart::{
    aggregate, distribution, stats, ChartSeries, DashboardStats, Distribution, TrendDay,
    TrendPoint,
};
pub use effect::{Effect, TimerKey};
pub use failure::ActionFailure;
pub use form::{ConfigField, ConfigForm, DirectoryField, RowError};
pub use model::{
    BatchMode, BatchRequest, BatchSummary, Config, DirectoryConfig, Filter, Message, MessageId,
    MessageKind, RedoCommand, RedoId, DEFAULT_CACHE_EXPIRY_DAYS, DEFAULT_MAX_RETRIES,
};
pub use monitor::MonitorFlag;
pub use msg::Msg;
pub use notify::{
    Enqueued, Notification, NotificationId, NotificationQueue, Severity, MAX_NOTIFICATIONS,
    NOTIFICATION_TTL,
};
pub use poll::{PollGate, DEFAULT_MESSAGE_LIMIT, POLL_INTERVAL};
pub use projection::{project, project_messages, Projection};
pub use redo::{RedoSweep, SweepReport, SweepStep, REDO_STEP_INTERVAL};
pub use state::{AppState, MessageStore};
pub use update::{update, BATCH_SETTLE_DELAY};
pub use view_model::{AppViewModel, BatchBusy, RedoProgress, UiEvent};
