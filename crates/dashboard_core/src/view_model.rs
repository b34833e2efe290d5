use crate::{
    ChartSeries, DashboardStats, DirectoryConfig, Filter, Notification, Projection, RedoCommand,
    RedoId, SweepReport,
};

/// Typed notifications for the rendering layer, drained with
/// `AppState::take_events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PollCompleted { message_count: usize, revision: u64 },
    FilterChanged(Filter),
    ConfigLoaded,
    RedoStepCompleted {
        id: RedoId,
        ok: bool,
        position: usize,
        total: usize,
    },
    RedoSweepFinished(SweepReport),
    NotificationsChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchBusy {
    pub all: bool,
    pub compare: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedoProgress {
    pub started: usize,
    pub total: usize,
    pub cancelling: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub filter: Filter,
    pub items: Projection,
    pub snapshot_revision: u64,
    pub charts: ChartSeries,
    pub stats: DashboardStats,
    pub notifications: Vec<Notification>,
    pub monitor_enabled: bool,
    pub monitor_pending: bool,
    pub config_loaded: bool,
    pub directories: Vec<DirectoryConfig>,
    pub batch_busy: BatchBusy,
    pub redo_view_open: bool,
    pub redo_commands: Vec<RedoCommand>,
    pub redo_progress: Option<RedoProgress>,
    pub single_redo: Option<RedoId>,
    pub poll_in_flight: bool,
    pub dirty: bool,
}
