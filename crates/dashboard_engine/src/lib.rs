//! Dashboard engine: HTTP client, effect execution and sync scheduling.
mod api;
mod persist;
mod runner;
mod scheduler;
mod session;
mod timers;
mod types;

pub use api::{ApiSettings, DashboardApi, ReqwestApi};
pub use persist::{AtomicFileWriter, PersistError};
pub use runner::EffectRunner;
pub use scheduler::SyncScheduler;
pub use session::Session;
pub use timers::TimerRegistry;
pub use types::{ApiError, FailureKind};
