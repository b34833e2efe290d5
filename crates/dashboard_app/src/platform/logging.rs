//! Logger setup for dashboard_app.
//!
//! Writes to `./dashboard.log` in the current working directory unless the
//! settings ask for terminal output only.

use std::path::Path;

use log::LevelFilter;

use super::settings::LogTarget;

pub(crate) const LOG_FILENAME: &str = "dashboard.log";

pub(crate) fn initialize(target: LogTarget) {
    engine_logging::initialize(target.into(), Path::new(LOG_FILENAME), LevelFilter::Info);
}
