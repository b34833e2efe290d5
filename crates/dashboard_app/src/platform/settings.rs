use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dashboard_core::{DEFAULT_MESSAGE_LIMIT, POLL_INTERVAL};
use dashboard_engine::{ApiSettings, AtomicFileWriter, PersistError};
use engine_logging::LogDestination;
use serde::{Deserialize, Serialize};

pub(crate) const SETTINGS_FILENAME: &str = "dashboard.ron";
pub(crate) const SERVER_URL_ENV: &str = "DASHBOARD_SERVER_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

/// Local client settings, kept next to the binary's working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DashboardSettings {
    pub server_url: String,
    pub poll_interval_secs: u64,
    pub message_limit: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_destination: LogTarget,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            server_url: api.base_url,
            poll_interval_secs: POLL_INTERVAL.as_secs(),
            message_limit: DEFAULT_MESSAGE_LIMIT,
            connect_timeout_secs: api.connect_timeout.as_secs(),
            request_timeout_secs: api.request_timeout.as_secs(),
            log_destination: LogTarget::File,
        }
    }
}

impl DashboardSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// A non-empty override replaces `server_url`.
    pub fn with_server_override(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|url| !url.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }
        self
    }
}

/// How the settings were obtained; logged once the logger is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingsSource {
    Loaded(PathBuf),
    Created(PathBuf),
    /// Defaults are in use; the text says why.
    Defaults(String),
}

pub(crate) fn load_or_create(dir: &Path) -> (DashboardSettings, SettingsSource) {
    let path = dir.join(SETTINGS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let settings = DashboardSettings::default();
            let source = match save(dir, &settings) {
                Ok(path) => SettingsSource::Created(path),
                Err(err) => SettingsSource::Defaults(format!(
                    "could not write {}: {}",
                    path.display(),
                    err
                )),
            };
            return (settings, source);
        }
        Err(err) => {
            return (
                DashboardSettings::default(),
                SettingsSource::Defaults(format!("could not read {}: {}", path.display(), err)),
            );
        }
    };

    match ron::from_str::<DashboardSettings>(&content) {
        Ok(settings) => (settings, SettingsSource::Loaded(path)),
        Err(err) => (
            DashboardSettings::default(),
            SettingsSource::Defaults(format!("could not parse {}: {}", path.display(), err)),
        ),
    }
}

pub(crate) fn save(dir: &Path, settings: &DashboardSettings) -> Result<PathBuf, PersistError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(settings, pretty)
        .map_err(|err| PersistError::Encode(err.to_string()))?;
    AtomicFileWriter::new(dir).write(SETTINGS_FILENAME, &content)
}
