use crate::{
    ActionFailure, BatchMode, BatchRequest, Config, DirectoryConfig, DEFAULT_CACHE_EXPIRY_DAYS,
    DEFAULT_MAX_RETRIES,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigField {
    TmdbApiKey(String),
    DoubanCookies(String),
    MaxRetries(u32),
    CacheExpiryDays(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryField {
    Name,
    Source,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowError {
    LastRow,
    OutOfRange,
}

/// Editable copy of the server configuration.
///
/// Always holds at least one directory row.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigForm {
    config: Config,
    loaded: bool,
}

impl Default for ConfigForm {
    fn default() -> Self {
        Self {
            config: Config {
                directories: vec![DirectoryConfig::default()],
                ..Config::default()
            },
            loaded: false,
        }
    }
}

impl ConfigForm {
    /// Replaces the form with a freshly loaded config.
    pub fn load(&mut self, mut config: Config) {
        if config.directories.is_empty() {
            config.directories.push(DirectoryConfig::default());
        }
        if config.max_retries == 0 {
            config.max_retries = DEFAULT_MAX_RETRIES;
        }
        if config.cache_expiry_days == 0 {
            config.cache_expiry_days = DEFAULT_CACHE_EXPIRY_DAYS;
        }
        self.config = config;
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rows(&self) -> &[DirectoryConfig] {
        &self.config.directories
    }

    pub fn add_row(&mut self) {
        self.config.directories.push(DirectoryConfig::default());
    }

    pub fn remove_row(&mut self, index: usize) -> Result<(), RowError> {
        if index >= self.config.directories.len() {
            return Err(RowError::OutOfRange);
        }
        if self.config.directories.len() == 1 {
            return Err(RowError::LastRow);
        }
        self.config.directories.remove(index);
        Ok(())
    }

    pub fn edit_row(&mut self, index: usize, field: DirectoryField, value: String) -> bool {
        let Some(row) = self.config.directories.get_mut(index) else {
            return false;
        };
        match field {
            DirectoryField::Name => row.name = value,
            DirectoryField::Source => row.source = value,
            DirectoryField::Target => row.target = value,
        }
        true
    }

    pub fn edit(&mut self, field: ConfigField) {
        match field {
            ConfigField::TmdbApiKey(value) => self.config.tmdb_api_key = value,
            ConfigField::DoubanCookies(value) => self.config.douban_cookies = value,
            ConfigField::MaxRetries(value) => {
                self.config.max_retries = if value == 0 { DEFAULT_MAX_RETRIES } else { value }
            }
            ConfigField::CacheExpiryDays(value) => {
                self.config.cache_expiry_days = if value == 0 {
                    DEFAULT_CACHE_EXPIRY_DAYS
                } else {
                    value
                }
            }
        }
    }

    /// Whole config to save. Only fully populated rows are sent.
    pub fn to_config(&self, monitor_enabled: bool) -> Config {
        let mut config = self.config.clone();
        config.directories.retain(DirectoryConfig::is_fully_populated);
        config.monitor_enabled = monitor_enabled;
        config
    }

    /// Batch request built from the first row only. The name is optional.
    pub fn batch_request(&self, mode: BatchMode) -> Result<BatchRequest, ActionFailure> {
        let Some(first) = self.config.directories.first() else {
            return Err(ActionFailure::Validation(
                "Configure a directory mapping first".to_string(),
            ));
        };
        let source_dir = first.source.trim();
        let target_dir = first.target.trim();
        if source_dir.is_empty() || target_dir.is_empty() {
            return Err(ActionFailure::Validation(
                "Fill in both source and target directories".to_string(),
            ));
        }
        Ok(BatchRequest {
            source_dir: source_dir.to_string(),
            target_dir: target_dir.to_string(),
            mode,
        })
    }
}
