use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::model::{ExpiryPolicy, SortBy, SortOrder, SortSpec};

static SETTINGS_FILE_NAME: &str = "settings.json";
static LOG_FILE_NAME: &str = "qcd.log";
static ENV_DATA_DIR: &str = "QCD_DATA_DIR";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "quick-countdown", "qcd"));

/// User preferences read from `settings.json` in the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub expiry_policy: ExpiryPolicy,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub allow_multiple_instances: bool,
}

impl Settings {
    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort_by, self.sort_order)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("unable to read settings file {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str::<Settings>(content).map_err(|err| {
            let line = err.line();
            let column = err.column();
            anyhow!("invalid settings JSON at line {line}, column {column}: {err}")
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    data_dir: PathBuf,
    settings: Settings,
}

impl AppConfig {
    /// Construct [`AppConfig`] by resolving the data directory using the provided override,
    /// environment variables, and platform defaults.
    pub fn discover(data_dir_override: Option<PathBuf>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir_override)?;
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory at {}", data_dir.display())
            })?;
        }
        Self::from_data_dir(data_dir)
    }

    /// Construct [`AppConfig`] directly from a resolved data directory, loading
    /// `settings.json` when present.
    pub fn from_data_dir(data_dir: PathBuf) -> Result<Self> {
        let settings = Settings::load(&data_dir.join(SETTINGS_FILE_NAME))?;
        Ok(Self { data_dir, settings })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    /// Lock file scoped to the current user, e.g. `quick-countdown-alice.lock`.
    pub fn lock_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("quick-countdown-{}.lock", current_user()))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

fn current_user() -> String {
    let raw = env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_else(|_| String::from("default"));
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        String::from("default")
    } else {
        cleaned
    }
}

fn resolve_data_dir(data_dir_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = data_dir_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_DATA_DIR) {
        return Ok(PathBuf::from(env_dir));
    }

    if cfg!(debug_assertions) {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let dev_dir = manifest_dir.join("..").join("tmp").join("dev-qcd");
        return Ok(dev_dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(base) = BaseDirs::new() {
            return Ok(base.home_dir().join(".qcd"));
        }
    }

    if let Some(project) = &*PROJECT_DIRS {
        return Ok(project.data_dir().to_path_buf());
    }

    if let Some(base) = BaseDirs::new() {
        return Ok(base.home_dir().join(".qcd"));
    }

    Ok(env::current_dir()?.join(".qcd"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_settings_file_uses_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        assert_eq!(*config.settings(), Settings::default());
        assert_eq!(config.settings().expiry_policy, ExpiryPolicy::Retain);
        assert_eq!(config.settings().sort_order, SortOrder::Descending);
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings = Settings::parse(r#"{ "expiry_policy": "remove", "sort_by": "remaining_time" }"#)
            .expect("valid settings");
        assert_eq!(settings.expiry_policy, ExpiryPolicy::Remove);
        assert_eq!(settings.sort_by, SortBy::RemainingTime);
        assert_eq!(settings.sort_order, SortOrder::Descending);
        assert!(!settings.allow_multiple_instances);
    }

    #[test]
    fn invalid_settings_report_position() {
        let err = Settings::parse("{ \"expiry_policy\": ").expect_err("invalid json");
        assert!(err.to_string().contains("invalid settings JSON at line 1"));
    }

    #[test]
    fn settings_file_is_loaded_from_data_dir() {
        let dir = TempDir::new().expect("temp dir");
        std::fs::write(
            dir.path().join(SETTINGS_FILE_NAME),
            r#"{ "sort_order": "ascending", "allow_multiple_instances": true }"#,
        )
        .expect("write settings");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        assert_eq!(config.settings().sort_order, SortOrder::Ascending);
        assert!(config.settings().allow_multiple_instances);
        assert!(config
            .lock_path()
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("quick-countdown-") && name.ends_with(".lock")));
    }
}
