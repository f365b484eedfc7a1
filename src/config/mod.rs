use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::domain::DEFAULT_MONTHLY_GOAL;
use crate::storage::{json_backend::write_atomic, Result};

const APP_DIR_NAME: &str = "doce_gestao";
const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_BACKUP_IDENTIFIER: &str = "delicias_das_marias";
const DEFAULT_REPORT_ROWS_PER_PAGE: usize = 40;

/// Host-level preferences. These never travel inside a backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub backup_identifier: String,
    pub recent_limit: usize,
    pub report_rows_per_page: usize,
    pub default_monthly_goal: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            backup_identifier: DEFAULT_BACKUP_IDENTIFIER.into(),
            recent_limit: crate::core::services::DEFAULT_RECENT_LIMIT,
            report_rows_per_page: DEFAULT_REPORT_ROWS_PER_PAGE,
            default_monthly_goal: DEFAULT_MONTHLY_GOAL,
        }
    }
}

impl Settings {
    /// Explicit `data_dir`, else `<platform data dir>/doce_gestao`, else a
    /// relative `doce_gestao` directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|base| base.join(APP_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(APP_DIR_NAME)),
        }
    }

    /// Goal applied to freshly created documents; invalid values fall back
    /// to the built-in default.
    pub fn effective_monthly_goal(&self) -> f64 {
        if self.default_monthly_goal.is_finite() && self.default_monthly_goal > 0.0 {
            self.default_monthly_goal
        } else {
            DEFAULT_MONTHLY_GOAL
        }
    }
}

pub struct SettingsManager {
    path: PathBuf,
}

impl SettingsManager {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SETTINGS_FILE),
        }
    }

    /// Manager rooted at the platform data directory.
    pub fn default_location() -> Self {
        Self::new(Settings::default().resolved_data_dir())
    }

    pub fn load(&self) -> Result<Settings> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file, using defaults");
                Ok(Settings::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = SettingsManager::new(dir.path());
        let settings = manager.load().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.recent_limit, 5);
        assert_eq!(settings.backup_identifier, "delicias_das_marias");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let manager = SettingsManager::new(dir.path().join("nested"));
        let settings = Settings {
            data_dir: Some(dir.path().join("data")),
            recent_limit: 8,
            ..Settings::default()
        };
        manager.save(&settings).unwrap();
        assert_eq!(manager.load().unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), r#"{"recent_limit": 3}"#).unwrap();
        let settings = SettingsManager::new(dir.path()).load().unwrap();
        assert_eq!(settings.recent_limit, 3);
        assert_eq!(settings.report_rows_per_page, DEFAULT_REPORT_ROWS_PER_PAGE);
    }

    #[test]
    fn invalid_goal_falls_back() {
        let settings = Settings {
            default_monthly_goal: 0.0,
            ..Settings::default()
        };
        assert_eq!(settings.effective_monthly_goal(), DEFAULT_MONTHLY_GOAL);
    }

    #[test]
    fn explicit_data_dir_wins() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/tmp/bakery")),
            ..Settings::default()
        };
        assert_eq!(settings.resolved_data_dir(), PathBuf::from("/tmp/bakery"));
    }
}
