//! Configuration management for planboard.
//!
//! Supports layered configuration: defaults → workspace → user → env

use crate::domain::ProgressPolicy;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanboardConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

impl PlanboardConfig {
    /// Load configuration with hierarchy: defaults → workspace → user → env
    pub fn load(workspace_root: Option<&PathBuf>) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder();

        // 1. Start with defaults
        builder = builder.add_source(
            config::File::from_str(
                include_str!("../default_config.toml"),
                config::FileFormat::Toml,
            )
            .required(false),
        );

        // 2. Workspace config (.planboard.toml in workspace root)
        if let Some(root) = workspace_root {
            let workspace_config = root.join(".planboard.toml");
            if workspace_config.exists() {
                builder = builder.add_source(File::from(workspace_config).required(false));
            }
        }

        // 3. User config (~/.config/planboard/config.toml)
        if let Some(config_dir) = directories::ProjectDirs::from("com", "planboard", "planboard") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        // 4. Environment variables (PLANBOARD__*)
        builder = builder.add_source(
            Environment::with_prefix("PLANBOARD")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("identity.admins")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Load configuration with default settings only
    pub fn load_defaults() -> Self {
        Self::default()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ui.refresh_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "ui.refresh_rate_ms must be greater than zero".to_string(),
            ));
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.data_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Document storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the collection files (relative to workspace root)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".planboard")
}

/// Which view the dashboard opens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartView {
    #[default]
    Dashboard,
    Kanban,
    Table,
    Timeline,
    Gantt,
    Backlog,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// UI refresh rate in milliseconds
    #[serde(default = "default_refresh_rate_ms")]
    pub refresh_rate_ms: u64,
    /// Enable vim-style navigation (j/k/h/l)
    #[serde(default = "default_vim_navigation")]
    pub vim_navigation: bool,
    #[serde(default)]
    pub default_view: StartView,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: default_refresh_rate_ms(),
            vim_navigation: default_vim_navigation(),
            default_view: StartView::default(),
        }
    }
}

fn default_refresh_rate_ms() -> u64 {
    100
}

fn default_vim_navigation() -> bool {
    true
}

/// Who is using the dashboard and who administers it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Current user's email; `$USER` is used when empty
    #[serde(default)]
    pub current_user: String,
    /// Administrator emails
    #[serde(default)]
    pub admins: Vec<String>,
}

/// Notification outbox configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,
    /// Outbox file name inside the data directory
    #[serde(default = "default_outbox")]
    pub outbox: PathBuf,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
            outbox: default_outbox(),
        }
    }
}

fn default_notifications_enabled() -> bool {
    true
}

fn default_outbox() -> PathBuf {
    PathBuf::from("outbox.jsonl")
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving exports (relative to workspace root)
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
        }
    }
}

fn default_export_directory() -> PathBuf {
    PathBuf::from("exports")
}

/// Progress calculation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressConfig {
    #[serde(default)]
    pub policy: ProgressPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PlanboardConfig::default();
        assert_eq!(config.storage.data_dir, PathBuf::from(".planboard"));
        assert_eq!(config.ui.refresh_rate_ms, 100);
        assert!(config.ui.vim_navigation);
        assert_eq!(config.ui.default_view, StartView::Dashboard);
        assert!(config.identity.admins.is_empty());
        assert!(config.notifications.enabled);
        assert_eq!(config.export.directory, PathBuf::from("exports"));
        assert_eq!(config.progress.policy, ProgressPolicy::Stage);
    }

    #[test]
    fn test_workspace_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".planboard.toml"),
            "[identity]\nadmins = [\"jefe@uni.cl\"]\n\n[progress]\npolicy = \"blended\"\n\n[ui]\ndefault_view = \"kanban\"\n",
        )
        .unwrap();

        let root = temp.path().to_path_buf();
        let config = PlanboardConfig::load(Some(&root)).unwrap();
        assert_eq!(config.identity.admins, vec!["jefe@uni.cl".to_string()]);
        assert_eq!(config.progress.policy, ProgressPolicy::Blended);
        assert_eq!(config.ui.default_view, StartView::Kanban);
        assert_eq!(config.ui.refresh_rate_ms, 100);
    }

    #[test]
    fn test_invalid_refresh_rate_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".planboard.toml"),
            "[ui]\nrefresh_rate_ms = 0\n",
        )
        .unwrap();

        let root = temp.path().to_path_buf();
        assert!(matches!(
            PlanboardConfig::load(Some(&root)),
            Err(ConfigError::Invalid(_))
        ));
    }
}
