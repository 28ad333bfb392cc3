//! Workspace context: where the tracker keeps its data, exports and outbox.

use crate::config::PlanboardConfig;
use std::path::PathBuf;

/// Name of the per-workspace data directory used for discovery
pub const DATA_DIR_NAME: &str = ".planboard";

/// Resolved locations for one tracker workspace
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Workspace root path
    pub root_path: PathBuf,
    /// Directory holding the collection files and log (absolute path)
    pub data_directory: PathBuf,
    /// Directory receiving exports (absolute path)
    pub export_directory: PathBuf,
    /// Notification outbox file (absolute path)
    pub outbox_path: PathBuf,
    /// Loaded configuration
    pub config: PlanboardConfig,
}

impl Workspace {
    /// Create a new Workspace from a root path and configuration
    pub fn new(root_path: PathBuf, config: PlanboardConfig) -> Self {
        let data_directory = root_path.join(&config.storage.data_dir);
        let export_directory = root_path.join(&config.export.directory);
        let outbox_path = data_directory.join(&config.notifications.outbox);

        Self {
            root_path,
            data_directory,
            export_directory,
            outbox_path,
            config,
        }
    }

    /// Discover the workspace root by walking up from the current directory
    pub fn discover(start_path: Option<PathBuf>) -> Option<PathBuf> {
        let start = start_path
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let mut current = start.as_path();
        loop {
            if current.join(DATA_DIR_NAME).is_dir() || current.join(".planboard.toml").is_file() {
                return Some(current.to_path_buf());
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    /// Ensure the data directory exists
    pub fn ensure_data_directory(&self) -> std::io::Result<()> {
        if !self.data_directory.exists() {
            std::fs::create_dir_all(&self.data_directory)?;
        }
        Ok(())
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_directory.join("planboard.log")
    }
}
