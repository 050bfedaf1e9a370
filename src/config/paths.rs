//! Path management for finplan
//!
//! ## Path Resolution Order
//!
//! 1. `FINPLAN_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/finplan` or `~/.config/finplan`
//! 3. Windows: `%APPDATA%\finplan`

use std::path::PathBuf;

use crate::error::FinplanError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "FINPLAN_DATA_DIR";

/// Manages all paths used by finplan
#[derive(Debug, Clone)]
pub struct FinplanPaths {
    base_dir: PathBuf,
}

impl FinplanPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FinplanError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Plans store (`<base>/data/plans.json`)
    pub fn plans_file(&self) -> PathBuf {
        self.data_dir().join("plans.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), FinplanError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FinplanError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FinplanError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if finplan has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, FinplanError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                FinplanError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("finplan"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, FinplanError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| FinplanError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("finplan"))
}
