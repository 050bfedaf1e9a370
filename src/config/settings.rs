//! User settings for finplan
//!
//! Currency display, the catch-all policy the reconciler uses, and whether a
//! surplus needs explicit confirmation before it is submitted.

use serde::{Deserialize, Serialize};

use super::paths::FinplanPaths;
use crate::error::FinplanError;
use crate::reconcile::DEFAULT_CATCH_ALL_NAMES;

/// Categories a new plan's edit form starts with
pub const STARTER_CATEGORIES: &[&str] = &["Housing", "Food", "Transport", "Entertainment", "Other"];

/// User settings for finplan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Category names that receive unallocated income, in preference order
    #[serde(default = "default_catch_all_names")]
    pub catch_all_names: Vec<String>,

    /// Create the catch-all category when an edit doesn't include one
    #[serde(default)]
    pub create_catch_all: bool,

    /// Refuse to submit a surplus reconciliation without confirmation
    #[serde(default = "default_true")]
    pub confirm_under_allocation: bool,

    #[serde(default = "default_starter_categories")]
    pub starter_categories: Vec<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_catch_all_names() -> Vec<String> {
    DEFAULT_CATCH_ALL_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_starter_categories() -> Vec<String> {
    STARTER_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            catch_all_names: default_catch_all_names(),
            create_catch_all: false,
            confirm_under_allocation: true,
            starter_categories: default_starter_categories(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FinplanPaths) -> Result<Self, FinplanError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| FinplanError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FinplanError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinplanPaths) -> Result<(), FinplanError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FinplanError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| FinplanError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the reconciler cannot work with
    pub fn validate(&self) -> Result<(), FinplanError> {
        if self.create_catch_all && self.catch_all_names.is_empty() {
            return Err(FinplanError::Config(
                "create_catch_all requires at least one catch_all_names entry".into(),
            ));
        }
        if self.catch_all_names.iter().any(|n| n.trim().is_empty()) {
            return Err(FinplanError::Config(
                "catch_all_names cannot contain blank names".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.catch_all_names, vec!["Other", "Otros"]);
        assert!(!settings.create_catch_all);
        assert!(settings.confirm_under_allocation);
        assert_eq!(settings.starter_categories.len(), 5);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinplanPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            create_catch_all: true,
            confirm_under_allocation: false,
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(loaded.create_catch_all);
        assert!(!loaded.confirm_under_allocation);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.catch_all_names, vec!["Other", "Otros"]);
        assert!(settings.confirm_under_allocation);
    }

    #[test]
    fn test_invalid_catch_all_config_rejected() {
        let settings = Settings {
            catch_all_names: Vec::new(),
            create_catch_all: true,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
