use std::path::{Path, PathBuf};

use health_demo_lib::privacy_mode::PrivacyMode;
use serde::{Deserialize, Serialize};

use crate::DataManagerError;

/// The user's scalar preferences, stored as a small JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(skip)]
    path: PathBuf,
    privacy_setup_pending: bool,
    privacy_last_mode_id: i32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            privacy_setup_pending: true,
            privacy_last_mode_id: PrivacyMode::Unknown.id(),
        }
    }
}

impl Preferences {
    /// A missing file yields the defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, DataManagerError> {
        let path = path.into();

        let mut preferences = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| DataManagerError::Preferences(format!("Failed to read {:?}: {}", path, e)))?;
            serde_json::from_str::<Preferences>(&content)
                .map_err(|e| DataManagerError::Preferences(format!("Malformed preferences in {:?}: {}", path, e)))?
        } else {
            Preferences::default()
        };

        preferences.path = path;
        Ok(preferences)
    }

    pub fn save(&self) -> Result<(), DataManagerError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DataManagerError::Preferences(format!("Failed to serialize preferences: {}", e)))?;

        std::fs::write(&self.path, content)
            .map_err(|e| DataManagerError::Preferences(format!("Failed to write {:?}: {}", self.path, e)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn setup_pending(&self) -> bool {
        self.privacy_setup_pending
    }

    pub fn set_setup_pending(&mut self, pending: bool) {
        self.privacy_setup_pending = pending;
    }

    /// Stored ids that no longer name a mode read as `PrivacyMode::Unknown`.
    pub fn privacy_mode(&self) -> PrivacyMode {
        PrivacyMode::from_id(self.privacy_last_mode_id)
    }

    /// Choosing a mode completes the privacy setup.
    pub fn set_privacy_mode(&mut self, mode: PrivacyMode) {
        self.privacy_last_mode_id = mode.id();
        self.privacy_setup_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let preferences = Preferences::load(dir.path().join("preferences.json")).unwrap();

        assert!(preferences.setup_pending());
        assert_eq!(preferences.privacy_mode(), PrivacyMode::Unknown);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");

        let mut preferences = Preferences::load(&path).unwrap();
        preferences.set_privacy_mode(PrivacyMode::MinimumData);
        preferences.save().unwrap();

        let loaded = Preferences::load(&path).unwrap();
        assert_eq!(loaded, preferences);
        assert!(!loaded.setup_pending());
        assert_eq!(loaded.privacy_mode(), PrivacyMode::MinimumData);
    }

    #[test]
    fn unknown_stored_id_reads_as_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, r#"{ "privacy_last_mode_id": 12 }"#).unwrap();

        let preferences = Preferences::load(&path).unwrap();
        assert_eq!(preferences.privacy_mode(), PrivacyMode::Unknown);
        assert!(preferences.setup_pending());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{ privacy").unwrap();

        assert!(matches!(Preferences::load(&path), Err(DataManagerError::Preferences(_))));
    }
}
