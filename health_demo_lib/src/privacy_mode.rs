use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A user-selected data sharing tier. Only the id is ever persisted.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivacyMode {
    Unknown,
    MaximumData,
    UserDefined,
    MinimumData,
    Obfuscation,
}

impl PrivacyMode {
    pub const ALL: [PrivacyMode; 5] = [
        PrivacyMode::Unknown,
        PrivacyMode::MaximumData,
        PrivacyMode::UserDefined,
        PrivacyMode::MinimumData,
        PrivacyMode::Obfuscation,
    ];

    /// Negative ids are reserved and never offered to the user.
    pub fn id(&self) -> i32 {
        match self {
            PrivacyMode::Unknown => -1,
            PrivacyMode::MaximumData => 0,
            PrivacyMode::UserDefined => 45,
            PrivacyMode::MinimumData => 65,
            PrivacyMode::Obfuscation => 100,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PrivacyMode::Unknown => "Unknown",
            PrivacyMode::MaximumData => "Maximum data",
            PrivacyMode::UserDefined => "User defined",
            PrivacyMode::MinimumData => "Minimum data",
            PrivacyMode::Obfuscation => "Obfuscation",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            PrivacyMode::Unknown => "ic_privacy_mode_unknown",
            PrivacyMode::MaximumData => "ic_privacy_mode_maximum",
            PrivacyMode::UserDefined => "ic_privacy_mode_user",
            PrivacyMode::MinimumData => "ic_privacy_mode_minimum",
            PrivacyMode::Obfuscation => "ic_privacy_mode_obfuscation",
        }
    }

    pub fn from_id(id: i32) -> PrivacyMode {
        Self::ALL
            .into_iter()
            .find(|mode| mode.id() == id)
            .unwrap_or(PrivacyMode::Unknown)
    }

    pub fn user_modes() -> Vec<PrivacyMode> {
        Self::ALL.into_iter().filter(|mode| mode.id() >= 0).collect()
    }
}

impl Display for PrivacyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
