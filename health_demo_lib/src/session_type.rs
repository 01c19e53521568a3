use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Default,
    Walk,
    Run,
    Bicycle,
}

impl SessionType {
    pub const ALL: [SessionType; 4] = [SessionType::Default, SessionType::Walk, SessionType::Run, SessionType::Bicycle];

    /// Stable alias used in fixtures and in the database.
    pub fn alias(&self) -> &'static str {
        match self {
            SessionType::Default => "default",
            SessionType::Walk => "walk",
            SessionType::Run => "run",
            SessionType::Bicycle => "bicycle",
        }
    }

    pub fn display_text(&self) -> &'static str {
        match self {
            SessionType::Default => "Workout",
            SessionType::Walk => "Walk",
            SessionType::Run => "Run",
            SessionType::Bicycle => "Bike ride",
        }
    }

    /// Unknown aliases fall back to `SessionType::Default`.
    pub fn get(alias: &str) -> SessionType {
        Self::ALL
            .into_iter()
            .find(|session_type| session_type.alias() == alias)
            .unwrap_or_default()
    }
}

impl Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_text())
    }
}
