use serde::{Deserialize, Serialize};
#[cfg(feature = "sqlx")]
use sqlx::{prelude::*, sqlite::SqliteRow};

use crate::{measurement::Measurement, session_type::SessionType, summary::SessionSummary};

/// The descriptive part of a session, without its measurements.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionDescription {
    pub id: i64,
    pub session_type: SessionType,
    pub description: String,
}

#[cfg(feature = "sqlx")]
impl FromRow<'_, SqliteRow> for SessionDescription {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let alias: String = row.try_get(1)?;

        Ok(Self {
            id: row.try_get(0)?,
            session_type: SessionType::get(&alias),
            description: row.try_get(2)?,
        })
    }
}

impl SessionDescription {
    pub fn new(id: i64, session_type: SessionType, description: impl Into<String>) -> Self {
        Self {
            id,
            session_type,
            description: description.into(),
        }
    }
}

/// One recorded activity with its measurements in recording order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Session {
    pub id: i64,
    pub session_type: SessionType,
    pub description: String,
    measurements: Vec<Measurement>,
}

impl Session {
    pub fn new(id: i64, session_type: SessionType, description: impl Into<String>) -> Self {
        Self {
            id,
            session_type,
            description: description.into(),
            measurements: Vec::new(),
        }
    }

    pub fn with_measurements(mut self, measurements: Vec<Measurement>) -> Self {
        self.add_all(measurements);
        self
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    pub fn add(&mut self, measurement: Measurement) {
        self.measurements.push(measurement);
    }

    pub fn add_all(&mut self, measurements: impl IntoIterator<Item = Measurement>) {
        self.measurements.extend(measurements);
    }

    pub fn description(&self) -> SessionDescription {
        SessionDescription::new(self.id, self.session_type, self.description.clone())
    }

    /// None for a session without measurements.
    pub fn summary(&self) -> Option<SessionSummary> {
        SessionSummary::from_measurements(&self.measurements)
    }
}

impl From<SessionDescription> for Session {
    fn from(description: SessionDescription) -> Self {
        Session::new(description.id, description.session_type, description.description)
    }
}
