use const_format::concatcp;

pub mod asset_reader;
pub mod database;
mod data_manager;
pub mod preferences;

pub use data_manager::*;

pub const DATA_DIR: &str = "data/";
pub const DATABASE_FILE: &str = "sessions.db";
pub const FIXTURE_DIR: &str = "sessions";
pub const PREFERENCES_FILE: &str = "preferences.json";
pub const DATABASE_PATH: &str = concatcp!(DATA_DIR, DATABASE_FILE);
pub const FIXTURE_PATH: &str = concatcp!(DATA_DIR, FIXTURE_DIR);
pub const PREFERENCES_PATH: &str = concatcp!(DATA_DIR, PREFERENCES_FILE);

#[derive(Debug, thiserror::Error)]
pub enum DataManagerError {
    #[error("session database has no active connection, call open() first")]
    NotConnected,
    #[error("no session with id {0}")]
    NotFound(i64),
    #[error("a session with id {0} already exists")]
    AlreadyExists(i64),
    #[error("database error: {0}")]
    Database(String),
    #[error("could not read session asset: {0}")]
    Asset(String),
    #[error("could not access preferences: {0}")]
    Preferences(String),
    #[error("io error: {0}")]
    Io(String),
}

#[test]
fn default_layout() {
    assert_eq!(DATABASE_PATH, "data/sessions.db");
    assert_eq!(FIXTURE_PATH, "data/sessions");
    assert_eq!(PREFERENCES_PATH, "data/preferences.json");
}
