use std::path::{Path, PathBuf};

use health_demo_lib::{privacy_mode::PrivacyMode, session::{Session, SessionDescription}};

use crate::{asset_reader::{self, SessionAssetReader}, database::db::SessionDatabase, preferences::Preferences, DataManagerError, DATABASE_FILE, DATABASE_PATH, DATA_DIR, FIXTURE_DIR, FIXTURE_PATH, PREFERENCES_FILE, PREFERENCES_PATH};

pub struct DataManager {
    data_dir: PathBuf,
    database: SessionDatabase,
    preferences: Preferences,
}

/// The public interface for all session and preference data.
impl DataManager {
    /// Starts in the `data/` directory of the project root.
    pub async fn start() -> Result<Self, DataManagerError> {
        let root: PathBuf = project_root::get_project_root()
            .map_err(|e| DataManagerError::Io(format!("Failed to locate project root: {}", e)))?;

        Self::open(root.join(DATA_DIR), root.join(DATABASE_PATH), root.join(FIXTURE_PATH), root.join(PREFERENCES_PATH)).await
    }

    /// Mock sessions in `<data_dir>/sessions/` are seeded the first time the database is created.
    pub async fn start_in(data_dir: impl Into<PathBuf>) -> Result<Self, DataManagerError> {
        let data_dir = data_dir.into();
        let database_path = data_dir.join(DATABASE_FILE);
        let fixture_dir = data_dir.join(FIXTURE_DIR);
        let preferences_path = data_dir.join(PREFERENCES_FILE);

        Self::open(data_dir, database_path, fixture_dir, preferences_path).await
    }

    async fn open(data_dir: PathBuf, database_path: PathBuf, fixture_dir: PathBuf, preferences_path: PathBuf) -> Result<Self, DataManagerError> {
        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)
                .map_err(|e| DataManagerError::Io(format!("Failed to create data directory {:?}: {}", data_dir, e)))?;
        }

        let seed = fixture_dir.is_dir().then(|| SessionAssetReader::new(fixture_dir));

        let preferences = Preferences::load(preferences_path)?;
        let database = SessionDatabase::connect(database_path, seed).await?;

        Ok(DataManager {
            data_dir,
            database,
            preferences,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionDescription>, DataManagerError> {
        self.database.list_sessions().await
    }

    pub async fn get_session(&self, id: i64) -> Result<Session, DataManagerError> {
        self.database.get(id).await
    }

    pub async fn add_session(&self, session: &Session) -> Result<(), DataManagerError> {
        self.database.add(session).await
    }

    pub async fn remove_session(&self, id: i64) -> Result<(), DataManagerError> {
        self.database.remove(id).await
    }

    /// Reads a single fixture file and stores it. Returns the new session's id.
    pub async fn import_fixture(&self, path: impl AsRef<Path>) -> Result<i64, DataManagerError> {
        let session = asset_reader::read_session(path)?;
        self.database.add(&session).await?;
        tracing::info!("Imported session {} ({})", session.id, session.session_type);
        Ok(session.id)
    }

    pub fn privacy_mode(&self) -> PrivacyMode {
        self.preferences.privacy_mode()
    }

    pub fn privacy_setup_pending(&self) -> bool {
        self.preferences.setup_pending()
    }

    pub fn set_privacy_mode(&mut self, mode: PrivacyMode) -> Result<(), DataManagerError> {
        self.preferences.set_privacy_mode(mode);
        self.preferences.save()?;
        tracing::info!("Privacy mode set to {} ({})", mode, mode.id());
        Ok(())
    }

    pub async fn close(&mut self) {
        self.database.close().await;
    }
}
