use std::path::{Path, PathBuf};

use const_format::concatcp;
use health_demo_lib::{measurement::Measurement, session::{Session, SessionDescription}};
use sqlx::{query, query_as, sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Executor, Pool, Sqlite, SqliteConnection};

use crate::{asset_reader::SessionAssetReader, DataManagerError};

use super::constants::*;

/// Session storage with one metadata table and one measurement table per session.
///
/// Every operation fails with [`DataManagerError::NotConnected`] while the database is closed.
pub struct SessionDatabase {
    path: PathBuf,
    seed: Option<SessionAssetReader>,
    pool: Option<Pool<Sqlite>>,
}

impl SessionDatabase {
    pub fn new(path: impl Into<PathBuf>, seed: Option<SessionAssetReader>) -> Self {
        Self {
            path: path.into(),
            seed,
            pool: None,
        }
    }

    /// Creates the database and opens a connection right away.
    pub async fn connect(path: impl Into<PathBuf>, seed: Option<SessionAssetReader>) -> Result<Self, DataManagerError> {
        let mut db = Self::new(path, seed);
        db.open().await?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.pool.is_some()
    }

    pub async fn open(&mut self) -> Result<(), DataManagerError> {
        if self.pool.is_some() {
            return Ok(());
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options).await
            .map_err(|e| DataManagerError::Database(format!("Failed to connect to database {:?}: {}", self.path, e)))?;

        if !Self::is_initialized(&pool).await? {
            self.init(&pool).await?;
        }

        tracing::info!("Opened session database {:?}", self.path);
        self.pool = Some(pool);
        Ok(())
    }

    /// Closing an already closed database does nothing.
    pub async fn close(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.close().await;
            tracing::debug!("Closed session database {:?}", self.path);
        }
    }

    fn pool(&self) -> Result<&Pool<Sqlite>, DataManagerError> {
        self.pool.as_ref().ok_or(DataManagerError::NotConnected)
    }

    async fn is_initialized(pool: &Pool<Sqlite>) -> Result<bool, DataManagerError> {
        query("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .bind(SESSIONS_TABLE_NAME)
            .fetch_optional(pool).await
            .map_err(|e| DataManagerError::Database(format!("Failed to inspect schema: {}", e)))
            .map(|row| row.is_some())
    }

    async fn init(&self, pool: &Pool<Sqlite>) -> Result<(), DataManagerError> {
        pool.execute(concatcp!("
            CREATE TABLE ", SESSIONS_TABLE_NAME, "(",
                SESSION_ID,          " INTEGER NOT NULL PRIMARY KEY,",
                SESSION_TYPE,        " TEXT NOT NULL,",
                SESSION_DESCRIPTION, " TEXT NOT NULL
            )")).await
            .map_err(|e| DataManagerError::Database(format!("Failed to create sessions table: {}", e)))?;

        if let Some(reader) = &self.seed {
            Self::seed(pool, reader).await;
        }

        Ok(())
    }

    /// Failures are logged and leave the store with whatever was added so far.
    async fn seed(pool: &Pool<Sqlite>, reader: &SessionAssetReader) {
        let sessions = match reader.read_all() {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::error!("Unable to read mockup data from {:?}: {}", reader.directory(), e);
                return;
            }
        };

        let mut seeded = 0;
        for session in &sessions {
            match Self::insert(pool, session).await {
                Ok(()) => seeded += 1,
                Err(e) => tracing::error!("Unable to seed session {}: {}", session.id, e),
            }
        }

        tracing::info!("Seeded {} of {} sessions from {:?}", seeded, sessions.len(), reader.directory());
    }

    pub async fn list_sessions(&self) -> Result<Vec<SessionDescription>, DataManagerError> {
        query_as::<_, SessionDescription>(concatcp!("SELECT * FROM ", SESSIONS_TABLE_NAME))
            .fetch_all(self.pool()?).await
            .map_err(|e| DataManagerError::Database(format!("Failed to list sessions: {}", e)))
    }

    pub async fn contains(&self, id: i64) -> Result<bool, DataManagerError> {
        query(concatcp!("SELECT 1 FROM ", SESSIONS_TABLE_NAME, " WHERE ", SESSION_ID, " = ?1"))
            .bind(id)
            .fetch_optional(self.pool()?).await
            .map_err(|e| DataManagerError::Database(format!("Failed to look up session {}: {}", id, e)))
            .map(|row| row.is_some())
    }

    pub async fn get(&self, id: i64) -> Result<Session, DataManagerError> {
        let pool = self.pool()?;

        let description = query_as::<_, SessionDescription>(concatcp!("SELECT * FROM ", SESSIONS_TABLE_NAME, " WHERE ", SESSION_ID, " = ?1"))
            .bind(id)
            .fetch_optional(pool).await
            .map_err(|e| DataManagerError::Database(format!("Failed to get session {}: {}", id, e)))?
            .ok_or(DataManagerError::NotFound(id))?;

        let sql = format!("SELECT * FROM {} ORDER BY {}", table_name(id), ID);
        let measurements = query_as::<_, Measurement>(&sql)
            .fetch_all(pool).await
            .map_err(|e| DataManagerError::Database(format!("Failed to get measurements of session {}: {}", id, e)))?;

        tracing::debug!("Read session {} with {} measurements", id, measurements.len());

        Ok(Session::from(description).with_measurements(measurements))
    }

    /// Adding an id that is already stored fails with [`DataManagerError::AlreadyExists`] and changes nothing.
    pub async fn add(&self, session: &Session) -> Result<(), DataManagerError> {
        Self::insert(self.pool()?, session).await?;
        tracing::debug!("Added session {} with {} measurements", session.id, session.measurements().len());
        Ok(())
    }

    async fn insert(pool: &Pool<Sqlite>, session: &Session) -> Result<(), DataManagerError> {
        let mut tx = pool.begin().await
            .map_err(|e| DataManagerError::Database(format!("Failed to begin transaction: {}", e)))?;

        Self::insert_measurements(&mut tx, session).await?;

        query(concatcp!("
            INSERT INTO ", SESSIONS_TABLE_NAME, "(", SESSION_ID, ", ", SESSION_TYPE, ", ", SESSION_DESCRIPTION, ")
            VALUES (?1, ?2, ?3)"))
                .bind(session.id)
                .bind(session.session_type.alias())
                .bind(&session.description)
                .execute(&mut *tx).await
                .map_err(|e| match e.as_database_error() {
                    Some(db_error) if db_error.is_unique_violation() => DataManagerError::AlreadyExists(session.id),
                    _ => DataManagerError::Database(format!("Failed to insert session {}: {}", session.id, e)),
                })?;

        tx.commit().await
            .map_err(|e| DataManagerError::Database(format!("Failed to commit session {}: {}", session.id, e)))
    }

    async fn insert_measurements(conn: &mut SqliteConnection, session: &Session) -> Result<(), DataManagerError> {
        let table = table_name(session.id);

        let create = format!("
            CREATE TABLE IF NOT EXISTS {table} (
                {ID}        INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
                {TIMESTAMP} TEXT NOT NULL,
                {LATITUDE}  REAL NOT NULL,
                {LONGITUDE} REAL NOT NULL,
                {HEARTRATE} INTEGER NOT NULL
            )");
        query(&create)
            .execute(&mut *conn).await
            .map_err(|e| DataManagerError::Database(format!("Failed to create table {}: {}", table, e)))?;

        let insert = format!("INSERT INTO {table} ({TIMESTAMP}, {LATITUDE}, {LONGITUDE}, {HEARTRATE}) VALUES (?1, ?2, ?3, ?4)");
        for measurement in session.measurements() {
            query(&insert)
                .bind(&measurement.timestamp)
                .bind(measurement.latitude)
                .bind(measurement.longitude)
                .bind(measurement.heartrate)
                .execute(&mut *conn).await
                .map_err(|e| DataManagerError::Database(format!("Failed to insert measurement into {}: {}", table, e)))?;
        }

        Ok(())
    }

    pub async fn remove(&self, id: i64) -> Result<(), DataManagerError> {
        let mut tx = self.pool()?.begin().await
            .map_err(|e| DataManagerError::Database(format!("Failed to begin transaction: {}", e)))?;

        let removed = query(concatcp!("DELETE FROM ", SESSIONS_TABLE_NAME, " WHERE ", SESSION_ID, " = ?1"))
            .bind(id)
            .execute(&mut *tx).await
            .map_err(|e| DataManagerError::Database(format!("Failed to remove session {}: {}", id, e)))?
            .rows_affected();

        if removed == 0 {
            return Err(DataManagerError::NotFound(id));
        }

        let drop = format!("DROP TABLE IF EXISTS {}", table_name(id));
        query(&drop)
            .execute(&mut *tx).await
            .map_err(|e| DataManagerError::Database(format!("Failed to drop measurements of session {}: {}", id, e)))?;

        tx.commit().await
            .map_err(|e| DataManagerError::Database(format!("Failed to commit removal of session {}: {}", id, e)))?;

        tracing::debug!("Removed session {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use health_demo_lib::session_type::SessionType;

    use super::*;

    fn run_session(id: i64) -> Session {
        Session::new(id, SessionType::Run, format!("Run {}", id)).with_measurements(vec![
            Measurement::new("2018-08-23T07:00:00Z", 53.5611, 10.0052, 96),
            Measurement::new("2018-08-23T07:00:30Z", 53.5619, 10.0071, 131),
            Measurement::new("2018-08-23T07:01:00Z", 53.5627, 10.0090, 142),
        ])
    }

    #[tokio::test]
    async fn add_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let db = SessionDatabase::connect(dir.path().join("sessions.db"), None).await.unwrap();

        let session = run_session(5);
        db.add(&session).await.unwrap();

        assert_eq!(db.get(5).await.unwrap(), session);
        assert!(db.contains(5).await.unwrap());
        assert!(!db.contains(6).await.unwrap());
    }

    #[tokio::test]
    async fn empty_session_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let db = SessionDatabase::connect(dir.path().join("sessions.db"), None).await.unwrap();

        let session = Session::new(-2, SessionType::Default, "");
        db.add(&session).await.unwrap();

        assert_eq!(db.get(-2).await.unwrap(), session);
    }

    #[tokio::test]
    async fn lists_every_added_session() {
        let dir = tempfile::tempdir().unwrap();
        let db = SessionDatabase::connect(dir.path().join("sessions.db"), None).await.unwrap();

        for id in [3, 1, 2] {
            db.add(&run_session(id)).await.unwrap();
        }

        let mut ids: Vec<i64> = db.list_sessions().await.unwrap().iter().map(|s| s.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let db = SessionDatabase::connect(dir.path().join("sessions.db"), None).await.unwrap();

        let session = run_session(8);
        db.add(&session).await.unwrap();

        let replacement = Session::new(8, SessionType::Walk, "Replacement")
            .with_measurements(vec![Measurement::new("2018-08-24T09:00:00Z", 1.0, 1.0, 70)]);

        assert!(matches!(db.add(&replacement).await, Err(DataManagerError::AlreadyExists(8))));
        assert_eq!(db.get(8).await.unwrap(), session);
        assert_eq!(db.list_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = SessionDatabase::connect(dir.path().join("sessions.db"), None).await.unwrap();

        assert!(matches!(db.get(77).await, Err(DataManagerError::NotFound(77))));
        assert!(matches!(db.remove(77).await, Err(DataManagerError::NotFound(77))));
    }

    #[tokio::test]
    async fn remove_drops_session() {
        let dir = tempfile::tempdir().unwrap();
        let db = SessionDatabase::connect(dir.path().join("sessions.db"), None).await.unwrap();

        db.add(&run_session(1)).await.unwrap();
        db.remove(1).await.unwrap();

        assert!(db.list_sessions().await.unwrap().is_empty());

        // The id is free again
        db.add(&run_session(1)).await.unwrap();
        assert_eq!(db.get(1).await.unwrap().measurements().len(), 3);
    }

    #[tokio::test]
    async fn closed_database_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = SessionDatabase::connect(dir.path().join("sessions.db"), None).await.unwrap();
        db.add(&run_session(1)).await.unwrap();

        db.close().await;
        db.close().await;

        assert!(!db.is_open());
        assert!(matches!(db.list_sessions().await, Err(DataManagerError::NotConnected)));
        assert!(matches!(db.get(1).await, Err(DataManagerError::NotConnected)));
        assert!(matches!(db.add(&run_session(2)).await, Err(DataManagerError::NotConnected)));
        assert!(matches!(db.remove(1).await, Err(DataManagerError::NotConnected)));
        assert!(matches!(db.contains(1).await, Err(DataManagerError::NotConnected)));

        db.open().await.unwrap();
        assert_eq!(db.get(1).await.unwrap(), run_session(1));
    }

    #[tokio::test]
    async fn seeds_only_on_creation() {
        let dir = tempfile::tempdir().unwrap();
        let fixtures = dir.path().join("sessions");
        std::fs::create_dir(&fixtures).unwrap();
        std::fs::write(fixtures.join("1.json"), r#"{
            "type": "walk",
            "description": "Park",
            "measurements": [ { "timestamp": "2018-08-23T07:00:00Z", "latitude": 1.5, "longitude": 2.5, "heartrate": 88 } ]
        }"#).unwrap();
        std::fs::write(fixtures.join("2.json"), r#"{ "type": "bicycle", "description": "Commute" }"#).unwrap();

        let path = dir.path().join("sessions.db");
        let mut db = SessionDatabase::connect(&path, Some(SessionAssetReader::new(&fixtures))).await.unwrap();

        assert_eq!(db.list_sessions().await.unwrap().len(), 2);
        let park = db.get(1).await.unwrap();
        assert_eq!(park.session_type, SessionType::Walk);
        assert_eq!(park.measurements(), &[Measurement::new("2018-08-23T07:00:00Z", 1.5, 2.5, 88)]);

        db.remove(2).await.unwrap();
        db.close().await;

        let db = SessionDatabase::connect(&path, Some(SessionAssetReader::new(&fixtures))).await.unwrap();
        assert_eq!(db.list_sessions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn seed_failure_leaves_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let fixtures = dir.path().join("sessions");
        std::fs::create_dir(&fixtures).unwrap();
        std::fs::write(fixtures.join("1.json"), "{ broken").unwrap();

        let db = SessionDatabase::connect(dir.path().join("sessions.db"), Some(SessionAssetReader::new(&fixtures))).await.unwrap();

        assert!(db.list_sessions().await.unwrap().is_empty());
    }
}
