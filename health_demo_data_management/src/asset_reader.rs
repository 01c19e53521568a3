use std::path::{Path, PathBuf};

use health_demo_lib::{measurement::Measurement, session::Session, session_type::SessionType};
use serde::Deserialize;

use crate::DataManagerError;

const EXTENSION: &str = "json";

#[derive(Deserialize)]
struct SessionFixture {
    id: Option<i64>,
    #[serde(rename = "type", default)]
    session_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    measurements: Vec<Measurement>,
}

/// Reads mock sessions from a directory of JSON fixture files.
///
/// A fixture's id comes from its `id` field, or from its file name (`12.json` is session 12).
#[derive(Debug, Clone)]
pub struct SessionAssetReader {
    directory: PathBuf,
}

impl SessionAssetReader {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn read_all(&self) -> Result<Vec<Session>, DataManagerError> {
        let entries = self.directory.read_dir()
            .map_err(|e| DataManagerError::Asset(format!("Failed to read fixture directory {:?}: {}", self.directory, e)))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map(|entry| entry.path())
                .map_err(|e| DataManagerError::Asset(format!("Failed to read fixture directory {:?}: {}", self.directory, e)))?;

            if path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| read_session(path)).collect()
    }
}

pub fn read_session(path: impl AsRef<Path>) -> Result<Session, DataManagerError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| DataManagerError::Asset(format!("Failed to open {:?}: {}", path, e)))?;

    let fixture: SessionFixture = serde_json::from_str(&content)
        .map_err(|e| DataManagerError::Asset(format!("Malformed session file {:?}: {}", path, e)))?;

    let Some(id) = fixture.id.or_else(|| file_name_to_id(path)) else {
        return Err(DataManagerError::Asset(format!("Session file has no id and an illegal name: {:?}", path)));
    };

    Ok(Session::new(id, SessionType::get(&fixture.session_type), fixture.description)
        .with_measurements(fixture.measurements))
}

fn file_name_to_id(path: &Path) -> Option<i64> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse::<i64>().ok())
}
