use platte_game::{GameState, GameStorage};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("save name '{0}' may only contain letters, digits, '-' and '_'")]
    InvalidName(String),
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt save {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Saves journeys as pretty-printed JSON files, one per save name.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, save_name: &str) -> Result<PathBuf, StorageError> {
        let valid = !save_name.is_empty()
            && save_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(self.dir.join(format!("{save_name}.json")))
        } else {
            Err(StorageError::InvalidName(save_name.to_string()))
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl GameStorage for JsonFileStorage {
    type Error = StorageError;

    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error> {
        let path = self.path_for(save_name)?;
        fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;
        let json = serde_json::to_string_pretty(game_state).map_err(|source| {
            StorageError::Json {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, json).map_err(io_error(&path))
    }

    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error> {
        let path = self.path_for(save_name)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(&path)(err)),
        };
        GameState::from_snapshot(&raw)
            .map(Some)
            .map_err(|source| StorageError::Json { path, source })
    }

    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
        let path = self.path_for(save_name)?;
        match fs::remove_file(&path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(io_error(&path)(err)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platte_game::{GameEngine, JourneyCfg, JourneySetup};

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "platte-saves-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn saves_load_and_delete() {
        let storage = JsonFileStorage::new(temp_dir("roundtrip"));
        let mut state = GameState::new(&JourneySetup::default(), 31).unwrap();
        state.trail.advance(120);
        state.day = 6;

        storage.save_game("slot_1", &state).unwrap();
        assert!(storage.dir().join("slot_1.json").exists());
        assert_eq!(storage.load_game("slot_1").unwrap(), Some(state));

        storage.delete_save("slot_1").unwrap();
        assert_eq!(storage.load_game("slot_1").unwrap(), None);
        storage.delete_save("slot_1").unwrap();
    }

    #[test]
    fn engine_resumes_from_disk() {
        let engine = GameEngine::new(JsonFileStorage::new(temp_dir("engine")), JourneyCfg::default());
        let session = engine.create_session(&JourneySetup::default(), 77).unwrap();
        engine.save_game("resume-me", session.state()).unwrap();
        let resumed = engine
            .resume_session("resume-me")
            .unwrap()
            .expect("save exists");
        assert_eq!(resumed.state(), session.state());
    }

    #[test]
    fn unsafe_names_and_corrupt_files_are_errors() {
        let dir = temp_dir("bad");
        let storage = JsonFileStorage::new(&dir);
        let state = GameState::new(&JourneySetup::default(), 1).unwrap();
        assert!(matches!(
            storage.save_game("../escape", &state),
            Err(StorageError::InvalidName(_))
        ));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("broken.json"), "{ not json").unwrap();
        assert!(matches!(
            storage.load_game("broken"),
            Err(StorageError::Json { .. })
        ));
    }

    #[test]
    fn hand_edited_trail_position_refuses_to_resume() {
        let dir = temp_dir("edited");
        let engine = GameEngine::new(JsonFileStorage::new(&dir), JourneyCfg::default());
        let session = engine.create_session(&JourneySetup::default(), 5).unwrap();
        engine.save_game("edited", session.state()).unwrap();
        let path = dir.join("edited.json");
        let raw = fs::read_to_string(&path).unwrap();
        fs::write(&path, raw.replace("\"landmark_index\": 0", "\"landmark_index\": 42")).unwrap();

        let err = engine.resume_session("edited").unwrap_err();
        assert!(matches!(
            err,
            platte_game::ResumeError::Storage(StorageError::Json { .. })
        ));
    }
}
