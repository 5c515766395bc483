//! Settings and hiscore persistence
//!
//! Both documents are small JSON files. Writes go to a temporary file first
//! and are renamed over the old one, so a crash never leaves half a file.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;

use crate::highscores::HighScores;
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("nothing stored under {0}")]
    Missing(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait Storage {
    fn load_settings(&self) -> Result<Settings, StorageError>;
    fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError>;
    fn load_scores(&self) -> Result<HighScores, StorageError>;
    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StorageError>;
}

/// JSON files in one directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    const SETTINGS_FILE: &'static str = "settings.json";
    const SCORES_FILE: &'static str = "hiscores.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read(&self, name: &str) -> Result<String, StorageError> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Err(StorageError::Missing(path.display().to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write(&self, name: &str, json: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let tmp = tmp_path(&path);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

impl Storage for FileStorage {
    fn load_settings(&self) -> Result<Settings, StorageError> {
        let settings = serde_json::from_str(&self.read(Self::SETTINGS_FILE)?)?;
        log::info!("Loaded settings from {}", self.dir.display());
        Ok(settings)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.write(Self::SETTINGS_FILE, &serde_json::to_string_pretty(settings)?)?;
        log::info!("Settings saved");
        Ok(())
    }

    fn load_scores(&self) -> Result<HighScores, StorageError> {
        let mut scores: HighScores = serde_json::from_str(&self.read(Self::SCORES_FILE)?)?;
        scores.normalize();
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StorageError> {
        self.write(Self::SCORES_FILE, &serde_json::to_string_pretty(scores)?)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

/// Contents of a [`MemoryStorage`]
#[derive(Debug, Default)]
pub struct MemoryData {
    pub settings: Option<Settings>,
    pub scores: Option<HighScores>,
    pub settings_saves: u32,
    pub scores_saves: u32,
}

/// In-memory storage; clones share the same data
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Rc<RefCell<MemoryData>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> std::cell::Ref<'_, MemoryData> {
        self.data.borrow()
    }

    pub fn data_mut(&self) -> std::cell::RefMut<'_, MemoryData> {
        self.data.borrow_mut()
    }
}

impl Storage for MemoryStorage {
    fn load_settings(&self) -> Result<Settings, StorageError> {
        self.data
            .borrow()
            .settings
            .clone()
            .ok_or_else(|| StorageError::Missing("settings".to_string()))
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        let mut data = self.data.borrow_mut();
        data.settings = Some(settings.clone());
        data.settings_saves += 1;
        Ok(())
    }

    fn load_scores(&self) -> Result<HighScores, StorageError> {
        self.data
            .borrow()
            .scores
            .clone()
            .ok_or_else(|| StorageError::Missing("hiscores".to_string()))
    }

    fn save_scores(&mut self, scores: &HighScores) -> Result<(), StorageError> {
        let mut data = self.data.borrow_mut();
        data.scores = Some(scores.clone());
        data.scores_saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cyber-snake-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_file_roundtrip_and_missing() {
        let dir = scratch_dir("roundtrip");
        let mut storage = FileStorage::new(&dir);
        assert!(matches!(storage.load_settings(), Err(StorageError::Missing(_))));

        let mut settings = Settings::default();
        settings.sound.music_volume = 99;
        storage.save_settings(&settings).unwrap();
        assert_eq!(storage.load_settings().unwrap(), settings);
        assert!(!dir.join("settings.json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("hiscores.json"), "{ not json").unwrap();
        let storage = FileStorage::new(&dir);
        assert!(matches!(storage.load_scores(), Err(StorageError::Json(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_memory_clones_share_data() {
        let storage = MemoryStorage::new();
        let mut handle = storage.clone();
        handle.save_scores(&HighScores::new()).unwrap();
        assert_eq!(storage.data().scores_saves, 1);
        assert!(storage.load_scores().is_ok());
    }
}
