//! Save slot: one key-addressed RON blob holding player, missions and achievements.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::achievements::AchievementSave;
use crate::missions::MissionSave;
use crate::player::PlayerSave;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save slot i/o failed at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("save data is corrupt: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not encode save data: {0}")]
    Serialize(#[from] ron::Error),
    #[error("no save found")]
    NotFound,
}

/// Everything written to the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveBlob {
    pub player: PlayerSave,
    pub missions: MissionSave,
    pub achievements: AchievementSave,
    /// RFC 3339, local time.
    pub timestamp: String,
}

impl SaveBlob {
    pub fn new(player: PlayerSave, missions: MissionSave, achievements: AchievementSave) -> Self {
        Self {
            player,
            missions,
            achievements,
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }
}

pub fn encode(blob: &SaveBlob) -> Result<String, SaveError> {
    Ok(ron::ser::to_string_pretty(blob, ron::ser::PrettyConfig::default())?)
}

pub fn decode(data: &str) -> Result<SaveBlob, SaveError> {
    Ok(ron::from_str(data)?)
}

/// Key-addressed string storage.
pub trait SaveStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError>;
    fn write(&mut self, key: &str, data: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str) -> Result<(), SaveError>;

    fn save(&mut self, key: &str, blob: &SaveBlob) -> Result<(), SaveError> {
        let data = encode(blob)?;
        self.write(key, &data)
    }

    /// Read and decode the slot. A corrupt entry is removed and reported as [`SaveError::NotFound`].
    fn load(&mut self, key: &str) -> Result<SaveBlob, SaveError> {
        let data = self.read(key)?.ok_or(SaveError::NotFound)?;
        match decode(&data) {
            Ok(blob) => Ok(blob),
            Err(e) => {
                log::error!("Discarding corrupt save '{}': {}", key, e);
                if let Err(e) = self.remove(key) {
                    log::warn!("Could not remove corrupt save '{}': {}", key, e);
                }
                Err(SaveError::NotFound)
            }
        }
    }
}

/// One `<key>.ron` file per slot under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.ron"))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SaveError + '_ {
    move |source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl SaveStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path)(e)),
        }
    }

    fn write(&mut self, key: &str, data: &str) -> Result<(), SaveError> {
        std::fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("ron.tmp");
        std::fs::write(&tmp, data).map_err(io_error(&tmp))?;
        std::fs::rename(&tmp, &path).map_err(io_error(&path))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path)(e)),
        }
    }
}

/// In-memory slots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, SaveError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, data: &str) -> Result<(), SaveError> {
        self.slots.insert(key.to_string(), data.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SaveError> {
        self.slots.remove(key);
        Ok(())
    }
}
