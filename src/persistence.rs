// File: src/persistence.rs
use crate::core::model::LanguageModel;
use crate::error::{Error, Result};
use crate::learning::FeedbackStore;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const PROFILE_FILE_NAME: &str = "custom_words.json";
pub const SHORTCUTS_FILE_NAME: &str = "shortcuts.json";

/// Flat `{short: full}` map.
pub type ShortcutMap = BTreeMap<String, String>;

/// The learned-words document: `{words: [...], feedback: {...}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub words: BTreeSet<String>,
    #[serde(default)]
    pub feedback: FeedbackStore,
}

/// Where the engine keeps what the user taught it. `Ok(None)` from a load
/// means nothing has been saved yet.
pub trait Store {
    fn load_profile(&self) -> Result<Option<UserProfile>>;
    fn save_profile(&mut self, profile: &UserProfile) -> Result<()>;
    fn load_shortcuts(&self) -> Result<Option<ShortcutMap>>;
    fn save_shortcuts(&mut self, shortcuts: &ShortcutMap) -> Result<()>;
}

/// Two JSON documents on disk, each replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    profile_path: PathBuf,
    shortcuts_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(profile_path: impl Into<PathBuf>, shortcuts_path: impl Into<PathBuf>) -> Self {
        Self {
            profile_path: profile_path.into(),
            shortcuts_path: shortcuts_path.into(),
        }
    }

    /// Uses the default file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(PROFILE_FILE_NAME), dir.join(SHORTCUTS_FILE_NAME))
    }

    pub fn profile_path(&self) -> &Path {
        &self.profile_path
    }

    pub fn shortcuts_path(&self) -> &Path {
        &self.shortcuts_path
    }
}

impl Store for JsonFileStore {
    fn load_profile(&self) -> Result<Option<UserProfile>> {
        read_json(&self.profile_path)
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        write_json_atomic(&self.profile_path, profile)
    }

    fn load_shortcuts(&self) -> Result<Option<ShortcutMap>> {
        read_json(&self.shortcuts_path)
    }

    fn save_shortcuts(&mut self, shortcuts: &ShortcutMap) -> Result<()> {
        write_json_atomic(&self.shortcuts_path, shortcuts)
    }
}

/// Keeps the documents in memory. Nothing touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    profile: Option<UserProfile>,
    shortcuts: Option<ShortcutMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(profile: Option<UserProfile>, shortcuts: Option<ShortcutMap>) -> Self {
        Self { profile, shortcuts }
    }
}

impl Store for MemoryStore {
    fn load_profile(&self) -> Result<Option<UserProfile>> {
        Ok(self.profile.clone())
    }

    fn save_profile(&mut self, profile: &UserProfile) -> Result<()> {
        self.profile = Some(profile.clone());
        Ok(())
    }

    fn load_shortcuts(&self) -> Result<Option<ShortcutMap>> {
        Ok(self.shortcuts.clone())
    }

    fn save_shortcuts(&mut self, shortcuts: &ShortcutMap) -> Result<()> {
        self.shortcuts = Some(shortcuts.clone());
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(Some(serde_json::from_reader(reader)?))
}

fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    write_atomic(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        Ok(())
    })
}

/// Writes through a temporary file in the target's directory, then renames it
/// over the target, so readers never observe a half-written file.
fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&File>) -> Result<()>,
{
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        write(&mut writer)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// Saves the built model in bincode so later starts can skip corpus ingestion.
pub fn save_model_snapshot(model: &LanguageModel, path: &Path) -> Result<()> {
    write_atomic(path, |writer| {
        bincode::serialize_into(&mut *writer, model)?;
        Ok(())
    })
}

pub fn load_model_snapshot(path: &Path) -> Result<LanguageModel> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}
