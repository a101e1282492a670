//! On-disk persistence for the roster.
//!
//! The whole roster lives in a single `roster.json` under the platform data
//! directory and is rewritten wholesale on every save. Writes go through a
//! temporary file in the same directory and are renamed into place, so a
//! crash mid-write never leaves a truncated roster behind.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::character::record::CharacterRecord;
use crate::character::roster::{Roster, RosterError};
use crate::core::config::path_display;

pub const ROSTER_FILE_NAME: &str = "roster.json";
const ROSTER_FORMAT_VERSION: u32 = 1;
const EXPORT_FORMAT: &str = "sheetkeep-character";

#[derive(Debug)]
pub enum StoreError {
    /// No platform data directory could be determined.
    NoDataDir,
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
    UnsupportedVersion {
        path: PathBuf,
        version: u32,
    },
    Roster(RosterError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NoDataDir => write!(f, "Could not determine a data directory"),
            StoreError::Read { path, source } => {
                write!(f, "Failed to read {}: {}", path_display(path), source)
            }
            StoreError::Parse { path, source } => {
                write!(f, "Failed to parse {}: {}", path_display(path), source)
            }
            StoreError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path_display(path), source)
            }
            StoreError::Serialize(source) => write!(f, "Failed to serialize roster: {source}"),
            StoreError::UnsupportedVersion { path, version } => write!(
                f,
                "{} was written by a newer version (format {})",
                path_display(path),
                version
            ),
            StoreError::Roster(err) => write!(f, "{err}"),
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::Read { source, .. } => Some(source),
            StoreError::Parse { source, .. } => Some(source),
            StoreError::Write { source, .. } => Some(source),
            StoreError::Serialize(source) => Some(source),
            StoreError::Roster(err) => Some(err),
            StoreError::NoDataDir | StoreError::UnsupportedVersion { .. } => None,
        }
    }
}

impl StoreError {
    /// Whether the failure was a name clash with an existing character.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Roster(RosterError::DuplicateName(_)))
    }
}

impl From<RosterError> for StoreError {
    fn from(err: RosterError) -> Self {
        StoreError::Roster(err)
    }
}

#[derive(Serialize, Deserialize)]
struct RosterFile {
    version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    roster: Roster,
}

#[derive(Serialize, Deserialize)]
struct CharacterExport {
    format: String,
    exported_at: DateTime<Utc>,
    character: CharacterRecord,
}

/// Import accepts our own export envelope or a bare record.
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportPayload {
    Envelope(CharacterExport),
    Bare(CharacterRecord),
}

pub fn default_data_dir() -> Result<PathBuf, StoreError> {
    ProjectDirs::from("org", "sheetkeep", "sheetkeep")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(StoreError::NoDataDir)
}

#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(ROSTER_FILE_NAME))
    }

    /// Store rooted at the configured data dir, or the platform default.
    pub fn open(data_dir: Option<&Path>) -> Result<Self, StoreError> {
        match data_dir {
            Some(dir) => Ok(Self::in_dir(dir)),
            None => Ok(Self::in_dir(&default_data_dir()?)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the roster. A missing file is an empty roster, not an error.
    pub fn load(&self) -> Result<Roster, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no roster file yet");
            return Ok(Roster::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let file: RosterFile =
            serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        if file.version > ROSTER_FORMAT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: self.path.clone(),
                version: file.version,
            });
        }

        debug!(
            path = %self.path.display(),
            characters = file.roster.len(),
            "loaded roster"
        );
        Ok(file.roster)
    }

    pub fn save(&self, roster: &Roster) -> Result<(), StoreError> {
        let file = RosterFile {
            version: ROSTER_FORMAT_VERSION,
            saved_at: Some(Utc::now()),
            roster: roster.clone(),
        };
        let contents = serde_json::to_string_pretty(&file).map_err(StoreError::Serialize)?;
        write_atomically(&self.path, contents.as_bytes())?;
        debug!(
            path = %self.path.display(),
            characters = roster.len(),
            "saved roster"
        );
        Ok(())
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let write_err = |source: std::io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        fs::create_dir_all(dir).map_err(write_err)?;
    }

    let mut temp_file = match parent {
        Some(dir) => NamedTempFile::new_in(dir),
        None => NamedTempFile::new(),
    }
    .map_err(write_err)?;

    temp_file.write_all(contents).map_err(write_err)?;
    temp_file.as_file_mut().sync_all().map_err(write_err)?;
    temp_file
        .persist(path)
        .map_err(|err| write_err(err.error))?;
    Ok(())
}

pub fn export_character(record: &CharacterRecord, path: &Path) -> Result<(), StoreError> {
    let export = CharacterExport {
        format: EXPORT_FORMAT.to_string(),
        exported_at: Utc::now(),
        character: record.clone(),
    };
    let contents = serde_json::to_string_pretty(&export).map_err(StoreError::Serialize)?;
    write_atomically(path, contents.as_bytes())?;
    info!(character = %record.name, path = %path.display(), "exported character");
    Ok(())
}

pub fn read_character(path: &Path) -> Result<CharacterRecord, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let payload: ImportPayload =
        serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(match payload {
        ImportPayload::Envelope(export) => export.character,
        ImportPayload::Bare(record) => record,
    })
}

/// Read a character file into the roster, optionally under a new name.
/// Returns the name the character was stored under.
pub fn import_character(
    roster: &mut Roster,
    path: &Path,
    rename: Option<&str>,
) -> Result<String, StoreError> {
    let mut record = read_character(path)?;
    if let Some(name) = rename {
        record.name = name.to_string();
    }
    let stored = roster.insert(record)?;
    info!(character = %stored.name, path = %path.display(), "imported character");
    Ok(stored.name.clone())
}
