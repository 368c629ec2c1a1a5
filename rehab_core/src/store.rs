//! Persistence surface for week and session history.
//!
//! The tracker only talks to the `ProgressStore` trait. `JsonFileStore`
//! keeps two JSON files under the data directory with file locking and
//! atomic replacement; `MemoryStore` keeps everything in process.

use crate::types::{clamp_week, SessionRecord, MIN_WEEK};
use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Storage for the values that outlive a process
///
/// A missing value is not an error: `load_week` yields week 1 and
/// `load_history` an empty list. Unreadable or corrupted data is.
pub trait ProgressStore {
    fn load_week(&self) -> Result<u8>;
    fn save_week(&mut self, week: u8) -> Result<()>;
    fn load_history(&self) -> Result<Vec<SessionRecord>>;
    /// Replace the stored history with `records` in full
    fn save_history(&mut self, records: &[SessionRecord]) -> Result<()>;
}

/// On-disk shape of the week file
#[derive(Debug, Serialize, Deserialize)]
struct WeekFile {
    week: u8,
}

/// JSON files under a data directory
pub struct JsonFileStore {
    week_path: PathBuf,
    history_path: PathBuf,
}

impl JsonFileStore {
    pub const WEEK_FILE: &'static str = "state.json";
    pub const HISTORY_FILE: &'static str = "history.json";

    /// Store rooted at `data_dir`; nothing is created until the first save
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            week_path: data_dir.join(Self::WEEK_FILE),
            history_path: data_dir.join(Self::HISTORY_FILE),
        }
    }

    pub fn week_path(&self) -> &Path {
        &self.week_path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }
}

impl ProgressStore for JsonFileStore {
    fn load_week(&self) -> Result<u8> {
        match read_json::<WeekFile>(&self.week_path)? {
            Some(file) => {
                let week = clamp_week(file.week as i64);
                if week != file.week {
                    tracing::warn!("Stored week {} out of range, using {}", file.week, week);
                }
                Ok(week)
            }
            None => {
                tracing::info!("No week file found, starting at week {}", MIN_WEEK);
                Ok(MIN_WEEK)
            }
        }
    }

    fn save_week(&mut self, week: u8) -> Result<()> {
        write_json_atomic(&self.week_path, &WeekFile { week })
    }

    fn load_history(&self) -> Result<Vec<SessionRecord>> {
        let records = read_json::<Vec<SessionRecord>>(&self.history_path)?.unwrap_or_default();
        tracing::debug!("Loaded {} history records", records.len());
        Ok(records)
    }

    fn save_history(&mut self, records: &[SessionRecord]) -> Result<()> {
        write_json_atomic(&self.history_path, records)
    }
}

/// Read a JSON file under a shared lock; `None` if it does not exist
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| Error::Persistence(format!("Failed to parse {:?}: {}", path, e)))
}

/// Atomically replace `path` with the JSON encoding of `value`
///
/// Writes to a temp file in the same directory under an exclusive lock,
/// syncs it, then renames it over the original.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        Error::Persistence(format!("{:?} has no parent directory", path))
    })?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved {:?}", path);
    Ok(())
}

/// In-process store
#[derive(Clone, Debug)]
pub struct MemoryStore {
    pub week: u8,
    pub history: Vec<SessionRecord>,
    fail_saves: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            week: MIN_WEEK,
            history: Vec::new(),
            fail_saves: false,
        }
    }
}

impl MemoryStore {
    /// Store whose saves all fail with `Error::Persistence`; loads still work
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Switch save failures on or off
    pub fn set_failing(&mut self, failing: bool) {
        self.fail_saves = failing;
    }

    pub fn is_failing(&self) -> bool {
        self.fail_saves
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_saves {
            Err(Error::Persistence("memory store is read-only".into()))
        } else {
            Ok(())
        }
    }
}

impl ProgressStore for MemoryStore {
    fn load_week(&self) -> Result<u8> {
        Ok(clamp_week(self.week as i64))
    }

    fn save_week(&mut self, week: u8) -> Result<()> {
        self.check_writable()?;
        self.week = week;
        Ok(())
    }

    fn load_history(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.history.clone())
    }

    fn save_history(&mut self, records: &[SessionRecord]) -> Result<()> {
        self.check_writable()?;
        self.history = records.to_vec();
        Ok(())
    }
}
