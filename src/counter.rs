use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::RunError;

/// Source of human facing contract numbers.
pub trait ContractSequence {
    /// Number the next contract would receive. Never fails: an unreadable
    /// store counts as no contracts issued so far.
    fn load_next(&self) -> u64;

    fn save(&self, number: u64) -> Result<(), RunError>;

    fn issue(&self) -> Result<u64, RunError> {
        let number = self.load_next();
        self.save(number)?;
        Ok(number)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
struct CounterState {
    #[serde(default)]
    last_number: u64,
}

/// Counter persisted as `{"last_number": n}` in a JSON file.
pub struct FileCounter {
    path: PathBuf,
}

impl FileCounter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_issued(&self) -> Result<Option<u64>, RunError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let state: CounterState = serde_json::from_reader(reader)?;
        Ok(Some(state.last_number))
    }

    fn lock(&self) -> Result<LockGuard, RunError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lock_path = self.path.with_extension("lock");
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(_) => {
                debug!("Acquired counter lock {}", lock_path.display());
                Ok(LockGuard { path: lock_path })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                Err(RunError::CounterLocked { path: lock_path })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ContractSequence for FileCounter {
    fn load_next(&self) -> u64 {
        match self.last_issued() {
            Ok(None) => 1,
            Ok(Some(last)) => last.saturating_add(1),
            Err(error) => {
                warn!(
                    "Ignoring unreadable contract counter {}: {}",
                    self.path.display(),
                    error
                );
                1
            }
        }
    }

    fn save(&self, number: u64) -> Result<(), RunError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let updated_path = self.path.with_extension("updated");
        let f = File::create(&updated_path)?;

        serde_json::to_writer_pretty(f, &CounterState { last_number: number })?;
        fs::rename(updated_path, &self.path)?;
        Ok(())
    }

    fn issue(&self) -> Result<u64, RunError> {
        let _guard = self.lock()?;
        let number = self.load_next();
        self.save(number)?;
        Ok(number)
    }
}

struct LockGuard {
    path: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if let Err(error) = fs::remove_file(&self.path) {
            if error.kind() != io::ErrorKind::NotFound {
                warn!("Could not release {}: {}", self.path.display(), error);
            }
        }
    }
}
