//! JSON file actor store.
//!
//! One pretty-printed file per actor at `<dir>/<real_name>.json` and the
//! ledger at `<dir>/_character_occurrence.json`. Reads are best-effort: a
//! missing or malformed file is reported as not found.

use legion_application::ports::actor_store::{ActorStore, StoreError};
use legion_domain::{ActorSnapshot, LedgerRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the persisted ledger
pub const LEDGER_FILE: &str = "_character_occurrence.json";

/// Where actors are kept when no directory is configured
pub fn default_cache_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("legion").join("characters"))
        .unwrap_or_else(|| PathBuf::from("cache"))
}

pub struct JsonActorStore {
    dir: PathBuf,
}

impl JsonActorStore {
    /// Store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `real_name`
    pub fn actor_path(&self, real_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(real_name)))
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    fn read<T: DeserializeOwned>(&self, path: &Path, key: &str) -> Result<T, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No record at {}", path.display());
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        serde_json::from_str(&contents).map_err(|e| {
            warn!("Ignoring malformed record {}: {}", path.display(), e);
            StoreError::NotFound(key.to_string())
        })
    }

    fn write<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl ActorStore for JsonActorStore {
    fn load_actor(&self, real_name: &str) -> Result<ActorSnapshot, StoreError> {
        self.read(&self.actor_path(real_name), real_name)
    }

    fn save_actor(&self, snapshot: &ActorSnapshot) -> Result<(), StoreError> {
        self.write(&self.actor_path(&snapshot.real_name), snapshot)
    }

    fn load_ledger(&self) -> Result<LedgerRecord, StoreError> {
        self.read(&self.ledger_path(), "ledger")
    }

    fn save_ledger(&self, record: &LedgerRecord) -> Result<(), StoreError> {
        self.write(&self.ledger_path(), record)
    }
}

/// Keep names readable while making them safe as a single path component
fn file_stem(real_name: &str) -> String {
    let stem: String = real_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    match stem.trim_start_matches('.') {
        "" => "_".to_string(),
        rest => rest.to_string(),
    }
}
