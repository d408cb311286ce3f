use crate::error::{CliError, Result};
use ccbuilder::engine::cache::Fingerprint;
use ccbuilder::engine::store::{
    BuildLogEntry, BuildRecord, BuildStore, RecordMutation, StoreError,
};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

const STORE_FILE_NAME: &str = "builds.json";
const LOG_EXTENSION: &str = "log.jsonl";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    records: BTreeMap<Fingerprint, BuildRecord>,
}

/// Build store persisted next to its audit log.
///
/// Records live in one JSON document that every upsert reads, modifies and
/// writes back through a temporary file renamed over the original. The audit
/// log is a separate JSON-lines file that is only ever appended to. Both are
/// guarded by an in-process mutex; concurrent processes sharing the files are
/// not serialized.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Using build store at {:?}", &path);
        Self {
            path,
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the append-only audit log, beside the records document.
    pub fn log_path(&self) -> PathBuf {
        self.path.with_extension(LOG_EXTENSION)
    }

    pub fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("edu", "caltech", "ccbuilder")
            .map(|dirs| dirs.data_dir().join(STORE_FILE_NAME))
            .ok_or_else(|| {
                CliError::Config("Could not determine default data directory path.".to_string())
            })
    }

    /// Audit entries recorded for one fingerprint, oldest first.
    pub fn log_entries_for(
        &self,
        fingerprint: &Fingerprint,
    ) -> std::result::Result<Vec<BuildLogEntry>, StoreError> {
        let _guard = self.lock()?;
        let log_path = self.log_path();
        if !log_path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&log_path).map_err(|e| unavailable(&log_path, e))?;

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| unavailable(&log_path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: BuildLogEntry = serde_json::from_str(&line)?;
            if &entry.fingerprint == fingerprint {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    fn lock(&self) -> std::result::Result<MutexGuard<'_, ()>, StoreError> {
        self.guard
            .lock()
            .map_err(|_| StoreError::Unavailable("file store lock poisoned".to_string()))
    }

    fn load(&self) -> std::result::Result<StoreDocument, StoreError> {
        if !self.path.exists() {
            return Ok(StoreDocument::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| unavailable(&self.path, e))?;
        Ok(serde_json::from_str(&content)?)
    }

    fn ensure_parent(&self) -> std::result::Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| unavailable(parent, e))?;
        }
        Ok(())
    }

    fn save(&self, document: &StoreDocument) -> std::result::Result<(), StoreError> {
        self.ensure_parent()?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_vec_pretty(document)?)
            .map_err(|e| unavailable(&staging, e))?;
        fs::rename(&staging, &self.path).map_err(|e| unavailable(&self.path, e))
    }
}

fn unavailable(path: &Path, error: std::io::Error) -> StoreError {
    StoreError::Unavailable(format!("{}: {}", path.display(), error))
}

impl BuildStore for FileStore {
    fn get(
        &self,
        fingerprint: &Fingerprint,
    ) -> std::result::Result<Option<BuildRecord>, StoreError> {
        let _guard = self.lock()?;
        Ok(self.load()?.records.remove(fingerprint))
    }

    fn upsert(
        &self,
        fingerprint: &Fingerprint,
        mutation: RecordMutation,
    ) -> std::result::Result<BuildRecord, StoreError> {
        let _guard = self.lock()?;
        let mut document = self.load()?;
        let record = match document.records.get_mut(fingerprint) {
            Some(existing) => {
                existing.apply(mutation);
                existing.clone()
            }
            None => {
                let created = BuildRecord::create(fingerprint.clone(), mutation);
                document.records.insert(fingerprint.clone(), created.clone());
                created
            }
        };
        self.save(&document)?;
        Ok(record)
    }

    fn append(&self, entry: BuildLogEntry) -> std::result::Result<(), StoreError> {
        let _guard = self.lock()?;
        self.ensure_parent()?;
        let log_path = self.log_path();
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| unavailable(&log_path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| unavailable(&log_path, e))
    }
}
