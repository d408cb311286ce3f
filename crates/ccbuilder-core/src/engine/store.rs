use super::cache::Fingerprint;
use super::state::BuildResult;
use crate::core::parameters::helix::HelixParameters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Build store is unreachable: {0}")]
    Unavailable(String),
    #[error("Failed to encode build data: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Lifecycle of a build record. `Unseen` has no record at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Seen { count: u64 },
    Promoted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    pub fingerprint: Fingerprint,
    pub parameters: Vec<HelixParameters>,
    /// Number of requests that missed the cache. Never zero once a record exists.
    pub requested: u64,
    pub model: Option<BuildResult>,
}

impl BuildRecord {
    pub fn state(&self) -> RecordState {
        match self.model {
            Some(_) => RecordState::Promoted,
            None => RecordState::Seen {
                count: self.requested,
            },
        }
    }

    /// Applies a mutation in place. Counting starts at 1 on creation.
    pub fn apply(&mut self, mutation: RecordMutation) {
        match mutation {
            RecordMutation::RegisterRequest { .. } => {
                self.requested = self.requested.saturating_add(1);
            }
            RecordMutation::Promote { model, .. } => {
                if self.model.is_none() {
                    self.model = Some(model);
                }
            }
        }
    }

    /// Creates the record a mutation produces when none exists yet.
    pub fn create(fingerprint: Fingerprint, mutation: RecordMutation) -> Self {
        match mutation {
            RecordMutation::RegisterRequest { parameters } => Self {
                fingerprint,
                parameters,
                requested: 1,
                model: None,
            },
            RecordMutation::Promote { parameters, model } => Self {
                fingerprint,
                parameters,
                requested: 1,
                model: Some(model),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordMutation {
    /// Create the record with a count of 1, or increment an existing count.
    RegisterRequest { parameters: Vec<HelixParameters> },
    /// Attach a realized model. The first promotion wins.
    Promote {
        parameters: Vec<HelixParameters>,
        model: BuildResult,
    },
}

/// One line of the build audit trail. Never read back by the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildLogEntry {
    pub timestamp: DateTime<Utc>,
    pub caller: String,
    pub build_seconds: f64,
    pub fingerprint: Fingerprint,
}

/// Persistence collaborator of the build cache.
///
/// Implementations must make `upsert` atomic per fingerprint: two concurrent
/// `RegisterRequest` mutations for the same fingerprint must both be counted.
pub trait BuildStore: Send + Sync {
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<BuildRecord>, StoreError>;

    fn upsert(
        &self,
        fingerprint: &Fingerprint,
        mutation: RecordMutation,
    ) -> Result<BuildRecord, StoreError>;

    fn append(&self, entry: BuildLogEntry) -> Result<(), StoreError>;
}

/// In-process store. Useful for tests and for callers that only need
/// memoization for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Fingerprint, BuildRecord>>,
    log: Mutex<Vec<BuildLogEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_entries(&self) -> Result<Vec<BuildLogEntry>, StoreError> {
        Ok(lock(&self.log)?.clone())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.records)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
}

impl BuildStore for MemoryStore {
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<BuildRecord>, StoreError> {
        Ok(lock(&self.records)?.get(fingerprint).cloned())
    }

    fn upsert(
        &self,
        fingerprint: &Fingerprint,
        mutation: RecordMutation,
    ) -> Result<BuildRecord, StoreError> {
        let mut records = lock(&self.records)?;
        let record = match records.get_mut(fingerprint) {
            Some(existing) => {
                existing.apply(mutation);
                existing.clone()
            }
            None => {
                let created = BuildRecord::create(fingerprint.clone(), mutation);
                records.insert(fingerprint.clone(), created.clone());
                created
            }
        };
        Ok(record)
    }

    fn append(&self, entry: BuildLogEntry) -> Result<(), StoreError> {
        lock(&self.log)?.push(entry);
        Ok(())
    }
}
