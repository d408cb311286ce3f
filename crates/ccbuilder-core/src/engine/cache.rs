use super::state::BuildResult;
use super::store::{BuildLogEntry, BuildRecord, BuildStore, RecordMutation, StoreError};
use crate::core::parameters::helix::HelixParameters;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Identity of a build request: SHA-256 of the canonical JSON encoding of the
/// full parameter list, in chain order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(parameters: &[HelixParameters]) -> Result<Self, StoreError> {
        let canonical = serde_json::to_vec(parameters)?;
        Ok(Self(hex::encode(Sha256::digest(&canonical))))
    }

    pub fn from_digest(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of counting one cache-missing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub count: u64,
    /// Set on every counted request at or past the threshold while no model is
    /// stored, so a failed or cancelled threshold request does not strand the
    /// record. Concurrent promotions resolve first-wins in the store.
    pub promote: bool,
}

/// Request counting and promotion on top of a [`BuildStore`].
pub struct BuildCache<'a> {
    store: &'a dyn BuildStore,
    promotion_threshold: u64,
}

impl<'a> BuildCache<'a> {
    pub fn new(store: &'a dyn BuildStore, promotion_threshold: u64) -> Self {
        Self {
            store,
            promotion_threshold,
        }
    }

    /// Returns the stored model when the fingerprint has been promoted.
    ///
    /// A record whose parameters differ from `parameters` is treated as a miss,
    /// so request equality stays exact even under a digest collision.
    pub fn lookup(
        &self,
        fingerprint: &Fingerprint,
        parameters: &[HelixParameters],
    ) -> Result<Option<BuildResult>, StoreError> {
        let Some(record) = self.store.get(fingerprint)? else {
            debug!(fingerprint = %fingerprint, "No build record for fingerprint.");
            return Ok(None);
        };
        if record.parameters != parameters {
            warn!(
                fingerprint = %fingerprint,
                "Stored build record has different parameters; treating as a miss."
            );
            return Ok(None);
        }
        Ok(record.model)
    }

    pub fn record_request(
        &self,
        fingerprint: &Fingerprint,
        parameters: &[HelixParameters],
    ) -> Result<RequestTicket, StoreError> {
        let record = self.store.upsert(
            fingerprint,
            RecordMutation::RegisterRequest {
                parameters: parameters.to_vec(),
            },
        )?;
        let ticket = RequestTicket {
            count: record.requested,
            promote: record.requested >= self.promotion_threshold && record.model.is_none(),
        };
        debug!(
            fingerprint = %fingerprint,
            count = ticket.count,
            promote = ticket.promote,
            "Recorded build request."
        );
        Ok(ticket)
    }

    pub fn promote(
        &self,
        fingerprint: &Fingerprint,
        parameters: &[HelixParameters],
        model: BuildResult,
    ) -> Result<BuildRecord, StoreError> {
        self.store.upsert(
            fingerprint,
            RecordMutation::Promote {
                parameters: parameters.to_vec(),
                model,
            },
        )
    }

    pub fn log_build(
        &self,
        fingerprint: &Fingerprint,
        caller: &str,
        elapsed: Duration,
    ) -> Result<(), StoreError> {
        self.store.append(BuildLogEntry {
            timestamp: Utc::now(),
            caller: caller.to_string(),
            build_seconds: elapsed.as_secs_f64(),
            fingerprint: fingerprint.clone(),
        })
    }
}
