//! # Revocation Registry
//!
//! Append-only record of revoked credential and presentation ids.
//!
//! ## Invariants
//!
//! - Once `revoke(id)` succeeds, `is_revoked(id)` is true for the lifetime of
//!   the store. There is no un-revoke.
//! - A second `revoke` of the same id fails with
//!   [`RevocationError::AlreadyRevoked`] carrying the original record, which
//!   is never overwritten.
//! - `is_revoked` is total: unknown ids (including the empty string) are
//!   simply not revoked.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use credence_core::Timestamp;

/// Reason recorded when the caller gives none.
pub const DEFAULT_REASON: &str = "unspecified";

/// `revokedBy` recorded when the caller gives none.
pub const DEFAULT_REVOKED_BY: &str = "unknown";

/// A revocation, created exactly once per subject id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationRecord {
    pub subject_id: String,
    pub revoked_at: Timestamp,
    pub reason: String,
    pub revoked_by: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Input to [`RevocationStore::revoke`].
#[derive(Debug, Clone, Default)]
pub struct RevocationRequest {
    pub subject_id: String,
    pub reason: Option<String>,
    pub revoked_by: Option<String>,
    pub metadata: Map<String, Value>,
}

impl RevocationRequest {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            ..Default::default()
        }
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn revoked_by(mut self, revoked_by: impl Into<String>) -> Self {
        self.revoked_by = Some(revoked_by.into());
        self
    }

    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Revocation state of one id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevocationStatus {
    pub revoked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RevocationRecord>,
}

impl RevocationStatus {
    pub fn active() -> Self {
        Self {
            revoked: false,
            record: None,
        }
    }

    pub fn revoked(record: RevocationRecord) -> Self {
        Self {
            revoked: true,
            record: Some(record),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RevocationError {
    #[error("revocation subject id must not be empty")]
    EmptyId,

    /// The id was already revoked; the original record is unchanged.
    #[error("{} already revoked at {}", .0.subject_id, .0.revoked_at)]
    AlreadyRevoked(Box<RevocationRecord>),
}

/// Shared revocation state.
pub trait RevocationStore: Send + Sync {
    /// Record a revocation.
    fn revoke(&self, request: RevocationRequest) -> Result<RevocationRecord, RevocationError>;

    /// Whether `id` has been revoked.
    fn is_revoked(&self, id: &str) -> bool;

    /// Revocation state of `id`, with the record when revoked.
    fn status_of(&self, id: &str) -> RevocationStatus;

    /// All records, oldest first.
    fn list_revoked(&self) -> Vec<RevocationRecord>;
}

/// Process-lifetime registry on a concurrent map.
///
/// Inserts go through the map's entry API, so concurrent revokes of the same
/// id produce exactly one record and one conflict.
#[derive(Debug, Default)]
pub struct InMemoryRevocationRegistry {
    records: DashMap<String, RevocationRecord>,
}

impl InMemoryRevocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a revocation at `now`.
    pub fn revoke_at(
        &self,
        request: RevocationRequest,
        now: Timestamp,
    ) -> Result<RevocationRecord, RevocationError> {
        if request.subject_id.trim().is_empty() {
            return Err(RevocationError::EmptyId);
        }
        match self.records.entry(request.subject_id) {
            Entry::Occupied(existing) => {
                Err(RevocationError::AlreadyRevoked(Box::new(existing.get().clone())))
            }
            Entry::Vacant(slot) => {
                let record = RevocationRecord {
                    subject_id: slot.key().clone(),
                    revoked_at: now,
                    reason: request.reason.unwrap_or_else(|| DEFAULT_REASON.to_string()),
                    revoked_by: request
                        .revoked_by
                        .unwrap_or_else(|| DEFAULT_REVOKED_BY.to_string()),
                    metadata: request.metadata,
                };
                slot.insert(record.clone());
                tracing::info!(
                    subject = %record.subject_id,
                    reason = %record.reason,
                    revoked_by = %record.revoked_by,
                    "revoked"
                );
                Ok(record)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RevocationStore for InMemoryRevocationRegistry {
    fn revoke(&self, request: RevocationRequest) -> Result<RevocationRecord, RevocationError> {
        self.revoke_at(request, Timestamp::now())
    }

    fn is_revoked(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    fn status_of(&self, id: &str) -> RevocationStatus {
        match self.records.get(id) {
            Some(record) => RevocationStatus::revoked(record.value().clone()),
            None => RevocationStatus::active(),
        }
    }

    fn list_revoked(&self) -> Vec<RevocationRecord> {
        let mut records: Vec<RevocationRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| {
            a.revoked_at
                .cmp(&b.revoked_at)
                .then_with(|| a.subject_id.cmp(&b.subject_id))
        });
        records
    }
}
