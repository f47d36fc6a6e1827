//! # Verification History
//!
//! Append-only, process-lifetime log of presentation reports keyed by the
//! report id. Entries are never replaced or removed.
//!
//! ## Thread Safety
//!
//! Guarded by a `parking_lot::RwLock`; the lock is never held across an
//! `.await`, so it is safe to share through axum state.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::policy::PresentationReport;
use crate::result::VerificationResult;

#[derive(Debug, Default)]
struct Entries {
    order: Vec<Uuid>,
    reports: HashMap<Uuid, PresentationReport>,
}

/// Append-only report log.
#[derive(Debug, Default)]
pub struct VerificationHistory {
    entries: RwLock<Entries>,
}

impl VerificationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `report` under its id. Returns `false`, leaving the existing
    /// entry untouched, if the id is already present.
    pub fn append(&self, report: PresentationReport) -> bool {
        let mut entries = self.entries.write();
        let id = report.id;
        if entries.reports.contains_key(&id) {
            tracing::warn!(%id, "verification report id already recorded, keeping original");
            return false;
        }
        entries.order.push(id);
        entries.reports.insert(id, report);
        true
    }

    pub fn get(&self, id: &Uuid) -> Option<PresentationReport> {
        self.entries.read().reports.get(id).cloned()
    }

    /// All reports in insertion order.
    pub fn list(&self) -> Vec<PresentationReport> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|id| entries.reports.get(id).cloned())
            .collect()
    }

    /// The verification results of all reports, in insertion order.
    pub fn results(&self) -> Vec<VerificationResult> {
        self.list().into_iter().map(|report| report.result).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
