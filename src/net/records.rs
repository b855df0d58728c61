//! Visitor record client: backend reads/writes with a two-slot cache.
//!
//! DESIGN
//! ======
//! The client keeps at most two cached collections, the visible record list
//! and the last export snapshot, each invalidated independently. Any
//! successful write drops both. There are no row-level entries.
//!
//! Admin-gated calls consult the [`AdminGate`] at call time and again when the
//! response lands, so a `lock()` that happens mid-request never leaves admin
//! data behind in the cache. Each slot carries a generation counter so a
//! response that raced an invalidation is returned but not cached.

#[cfg(test)]
#[path = "records_test.rs"]
mod records_test;

use std::sync::{Arc, Mutex};

use super::backend::VisitorBackend;
use super::types::{EntryIdVisitorRecord, RecordId, VisitorFields};
use crate::config::RecordListAccess;
use crate::error::{BackendError, ErrorCode, ValidationError};
use crate::state::admin::{AdminGate, GateState};

/// Named cache collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheSlot {
    VisibleRecords,
    ExportSnapshot,
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("admin access required")]
    AdminRequired,

    #[error("admin verification is still in progress")]
    VerificationPending,

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ErrorCode for RecordError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.error_code(),
            Self::AdminRequired => "E_ADMIN_REQUIRED",
            Self::VerificationPending => "E_VERIFICATION_PENDING",
            Self::Backend(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::VerificationPending => true,
            Self::Backend(e) => e.retryable(),
            Self::Validation(_) | Self::AdminRequired => false,
        }
    }
}

#[derive(Default)]
struct Slot {
    rows: Option<Vec<EntryIdVisitorRecord>>,
    generation: u64,
}

impl Slot {
    fn invalidate(&mut self) {
        self.rows = None;
        self.generation = self.generation.wrapping_add(1);
    }
}

#[derive(Default)]
struct RecordCache {
    visible: Slot,
    export_snapshot: Slot,
}

impl RecordCache {
    fn slot_mut(&mut self, slot: CacheSlot) -> &mut Slot {
        match slot {
            CacheSlot::VisibleRecords => &mut self.visible,
            CacheSlot::ExportSnapshot => &mut self.export_snapshot,
        }
    }
}

/// Mediates record calls to the backend.
pub struct VisitorRecordClient {
    backend: Arc<dyn VisitorBackend>,
    gate: Arc<AdminGate>,
    access: RecordListAccess,
    cache: Mutex<RecordCache>,
}

impl VisitorRecordClient {
    #[must_use]
    pub fn new(backend: Arc<dyn VisitorBackend>, gate: Arc<AdminGate>, access: RecordListAccess) -> Self {
        Self { backend, gate, access, cache: Mutex::new(RecordCache::default()) }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, RecordCache> {
        self.cache
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn require_admin(&self) -> Result<(), RecordError> {
        match self.gate.state() {
            GateState::Unlocked => Ok(()),
            GateState::Verifying => Err(RecordError::VerificationPending),
            GateState::Locked | GateState::Unlocking => Err(RecordError::AdminRequired),
        }
    }

    fn require_list_access(&self) -> Result<(), RecordError> {
        match self.access {
            RecordListAccess::Open => Ok(()),
            RecordListAccess::AdminOnly => self.require_admin(),
        }
    }

    fn may_read(&self, slot: CacheSlot) -> bool {
        match slot {
            CacheSlot::VisibleRecords => self.require_list_access().is_ok(),
            CacheSlot::ExportSnapshot => self.require_admin().is_ok(),
        }
    }

    fn generation(&self, slot: CacheSlot) -> u64 {
        self.cache().slot_mut(slot).generation
    }

    /// Store `rows` unless the slot was invalidated or access was lost meanwhile.
    fn store(&self, slot: CacheSlot, generation: u64, rows: &[EntryIdVisitorRecord]) {
        if !self.may_read(slot) {
            tracing::debug!(?slot, "dropping response after access was revoked");
            return;
        }
        let mut cache = self.cache();
        let entry = cache.slot_mut(slot);
        if entry.generation == generation {
            entry.rows = Some(rows.to_vec());
        }
    }

    /// Drop one cached collection.
    pub fn invalidate(&self, slot: CacheSlot) {
        self.cache().slot_mut(slot).invalidate();
    }

    /// Drop every cached collection. Called whenever the admin session locks.
    pub fn clear_admin_caches(&self) {
        let mut cache = self.cache();
        cache.visible.invalidate();
        cache.export_snapshot.invalidate();
    }

    /// Cached rows for `slot`, if warm and currently readable.
    #[must_use]
    pub fn cached(&self, slot: CacheSlot) -> Option<Vec<EntryIdVisitorRecord>> {
        if !self.may_read(slot) {
            return None;
        }
        self.cache().slot_mut(slot).rows.clone()
    }

    /// Submit a new visitor record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Validation`] for blank fields (nothing is sent)
    /// or [`RecordError::Backend`] if the backend call fails.
    pub async fn add_record(&self, fields: &VisitorFields) -> Result<(), RecordError> {
        fields.validate()?;
        self.backend.add_visitor_record(fields).await?;
        self.clear_admin_caches();
        tracing::info!("visitor record added");
        Ok(())
    }

    /// Records in backend order (most recent first).
    ///
    /// Served from the visible-records cache when warm.
    ///
    /// # Errors
    ///
    /// Under [`RecordListAccess::AdminOnly`]: [`RecordError::VerificationPending`]
    /// while the gate is verifying, [`RecordError::AdminRequired`] unless
    /// unlocked. [`RecordError::Backend`] if the fetch fails.
    pub async fn list_records(&self) -> Result<Vec<EntryIdVisitorRecord>, RecordError> {
        self.require_list_access()?;
        if let Some(rows) = self.cached(CacheSlot::VisibleRecords) {
            return Ok(rows);
        }

        let generation = self.generation(CacheSlot::VisibleRecords);
        let rows = self.backend.get_sorted_visitor_records().await?;
        self.store(CacheSlot::VisibleRecords, generation, &rows);
        tracing::debug!(count = rows.len(), "visitor records fetched");
        Ok(rows)
    }

    /// Replace every field of record `id`. Admin only.
    ///
    /// # Errors
    ///
    /// [`RecordError::AdminRequired`] / [`RecordError::VerificationPending`]
    /// unless unlocked, [`RecordError::Validation`] for blank fields, or
    /// [`RecordError::Backend`] if the backend call fails.
    pub async fn update_record(&self, id: RecordId, fields: &VisitorFields) -> Result<(), RecordError> {
        self.require_admin()?;
        fields.validate()?;
        self.backend.update_visitor_record(id, fields).await?;
        self.clear_admin_caches();
        tracing::info!(id, "visitor record updated");
        Ok(())
    }

    /// Fetch the full record set for export. Always hits the backend.
    ///
    /// # Errors
    ///
    /// [`RecordError::AdminRequired`] / [`RecordError::VerificationPending`]
    /// unless unlocked, or [`RecordError::Backend`] if the fetch fails.
    pub async fn fetch_export_snapshot(&self) -> Result<Vec<EntryIdVisitorRecord>, RecordError> {
        self.require_admin()?;
        self.invalidate(CacheSlot::ExportSnapshot);

        let generation = self.generation(CacheSlot::ExportSnapshot);
        let rows = self.backend.export_visitor_records().await?;
        self.store(CacheSlot::ExportSnapshot, generation, &rows);
        tracing::debug!(count = rows.len(), "export snapshot fetched");
        Ok(rows)
    }
}
