//! Process-local backend for development and tests.
//!
//! DESIGN
//! ======
//! Mirrors the observable behavior of the remote backend: ids are issued
//! monotonically, timestamps come from the system clock in nanoseconds,
//! listings are most-recent-first, and admin-only calls are refused until
//! `admin_login` succeeds. Nothing is persisted.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use super::backend::VisitorBackend;
use super::types::{EntryIdVisitorRecord, RecordId, VisitorFields};
use crate::error::BackendError;

struct Inner {
    next_id: RecordId,
    last_timestamp: u64,
    records: Vec<EntryIdVisitorRecord>,
    admin_password: String,
    caller_is_admin: bool,
    offline: bool,
}

/// In-memory [`VisitorBackend`] holding a single caller's view.
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

/// Current time as nanoseconds since Unix epoch.
fn now_nanos() -> u64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    u64::try_from(dur.as_nanos()).unwrap_or(u64::MAX)
}

impl MemoryBackend {
    #[must_use]
    pub fn new(admin_password: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: 0,
                last_timestamp: 0,
                records: Vec::new(),
                admin_password: admin_password.into(),
                caller_is_admin: false,
                offline: false,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Make every subsequent call fail with [`BackendError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Drop the caller's admin grant, as a backend restart or expiry would.
    pub fn revoke_admin(&self) {
        self.lock().caller_is_admin = false;
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }
}

impl Inner {
    fn online(&self) -> Result<(), BackendError> {
        if self.offline { Err(BackendError::Unavailable) } else { Ok(()) }
    }

    fn require_admin(&self) -> Result<(), BackendError> {
        self.online()?;
        if self.caller_is_admin {
            Ok(())
        } else {
            Err(BackendError::Rejected("Unauthorized: admin privileges required".into()))
        }
    }

    /// Strictly increasing so two adds in the same clock tick stay ordered.
    fn next_timestamp(&mut self) -> u64 {
        let ts = now_nanos().max(self.last_timestamp.saturating_add(1));
        self.last_timestamp = ts;
        ts
    }

    fn sorted(&self) -> Vec<EntryIdVisitorRecord> {
        let mut out = self.records.clone();
        out.sort_by(|a, b| {
            b.record
                .timestamp
                .cmp(&a.record.timestamp)
                .then(b.id.cmp(&a.id))
        });
        out
    }
}

#[async_trait::async_trait]
impl VisitorBackend for MemoryBackend {
    async fn add_visitor_record(&self, fields: &VisitorFields) -> Result<(), BackendError> {
        let mut inner = self.lock();
        inner.online()?;
        let id = inner.next_id;
        inner.next_id += 1;
        let timestamp = inner.next_timestamp();
        inner
            .records
            .push(EntryIdVisitorRecord { id, record: fields.clone().into_record(timestamp) });
        tracing::debug!(id, "memory backend stored visitor record");
        Ok(())
    }

    async fn update_visitor_record(&self, id: RecordId, fields: &VisitorFields) -> Result<(), BackendError> {
        let mut inner = self.lock();
        inner.require_admin()?;
        let Some(entry) = inner.records.iter_mut().find(|e| e.id == id) else {
            return Err(BackendError::Rejected(format!("record {id} not found")));
        };
        let timestamp = entry.record.timestamp;
        entry.record = fields.clone().into_record(timestamp);
        Ok(())
    }

    async fn get_sorted_visitor_records(&self) -> Result<Vec<EntryIdVisitorRecord>, BackendError> {
        let inner = self.lock();
        inner.online()?;
        Ok(inner.sorted())
    }

    async fn export_visitor_records(&self) -> Result<Vec<EntryIdVisitorRecord>, BackendError> {
        let inner = self.lock();
        inner.require_admin()?;
        Ok(inner.sorted())
    }

    async fn admin_login(&self, password: &str) -> Result<bool, BackendError> {
        let mut inner = self.lock();
        inner.online()?;
        let granted = inner.admin_password == password;
        if granted {
            inner.caller_is_admin = true;
        }
        Ok(granted)
    }

    async fn is_caller_admin(&self) -> Result<bool, BackendError> {
        let inner = self.lock();
        inner.online()?;
        Ok(inner.caller_is_admin)
    }

    async fn change_admin_password(&self, old_password: &str, new_password: &str) -> Result<bool, BackendError> {
        let mut inner = self.lock();
        inner.require_admin()?;
        if inner.admin_password != old_password {
            return Ok(false);
        }
        inner.admin_password = new_password.to_owned();
        Ok(true)
    }
}
