//! The backend collaborator interface.
//!
//! DESIGN
//! ======
//! Storage and authorization live outside this crate. The backend is injected
//! as an `Arc<dyn VisitorBackend>` into the gate and the record client so
//! tests and alternative transports can swap it freely. Adapters own their
//! own timeouts and report them as [`BackendError::Timeout`].

use super::types::{EntryIdVisitorRecord, RecordId, VisitorFields};
use crate::error::BackendError;

/// Operations the tracker consumes from the backend.
#[async_trait::async_trait]
pub trait VisitorBackend: Send + Sync {
    /// Store a new record. The backend assigns id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the call fails.
    async fn add_visitor_record(&self, fields: &VisitorFields) -> Result<(), BackendError>;

    /// Replace every field of record `id` except its timestamp. Admin only.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the call fails or is refused.
    async fn update_visitor_record(&self, id: RecordId, fields: &VisitorFields) -> Result<(), BackendError>;

    /// All records, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the call fails.
    async fn get_sorted_visitor_records(&self) -> Result<Vec<EntryIdVisitorRecord>, BackendError>;

    /// The complete record set for file export.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the call fails.
    async fn export_visitor_records(&self) -> Result<Vec<EntryIdVisitorRecord>, BackendError>;

    /// Grant admin privileges to the caller when `password` matches.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the call fails. A wrong password is
    /// `Ok(false)`, not an error.
    async fn admin_login(&self, password: &str) -> Result<bool, BackendError>;

    /// Whether the backend currently treats the caller as admin.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the call fails.
    async fn is_caller_admin(&self) -> Result<bool, BackendError>;

    /// Replace the admin password. `Ok(false)` means `old_password` was wrong.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if the call fails.
    async fn change_admin_password(&self, old_password: &str, new_password: &str) -> Result<bool, BackendError>;
}
