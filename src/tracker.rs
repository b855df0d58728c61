//! Controller facade the presentation shell calls into.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every user-initiated action ends in exactly one [`Notice`]: the success or
//! error toast the shell shows. Failures are logged here with their error
//! code and shown to the user as fixed, generic text. Validation messages are
//! the only error details that reach the user verbatim.

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tracker_test;

use std::sync::Arc;

use time::{Date, OffsetDateTime};

use crate::config::TrackerConfig;
use crate::error::ErrorCode;
use crate::export::csv::CsvEncoder;
use crate::export::sink::{DirectorySink, ExportSink};
use crate::export::xlsx::XlsxEncoder;
use crate::export::{ExportError, ExportFormat, RecordEncoder, run_export};
use crate::net::backend::VisitorBackend;
use crate::net::records::{CacheSlot, RecordError, VisitorRecordClient};
use crate::net::types::{EntryIdVisitorRecord, VisitorFields};
use crate::state::admin::{AdminGate, GateError, GateState, PasswordChange, UnlockOutcome};
use crate::state::session::SessionCache;

pub const MSG_RECORD_ADDED: &str = "Visitor record added successfully";
pub const MSG_RECORD_ADD_FAILED: &str = "Failed to add visitor record";
pub const MSG_ACCESS_GRANTED: &str = "Admin access granted";
pub const MSG_ACCESS_DENIED: &str = "Incorrect password. Access denied.";
pub const MSG_VERIFY_FAILED: &str = "Failed to verify password. Please try again.";
pub const MSG_VERIFY_PENDING: &str = "Admin verification in progress. Please wait.";
pub const MSG_UNLOCK_IN_FLIGHT: &str = "Password check already in progress. Please wait.";
pub const MSG_LOCKED: &str = "Admin mode locked";
pub const MSG_EXPORT_ADMIN_REQUIRED: &str = "Admin access required to export data";
pub const MSG_NO_RECORDS: &str = "No records available to export";
pub const MSG_CSV_EXPORTED: &str = "CSV file downloaded successfully";
pub const MSG_XLSX_EXPORTED: &str = "Excel file downloaded successfully";
pub const MSG_CSV_FAILED: &str = "Failed to export CSV";
pub const MSG_XLSX_FAILED: &str = "Failed to export Excel file";
pub const MSG_PASSWORD_CHANGED: &str =
    "Password updated successfully. Your new password will be required for future Admin unlocks.";
pub const MSG_PASSWORD_REJECTED: &str = "Incorrect current password";
pub const MSG_PASSWORD_CHANGE_FAILED: &str = "Failed to change password. Please try again.";
pub const MSG_PASSWORD_ADMIN_REQUIRED: &str = "Admin access required to change password";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-visible outcome of one action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

/// The gate, the record client, and export delivery wired together.
pub struct VisitorTracker {
    gate: Arc<AdminGate>,
    records: VisitorRecordClient,
    sink: Arc<dyn ExportSink>,
    config: TrackerConfig,
}

impl VisitorTracker {
    #[must_use]
    pub fn new(
        backend: Arc<dyn VisitorBackend>,
        session: Arc<dyn SessionCache>,
        sink: Arc<dyn ExportSink>,
        config: TrackerConfig,
    ) -> Self {
        let gate = Arc::new(AdminGate::new(backend.clone(), session));
        let records = VisitorRecordClient::new(backend, gate.clone(), config.list_access);
        Self { gate, records, sink, config }
    }

    /// Native wiring: exports land in `config.export_dir`.
    #[must_use]
    pub fn with_export_dir(backend: Arc<dyn VisitorBackend>, session: Arc<dyn SessionCache>, config: TrackerConfig) -> Self {
        let sink = Arc::new(DirectorySink::new(config.export_dir.clone()));
        Self::new(backend, session, sink, config)
    }

    #[must_use]
    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    #[must_use]
    pub fn records(&self) -> &VisitorRecordClient {
        &self.records
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Page-load reconciliation of a persisted admin flag.
    pub async fn start(&self) -> GateState {
        let state = self.gate.restore().await;
        if state != GateState::Unlocked {
            self.records.clear_admin_caches();
        }
        state
    }

    /// Records visible to the current session, most recent first.
    ///
    /// # Errors
    ///
    /// See [`VisitorRecordClient::list_records`].
    pub async fn visible_records(&self) -> Result<Vec<EntryIdVisitorRecord>, RecordError> {
        self.records.list_records().await
    }

    /// Validate and store a new visitor record.
    ///
    /// A blank field shows its form message and nothing is sent; a backend
    /// failure shows [`MSG_RECORD_ADD_FAILED`].
    pub async fn submit_visitor(&self, fields: &VisitorFields) -> Notice {
        match self.records.add_record(fields).await {
            Ok(()) => Notice::success(MSG_RECORD_ADDED),
            Err(RecordError::Validation(e)) => Notice::error(e.to_string()),
            Err(e) => {
                tracing::error!(error = %e, code = e.error_code(), "add visitor record failed");
                Notice::error(MSG_RECORD_ADD_FAILED)
            }
        }
    }

    /// Submit the admin password.
    ///
    /// Denied for a wrong password, a retry message for backend failures, and
    /// a wait message while verification or another submission is pending.
    pub async fn unlock(&self, password: &str) -> Notice {
        match self.gate.submit(password).await {
            Ok(UnlockOutcome::Granted) => {
                self.records.invalidate(CacheSlot::VisibleRecords);
                Notice::success(MSG_ACCESS_GRANTED)
            }
            Ok(UnlockOutcome::Denied) => Notice::error(MSG_ACCESS_DENIED),
            Err(GateError::Validation(e)) => Notice::error(e.to_string()),
            Err(GateError::VerificationPending) => Notice::error(MSG_VERIFY_PENDING),
            Err(GateError::UnlockInFlight) => Notice::error(MSG_UNLOCK_IN_FLIGHT),
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "admin unlock failed");
                Notice::error(MSG_VERIFY_FAILED)
            }
        }
    }

    /// Leave admin mode: the flag is erased and both record caches are dropped.
    pub fn lock(&self) -> Notice {
        self.gate.lock();
        self.records.clear_admin_caches();
        Notice::success(MSG_LOCKED)
    }

    /// Export every record, naming the file after today's UTC date.
    pub async fn export(&self, format: ExportFormat) -> Notice {
        self.export_on(format, OffsetDateTime::now_utc().date()).await
    }

    /// Export every record as `format`, naming the file after `date`.
    ///
    /// Refused without an unlocked session before the backend is called. An
    /// empty snapshot shows [`MSG_NO_RECORDS`] and delivers no file; any other
    /// failure shows the format's failure message.
    pub async fn export_on(&self, format: ExportFormat, date: Date) -> Notice {
        if !self.gate.is_unlocked() {
            return Notice::error(MSG_EXPORT_ADMIN_REQUIRED);
        }

        let csv = CsvEncoder::new(self.config.display_offset);
        let xlsx = XlsxEncoder::new(self.config.display_offset);
        let (encoder, done, failed): (&dyn RecordEncoder, &str, &str) = match format {
            ExportFormat::Csv => (&csv, MSG_CSV_EXPORTED, MSG_CSV_FAILED),
            ExportFormat::Xlsx => (&xlsx, MSG_XLSX_EXPORTED, MSG_XLSX_FAILED),
        };

        match run_export(&self.records, encoder, self.sink.as_ref(), date).await {
            Ok(_) => Notice::success(done),
            Err(ExportError::NoRecords) => Notice::error(MSG_NO_RECORDS),
            Err(ExportError::Records(RecordError::AdminRequired | RecordError::VerificationPending)) => {
                Notice::error(MSG_EXPORT_ADMIN_REQUIRED)
            }
            Err(e) => {
                tracing::error!(error = %e, code = e.error_code(), ?format, "export failed");
                Notice::error(failed)
            }
        }
    }

    /// Change the admin password from the settings dialog.
    ///
    /// Validation problems show their message, a wrong current password shows
    /// [`MSG_PASSWORD_REJECTED`], and the session stays unlocked either way.
    pub async fn change_password(&self, current: &str, new: &str, confirm: &str) -> Notice {
        match self.gate.change_password(current, new, confirm).await {
            Ok(PasswordChange::Changed) => Notice::success(MSG_PASSWORD_CHANGED),
            Ok(PasswordChange::Rejected) => Notice::error(MSG_PASSWORD_REJECTED),
            Err(GateError::Validation(e)) => Notice::error(e.to_string()),
            Err(GateError::Locked) => Notice::error(MSG_PASSWORD_ADMIN_REQUIRED),
            Err(e) => {
                tracing::error!(error = %e, code = e.error_code(), "admin password change failed");
                Notice::error(MSG_PASSWORD_CHANGE_FAILED)
            }
        }
    }
}
