//! Visitor record types exchanged with the backend.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase schema on the wire. The
//! categorical fields (`income_level`, `visit_type`) stay plain strings since
//! their value sets differ between form revisions; the option lists below are
//! what the current form offers.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Backend-issued record identifier. Unique and monotonically increasing.
pub type RecordId = u64;

/// Income levels offered by the visitor form.
pub const INCOME_LEVEL_OPTIONS: [&str; 4] = ["Low", "Medium", "High", "Very High"];

/// Income levels offered by the extended form revision.
pub const EXTENDED_INCOME_LEVEL_OPTIONS: [&str; 5] = ["Very Low", "Low", "Medium", "High", "Very High"];

/// Visit types offered by the visitor form.
pub const VISIT_TYPE_OPTIONS: [&str; 6] = [
    "New Inquiry",
    "Follow-up",
    "Loan Application",
    "Account Opening",
    "General Consultation",
    "Other",
];

/// Whether an income level gets the highlighted badge in the records table.
#[must_use]
pub fn is_high_income(level: &str) -> bool {
    matches!(level, "High" | "Very High")
}

/// One logged visit as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub full_name: String,
    /// Contact information (email or phone).
    pub email: String,
    pub address: String,
    /// Organization or bank.
    pub job_info: String,
    pub income_level: String,
    pub reason_for_visit: String,
    pub visit_type: String,
    /// Creation instant in nanoseconds since the Unix epoch. Set by the backend.
    pub timestamp: u64,
}

/// A [`VisitorRecord`] paired with its backend id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryIdVisitorRecord {
    pub id: RecordId,
    pub record: VisitorRecord,
}

/// The seven user-entered values submitted on add and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorFields {
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub job_info: String,
    pub income_level: String,
    pub reason_for_visit: String,
    pub visit_type: String,
}

impl VisitorFields {
    /// Check that every field has a non-blank value.
    ///
    /// This is a usability guard for the form, not a security boundary.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for the first blank field,
    /// in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            (&self.full_name, "Full name is required"),
            (&self.email, "Contact information is required"),
            (&self.address, "Address is required"),
            (&self.job_info, "Organization/Bank is required"),
            (&self.income_level, "Income level is required"),
            (&self.visit_type, "Visit type is required"),
            (&self.reason_for_visit, "Purpose/Remarks is required"),
        ];
        match checks.into_iter().find(|(value, _)| value.trim().is_empty()) {
            Some((_, message)) => Err(ValidationError::MissingField(message)),
            None => Ok(()),
        }
    }

    /// Rebuild the editable fields of an existing record.
    #[must_use]
    pub fn from_record(record: &VisitorRecord) -> Self {
        Self {
            full_name: record.full_name.clone(),
            email: record.email.clone(),
            address: record.address.clone(),
            job_info: record.job_info.clone(),
            income_level: record.income_level.clone(),
            reason_for_visit: record.reason_for_visit.clone(),
            visit_type: record.visit_type.clone(),
        }
    }

    /// Attach a backend timestamp, producing a stored record.
    #[must_use]
    pub fn into_record(self, timestamp: u64) -> VisitorRecord {
        VisitorRecord {
            full_name: self.full_name,
            email: self.email,
            address: self.address,
            job_info: self.job_info,
            income_level: self.income_level,
            reason_for_visit: self.reason_for_visit,
            visit_type: self.visit_type,
            timestamp,
        }
    }
}
