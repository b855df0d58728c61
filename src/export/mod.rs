//! Record export pipeline: snapshot fetch, encoding, delivery.
//!
//! ARCHITECTURE
//! ============
//! Encoders are pure: they turn an ordered slice of records into bytes and
//! never touch the filesystem or the DOM. Delivery (the "download") is a
//! separate [`sink::ExportSink`], so both encoders stay testable without I/O.
//!
//! ```text
//! VisitorRecordClient::fetch_export_snapshot
//!     -> RecordEncoder::encode   (csv | xlsx)
//!     -> ExportSink::deliver     (directory | browser download)
//! ```
//!
//! Both encoders share the column mapping below so their headers can never
//! drift apart.

pub mod csv;
pub mod sink;
pub mod xlsx;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

use time::{Date, UtcOffset};

use crate::error::{BackendError, ErrorCode};
use crate::net::records::{RecordError, VisitorRecordClient};
use crate::net::types::EntryIdVisitorRecord;
use crate::util::timestamp::format_timestamp_at;
use sink::ExportSink;

/// Filename stem shared by every export.
pub const EXPORT_FILE_PREFIX: &str = "MSP_Visitor_Records";

/// Display headers, in column order.
pub const HEADERS: [&str; 8] = [
    "Date & Time",
    "Full Name",
    "Contact",
    "Address",
    "Organization/Bank",
    "Income Level",
    "Visit Type",
    "Purpose/Remarks",
];

/// Spreadsheet column width hints, in characters.
pub const COLUMN_WIDTHS: [u16; 8] = [20, 20, 25, 30, 25, 15, 20, 40];

// =============================================================================
// FORMATS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv;charset=utf-8;",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

/// `MSP_Visitor_Records_<YYYY-MM-DD>.<ext>` for the given export day.
#[must_use]
pub fn export_filename(format: ExportFormat, date: Date) -> String {
    format!(
        "{EXPORT_FILE_PREFIX}_{:04}-{:02}-{:02}.{}",
        date.year(),
        u8::from(date.month()),
        date.day(),
        format.extension()
    )
}

/// Display values of one record in [`HEADERS`] order.
///
/// The timestamp is formatted here, per row, at encode time.
#[must_use]
pub fn row_values(entry: &EntryIdVisitorRecord, offset: UtcOffset) -> [String; 8] {
    let r = &entry.record;
    [
        format_timestamp_at(r.timestamp, offset),
        r.full_name.clone(),
        r.email.clone(),
        r.address.clone(),
        r.job_info.clone(),
        r.income_level.clone(),
        r.visit_type.clone(),
        r.reason_for_visit.clone(),
    ]
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The snapshot was empty; no file is produced.
    #[error("no records available to export")]
    NoRecords,

    /// The snapshot could not be fetched (locked gate or backend failure).
    #[error(transparent)]
    Records(#[from] RecordError),

    /// The spreadsheet library failed to build the workbook.
    #[error("spreadsheet encoding failed: {0}")]
    Spreadsheet(String),

    /// The encoded file could not be handed to the user.
    #[error("export delivery failed: {0}")]
    Delivery(String),
}

impl From<BackendError> for ExportError {
    fn from(e: BackendError) -> Self {
        Self::Records(RecordError::Backend(e))
    }
}

impl ErrorCode for ExportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoRecords => "E_EXPORT_EMPTY",
            Self::Records(e) => e.error_code(),
            Self::Spreadsheet(_) => "E_EXPORT_SPREADSHEET",
            Self::Delivery(_) => "E_EXPORT_DELIVERY",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Records(e) => e.retryable(),
            Self::Delivery(_) => true,
            Self::NoRecords | Self::Spreadsheet(_) => false,
        }
    }
}

// =============================================================================
// ENCODING
// =============================================================================

/// An encoded export ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns records into the bytes of one file format.
pub trait RecordEncoder: Send + Sync {
    fn format(&self) -> ExportFormat;

    /// Encode `records` in the given order.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] if the format's library fails.
    fn encode(&self, records: &[EntryIdVisitorRecord]) -> Result<Vec<u8>, ExportError>;

    /// Encode and name the file for `date`.
    ///
    /// # Errors
    ///
    /// Propagates [`RecordEncoder::encode`] failures.
    fn to_file(&self, records: &[EntryIdVisitorRecord], date: Date) -> Result<ExportFile, ExportError> {
        let format = self.format();
        Ok(ExportFile {
            filename: export_filename(format, date),
            mime_type: format.mime_type(),
            bytes: self.encode(records)?,
        })
    }
}

/// What a finished export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub filename: String,
    pub rows: usize,
    pub bytes: usize,
}

/// Fetch a fresh snapshot, encode it, and deliver the file.
///
/// An empty snapshot is rejected before encoding so no empty file is ever
/// produced.
///
/// # Errors
///
/// - [`ExportError::Records`] if the gate is not unlocked or the fetch fails
/// - [`ExportError::NoRecords`] if the snapshot is empty
/// - [`ExportError::Spreadsheet`] / [`ExportError::Delivery`] from the encoder or sink
pub async fn run_export(
    client: &VisitorRecordClient,
    encoder: &dyn RecordEncoder,
    sink: &dyn ExportSink,
    date: Date,
) -> Result<ExportReceipt, ExportError> {
    let records = client.fetch_export_snapshot().await?;
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }

    let file = encoder.to_file(&records, date)?;
    sink.deliver(&file)?;

    let receipt = ExportReceipt { filename: file.filename, rows: records.len(), bytes: file.bytes.len() };
    tracing::info!(
        filename = %receipt.filename,
        rows = receipt.rows,
        bytes = receipt.bytes,
        "records exported"
    );
    Ok(receipt)
}
