//! XLSX encoding of visitor records via `rust_xlsxwriter`.
//!
//! One worksheet named `Visitor Records`: a header row from the shared
//! display columns, then one row per record, with fixed column widths.
//! Any library failure surfaces as [`ExportError::Spreadsheet`]; a partial
//! or empty workbook is never returned.

#[cfg(test)]
#[path = "xlsx_test.rs"]
mod xlsx_test;

use rust_xlsxwriter::{Workbook, XlsxError};
use time::UtcOffset;

use super::{COLUMN_WIDTHS, ExportError, ExportFormat, HEADERS, RecordEncoder, row_values};
use crate::net::types::EntryIdVisitorRecord;

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Visitor Records";

impl From<XlsxError> for ExportError {
    fn from(e: XlsxError) -> Self {
        Self::Spreadsheet(e.to_string())
    }
}

/// [`RecordEncoder`] producing an Office Open XML workbook.
#[derive(Debug, Clone, Copy)]
pub struct XlsxEncoder {
    offset: UtcOffset,
}

impl XlsxEncoder {
    #[must_use]
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    fn build(&self, records: &[EntryIdVisitorRecord]) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, (header, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
            let col = column_index(col)?;
            sheet.set_column_width(col, width)?;
            sheet.write_string(0, col, *header)?;
        }

        for (i, entry) in records.iter().enumerate() {
            let row = u32::try_from(i + 1)
                .map_err(|_| ExportError::Spreadsheet(format!("row {} exceeds sheet limits", i + 1)))?;
            for (col, value) in row_values(entry, self.offset).into_iter().enumerate() {
                sheet.write_string(row, column_index(col)?, value)?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn column_index(col: usize) -> Result<u16, ExportError> {
    u16::try_from(col).map_err(|_| ExportError::Spreadsheet(format!("column {col} exceeds sheet limits")))
}

impl Default for XlsxEncoder {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl RecordEncoder for XlsxEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn encode(&self, records: &[EntryIdVisitorRecord]) -> Result<Vec<u8>, ExportError> {
        let bytes = self.build(records).inspect_err(|e| {
            tracing::error!(error = %e, "xlsx export failed");
        })?;
        if bytes.is_empty() {
            return Err(ExportError::Spreadsheet("workbook serialized to zero bytes".into()));
        }
        Ok(bytes)
    }
}
