//! CSV encoding of visitor records.
//!
//! Quoting rule: a field is wrapped in double quotes, with inner quotes
//! doubled, if and only if it contains a comma, a double quote, or `\n`.
//! Rows are joined with `\n` and there is no trailing newline.

#[cfg(test)]
#[path = "csv_test.rs"]
mod csv_test;

use std::borrow::Cow;

use time::UtcOffset;

use super::{ExportError, ExportFormat, HEADERS, RecordEncoder, row_values};
use crate::net::types::EntryIdVisitorRecord;

/// Escape one CSV field.
#[must_use]
pub fn escape_csv(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

fn push_row<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_csv(field));
    }
}

/// Render the CSV document as text.
#[must_use]
pub fn encode_csv_text(records: &[EntryIdVisitorRecord], offset: UtcOffset) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADERS);
    for entry in records {
        out.push('\n');
        let values = row_values(entry, offset);
        push_row(&mut out, values.iter().map(String::as_str));
    }
    out
}

/// [`RecordEncoder`] producing UTF-8 CSV.
#[derive(Debug, Clone, Copy)]
pub struct CsvEncoder {
    offset: UtcOffset,
}

impl CsvEncoder {
    #[must_use]
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl RecordEncoder for CsvEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn encode(&self, records: &[EntryIdVisitorRecord]) -> Result<Vec<u8>, ExportError> {
        Ok(encode_csv_text(records, self.offset).into_bytes())
    }
}
