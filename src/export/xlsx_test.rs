use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use super::*;
use crate::net::test_helpers::sample_entry;
use crate::net::types::VisitorFields;

fn read_sheet(bytes: Vec<u8>) -> Range<Data> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_owned()]);
    workbook.worksheet_range(SHEET_NAME).unwrap()
}

fn cell(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        other => panic!("expected string at ({row}, {col}), got {other:?}"),
    }
}

#[test]
fn output_is_a_zip_container() {
    let bytes = XlsxEncoder::default().encode(&[sample_entry(1, "A", 0)]).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn single_sheet_with_shared_headers() {
    let range = read_sheet(XlsxEncoder::default().encode(&[]).unwrap());
    for (col, header) in HEADERS.iter().enumerate() {
        assert_eq!(cell(&range, 0, u32::try_from(col).unwrap()), *header);
    }
    assert_eq!(range.height(), 1);
}

#[test]
fn rows_round_trip_non_timestamp_fields() {
    let tricky = VisitorFields {
        full_name: "Lee, \"Sam\"".into(),
        email: "+91 98765 43210".into(),
        address: "Line one\nLine two".into(),
        job_info: "Union Bank".into(),
        income_level: "Very Low".into(),
        reason_for_visit: "Credit card, limit increase".into(),
        visit_type: "Other".into(),
    };
    let records = vec![
        EntryIdVisitorRecord { id: 7, record: tricky.clone().into_record(1_771_338_600_000_000_000) },
        sample_entry(3, "Second", 0),
    ];

    let range = read_sheet(XlsxEncoder::default().encode(&records).unwrap());

    assert_eq!(range.height(), 3);
    assert_eq!(cell(&range, 1, 0), "Feb 17, 2026 2:30 PM");
    assert_eq!(cell(&range, 1, 1), tricky.full_name);
    assert_eq!(cell(&range, 1, 2), tricky.email);
    assert_eq!(cell(&range, 1, 3), tricky.address);
    assert_eq!(cell(&range, 1, 4), tricky.job_info);
    assert_eq!(cell(&range, 1, 5), tricky.income_level);
    assert_eq!(cell(&range, 1, 6), tricky.visit_type);
    assert_eq!(cell(&range, 1, 7), tricky.reason_for_visit);
    assert_eq!(cell(&range, 2, 1), "Second");
}

#[test]
fn headers_match_csv_header_row() {
    let csv_header = crate::export::csv::encode_csv_text(&[], UtcOffset::UTC);
    assert_eq!(csv_header, HEADERS.join(","));
    assert_eq!(COLUMN_WIDTHS.len(), HEADERS.len());
}

#[test]
fn library_failure_is_an_explicit_export_error() {
    // Excel caps a cell at 32,767 characters.
    let oversized = VisitorFields { reason_for_visit: "x".repeat(40_000), ..crate::net::test_helpers::sample_fields("Big") };
    let records = [EntryIdVisitorRecord { id: 1, record: oversized.into_record(0) }];
    let err = XlsxEncoder::default().encode(&records).unwrap_err();
    assert!(matches!(err, ExportError::Spreadsheet(_)));
}

#[test]
fn encoder_reports_xlsx_format() {
    let encoder = XlsxEncoder::default();
    assert_eq!(encoder.format(), ExportFormat::Xlsx);
    let file = encoder
        .to_file(&[sample_entry(1, "A", 0)], time::macros::date!(2026 - 02 - 17))
        .unwrap();
    assert_eq!(file.filename, "MSP_Visitor_Records_2026-02-17.xlsx");
    assert_eq!(file.mime_type, ExportFormat::Xlsx.mime_type());
}
