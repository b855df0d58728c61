use super::*;

fn filled() -> VisitorFields {
    VisitorFields {
        full_name: "Asha Rao".into(),
        email: "asha@example.com".into(),
        address: "12 Park Street".into(),
        job_info: "City Bank".into(),
        income_level: "High".into(),
        reason_for_visit: "Home loan".into(),
        visit_type: "Loan Application".into(),
    }
}

// =============================================================
// VisitorFields::validate
// =============================================================

#[test]
fn complete_fields_validate() {
    assert_eq!(filled().validate(), Ok(()));
}

#[test]
fn missing_name_reports_form_message() {
    let fields = VisitorFields { full_name: String::new(), ..filled() };
    assert_eq!(fields.validate(), Err(ValidationError::MissingField("Full name is required")));
}

#[test]
fn whitespace_only_counts_as_missing() {
    let fields = VisitorFields { email: "   ".into(), ..filled() };
    assert_eq!(fields.validate(), Err(ValidationError::MissingField("Contact information is required")));
}

#[test]
fn first_missing_field_in_form_order_wins() {
    let fields = VisitorFields { address: String::new(), reason_for_visit: String::new(), ..filled() };
    assert_eq!(fields.validate(), Err(ValidationError::MissingField("Address is required")));
}

#[test]
fn default_fields_fail_on_full_name() {
    assert_eq!(
        VisitorFields::default().validate(),
        Err(ValidationError::MissingField("Full name is required"))
    );
}

// =============================================================
// record conversions
// =============================================================

#[test]
fn into_record_keeps_values_and_sets_timestamp() {
    let record = filled().into_record(42);
    assert_eq!(record.full_name, "Asha Rao");
    assert_eq!(record.visit_type, "Loan Application");
    assert_eq!(record.timestamp, 42);
}

#[test]
fn from_record_drops_only_timestamp() {
    let record = filled().into_record(7);
    assert_eq!(VisitorFields::from_record(&record), filled());
}

// =============================================================
// wire format
// =============================================================

#[test]
fn record_serializes_with_camel_case_keys() {
    let entry = EntryIdVisitorRecord { id: 3, record: filled().into_record(1_000) };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["record"]["fullName"], "Asha Rao");
    assert_eq!(json["record"]["jobInfo"], "City Bank");
    assert_eq!(json["record"]["reasonForVisit"], "Home loan");
    assert_eq!(json["record"]["timestamp"], 1_000);
}

#[test]
fn record_deserializes_from_backend_json() {
    let raw = r#"{"id":9,"record":{"fullName":"B","email":"b@x","address":"A","jobInfo":"J",
        "incomeLevel":"Low","reasonForVisit":"R","visitType":"Other","timestamp":5}}"#;
    let entry: EntryIdVisitorRecord = serde_json::from_str(raw).unwrap();
    assert_eq!(entry.id, 9);
    assert_eq!(entry.record.income_level, "Low");
}

// =============================================================
// options
// =============================================================

#[test]
fn high_income_badge_levels() {
    assert!(is_high_income("High"));
    assert!(is_high_income("Very High"));
    assert!(!is_high_income("Medium"));
    assert!(!is_high_income("Very Low"));
}

#[test]
fn extended_income_levels_include_base_set() {
    for level in INCOME_LEVEL_OPTIONS {
        assert!(EXTENDED_INCOME_LEVEL_OPTIONS.contains(&level));
    }
    assert!(VISIT_TYPE_OPTIONS.contains(&"Follow-up"));
}
