use super::*;

// =============================================================================
// parse_list_access
// =============================================================================

#[test]
fn list_access_defaults_to_admin_only() {
    assert_eq!(parse_list_access(None).unwrap(), RecordListAccess::AdminOnly);
}

#[test]
fn list_access_accepts_open() {
    assert_eq!(parse_list_access(Some("open")).unwrap(), RecordListAccess::Open);
    assert_eq!(parse_list_access(Some("admin")).unwrap(), RecordListAccess::AdminOnly);
}

#[test]
fn list_access_rejects_unknown_value() {
    let err = parse_list_access(Some("public")).unwrap_err();
    assert!(err.to_string().contains("public"));
}

// =============================================================================
// parse_offset_minutes
// =============================================================================

#[test]
fn offset_defaults_to_utc() {
    assert_eq!(parse_offset_minutes(None).unwrap(), UtcOffset::UTC);
}

#[test]
fn offset_parses_positive_and_negative_minutes() {
    assert_eq!(parse_offset_minutes(Some("330")).unwrap().whole_minutes(), 330);
    assert_eq!(parse_offset_minutes(Some("-300")).unwrap().whole_minutes(), -300);
}

#[test]
fn offset_rejects_garbage() {
    assert!(parse_offset_minutes(Some("five")).is_err());
}

#[test]
fn offset_rejects_out_of_range() {
    assert!(parse_offset_minutes(Some("100000")).is_err());
}

// =============================================================================
// defaults
// =============================================================================

#[test]
fn default_config_is_gated_utc_current_dir() {
    let config = TrackerConfig::default();
    assert_eq!(config.list_access, RecordListAccess::AdminOnly);
    assert_eq!(config.export_dir, PathBuf::from("."));
    assert_eq!(config.display_offset, UtcOffset::UTC);
}
