use super::*;

#[test]
fn missing_field_displays_form_message() {
    let err = ValidationError::MissingField("Address is required");
    assert_eq!(err.to_string(), "Address is required");
    assert_eq!(err.error_code(), "E_MISSING_FIELD");
}

#[test]
fn validation_errors_are_not_retryable() {
    assert!(!ValidationError::EmptyPassword.retryable());
    assert!(!ValidationError::PasswordMismatch.retryable());
}

#[test]
fn transport_and_timeout_are_retryable() {
    assert!(BackendError::Transport("reset".into()).retryable());
    assert!(BackendError::Timeout.retryable());
    assert!(BackendError::Unavailable.retryable());
}

#[test]
fn rejection_is_not_retryable() {
    let err = BackendError::Rejected("not admin".into());
    assert!(!err.retryable());
    assert_eq!(err.error_code(), "E_BACKEND_REJECTED");
    assert_eq!(err.to_string(), "backend rejected call: not admin");
}

#[test]
fn config_error_code() {
    let err = ConfigError::Parse("bad".into());
    assert_eq!(err.error_code(), "E_CONFIG_PARSE");
    assert_eq!(err.to_string(), "config parse failed: bad");
}
