use super::*;

#[test]
fn test_app_error_status_codes() {
    assert_eq!(AppError::Validation("test".into()).status_code(), 400);
    assert_eq!(AppError::NotFound("test".into()).status_code(), 404);
    assert_eq!(AppError::PayloadTooLarge("test".into()).status_code(), 413);
    assert_eq!(
        AppError::UnsupportedMediaType("test".into()).status_code(),
        415
    );
    assert_eq!(AppError::Storage("test".into()).status_code(), 500);
    assert_eq!(AppError::Internal("test".into()).status_code(), 500);
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(
        AppError::Validation("test".into()).error_code(),
        "VALIDATION_ERROR"
    );
    assert_eq!(AppError::NotFound("test".into()).error_code(), "NOT_FOUND");
    assert_eq!(
        AppError::PayloadTooLarge("test".into()).error_code(),
        "PAYLOAD_TOO_LARGE"
    );
    assert_eq!(
        AppError::UnsupportedMediaType("test".into()).error_code(),
        "UNSUPPORTED_MEDIA_TYPE"
    );
    assert_eq!(
        AppError::Storage("test".into()).error_code(),
        "STORAGE_ERROR"
    );
    assert_eq!(
        AppError::Internal("test".into()).error_code(),
        "INTERNAL_ERROR"
    );
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::Validation("msg".into())),
        "Validation error: msg"
    );
    assert_eq!(
        format!("{}", AppError::NotFound("msg".into())),
        "Not found: msg"
    );
    assert_eq!(
        format!("{}", AppError::PayloadTooLarge("msg".into())),
        "Payload too large: msg"
    );
    assert_eq!(
        format!("{}", AppError::Storage("msg".into())),
        "Storage error: msg"
    );
}

#[test]
fn test_client_error_classification() {
    assert!(AppError::NotFound("x".into()).is_client_error());
    assert!(AppError::UnsupportedMediaType("x".into()).is_client_error());
    assert!(!AppError::Storage("x".into()).is_client_error());
    assert!(!AppError::Internal("x".into()).is_client_error());
}

#[test]
fn test_app_error_message_has_no_prefix() {
    assert_eq!(AppError::NotFound("Route not found".into()).message(), "Route not found");
    assert_eq!(AppError::Storage("disk full".into()).message(), "disk full");
}
