// Error handling tests
// Author: kelexine (https://github.com/kelexine)

use polytrans::error::TranslateError;

#[test]
fn test_error_display_messages() {
    let errors = vec![
        TranslateError::Provider("Bad shape".to_string()),
        TranslateError::InvalidRequest("Bad request".to_string()),
        TranslateError::Config("Missing key".to_string()),
        TranslateError::Unsupported {
            provider: "google",
            operation: "usage",
        },
        TranslateError::Transport {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            body: String::new(),
        },
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[test]
fn test_transport_error_carries_status_text() {
    let error = TranslateError::Transport {
        status: 500,
        status_text: "Internal Server Error".to_string(),
        body: "{\"message\":\"boom\"}".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("500"));
    assert!(display.contains("Internal Server Error"));
    assert!(display.contains("boom"));
    assert_eq!(error.status(), Some(500));
}

#[test]
fn test_unsupported_error() {
    let error = TranslateError::Unsupported {
        provider: "microsoft",
        operation: "usage",
    };
    assert_eq!(format!("{}", error), "microsoft does not support usage");
    assert_eq!(error.status(), None);
}

#[test]
fn test_json_error_conversion() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
    let error: TranslateError = parse.unwrap_err().into();
    assert!(matches!(error, TranslateError::Json(_)));
    assert!(format!("{}", error).starts_with("JSON error"));
}

#[test]
fn test_provider_error() {
    let error = TranslateError::Provider("expected 2 translations, received 1".to_string());
    assert!(format!("{}", error).contains("expected 2 translations"));
}
