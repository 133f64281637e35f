//! Error classification as seen by callers.

use starchat::api::is_retryable_message;
use starchat::error::{ChatError, FailureKind};

#[test]
fn test_retryable_statuses() {
    assert!(ChatError::upstream_fatal(503, "").is_retryable());
    assert!(!ChatError::upstream_fatal(500, "").is_retryable());
    assert!(ChatError::transient_network("HTTP 504: timeout", 3).is_retryable());
    assert!(!ChatError::EmptyResponse.is_retryable());
}

#[test]
fn test_client_messages_classify() {
    assert!(is_retryable_message("HTTP 502: bad gateway"));
    assert!(is_retryable_message("Network error: error sending request"));
    assert!(!is_retryable_message("HTTP 401: unauthorized"));
}

#[test]
fn test_failure_messages_are_distinct() {
    let kinds = [FailureKind::ServerBusy, FailureKind::Connection, FailureKind::Generic];
    for (i, a) in kinds.iter().enumerate() {
        for b in &kinds[i + 1..] {
            assert_ne!(a.message(), b.message());
        }
    }
}

#[test]
fn test_failure_kind_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&FailureKind::ServerBusy).unwrap(),
        "\"server_busy\""
    );
}

#[test]
fn test_invalid_request_display() {
    let err = ChatError::invalid_request("question must not be empty");
    assert_eq!(
        err.to_string(),
        "input: invalid request: question must not be empty"
    );
}
