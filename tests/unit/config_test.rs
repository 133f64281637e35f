//! Settings file loading.

use std::time::Duration;

use starchat::api::RetryPolicy;
use starchat::error::ChatError;
use starchat::types::config::{ConfigError, Settings};
use starchat::types::Language;

use crate::common::TestContext;

#[test]
fn test_load_explicit_file() {
    let ctx = TestContext::new();
    let path = ctx.create_file(
        "config.toml",
        r#"
base_url = "https://answers.example.com/"
language = "tamil"

[profile]
name = "Asha"
date = "1990-04-12"
time = "06:45"
place = "Pune"
latitude = 18.52
longitude = 73.85

[retry]
base_delay_ms = 250

[loading]
interval_ms = 1500
messages = ["Looking up…"]
"#,
    );

    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.language, Language::Tamil);
    assert_eq!(
        settings.endpoint_url(),
        "https://answers.example.com/api/chat/stream"
    );
    assert_eq!(settings.profile.as_ref().map(|p| p.place.as_str()), Some("Pune"));
    assert_eq!(settings.loading.interval(), Duration::from_millis(1500));

    let policy = RetryPolicy::from(&settings.retry);
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.delay_for(1), Duration::from_millis(250));
    assert_eq!(policy.delay_for(2), Duration::from_millis(500));
}

#[test]
fn test_missing_explicit_file_is_error() {
    let ctx = TestContext::new();
    let err = Settings::load(Some(&ctx.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_bad_language_is_rejected() {
    let ctx = TestContext::new();
    let path = ctx.create_file("config.toml", "language = \"klingon\"\n");
    let err = Settings::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));

    let chat: ChatError = err.into();
    assert_eq!(chat.stage(), "input");
}
