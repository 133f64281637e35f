//! Common test utilities and fixtures for Starchat.
//!
//! - Temporary directories for settings files
//! - A valid birth profile and request
//! - Builders for answer-stream bodies

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use starchat::api::RetryPolicy;
use starchat::types::{AnswerRequest, BirthProfile, Language};

/// Test context providing common setup for integration tests.
pub struct TestContext {
    /// Temporary directory for test file operations.
    pub temp_dir: tempfile::TempDir,
}

impl TestContext {
    /// Creates a new test context with a temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            temp_dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// Returns the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Creates a file in the temporary directory with the given content.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("failed to write file");
        path
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn sample_profile() -> BirthProfile {
    BirthProfile {
        name: "Asha".to_string(),
        date: "1990-04-12".to_string(),
        time: "06:45".to_string(),
        place: "Pune".to_string(),
        latitude: 18.52,
        longitude: 73.85,
    }
}

pub fn sample_request(question: &str) -> AnswerRequest {
    AnswerRequest::new(sample_profile(), question, Language::English).expect("valid request")
}

/// Retry policy with the default attempt count and millisecond delays.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
    }
}

/// One `data:` line carrying a chunk event.
pub fn chunk_line(text: &str) -> String {
    format!(
        "data: {}",
        serde_json::json!({"status": "chunk", "response": text})
    )
}

/// A complete stream body: one chunk per fragment, then `[DONE]`.
pub fn stream_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    for fragment in fragments {
        body.push_str(&chunk_line(fragment));
        body.push_str("\n\n");
    }
    body.push_str("data: [DONE]\n\n");
    body
}
