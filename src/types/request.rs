//! Request body sent to the answer service.
//!
//! The service expects a flat JSON object combining the birth profile with
//! the question:
//!
//! ```json
//! {"name":"Asha","date":"1990-04-12","time":"06:45","place":"Pune",
//!  "latitude":18.52,"longitude":73.85,"question":"When will I move abroad?",
//!  "language":"english","response_style":"detailed"}
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ChatError, ChatResult};

static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("date regex"));

static TIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time regex"));

/// Languages the answer service can respond in.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
    Telugu,
    Kannada,
    Malayalam,
    Bengali,
    Marathi,
    Gujarati,
}

impl Language {
    /// Returns the wire value for this language.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Hindi => "hindi",
            Self::Tamil => "tamil",
            Self::Telugu => "telugu",
            Self::Kannada => "kannada",
            Self::Malayalam => "malayalam",
            Self::Bengali => "bengali",
            Self::Marathi => "marathi",
            Self::Gujarati => "gujarati",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer verbosity requested from the service. Only `detailed` is used.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStyle {
    #[default]
    Detailed,
}

/// Birth data the prediction is computed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BirthProfile {
    /// Person's name.
    pub name: String,
    /// Birth date, `YYYY-MM-DD`.
    pub date: String,
    /// Birth time, `HH:MM` (24h).
    pub time: String,
    /// Birth place, free text.
    pub place: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl BirthProfile {
    /// Checks field shapes before a request is sent.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::InvalidRequest` naming the first bad field.
    pub fn validate(&self) -> ChatResult<()> {
        if self.name.trim().is_empty() {
            return Err(ChatError::invalid_request("name must not be empty"));
        }
        if !DATE_REGEX.is_match(&self.date) {
            return Err(ChatError::invalid_request(format!(
                "date '{}' must be YYYY-MM-DD",
                self.date
            )));
        }
        if !TIME_REGEX.is_match(&self.time) {
            return Err(ChatError::invalid_request(format!(
                "time '{}' must be HH:MM",
                self.time
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ChatError::invalid_request(format!(
                "latitude {} out of range",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ChatError::invalid_request(format!(
                "longitude {} out of range",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Full request body for one chat turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerRequest {
    /// Birth data, flattened into the top-level object.
    #[serde(flatten)]
    pub profile: BirthProfile,
    /// The user's question.
    pub question: String,
    /// Response language.
    pub language: Language,
    /// Response verbosity.
    pub response_style: ResponseStyle,
}

impl AnswerRequest {
    /// Builds a validated request.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::InvalidRequest` if the profile is malformed or
    /// the question is blank.
    pub fn new(
        profile: BirthProfile,
        question: impl Into<String>,
        language: Language,
    ) -> ChatResult<Self> {
        let question = question.into().trim().to_string();
        if question.is_empty() {
            return Err(ChatError::invalid_request("question must not be empty"));
        }
        profile.validate()?;
        Ok(Self {
            profile,
            question,
            language,
            response_style: ResponseStyle::Detailed,
        })
    }
}
