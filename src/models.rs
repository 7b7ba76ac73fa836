//! Data shapes mirroring the LibreTranslate JSON schema

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format for translate requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Plain text in, plain text out
    Text,
    /// HTML in, HTML out with markup preserved
    Html,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Text => write!(f, "text"),
            Format::Html => write!(f, "html"),
        }
    }
}

/// A language supported by the remote instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// ISO 639 language code, e.g. "en"
    pub code: String,
    /// Human-readable language name
    pub name: String,
}

/// Default language pair reported by the frontend settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontendSettingLanguage {
    /// Preselected source language
    pub source: Language,
    /// Preselected target language
    pub target: Language,
}

/// Read-only snapshot of the remote frontend configuration
///
/// Fields the server omits decode to their zero values; deployments differ
/// in which settings they report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendSetting {
    /// Whether the server manages API keys
    #[serde(rename = "apiKeys")]
    pub keys: bool,
    /// Whether requests must carry an API key
    #[serde(rename = "keyRequired")]
    pub key_required: bool,
    /// Whether the suggestions feature is enabled
    pub suggestions: bool,
    /// Maximum characters accepted per translate request
    #[serde(rename = "charLimit")]
    pub char_limit: i64,
    /// Request timeout the web frontend applies, in milliseconds
    #[serde(rename = "frontendTimeout")]
    pub frontend_timeout: i64,
    /// Default source/target pair
    pub language: FrontendSettingLanguage,
    /// File formats accepted for document translation
    #[serde(rename = "supportedFilesFormat")]
    pub supported_files_format: Vec<String>,
}

/// Outbound payload for the translate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    /// Text to translate
    pub q: String,
    /// Source language code
    pub source: String,
    /// Target language code
    pub target: String,
    /// Requested output format
    pub format: Format,
    /// API key; sent as an empty string when the server needs none
    pub api_key: String,
}

impl TranslateRequest {
    /// Create a plain-text request with no API key
    pub fn new(q: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            source: source.into(),
            target: target.into(),
            format: Format::Text,
            api_key: String::new(),
        }
    }

    /// Set the output format
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Attach an API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }
}

/// Inbound payload holding a translation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedText {
    /// The translated text
    #[serde(rename = "translatedText")]
    pub text: String,
}

/// Error envelope the remote API returns on failure responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMsg {
    /// Human-readable error description
    pub error: String,
}
