// Message and reply types.
//
// `Message` is what a context sends; `Reply` is the single value that comes
// back on the reply channel. Both are plain serde types so they can be
// logged, persisted in tests, or bridged to a real extension runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DetectionError;

/// Hard cap on extracted page text, in characters.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// A request sent to another context, discriminated by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Message {
    /// Ask the background context to classify a URL.
    CheckScam {
        /// Missing on the wire deserializes as empty, which fails validation.
        #[serde(default)]
        url: String,
    },
    /// Ask the page context for its visible text.
    ExtractContent,
}

impl Message {
    /// Wire name of the action, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            Message::CheckScam { .. } => "check_scam",
            Message::ExtractContent => "extract_content",
        }
    }
}

/// The one value delivered back on a reply channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Detection(DetectionResponse),
    Content(ExtractedContent),
}

/// Body of a detection request. Also the JSON body POSTed to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionRequest {
    pub url: String,
}

impl DetectionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Reject the request before any I/O if the URL is unusable.
    pub fn validate(&self) -> Result<(), DetectionError> {
        validate_url(&self.url)
    }
}

/// Check that a URL is non-empty and starts with an `http` scheme prefix.
///
/// This is a prefix check only: `https://` passes because it starts with
/// `http`, and so does anything else that does.
pub fn validate_url(url: &str) -> Result<(), DetectionError> {
    if url.is_empty() || !url.starts_with("http") {
        return Err(DetectionError::InvalidUrl);
    }
    Ok(())
}

/// A successful answer from the classification service.
///
/// `result` is kept verbatim; use [`Classification::verdict`] to interpret
/// it. The optional fields are extras the service may include. Anything else
/// in the body (the echoed `url`, for one) lands in `extra` and is written
/// back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub result: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspicious_word_count: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Classification {
    pub fn new(result: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            message: message.into(),
            confidence: None,
            suspicious_word_count: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_result(&self.result)
    }
}

/// Outcome of one detection request. Exactly one shape per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetectionResponse {
    Success(Classification),
    Failure { error: String },
}

impl DetectionResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        DetectionResponse::Failure {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DetectionResponse::Failure { .. })
    }

    /// The verdict, if this is a success.
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            DetectionResponse::Success(c) => Some(c.verdict()),
            DetectionResponse::Failure { .. } => None,
        }
    }
}

impl From<Classification> for DetectionResponse {
    fn from(classification: Classification) -> Self {
        DetectionResponse::Success(classification)
    }
}

impl From<DetectionError> for DetectionResponse {
    fn from(err: DetectionError) -> Self {
        DetectionResponse::failure(err.user_message())
    }
}

/// Scam or not. Anything other than the literal "Scam" counts as legitimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Scam,
    Legitimate,
}

impl Verdict {
    pub fn from_result(result: &str) -> Self {
        if result == "Scam" {
            Verdict::Scam
        } else {
            Verdict::Legitimate
        }
    }

    pub fn is_scam(self) -> bool {
        self == Verdict::Scam
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Scam => write!(f, "Scam"),
            Verdict::Legitimate => write!(f, "Legitimate"),
        }
    }
}

/// Visible page text, already truncated for transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub content: String,
}

impl ExtractedContent {
    /// Build from raw page text, keeping at most [`MAX_CONTENT_CHARS`] characters.
    pub fn from_text(text: &str) -> Self {
        let content = match text.char_indices().nth(MAX_CONTENT_CHARS) {
            Some((byte_idx, _)) => text[..byte_idx].to_string(),
            None => text.to_string(),
        };
        Self { content }
    }
}
