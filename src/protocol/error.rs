// Detection error taxonomy.
//
// Callers never need to tell these apart: every variant collapses into the
// same `{ error }` payload before it leaves the context that produced it.

pub const INVALID_URL_MESSAGE: &str = "Invalid URL format.";
pub const TRANSPORT_MESSAGE: &str = "Error contacting scam detection service.";
pub const UNRESOLVED_TAB_MESSAGE: &str = "No active tab to check.";

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// URL missing or not starting with `http`. Raised before any I/O.
    #[error("{}", INVALID_URL_MESSAGE)]
    InvalidUrl,
    /// Network failure, non-2xx status, an unparseable body, or a classifier
    /// that panicked.
    #[error("{}: {:#}", TRANSPORT_MESSAGE, .0)]
    Transport(#[from] anyhow::Error),
    /// The popup could not determine which tab to check.
    #[error("{}", UNRESOLVED_TAB_MESSAGE)]
    UnresolvedTab,
}

impl DetectionError {
    /// The fixed text shown to the user for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            DetectionError::InvalidUrl => INVALID_URL_MESSAGE,
            DetectionError::Transport(_) => TRANSPORT_MESSAGE,
            DetectionError::UnresolvedTab => UNRESOLVED_TAB_MESSAGE,
        }
    }
}
