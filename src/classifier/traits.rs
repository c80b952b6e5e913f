// Scam classifier trait — the swap-ready abstraction.

use anyhow::Result;
use async_trait::async_trait;

use crate::protocol::Classification;

/// Trait for classifying a URL. Implementations are async because the
/// classification happens in a remote service.
#[async_trait]
pub trait ScamClassifier: Send + Sync {
    /// Classify one URL. Any failure (network, status, body) is an error;
    /// callers do not distinguish between them.
    async fn classify(&self, url: &str) -> Result<Classification>;
}
