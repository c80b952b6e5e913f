// Background orchestrator — the only context that talks to the
// classification service.
//
// A `check_scam` message is validated on the context loop and, if it passes,
// turned into a pending reply: the network call runs in its own task while
// the loop keeps serving other messages. Every failure is folded into a
// `{ error }` payload before it is handed back, so the reply channel always
// gets exactly one value.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::anyhow;
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::classifier::ScamClassifier;
use crate::messaging::{Context, ContextHandle, Dispatch, Listener};
use crate::protocol::{DetectionError, DetectionRequest, DetectionResponse, Message, Reply};

/// Name the background context registers under.
pub const BACKGROUND_CONTEXT: &str = "background";

/// Owns the classifier and turns detection requests into responses.
#[derive(Clone)]
pub struct Orchestrator {
    classifier: Arc<dyn ScamClassifier>,
}

impl Orchestrator {
    pub fn new(classifier: Arc<dyn ScamClassifier>) -> Self {
        Self { classifier }
    }

    /// Validate, classify, and normalize the outcome into a response.
    ///
    /// Invalid URLs never reach the classifier. Classifier errors of every
    /// kind, panics included, become the same transport message.
    pub async fn handle_detection_request(&self, request: DetectionRequest) -> DetectionResponse {
        if let Err(rejected) = admit(&request) {
            return rejected;
        }
        self.classify_validated(request).await
    }

    /// The network half of a request that already passed validation.
    async fn classify_validated(&self, request: DetectionRequest) -> DetectionResponse {
        let outcome = AssertUnwindSafe(self.classifier.classify(&request.url))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| Err(anyhow!("classifier panicked")));

        match outcome {
            Ok(classification) => {
                debug!(
                    url = %request.url,
                    verdict = %classification.verdict(),
                    "Detection result"
                );
                classification.into()
            }
            Err(e) => {
                let err = DetectionError::Transport(e);
                warn!(url = %request.url, error = %err, "Detection failed");
                err.into()
            }
        }
    }
}

/// Log receipt and check the URL. A rejection is already the response.
fn admit(request: &DetectionRequest) -> Result<(), DetectionResponse> {
    info!(url = %request.url, "Received detection request");

    request.validate().map_err(|e| {
        warn!(url = %request.url, "Rejected detection request: {}", e);
        DetectionResponse::from(e)
    })
}

impl Listener for Orchestrator {
    fn on_message(&self, message: &Message) -> Dispatch {
        let Message::CheckScam { url } = message else {
            return Dispatch::Ignored;
        };

        let request = DetectionRequest::new(url.clone());

        // Cheap rejection stays on the loop; only real work goes pending
        if let Err(rejected) = admit(&request) {
            return Dispatch::Reply(Reply::Detection(rejected));
        }

        let orchestrator = self.clone();
        Dispatch::Pending(
            async move { Reply::Detection(orchestrator.classify_validated(request).await) }
                .boxed(),
        )
    }
}

/// Start the background context with the orchestrator as its only listener.
pub fn spawn_background(classifier: Arc<dyn ScamClassifier>) -> ContextHandle {
    Context::new(BACKGROUND_CONTEXT)
        .with_listener(Orchestrator::new(classifier))
        .spawn()
}
