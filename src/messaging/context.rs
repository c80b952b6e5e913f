// Context — one isolated execution context and the handle used to reach it.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::listener::{Dispatch, Listener};
use crate::protocol::{DetectionResponse, ExtractedContent, Message, Reply};

/// Failures of the messaging layer itself, as seen by a sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagingError {
    /// The target context has shut down.
    ContextClosed { context: &'static str },
    /// The reply channel was dropped without an answer: no listener claimed
    /// the message, or the listener that claimed it panicked.
    NoResponse {
        context: &'static str,
        action: &'static str,
    },
    /// A reply arrived but was not the kind the action produces.
    UnexpectedReply {
        context: &'static str,
        action: &'static str,
    },
}

impl fmt::Display for MessagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessagingError::ContextClosed { context } => {
                write!(f, "context '{}' is no longer running", context)
            }
            MessagingError::NoResponse { context, action } => {
                write!(f, "context '{}' never answered '{}'", context, action)
            }
            MessagingError::UnexpectedReply { context, action } => {
                write!(
                    f,
                    "context '{}' answered '{}' with the wrong reply type",
                    context, action
                )
            }
        }
    }
}

impl std::error::Error for MessagingError {}

struct Envelope {
    message: Message,
    reply: oneshot::Sender<Reply>,
}

/// A context under construction. Listeners are fixed once it is spawned.
pub struct Context {
    name: &'static str,
    listeners: Vec<Arc<dyn Listener>>,
}

impl Context {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Listeners are consulted in registration order.
    pub fn with_listener(mut self, listener: impl Listener) -> Self {
        self.listeners.push(Arc::new(listener));
        self
    }

    /// Start the context's event loop and return a handle to it.
    ///
    /// The loop runs until every handle has been dropped (or its runtime
    /// shuts down). Must be called
    /// from within a tokio runtime.
    pub fn spawn(self) -> ContextHandle {
        let (tx, mut rx) = mpsc::unbounded_channel::<Envelope>();
        let name = self.name;
        let listeners = self.listeners;

        tokio::spawn(async move {
            debug!(context = name, listeners = listeners.len(), "Context started");
            while let Some(envelope) = rx.recv().await {
                dispatch(name, &listeners, envelope);
            }
            debug!(context = name, "Context stopped");
        });

        ContextHandle { name, inbox: tx }
    }
}

/// Hand one message to the listeners. The first listener that doesn't
/// ignore it owns the reply channel.
///
/// A listener that panics loses only this message's reply; the loop and the
/// other listeners carry on.
fn dispatch(name: &'static str, listeners: &[Arc<dyn Listener>], envelope: Envelope) {
    let Envelope { message, reply } = envelope;
    let action = message.action();

    for listener in listeners {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.on_message(&message)));
        let Ok(outcome) = outcome else {
            warn!(context = name, action, "Listener panicked; dropping reply channel");
            return;
        };

        match outcome {
            Dispatch::Ignored => continue,
            Dispatch::Reply(value) => {
                if reply.send(value).is_err() {
                    debug!(context = name, action, "Sender gave up before reply");
                }
                return;
            }
            Dispatch::Pending(future) => {
                // Off the loop, so the context keeps serving other messages
                tokio::spawn(async move {
                    let value = future.await;
                    if reply.send(value).is_err() {
                        debug!(context = name, action, "Sender gave up before reply");
                    }
                });
                return;
            }
        }
    }

    warn!(context = name, action, "No listener answered; dropping reply channel");
}

/// Cloneable address of a running context.
#[derive(Clone)]
pub struct ContextHandle {
    name: &'static str,
    inbox: mpsc::UnboundedSender<Envelope>,
}

impl ContextHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Send a message and wait for its single reply.
    pub async fn send(&self, message: Message) -> Result<Reply, MessagingError> {
        let action = message.action();
        let (tx, rx) = oneshot::channel();

        self.inbox
            .send(Envelope { message, reply: tx })
            .map_err(|_| MessagingError::ContextClosed { context: self.name })?;

        rx.await.map_err(|_| MessagingError::NoResponse {
            context: self.name,
            action,
        })
    }

    /// Send `check_scam` and unwrap the detection reply.
    pub async fn check_scam(&self, url: &str) -> Result<DetectionResponse, MessagingError> {
        let message = Message::CheckScam {
            url: url.to_string(),
        };
        match self.send(message).await? {
            Reply::Detection(response) => Ok(response),
            Reply::Content(_) => Err(MessagingError::UnexpectedReply {
                context: self.name,
                action: "check_scam",
            }),
        }
    }

    /// Send `extract_content` and unwrap the content reply.
    pub async fn extract_content(&self) -> Result<ExtractedContent, MessagingError> {
        match self.send(Message::ExtractContent).await? {
            Reply::Content(content) => Ok(content),
            Reply::Detection(_) => Err(MessagingError::UnexpectedReply {
                context: self.name,
                action: "extract_content",
            }),
        }
    }
}
