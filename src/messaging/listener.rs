// Listener trait — the handler side of the messaging runtime.

use futures::future::BoxFuture;

use crate::protocol::{Message, Reply};

/// What a listener does with a message.
pub enum Dispatch {
    /// Answered synchronously; the reply is sent immediately.
    Reply(Reply),
    /// Will answer later. The runtime keeps the reply channel open and sends
    /// whatever the future resolves to. If the future panics, the channel is
    /// dropped and the sender sees [`MessagingError::NoResponse`].
    ///
    /// [`MessagingError::NoResponse`]: super::MessagingError::NoResponse
    Pending(BoxFuture<'static, Reply>),
    /// Not for this listener; the next one gets a turn.
    Ignored,
}

/// A message handler registered on a context for the context's whole life.
///
/// `on_message` runs on the context's loop and must not block. Long work
/// belongs in a [`Dispatch::Pending`] future, which runs off the loop.
pub trait Listener: Send + Sync + 'static {
    fn on_message(&self, message: &Message) -> Dispatch;
}
