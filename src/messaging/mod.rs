// Messaging runtime — isolated contexts that talk only through one-shot
// request/reply messages.
//
// Each context is a tokio task with a private inbox and a fixed set of
// listeners registered when it is spawned. A listener either answers on the
// spot, ignores the message, or hands back a future: the runtime then keeps
// the reply channel alive and delivers the future's output when it resolves.
// That last case is what lets the background context answer after a network
// call without the reply being dropped.

pub mod context;
pub mod listener;

pub use context::{Context, ContextHandle, MessagingError};
pub use listener::{Dispatch, Listener};
