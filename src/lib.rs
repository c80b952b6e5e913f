// Scamwatch: is the page I'm looking at a scam?
//
// This is the library root. The popup, background and page contexts each
// live in their own module and reach one another only through messaging.

pub mod classifier;
pub mod config;
pub mod messaging;
pub mod orchestrator;
pub mod page;
pub mod popup;
pub mod protocol;
