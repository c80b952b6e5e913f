// Cross-context message protocol — the shapes that travel between the
// popup, background and page contexts, plus the one validation rule the
// background applies before touching the network.
//
// Every type here serializes to exactly the JSON a browser extension would
// put on the wire, so the same structs double as the HTTP request body.

pub mod error;
pub mod messages;

pub use error::DetectionError;
pub use messages::{
    validate_url, Classification, DetectionRequest, DetectionResponse, ExtractedContent, Message,
    Reply, Verdict, MAX_CONTENT_CHARS,
};
