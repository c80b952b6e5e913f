// Scam classification — trait-based abstraction over the remote service.
//
// The ScamClassifier trait defines the interface. HttpClassifier implements
// it against the classification service's HTTP contract. The background
// context only ever sees the trait, so tests swap in an in-process fake.

pub mod http;
pub mod traits;

pub use http::HttpClassifier;
pub use traits::ScamClassifier;
