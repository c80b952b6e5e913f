// Page context — reads and marks up the document the user is looking at.
//
// The PageAdapter trait is the narrow capability set the rest of the crate
// depends on. HtmlPage implements it over a parsed HTML document; a real
// browser integration would implement it over the live DOM instead.

pub mod extractor;
pub mod html;
pub mod traits;

pub use extractor::{spawn_page, PageExtractor, PAGE_CONTEXT};
pub use html::HtmlPage;
pub use traits::{Banner, PageAdapter, VerdictStyle, BANNER_LIFETIME};
