// Page extractor — the page context's listener and its direct operations.

use std::sync::Arc;

use tracing::debug;

use super::traits::{Banner, PageAdapter};
use crate::messaging::{Context, ContextHandle, Dispatch, Listener};
use crate::protocol::{ExtractedContent, Message, Reply};

/// Name the page context registers under.
pub const PAGE_CONTEXT: &str = "page";

#[derive(Clone)]
pub struct PageExtractor {
    page: Arc<dyn PageAdapter>,
}

impl PageExtractor {
    pub fn new(page: Arc<dyn PageAdapter>) -> Self {
        Self { page }
    }

    /// Visible text, capped for transport. Never fails.
    pub fn extract_content(&self) -> ExtractedContent {
        let content = ExtractedContent::from_text(&self.page.extract_text());
        debug!(chars = content.content.chars().count(), "Extracted page content");
        content
    }

    /// Mark every element matching `selector` with the verdict palette.
    pub fn annotate(&self, selector: &str, is_scam: bool) -> usize {
        self.page.apply_verdict_style(selector, is_scam)
    }

    /// Show a verdict banner that removes itself after a few seconds.
    pub fn show_transient_banner(&self, is_scam: bool) -> Banner {
        self.page.show_transient_banner(is_scam)
    }
}

impl Listener for PageExtractor {
    fn on_message(&self, message: &Message) -> Dispatch {
        match message {
            Message::ExtractContent => Dispatch::Reply(Reply::Content(self.extract_content())),
            _ => Dispatch::Ignored,
        }
    }
}

/// Start a page context serving `extract_content` for the given page.
pub fn spawn_page(page: Arc<dyn PageAdapter>) -> ContextHandle {
    Context::new(PAGE_CONTEXT)
        .with_listener(PageExtractor::new(page))
        .spawn()
}
