// HtmlPage — PageAdapter over a parsed HTML document.
//
// The document source is kept as a string and reparsed on each read, since
// scraper's tree isn't Send. Parsing is deterministic, so element positions
// in document order are stable keys for the styles applied to them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector, StrTendril};
use tracing::{debug, warn};

use super::traits::{Banner, PageAdapter, VerdictStyle, BANNER_LIFETIME};

/// Elements whose text never counts as visible.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

pub struct HtmlPage {
    source: String,
    /// Applied styles, keyed by element position in document order.
    styles: Mutex<HashMap<usize, VerdictStyle>>,
    banners: Arc<Mutex<Vec<Banner>>>,
    next_banner_id: AtomicU64,
}

impl HtmlPage {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            styles: Mutex::new(HashMap::new()),
            banners: Arc::new(Mutex::new(Vec::new())),
            next_banner_id: AtomicU64::new(1),
        }
    }

    /// Load a page from the network.
    pub async fn fetch(url: &str) -> Result<Self> {
        let response = reqwest::get(url)
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("{} returned {}", url, response.status());
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {url}"))?;
        Ok(Self::new(body))
    }

    /// Styles applied to the elements matching `selector`, in document order.
    /// `None` for a matching element that hasn't been styled.
    pub fn styles_for(&self, selector: &str) -> Vec<Option<VerdictStyle>> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        let styles = self.styles.lock().unwrap_or_else(PoisonError::into_inner);
        let document = Html::parse_document(&self.source);

        elements_in_order(&document)
            .filter(|(_, element)| selector.matches(element))
            .map(|(position, _)| styles.get(&position).copied())
            .collect()
    }

    /// Banners currently on the page.
    pub fn banners(&self) -> Vec<Banner> {
        self.banners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove a banner by id. Returns false if it was already gone.
    pub fn remove_banner(&self, id: u64) -> bool {
        remove_banner(&self.banners, id)
    }

    /// Serialize the page as it looks now: verdict styles inlined on the
    /// elements they were applied to, live banners appended to `<body>`.
    pub fn render(&self) -> String {
        let mut document = Html::parse_document(&self.source);

        let styled: Vec<_> = {
            let styles = self.styles.lock().unwrap_or_else(PoisonError::into_inner);
            elements_in_order(&document)
                .filter_map(|(position, element)| {
                    styles.get(&position).map(|style| (element.id(), style.css()))
                })
                .collect()
        };

        for (id, css) in styled {
            if let Some(mut node) = document.tree.get_mut(id) {
                if let Node::Element(element) = node.value() {
                    append_inline_style(element, &css);
                }
            }
        }

        let mut html = document.html();
        let banners: String = self
            .banners()
            .iter()
            .map(|b| format!("<div style=\"{}\">{}</div>", b.css(), b.text()))
            .collect();
        match html.rfind("</body>") {
            Some(at) => html.insert_str(at, &banners),
            None => html.push_str(&banners),
        }
        html
    }
}

impl PageAdapter for HtmlPage {
    fn extract_text(&self) -> String {
        let document = Html::parse_document(&self.source);
        visible_text(&document)
    }

    fn apply_verdict_style(&self, selector: &str, is_scam: bool) -> usize {
        let Some(parsed) = parse_selector(selector) else {
            return 0;
        };
        let style = VerdictStyle::for_verdict(is_scam);
        let document = Html::parse_document(&self.source);
        let mut styles = self.styles.lock().unwrap_or_else(PoisonError::into_inner);

        let mut styled = 0;
        for (position, element) in elements_in_order(&document) {
            if parsed.matches(&element) {
                styles.insert(position, style);
                styled += 1;
            }
        }

        debug!(selector, is_scam, styled, "Applied verdict style");
        styled
    }

    fn show_transient_banner(&self, is_scam: bool) -> Banner {
        let banner = Banner {
            id: self.next_banner_id.fetch_add(1, Ordering::Relaxed),
            is_scam,
        };
        self.banners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(banner.clone());

        let banners = Arc::clone(&self.banners);
        let id = banner.id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(BANNER_LIFETIME).await;
                    if !remove_banner(&banners, id) {
                        debug!(id, "Banner already removed");
                    }
                });
            }
            Err(_) => warn!(id, "No runtime to schedule banner removal"),
        }

        banner
    }
}

fn remove_banner(banners: &Mutex<Vec<Banner>>, id: u64) -> bool {
    let mut banners = banners.lock().unwrap_or_else(PoisonError::into_inner);
    let before = banners.len();
    banners.retain(|b| b.id != id);
    banners.len() != before
}

/// Add `css` to the element's `style` attribute, keeping whatever was there.
fn append_inline_style(element: &mut Element, css: &str) {
    if let Some((_, value)) = element
        .attrs
        .iter_mut()
        .find(|(name, _)| &*name.local == "style")
    {
        let merged = format!("{} {}", value.trim_end(), css);
        *value = StrTendril::from(merged.trim_start());
        return;
    }

    // Plain HTML attribute: no namespace, no prefix
    let mut name = element.name.clone();
    name.prefix = None;
    name.ns = "".into();
    name.local = "style".into();
    element.attrs.insert(name, StrTendril::from(css));
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(selector, error = %e, "Invalid selector; nothing matched");
            None
        }
    }
}

/// Every element of the document, paired with its position in document order.
fn elements_in_order(document: &Html) -> impl Iterator<Item = (usize, ElementRef<'_>)> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .enumerate()
}

/// Text a reader would see: text nodes outside hidden elements, with runs of
/// whitespace collapsed to a single space.
fn visible_text(document: &Html) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_ELEMENTS.contains(&e.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}
