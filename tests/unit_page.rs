// Unit tests for the page context.
//
// Visible-text extraction and its 10,000 character cap, verdict styling by
// selector, and the self-removing banner (run on paused time).

use std::sync::Arc;
use std::time::Duration;

use scamwatch::page::{
    spawn_page, HtmlPage, PageAdapter, PageExtractor, VerdictStyle, BANNER_LIFETIME,
};

fn extractor_for(html: &str) -> (Arc<HtmlPage>, PageExtractor) {
    let page = Arc::new(HtmlPage::new(html));
    let extractor = PageExtractor::new(page.clone());
    (page, extractor)
}

// ============================================================
// Extraction
// ============================================================

#[test]
fn extracts_visible_text() {
    let (_, extractor) = extractor_for("<html><body>Hello World</body></html>");
    assert_eq!(extractor.extract_content().content, "Hello World");
}

#[test]
fn long_text_is_cut_to_first_ten_thousand_chars() {
    let text: String = ('a'..='z').cycle().take(15_000).collect();
    let (_, extractor) = extractor_for(&format!("<html><body>{text}</body></html>"));
    let content = extractor.extract_content().content;
    assert_eq!(content.len(), 10_000);
    assert_eq!(content, text[..10_000]);
}

#[test]
fn empty_document_yields_empty_text() {
    let (_, extractor) = extractor_for("");
    assert_eq!(extractor.extract_content().content, "");
}

#[test]
fn inline_markup_is_joined_and_hidden_text_skipped() {
    let (_, extractor) = extractor_for(
        "<html><head><title>Prize!</title></head><body>\
         <p>Claim   your <b>free</b>\n prize</p>\
         <noscript>enable js</noscript><script>track()</script>\
         </body></html>",
    );
    assert_eq!(extractor.extract_content().content, "Claim your free prize");
}

#[tokio::test]
async fn extract_content_over_messaging() {
    let page = Arc::new(HtmlPage::new("<body><h1>Welcome</h1></body>"));
    let context = spawn_page(page);
    let content = context.extract_content().await.unwrap();
    assert_eq!(content.content, "Welcome");
}

// ============================================================
// Verdict styling
// ============================================================

const LINKS: &str = "<body>\
    <a class=\"offer\" href=\"#\">Win</a>\
    <a class=\"offer\" href=\"#\">Claim</a>\
    <a href=\"#\">About</a>\
    </body>";

#[test]
fn annotate_styles_every_match() {
    let (page, extractor) = extractor_for(LINKS);
    assert_eq!(extractor.annotate("a.offer", true), 2);
    assert_eq!(
        page.styles_for("a.offer"),
        vec![Some(VerdictStyle::SCAM), Some(VerdictStyle::SCAM)]
    );
    assert_eq!(
        page.styles_for("a"),
        vec![Some(VerdictStyle::SCAM), Some(VerdictStyle::SCAM), None]
    );
}

#[test]
fn annotate_is_idempotent_and_reapplies() {
    let (page, extractor) = extractor_for(LINKS);
    extractor.annotate("a", true);
    extractor.annotate("a", true);
    assert_eq!(page.styles_for("a"), vec![Some(VerdictStyle::SCAM); 3]);

    extractor.annotate("a", false);
    assert_eq!(page.styles_for("a"), vec![Some(VerdictStyle::SAFE); 3]);
}

#[test]
fn annotate_without_matches_styles_nothing() {
    let (_, extractor) = extractor_for(LINKS);
    assert_eq!(extractor.annotate("table", true), 0);
}

#[test]
fn render_inlines_styles_on_matched_elements_only() {
    let (page, extractor) = extractor_for(LINKS);
    extractor.annotate("a.offer", true);
    let html = page.render();

    let scam = format!("style=\"{}\"", VerdictStyle::SCAM.css());
    assert_eq!(html.matches(&scam).count(), 2);
    assert!(html.contains("<a href=\"#\">About</a>"));
}

#[test]
fn render_of_untouched_page_has_no_styles() {
    let (page, _) = extractor_for(LINKS);
    assert!(!page.render().contains("style="));
}

#[test]
fn palettes() {
    assert_eq!(VerdictStyle::SCAM.border, "2px solid red");
    assert_eq!(VerdictStyle::SCAM.background, "#ffcccc");
    assert_eq!(VerdictStyle::SAFE.border, "2px solid green");
    assert_eq!(VerdictStyle::SAFE.background, "#ccffcc");
    assert_eq!(
        VerdictStyle::for_verdict(true).css(),
        "border: 2px solid red; background-color: #ffcccc;"
    );
}

// ============================================================
// Transient banner
// ============================================================

async fn wait_past_banner_lifetime() {
    tokio::time::sleep(BANNER_LIFETIME + Duration::from_millis(1)).await;
    tokio::task::yield_now().await;
}

#[tokio::test(start_paused = true)]
async fn banner_appears_then_removes_itself() {
    let (page, extractor) = extractor_for("<body></body>");
    let banner = extractor.show_transient_banner(true);

    let banners = page.banners();
    assert_eq!(banners.len(), 1);
    assert!(banners[0].is_scam);
    assert_eq!(banners[0].text(), "Warning: Scam Detected!");
    assert!(banner.css().contains("background-color: red"));
    assert!(banner.css().contains("position: fixed"));

    tokio::time::sleep(BANNER_LIFETIME - Duration::from_millis(1)).await;
    assert_eq!(page.banners().len(), 1);

    wait_past_banner_lifetime().await;
    assert!(page.banners().is_empty());
}

#[tokio::test(start_paused = true)]
async fn render_shows_banner_until_it_expires() {
    let (page, extractor) = extractor_for("<html><body><p>Hi</p></body></html>");
    extractor.show_transient_banner(true);

    let html = page.render();
    assert!(html.contains("Warning: Scam Detected!</div></body>"));
    assert!(html.contains("background-color: red"));

    wait_past_banner_lifetime().await;
    assert!(!page.render().contains("Warning: Scam Detected!"));
}

#[tokio::test(start_paused = true)]
async fn safe_banner_is_green() {
    let (_, extractor) = extractor_for("<body></body>");
    let banner = extractor.show_transient_banner(false);
    assert_eq!(banner.text(), "This page seems legitimate.");
    assert_eq!(banner.background(), "green");
}

#[tokio::test(start_paused = true)]
async fn removal_tolerates_banner_already_gone() {
    let (page, extractor) = extractor_for("<body></body>");
    let first = extractor.show_transient_banner(true);
    assert!(page.remove_banner(first.id));
    assert!(!page.remove_banner(first.id));

    wait_past_banner_lifetime().await;
    assert!(page.banners().is_empty());

    let second = extractor.show_transient_banner(true);
    assert_ne!(first.id, second.id);
    assert_eq!(page.banners().len(), 1);
    wait_past_banner_lifetime().await;
    assert!(page.banners().is_empty());
}

#[tokio::test(start_paused = true)]
async fn each_call_inserts_exactly_one_banner() {
    let page = Arc::new(HtmlPage::new("<body></body>"));
    page.show_transient_banner(true);
    page.show_transient_banner(false);
    assert_eq!(page.banners().len(), 2);
    wait_past_banner_lifetime().await;
    assert!(page.banners().is_empty());
}
