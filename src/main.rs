use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use scamwatch::classifier::HttpClassifier;
use scamwatch::config::Config;
use scamwatch::orchestrator::spawn_background;
use scamwatch::page::{spawn_page, HtmlPage, PageExtractor};
use scamwatch::popup::{CheckOutcome, FixedTab, PopupController, TerminalView};

/// Scamwatch: is the page I'm looking at a scam?
///
/// Sends the page's URL to a scam classification service and shows the
/// verdict, the way the browser popup would.
#[derive(Parser)]
#[command(name = "scamwatch", version, about)]
struct Cli {
    /// Base URL of the classification service (overrides SCAMWATCH_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a URL, as if it were the active tab
    Check {
        /// The URL to check. Omit to see how a missing tab is reported.
        url: Option<String>,

        /// Local HTML copy of the page to mark up with the verdict
        #[arg(long)]
        page: Option<PathBuf>,

        /// Elements on the page to highlight (CSS selector)
        #[arg(long, default_value = "body")]
        selector: String,

        /// Where to write the annotated page (stdout if omitted)
        #[arg(long, requires = "page")]
        out: Option<PathBuf>,
    },

    /// Print a page's visible text, capped at 10,000 characters
    Extract {
        /// http(s) URL or path to an HTML file
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("scamwatch=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            url,
            page,
            selector,
            out,
        } => {
            let config = Config::load()?.with_api_url(cli.api_url);
            config.require_api_url()?;

            let classifier = HttpClassifier::new(&config.api_url)?;
            info!(endpoint = classifier.endpoint(), "Using classification service");
            let background = spawn_background(Arc::new(classifier));

            let mut popup = PopupController::new(TerminalView::new(), FixedTab(url), background);
            let outcome = popup.check_current_page().await;

            let is_scam = match &outcome {
                CheckOutcome::Scam(_) => true,
                CheckOutcome::Legitimate(_) => false,
                CheckOutcome::Error(_) => return Ok(ExitCode::FAILURE),
            };

            if let Some(path) = page {
                annotate_local_page(&path, &selector, is_scam, out.as_deref()).await?;
            }

            Ok(if is_scam {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            })
        }

        Commands::Extract { source } => {
            let page = load_page(&source).await?;
            let context = spawn_page(Arc::new(page));
            let extracted = context
                .extract_content()
                .await
                .context("Page context did not answer")?;

            if extracted.content.is_empty() {
                println!("{}", "(no visible text)".dimmed());
            } else {
                println!("{}", extracted.content);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load a page from a URL or a local file.
async fn load_page(source: &str) -> Result<HtmlPage> {
    if source.starts_with("http://") || source.starts_with("https://") {
        HtmlPage::fetch(source).await
    } else {
        let html = tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read {source}"))?;
        Ok(HtmlPage::new(html))
    }
}

/// Highlight matching elements of a local page, add the verdict banner, and
/// write the marked-up document out.
async fn annotate_local_page(
    path: &Path,
    selector: &str,
    is_scam: bool,
    out: Option<&Path>,
) -> Result<()> {
    let html = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let page = Arc::new(HtmlPage::new(html));
    let extractor = PageExtractor::new(page.clone());

    let styled = extractor.annotate(selector, is_scam);
    let banner = extractor.show_transient_banner(is_scam);
    let rendered = page.render();

    eprintln!(
        "  Highlighted {} element(s) matching {}; banner: {}",
        styled,
        selector.bold(),
        banner.text()
    );

    match out {
        Some(out) => {
            tokio::fs::write(out, rendered)
                .await
                .with_context(|| format!("Failed to write {}", out.display()))?;
            eprintln!("  Annotated page written to {}", out.display().to_string().bold());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
