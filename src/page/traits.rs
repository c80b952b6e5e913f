// Page adapter trait and the verdict palettes it applies.

use std::time::Duration;

/// How long a transient banner stays on the page.
pub const BANNER_LIFETIME: Duration = Duration::from_secs(5);

/// Border and background applied to elements flagged by a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictStyle {
    pub border: &'static str,
    pub background: &'static str,
}

impl VerdictStyle {
    pub const SCAM: VerdictStyle = VerdictStyle {
        border: "2px solid red",
        background: "#ffcccc",
    };

    pub const SAFE: VerdictStyle = VerdictStyle {
        border: "2px solid green",
        background: "#ccffcc",
    };

    pub fn for_verdict(is_scam: bool) -> Self {
        if is_scam {
            Self::SCAM
        } else {
            Self::SAFE
        }
    }

    /// Inline CSS for this style.
    pub fn css(&self) -> String {
        format!(
            "border: {}; background-color: {};",
            self.border, self.background
        )
    }
}

/// A fixed-position verdict banner inserted into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: u64,
    pub is_scam: bool,
}

impl Banner {
    pub fn text(&self) -> &'static str {
        if self.is_scam {
            "Warning: Scam Detected!"
        } else {
            "This page seems legitimate."
        }
    }

    pub fn background(&self) -> &'static str {
        if self.is_scam {
            "red"
        } else {
            "green"
        }
    }

    /// Inline CSS for the banner element.
    pub fn css(&self) -> String {
        format!(
            "position: fixed; bottom: 10px; right: 10px; padding: 10px; \
             border-radius: 5px; color: white; background-color: {}; z-index: 10000;",
            self.background()
        )
    }
}

/// Everything the crate needs from a page. Nothing else touches the page.
pub trait PageAdapter: Send + Sync + 'static {
    /// Visible text of the document, untruncated. Empty when there is none.
    fn extract_text(&self) -> String;

    /// Apply the verdict palette to every element matching `selector`.
    /// Returns how many elements were styled. Reapplying is harmless.
    fn apply_verdict_style(&self, selector: &str, is_scam: bool) -> usize;

    /// Insert one verdict banner and schedule its removal after
    /// [`BANNER_LIFETIME`]. Removal tolerates the banner being gone already.
    fn show_transient_banner(&self, is_scam: bool) -> Banner;
}
