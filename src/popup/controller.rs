// Popup controller — one check per click, always leaving the trigger usable.

use async_trait::async_trait;
use tracing::{info, warn};

use super::view::{PopupView, ResultStyle, TabSource};
use crate::messaging::ContextHandle;
use crate::protocol::{Classification, DetectionError, DetectionResponse, Verdict};

pub const IDLE_LABEL: &str = "Check Current Page";
pub const CHECKING_LABEL: &str = "Checking...";
pub const CONNECTION_ERROR_TEXT: &str = "❌ Error: Could not connect to API.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Checking,
    ResultShown,
}

/// What a check ended with, as rendered to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Scam(Classification),
    Legitimate(Classification),
    Error(String),
}

impl CheckOutcome {
    fn display_text(&self) -> String {
        match self {
            CheckOutcome::Scam(c) => format!("🚨 Scam Detected!\n{}", c.message),
            CheckOutcome::Legitimate(c) => format!("✅ Legitimate Site\n{}", c.message),
            CheckOutcome::Error(text) => text.clone(),
        }
    }

    fn style(&self) -> ResultStyle {
        match self {
            CheckOutcome::Scam(_) => ResultStyle::Alert,
            CheckOutcome::Legitimate(_) => ResultStyle::Success,
            CheckOutcome::Error(_) => ResultStyle::Error,
        }
    }
}

pub struct PopupController<V, T> {
    view: V,
    tabs: T,
    background: ContextHandle,
    state: UiState,
}

impl<V: PopupView, T: TabSource> PopupController<V, T> {
    pub fn new(view: V, tabs: T, background: ContextHandle) -> Self {
        Self {
            view,
            tabs,
            background,
            state: UiState::Idle,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Run one check of the active tab and render the outcome.
    ///
    /// Takes `&mut self`, so a second check cannot start while one is in
    /// flight. The trigger is re-enabled on every exit path.
    pub async fn check_current_page(&mut self) -> CheckOutcome {
        self.begin_check();
        let outcome = self.run_check().await;
        self.render(&outcome);
        self.restore_trigger();
        outcome
    }

    /// Hide the current result and return to idle.
    pub fn dismiss(&mut self) {
        self.view.hide_result();
        self.state = UiState::Idle;
    }

    fn begin_check(&mut self) {
        self.view.set_trigger_enabled(false);
        self.view.set_trigger_label(CHECKING_LABEL);
        self.view.hide_result();
        self.state = UiState::Checking;
    }

    async fn run_check(&self) -> CheckOutcome {
        let Some(url) = self.tabs.active_tab_url().await else {
            let err = DetectionError::UnresolvedTab;
            warn!("No active tab: {}", err);
            return CheckOutcome::Error(err.user_message().to_string());
        };

        info!(url = %url, "Checking active tab");

        match self.background.check_scam(&url).await {
            Ok(DetectionResponse::Success(classification)) => match classification.verdict() {
                Verdict::Scam => CheckOutcome::Scam(classification),
                Verdict::Legitimate => CheckOutcome::Legitimate(classification),
            },
            Ok(DetectionResponse::Failure { error }) => CheckOutcome::Error(error),
            Err(e) => {
                warn!(error = %e, "No reply from background context");
                CheckOutcome::Error(CONNECTION_ERROR_TEXT.to_string())
            }
        }
    }

    fn render(&mut self, outcome: &CheckOutcome) {
        self.view.show_result(&outcome.display_text(), outcome.style());
        if matches!(outcome, CheckOutcome::Scam(_)) {
            self.view.play_alert();
        }
        self.state = UiState::ResultShown;
    }

    fn restore_trigger(&mut self) {
        self.view.set_trigger_enabled(true);
        self.view.set_trigger_label(IDLE_LABEL);
    }
}

/// A tab source that always reports the same tab (or none).
pub struct FixedTab(pub Option<String>);

#[async_trait]
impl TabSource for FixedTab {
    async fn active_tab_url(&self) -> Option<String> {
        self.0.clone()
    }
}
