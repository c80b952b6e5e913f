// Seams between the popup controller and its surroundings.

use async_trait::async_trait;

/// How a result is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultStyle {
    /// Scam verdict.
    Alert,
    /// Legitimate verdict.
    Success,
    /// Anything that went wrong.
    Error,
}

/// The popup's widgets: one trigger control and one result area.
pub trait PopupView {
    fn set_trigger_enabled(&mut self, enabled: bool);
    fn set_trigger_label(&mut self, label: &str);
    fn hide_result(&mut self);
    fn show_result(&mut self, text: &str, style: ResultStyle);
    /// Audible cue for a scam verdict.
    fn play_alert(&mut self);
}

/// Where the popup learns which page the user is looking at.
#[async_trait]
pub trait TabSource: Send + Sync {
    /// URL of the single active tab, or `None` if it can't be determined.
    async fn active_tab_url(&self) -> Option<String>;
}
