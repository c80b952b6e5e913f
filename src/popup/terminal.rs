// Colored terminal rendering of the popup.
//
// The trigger's in-progress label becomes a spinner; results are printed
// in the verdict's color; the audible cue is the terminal bell.

use std::io::Write;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use super::view::{PopupView, ResultStyle};

pub struct TerminalView {
    spinner: Option<ProgressBar>,
    trigger_enabled: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            spinner: None,
            trigger_enabled: true,
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl PopupView for TerminalView {
    fn set_trigger_enabled(&mut self, enabled: bool) {
        self.trigger_enabled = enabled;
        if enabled {
            self.clear_spinner();
        }
    }

    fn set_trigger_label(&mut self, label: &str) {
        if self.trigger_enabled {
            return;
        }
        let spinner = self.spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        spinner.set_message(label.to_string());
    }

    fn hide_result(&mut self) {}

    fn show_result(&mut self, text: &str, style: ResultStyle) {
        self.clear_spinner();
        println!();
        for line in text.lines() {
            let line = match style {
                ResultStyle::Alert => line.red().bold(),
                ResultStyle::Success => line.green(),
                ResultStyle::Error => line.bright_red(),
            };
            println!("  {}", line);
        }
        println!();
    }

    fn play_alert(&mut self) {
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
}
