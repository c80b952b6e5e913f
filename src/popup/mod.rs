// Popup — the UI controller the user drives.
//
// The controller owns the Idle → Checking → ResultShown state machine and
// talks to the page only through PopupView and to the browser's tab list
// only through TabSource. TerminalView is the CLI rendering of the popup.

pub mod controller;
pub mod terminal;
pub mod view;

pub use controller::{
    CheckOutcome, FixedTab, PopupController, UiState, CHECKING_LABEL, CONNECTION_ERROR_TEXT,
    IDLE_LABEL,
};
pub use terminal::TerminalView;
pub use view::{PopupView, ResultStyle, TabSource};
