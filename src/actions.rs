use std::fmt;

use crate::window::PanelKind;

/// What a bound key combination asks the deck to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    TogglePanel(PanelKind),
    CloseAll,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::TogglePanel(kind) => write!(f, "Toggle {}", kind.config().title),
            Action::CloseAll => write!(f, "Close all panels"),
            Action::Quit => write!(f, "Quit"),
        }
    }
}
