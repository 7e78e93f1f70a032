//! The boundary to panel content.
//!
//! The deck mounts one content value per open panel kind inside the frame's
//! content slot and never looks inside it. Content only sees its own area and
//! the keys the deck did not bind.

use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;
use crate::window::PanelKind;

pub mod notes;

pub use crate::component_context::ComponentContext;
pub use notes::NotesContent;

pub trait PanelContent: std::fmt::Debug {
    fn resize(&mut self, _area: Rect, _ctx: &ComponentContext) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    /// Returns `true` when the event was used.
    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

/// Builds the content hosted by a freshly opened panel of `kind`.
pub type ContentFactory = fn(PanelKind) -> Box<dyn PanelContent>;

/// Placeholder content for every catalog kind.
pub fn placeholder_content(kind: PanelKind) -> Box<dyn PanelContent> {
    Box::new(NotesContent::new(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[derive(Debug)]
    struct DummyContent;
    impl PanelContent for DummyContent {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }

    #[test]
    fn default_handle_event_returns_false() {
        let mut d = DummyContent;
        assert!(!d.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            &ComponentContext::new(PanelKind::GtdInbox)
        ));
    }
}
