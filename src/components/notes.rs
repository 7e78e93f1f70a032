use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use super::{ComponentContext, PanelContent};
use crate::ui::UiFrame;
use crate::window::PanelKind;

/// Shows the panel's catalog description and a one-line scratch note that
/// accepts typing while the panel is focused.
#[derive(Debug)]
pub struct NotesContent {
    kind: PanelKind,
    note: String,
}

impl NotesContent {
    pub fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            note: String::new(),
        }
    }

    pub fn note(&self) -> &str {
        &self.note
    }
}

impl PanelContent for NotesContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let config = self.kind.config();
        let body = Style::default().fg(crate::theme::content_fg());
        let mut note = vec![Span::styled("> ", body.add_modifier(Modifier::BOLD))];
        note.push(Span::styled(self.note.clone(), body));
        if ctx.focused() {
            note.push(Span::styled("_", body.add_modifier(Modifier::SLOW_BLINK)));
        }
        let mut lines = vec![
            Line::styled(config.description, body),
            Line::default(),
            Line::from(note),
        ];
        if ctx.pinned() {
            lines.push(Line::styled("pinned", body.add_modifier(Modifier::DIM)));
        }
        let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if !ctx.focused() || key.kind != KeyEventKind::Press {
            return false;
        }
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.note.push(c);
                true
            }
            KeyCode::Backspace => self.note.pop().is_some(),
            KeyCode::Esc => {
                let had = !self.note.is_empty();
                self.note.clear();
                had
            }
            _ => false,
        }
    }
}
