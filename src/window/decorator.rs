use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Clear;

use super::{PanelInstance, PanelKind};
use crate::layout::floating::{ResizeEdge, floating_header_for_region, resize_edge_at};
use crate::layout::rect_contains;
use crate::ui::UiFrame;

/// What a pointer-down on a panel's header row means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Drag,
    Pin,
    Minimize,
    Close,
}

/// The region of a panel frame under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHit {
    Header(HeaderAction),
    Resize(ResizeEdge),
    Body,
}

pub trait WindowDecorator: std::fmt::Debug {
    fn render_frame(&self, frame: &mut UiFrame<'_>, instance: &PanelInstance, focused: bool);

    fn hit_test(&self, kind: PanelKind, rect: Rect, column: u16, row: u16) -> Option<FrameHit>;
}

/// Border, header row with title and buttons, and a content slot.
///
/// ```text
/// ┌──────────────────────┐
/// │≡ GTD Inbox    ◇ _ ×  │  header: drag handle + pin/minimize/close
/// │                      │
/// │   (content slot)     │
/// └──────────────────────┘
/// ```
#[derive(Debug, Default)]
pub struct PanelFrame;

impl PanelFrame {
    /// Where content collaborators draw.
    pub fn content_area(rect: Rect) -> Rect {
        Rect {
            x: rect.x.saturating_add(1),
            y: rect.y.saturating_add(2),
            width: rect.width.saturating_sub(2),
            height: rect.height.saturating_sub(3),
        }
    }

    /// Header buttons, right to left, for the capabilities of `kind`.
    pub fn buttons(kind: PanelKind, rect: Rect) -> Vec<(HeaderAction, Rect)> {
        let Some(header) = floating_header_for_region(kind, rect) else {
            return Vec::new();
        };
        let caps = kind.config().capabilities;
        let mut actions = vec![HeaderAction::Close];
        if caps.minimizable {
            actions.push(HeaderAction::Minimize);
        }
        if caps.pinnable {
            actions.push(HeaderAction::Pin);
        }
        let header_right = header.rect.x.saturating_add(header.rect.width);
        let mut buttons = Vec::with_capacity(actions.len());
        for (idx, action) in actions.into_iter().enumerate() {
            let offset = 2 * (idx as u16 + 1);
            if offset >= header.rect.width {
                break;
            }
            buttons.push((
                action,
                Rect {
                    x: header_right.saturating_sub(offset),
                    y: header.rect.y,
                    width: 1,
                    height: 1,
                },
            ));
        }
        buttons
    }
}

impl WindowDecorator for PanelFrame {
    fn render_frame(&self, frame: &mut UiFrame<'_>, instance: &PanelInstance, focused: bool) {
        let rect = instance.rect();
        if rect.width < 3 || rect.height < 3 {
            return;
        }
        frame.render_widget(Clear, rect);

        let header_style = if focused {
            Style::default()
                .bg(crate::theme::decorator_header_bg())
                .fg(crate::theme::decorator_header_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(crate::theme::panel_bg())
                .fg(crate::theme::decorator_header_fg())
        };
        let border_style = if focused {
            Style::default().fg(crate::theme::accent())
        } else {
            Style::default().fg(crate::theme::decorator_border())
        };

        let left = rect.x;
        let top = rect.y;
        let right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let bottom = rect.y.saturating_add(rect.height).saturating_sub(1);

        {
            let bounds = frame.area();
            let buffer = frame.buffer_mut();
            let mut put = |x: u16, y: u16, symbol: &str, style: Style| {
                if rect_contains(bounds, x, y)
                    && let Some(cell) = buffer.cell_mut((x, y))
                {
                    cell.set_symbol(symbol);
                    cell.set_style(style);
                }
            };
            for x in left..=right {
                let (top_symbol, bottom_symbol) = if x == left {
                    ("┌", "└")
                } else if x == right {
                    ("┐", "┘")
                } else {
                    ("─", "─")
                };
                put(x, top, top_symbol, border_style);
                put(x, bottom, bottom_symbol, border_style);
            }
            for y in top.saturating_add(1)..bottom {
                put(left, y, "│", border_style);
                put(right, y, "│", border_style);
            }
            let header_y = top.saturating_add(1);
            for x in left.saturating_add(1)..right {
                put(x, header_y, " ", header_style);
            }
        }

        let Some(header) = floating_header_for_region(instance.kind, rect) else {
            return;
        };
        let buttons = Self::buttons(instance.kind, rect);
        let title_limit = buttons
            .last()
            .map(|(_, r)| r.x.saturating_sub(header.rect.x).saturating_sub(1))
            .unwrap_or(header.rect.width);
        let title_bounds = Rect {
            width: title_limit,
            ..header.rect
        };
        let title = format!("≡ {}", instance.kind.config().title);
        frame.set_string(title_bounds, header.rect.x, header.rect.y, &title, header_style);

        for (action, button) in buttons {
            let symbol = match action {
                HeaderAction::Close => "×",
                HeaderAction::Minimize => "_",
                HeaderAction::Pin if instance.pinned => "◆",
                HeaderAction::Pin => "◇",
                HeaderAction::Drag => continue,
            };
            frame.set_string(button, button.x, button.y, symbol, header_style);
        }
    }

    fn hit_test(&self, kind: PanelKind, rect: Rect, column: u16, row: u16) -> Option<FrameHit> {
        if !rect_contains(rect, column, row) {
            return None;
        }
        if let Some((action, _)) = Self::buttons(kind, rect)
            .into_iter()
            .find(|(_, r)| rect_contains(*r, column, row))
        {
            return Some(FrameHit::Header(action));
        }
        if floating_header_for_region(kind, rect).is_some_and(|h| rect_contains(h.rect, column, row))
        {
            return Some(FrameHit::Header(HeaderAction::Drag));
        }
        if let Some(edge) = resize_edge_at(rect, column, row) {
            return Some(FrameHit::Resize(edge));
        }
        Some(FrameHit::Body)
    }
}
