//! The launcher: a draggable strip listing every panel kind by priority.
//!
//! ```text
//! ┌────────────────────────┐      ┌───┐
//! │≡ Launcher              │      │≡  │
//! │ IN GTD Inbox          ●│      │IN●│   expanded / collapsed rail
//! │ AI AI Assistant        │      │AI │
//! │ ...                    │      │.. │
//! └────────────────────────┘      └───┘
//! ```

pub mod dock;

use std::time::Instant;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Clear;
use serde::{Deserialize, Serialize};

use crate::constants::{DOCK_THRESHOLD, HOVER_TRIGGER_WIDTH, TOOLBAR_RAIL_WIDTH, TOOLBAR_WIDTH};
use crate::layout::{Viewport, rect_contains};
use crate::priority::{Emphasis, Priority};
use crate::ui::UiFrame;
use crate::window::{LifecycleState, PanelKind, PanelRegistry, Position};
pub use dock::{DockMachine, DockSide, DockState, DockTransition, Timer};

/// The persisted part of the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarLayoutState {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub is_dragged: bool,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(default)]
    pub docked_side: Option<DockSide>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    /// The event was not for the launcher.
    Ignored,
    Consumed,
    Launch(PanelKind),
    /// Position, dock side or collapse state changed and should be saved.
    LayoutChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LauncherItem {
    pub kind: PanelKind,
    pub priority: Priority,
}

/// Catalog order with each kind's base tier, highest first.
pub fn catalog_ranking() -> Vec<(PanelKind, Priority)> {
    let mut ranked: Vec<(PanelKind, Priority)> = PanelKind::ALL
        .iter()
        .map(|kind| (*kind, kind.config().base_tier))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

#[derive(Debug)]
pub struct LauncherToolbar {
    position: Position,
    is_dragged: bool,
    dock: DockMachine,
    viewport: Viewport,
    drag_offset: Option<Position>,
    items: Vec<LauncherItem>,
}

impl LauncherToolbar {
    /// A floating launcher near the top-right corner.
    pub fn new(viewport: Viewport) -> Self {
        let mut toolbar = Self {
            position: Position::new(
                viewport.width as i32 - TOOLBAR_WIDTH as i32 - 2,
                viewport.top_band as i32 + 1,
            ),
            is_dragged: false,
            dock: DockMachine::default(),
            viewport,
            drag_offset: None,
            items: Vec::new(),
        };
        toolbar.set_items(catalog_ranking());
        toolbar.reclamp();
        toolbar
    }

    /// Rebuilds the launcher from a saved layout, re-clamped to `viewport`.
    /// No timers are armed until the next hover.
    pub fn from_persisted(state: ToolbarLayoutState, viewport: Viewport) -> Self {
        let mut toolbar = Self::new(viewport);
        toolbar.position = Position::new(state.x, state.y);
        toolbar.is_dragged = state.is_dragged;
        let dock_state = match (state.docked_side, state.is_collapsed) {
            (Some(side), true) => DockState::DockedCollapsed(side),
            (Some(side), false) => DockState::DockedExpanded(side),
            (None, _) => DockState::Floating,
        };
        toolbar.dock = DockMachine::restore(dock_state);
        toolbar.reclamp();
        toolbar
    }

    pub fn layout_state(&self) -> ToolbarLayoutState {
        let state = self.dock.state();
        ToolbarLayoutState {
            x: self.position.x,
            y: self.position.y,
            is_dragged: self.is_dragged,
            is_collapsed: state.is_collapsed(),
            docked_side: state.side(),
        }
    }

    pub fn dock_state(&self) -> DockState {
        self.dock.state()
    }

    pub fn dock(&self) -> &DockMachine {
        &self.dock
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    pub fn items(&self) -> &[LauncherItem] {
        &self.items
    }

    pub fn set_items(&mut self, ranked: Vec<(PanelKind, Priority)>) {
        self.items = ranked
            .into_iter()
            .map(|(kind, priority)| LauncherItem { kind, priority })
            .collect();
        self.reclamp();
    }

    pub fn height(&self) -> u16 {
        (self.items.len() as u16).saturating_add(3)
    }

    /// Where the launcher is drawn: the full strip, or the rail anchored to
    /// its dock side when collapsed.
    pub fn rect(&self) -> Rect {
        let (x, width) = match self.dock.state() {
            DockState::DockedCollapsed(DockSide::Left) => (0, TOOLBAR_RAIL_WIDTH),
            DockState::DockedCollapsed(DockSide::Right) => (
                self.viewport.width.saturating_sub(TOOLBAR_RAIL_WIDTH),
                TOOLBAR_RAIL_WIDTH,
            ),
            _ => (self.position.x.max(0) as u16, TOOLBAR_WIDTH),
        };
        Rect {
            x,
            y: self.position.y.max(0) as u16,
            width,
            height: self.height(),
        }
    }

    /// The thin edge column that counts as hovering a docked launcher.
    pub fn trigger_zone(&self) -> Option<Rect> {
        let side = self.dock.state().side()?;
        let x = match side {
            DockSide::Left => 0,
            DockSide::Right => self.viewport.width.saturating_sub(HOVER_TRIGGER_WIDTH),
        };
        Some(Rect {
            x,
            y: 0,
            width: HOVER_TRIGGER_WIDTH,
            height: self.viewport.height,
        })
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.rect(), column, row)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.reclamp();
    }

    /// Earliest pending collapse/expand deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.dock.next_deadline()
    }

    /// Fires due hover timers; `true` when the collapse state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.dock.tick(now).is_some()
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> ToolbarAction {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved => {
                self.update_hover(column, row, now);
                if self.contains(column, row) {
                    ToolbarAction::Consumed
                } else {
                    ToolbarAction::Ignored
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.drag_offset.is_some() => {
                if let Some(offset) = self.drag_offset {
                    self.position = Position::new(column as i32 - offset.x, row as i32 - offset.y);
                    self.reclamp();
                }
                ToolbarAction::Consumed
            }
            MouseEventKind::Up(MouseButton::Left) if self.drag_offset.is_some() => {
                self.drag_offset = None;
                self.release(now);
                self.update_hover(column, row, now);
                ToolbarAction::LayoutChanged
            }
            MouseEventKind::Down(MouseButton::Left) if self.contains(column, row) => {
                let rect = self.rect();
                if row == rect.y.saturating_add(1) {
                    return if self.begin_drag(column, row) {
                        ToolbarAction::LayoutChanged
                    } else {
                        ToolbarAction::Consumed
                    };
                }
                match self.item_at(row) {
                    Some(kind) => ToolbarAction::Launch(kind),
                    None => ToolbarAction::Consumed,
                }
            }
            MouseEventKind::Down(_) | MouseEventKind::Up(_) | MouseEventKind::Drag(_)
                if self.contains(column, row) =>
            {
                ToolbarAction::Consumed
            }
            _ => ToolbarAction::Ignored,
        }
    }

    /// Returns `true` when grabbing the header un-collapsed a docked rail.
    fn begin_drag(&mut self, column: u16, row: u16) -> bool {
        let expanded = self.dock.begin_drag();
        // Grab the strip where the pointer is; a collapsed rail expands under
        // it, so the offset is taken from the expanded geometry.
        let rect = self.rect();
        let grab_x = (column.saturating_sub(rect.x)).min(TOOLBAR_WIDTH.saturating_sub(1));
        self.position = Position::new(rect.x as i32, self.position.y);
        self.drag_offset = Some(Position::new(
            grab_x as i32,
            row as i32 - self.position.y,
        ));
        expanded
    }

    /// Docks to an edge the strip was released close to, or leaves it
    /// floating where it is.
    fn release(&mut self, now: Instant) {
        self.is_dragged = true;
        let right_x = self.right_dock_x();
        let side = if self.position.x <= DOCK_THRESHOLD {
            Some(DockSide::Left)
        } else if self.position.x >= right_x - DOCK_THRESHOLD {
            Some(DockSide::Right)
        } else {
            None
        };
        self.dock.end_drag(side, now);
        self.reclamp();
        tracing::debug!(
            x = self.position.x,
            y = self.position.y,
            docked = ?side,
            "launcher moved"
        );
    }

    fn update_hover(&mut self, column: u16, row: u16, now: Instant) {
        let inside = self.contains(column, row)
            || self
                .trigger_zone()
                .is_some_and(|zone| rect_contains(zone, column, row));
        if inside && !self.dock.is_hovered() {
            self.dock.hover(now);
        } else if !inside && self.dock.is_hovered() {
            self.dock.unhover(now);
        }
    }

    fn item_at(&self, row: u16) -> Option<PanelKind> {
        let first = self.rect().y.saturating_add(2);
        let idx = row.checked_sub(first)? as usize;
        self.items.get(idx).map(|item| item.kind)
    }

    fn right_dock_x(&self) -> i32 {
        (self.viewport.width as i32 - TOOLBAR_WIDTH as i32).max(0)
    }

    fn reclamp(&mut self) {
        let max_x = self.right_dock_x();
        let min_y = self.viewport.top_band as i32;
        let max_y = (self.viewport.height as i32 - self.height() as i32).max(min_y);
        // While dragging the strip follows the pointer; the side is only
        // decided on release.
        let side = match self.drag_offset {
            Some(_) => None,
            None => self.dock.state().side(),
        };
        let x = match side {
            Some(DockSide::Left) => 0,
            Some(DockSide::Right) => max_x,
            None => self.position.x.clamp(0, max_x),
        };
        self.position = Position::new(x, self.position.y.clamp(min_y, max_y));
    }

    pub fn render(&self, frame: &mut UiFrame<'_>, registry: &PanelRegistry) {
        let rect = self.rect();
        if rect.width < 3 || rect.height < 3 {
            return;
        }
        frame.render_widget(Clear, rect);
        let base = Style::default()
            .bg(crate::theme::menu_bg())
            .fg(crate::theme::menu_fg());
        let border = if self.is_dragging() {
            base.fg(crate::theme::accent())
        } else {
            base.fg(crate::theme::decorator_border())
        };
        let bounds = frame.area();
        let right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let bottom = rect.y.saturating_add(rect.height).saturating_sub(1);
        {
            let buffer = frame.buffer_mut();
            for y in rect.y..=bottom {
                for x in rect.x..=right {
                    let symbol = match (x == rect.x, x == right, y == rect.y, y == bottom) {
                        (true, _, true, _) => "┌",
                        (_, true, true, _) => "┐",
                        (true, _, _, true) => "└",
                        (_, true, _, true) => "┘",
                        (_, _, true, _) | (_, _, _, true) => "─",
                        (true, _, _, _) | (_, true, _, _) => "│",
                        _ => " ",
                    };
                    let style = if symbol == " " { base } else { border };
                    if rect_contains(bounds, x, y)
                        && let Some(cell) = buffer.cell_mut((x, y))
                    {
                        cell.reset();
                        cell.set_symbol(symbol);
                        cell.set_style(style);
                    }
                }
            }
        }

        let inner = Rect {
            x: rect.x.saturating_add(1),
            y: rect.y.saturating_add(1),
            width: rect.width.saturating_sub(2),
            height: rect.height.saturating_sub(2),
        };
        let collapsed = self.dock.state().is_collapsed();
        let header = if collapsed { "≡" } else { "≡ Launcher" };
        frame.set_string(
            inner,
            inner.x,
            inner.y,
            header,
            base.add_modifier(Modifier::BOLD),
        );
        for (idx, item) in self.items.iter().enumerate() {
            let y = inner.y.saturating_add(1 + idx as u16);
            let config = item.kind.config();
            let marker = match registry.state_of(item.kind) {
                LifecycleState::Open => "●",
                LifecycleState::Minimized => "○",
                LifecycleState::Closed => " ",
            };
            let style = emphasis_style(base, item.priority.emphasis());
            if collapsed {
                frame.set_string(inner, inner.x, y, config.icon, style);
                frame.set_string(inner, inner.x.saturating_add(2), y, marker, base);
            } else {
                let label = format!(" {} {}", config.icon, config.title);
                frame.set_string(inner, inner.x, y, &label, style);
                let marker_x = inner.x.saturating_add(inner.width.saturating_sub(1));
                frame.set_string(inner, marker_x, y, marker, base);
            }
        }
    }
}

fn emphasis_style(base: Style, emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Muted => base.fg(crate::theme::panel_inactive_fg()),
        Emphasis::Normal => base,
        Emphasis::Accent => base.fg(crate::theme::accent()),
        Emphasis::Glow => base
            .fg(crate::theme::accent_alt())
            .add_modifier(Modifier::BOLD),
    }
}
