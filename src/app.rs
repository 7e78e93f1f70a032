//! The deck: composition root for the panel manager.
//!
//! `Deck` owns the registry snapshot, the gesture controller, the launcher,
//! the priority engine and the layout store. Every input event and timer tick
//! comes through here and is routed to exactly one of them; every lifecycle
//! or geometry change goes through a registry operation.

use std::collections::BTreeMap;
use std::time::Instant;

use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use crate::actions::Action;
use crate::components::{ComponentContext, ContentFactory, PanelContent, placeholder_content};
use crate::constants::{IDLE_EVICTION_WINDOW, IDLE_SWEEP_INTERVAL};
use crate::interaction::{Gesture, PointerInteractionController};
use crate::keybindings::KeyBindings;
use crate::layout::Viewport;
use crate::layout::floating::render_resize_outline;
use crate::persistence::{LayoutRecord, LayoutStore};
use crate::priority::{ContextFlags, PriorityEngine, TimeSlot};
use crate::toolbar::{LauncherToolbar, Timer, ToolbarAction, catalog_ranking};
use crate::ui::UiFrame;
use crate::window::{
    FrameHit, HeaderAction, LifecycleState, PanelFrame, PanelKind, PanelRegistry, Position,
    WindowDecorator,
};

/// Startup knobs for a deck.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeckOptions {
    /// Fixed hour of day for the priority table; the local clock when `None`.
    pub hour: Option<u32>,
    /// Order the launcher by catalog tier instead of live priority.
    pub static_order: bool,
    pub context: ContextFlags,
}

pub struct Deck {
    registry: PanelRegistry,
    controller: PointerInteractionController,
    toolbar: LauncherToolbar,
    engine: PriorityEngine,
    store: LayoutStore,
    record: LayoutRecord,
    bindings: KeyBindings,
    decorator: PanelFrame,
    contents: BTreeMap<PanelKind, Box<dyn PanelContent>>,
    content_factory: ContentFactory,
    sweep_timer: Timer,
    options: DeckOptions,
    quit: bool,
}

impl std::fmt::Debug for Deck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deck")
            .field("registry", &self.registry)
            .field("toolbar", &self.toolbar)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

impl Deck {
    /// Builds a deck for `viewport`, restoring whatever layout `store` holds.
    pub fn new(viewport: Viewport, store: LayoutStore, options: DeckOptions, now: Instant) -> Self {
        let record = store.load_or_default();
        let toolbar = match record.toolbar {
            Some(state) => LauncherToolbar::from_persisted(state, viewport),
            None => LauncherToolbar::new(viewport),
        };
        let mut sweep_timer = Timer::default();
        sweep_timer.arm(now, IDLE_SWEEP_INTERVAL);
        let mut deck = Self {
            registry: PanelRegistry::new(viewport),
            controller: PointerInteractionController::new(),
            toolbar,
            engine: PriorityEngine::with_context(options.context),
            store,
            record,
            bindings: KeyBindings::default(),
            decorator: PanelFrame,
            contents: BTreeMap::new(),
            content_factory: placeholder_content,
            sweep_timer,
            options,
            quit: false,
        };
        deck.refresh_launcher(now);
        deck
    }

    pub fn with_content_factory(mut self, factory: ContentFactory) -> Self {
        self.content_factory = factory;
        self
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn toolbar(&self) -> &LauncherToolbar {
        &self.toolbar
    }

    pub fn controller(&self) -> &PointerInteractionController {
        &self.controller
    }

    pub fn engine(&self) -> &PriorityEngine {
        &self.engine
    }

    pub fn record(&self) -> &LayoutRecord {
        &self.record
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn has_content(&self, kind: PanelKind) -> bool {
        self.contents.contains_key(&kind)
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn time_slot(&self) -> TimeSlot {
        self.options
            .hour
            .map(TimeSlot::from_hour)
            .unwrap_or_else(TimeSlot::current)
    }

    pub fn set_context(&mut self, context: ContextFlags, now: Instant) {
        self.engine.set_context(context);
        self.refresh_launcher(now);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.registry.viewport() {
            return;
        }
        tracing::debug!(width = viewport.width, height = viewport.height, "viewport changed");
        self.registry = self.registry.set_viewport(viewport);
        self.toolbar.set_viewport(viewport);
    }

    /// Earliest instant at which `tick` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.toolbar.next_deadline(), self.sweep_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Fires due timers: launcher collapse/expand and the idle sweep.
    /// `next_deadline` says when to call this again.
    pub fn tick(&mut self, now: Instant) {
        if self.toolbar.tick(now) {
            self.persist();
        }
        if self.sweep_timer.fire_if_due(now) {
            self.sweep(now);
            self.sweep_timer.arm(now, IDLE_SWEEP_INTERVAL);
        }
    }

    /// Forgets kinds that have stayed closed for the eviction window: their
    /// usage history and their remembered geometry. Live panels, minimized
    /// or not, are never touched.
    fn sweep(&mut self, now: Instant) {
        let forgotten = self.engine.forget_idle(now, IDLE_EVICTION_WINDOW);
        if forgotten.is_empty() {
            return;
        }
        let mut dropped = false;
        for kind in &forgotten {
            if self.registry.get(*kind).is_none() {
                dropped |= self.record.forget_panel(*kind);
            }
        }
        tracing::debug!(forgotten = ?forgotten, geometry = dropped, "idle sweep");
        if dropped {
            self.persist();
        }
        self.refresh_launcher(now);
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        match event {
            Event::Resize(width, height) => self.set_viewport(Viewport::new(*width, *height)),
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return;
                }
                if let Some(action) = self.bindings.action_for_key(key) {
                    self.apply_action(action, now);
                    return;
                }
                self.forward_to_active(event);
            }
            Event::Mouse(mouse) => self.handle_mouse(*mouse, event, now),
            _ => {}
        }
    }

    pub fn apply_action(&mut self, action: Action, now: Instant) {
        tracing::trace!(%action, "action");
        match action {
            Action::TogglePanel(kind) => self.toggle_panel(kind, now),
            Action::CloseAll => self.close_all(now),
            Action::Quit => self.quit = true,
        }
    }

    /// Opens `kind`, restores it when minimized, or raises it when open.
    pub fn open_panel(&mut self, kind: PanelKind, now: Instant) {
        let was = self.registry.state_of(kind);
        if was != LifecycleState::Closed {
            self.registry = self.registry.open(kind, None, now);
            return;
        }
        self.registry = match self.record.panel(kind) {
            Some(saved) => self
                .registry
                .open(kind, Some(saved.position), now)
                .resize(kind, saved.size.width as i32, saved.size.height as i32)
                .move_to(kind, saved.position),
            None => self.registry.open(kind, None, now),
        };
        self.contents
            .entry(kind)
            .or_insert_with(|| (self.content_factory)(kind));
        self.engine.record_open(kind, now);
        self.refresh_launcher(now);
    }

    pub fn toggle_panel(&mut self, kind: PanelKind, now: Instant) {
        match self.registry.state_of(kind) {
            LifecycleState::Closed => self.open_panel(kind, now),
            LifecycleState::Minimized => {
                self.registry = self.registry.maximize(kind, now);
            }
            LifecycleState::Open => self.close_panel(kind, now),
        }
    }

    pub fn close_panel(&mut self, kind: PanelKind, now: Instant) {
        self.remember_geometry(kind);
        self.registry = self.registry.close(kind);
        if self.registry.state_of(kind) == LifecycleState::Closed {
            self.contents.remove(&kind);
            self.engine.record_close(kind, now);
        }
        self.persist();
        self.refresh_launcher(now);
    }

    pub fn close_all(&mut self, now: Instant) {
        let kinds: Vec<PanelKind> = self.registry.instances().map(|i| i.kind).collect();
        for kind in &kinds {
            self.remember_geometry(*kind);
        }
        self.registry = self.registry.close_all();
        for kind in kinds {
            if self.registry.state_of(kind) == LifecycleState::Closed {
                self.contents.remove(&kind);
                self.engine.record_close(kind, now);
            }
        }
        self.persist();
        self.refresh_launcher(now);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, event: &Event, now: Instant) {
        let pointer = Position::new(mouse.column as i32, mouse.row as i32);

        if self.controller.is_active() {
            match mouse.kind {
                MouseEventKind::Drag(_) | MouseEventKind::Moved => {
                    if let Some(next) = self.controller.pointer_move(&self.registry, pointer) {
                        self.registry = next;
                    }
                }
                MouseEventKind::Up(_) => {
                    if let Some(next) = self.controller.pointer_move(&self.registry, pointer) {
                        self.registry = next;
                    }
                    if let Some(session) = self.controller.pointer_up() {
                        self.remember_geometry(session.kind);
                        self.persist();
                    }
                }
                _ => {}
            }
            return;
        }

        match self.toolbar.handle_mouse(mouse, now) {
            ToolbarAction::Ignored => {}
            ToolbarAction::Consumed => return,
            ToolbarAction::LayoutChanged => {
                self.persist();
                return;
            }
            ToolbarAction::Launch(kind) => {
                self.open_panel(kind, now);
                return;
            }
        }

        let Some(kind) = self.registry.topmost_at(mouse.column, mouse.row) else {
            return;
        };
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            if matches!(mouse.kind, MouseEventKind::ScrollUp | MouseEventKind::ScrollDown) {
                self.forward_to(kind, event);
            }
            return;
        }
        let Some(rect) = self.registry.get(kind).map(|i| i.rect()) else {
            return;
        };
        match self.decorator.hit_test(kind, rect, mouse.column, mouse.row) {
            Some(FrameHit::Header(HeaderAction::Drag)) => {
                self.registry = self
                    .controller
                    .begin_drag(&self.registry, kind, pointer, now)
                    .unwrap_or_else(|| self.registry.focus(kind, now));
            }
            Some(FrameHit::Resize(edge)) => {
                self.registry = self
                    .controller
                    .begin_resize(&self.registry, kind, edge, pointer, now)
                    .unwrap_or_else(|| self.registry.focus(kind, now));
            }
            Some(FrameHit::Header(HeaderAction::Close)) => self.close_panel(kind, now),
            Some(FrameHit::Header(HeaderAction::Minimize)) => {
                self.registry = self.registry.minimize(kind);
            }
            Some(FrameHit::Header(HeaderAction::Pin)) => {
                let pinned = self.registry.get(kind).is_some_and(|i| i.pinned);
                self.registry = if pinned {
                    self.registry.unpin(kind)
                } else {
                    self.registry.pin(kind)
                };
            }
            Some(FrameHit::Body) => {
                self.registry = self.registry.focus(kind, now);
                self.forward_to(kind, event);
            }
            None => {}
        }
    }

    fn forward_to_active(&mut self, event: &Event) {
        if let Some(kind) = self.registry.active() {
            self.forward_to(kind, event);
        }
    }

    fn forward_to(&mut self, kind: PanelKind, event: &Event) {
        let ctx = self.context_for(kind);
        if let Some(content) = self.contents.get_mut(&kind) {
            content.handle_event(event, &ctx);
        }
    }

    fn context_for(&self, kind: PanelKind) -> ComponentContext {
        ComponentContext::new(kind)
            .with_focus(self.registry.active() == Some(kind))
            .with_pinned(self.registry.get(kind).is_some_and(|i| i.pinned))
    }

    fn refresh_launcher(&mut self, now: Instant) {
        let ranked = if self.options.static_order {
            catalog_ranking()
        } else {
            self.engine.ranked(self.time_slot(), now)
        };
        self.toolbar.set_items(ranked);
    }

    fn remember_geometry(&mut self, kind: PanelKind) {
        if let Some(instance) = self.registry.get(kind) {
            self.record
                .remember_panel(kind, instance.position, instance.size);
        }
    }

    fn persist(&mut self) {
        self.record.toolbar = Some(self.toolbar.layout_state());
        self.store.save_logged(&self.record);
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        self.set_viewport(Viewport::from_rect(frame.area()));
        self.render_status_band(frame);

        let resizing = self.controller.session().and_then(|s| match s.gesture {
            Gesture::Resize { .. } => Some(s.kind),
            Gesture::Drag { .. } => None,
        });
        let active = self.registry.active();
        let order: Vec<PanelKind> = self.registry.draw_order().iter().map(|i| i.kind).collect();
        for kind in order {
            let Some(instance) = self.registry.get(kind) else {
                continue;
            };
            let rect = instance.rect();
            self.decorator
                .render_frame(frame, instance, active == Some(kind));
            if resizing == Some(kind) {
                render_resize_outline(frame, rect);
            }
            let ctx = self.context_for(kind);
            if let Some(content) = self.contents.get_mut(&kind) {
                let area = PanelFrame::content_area(rect);
                content.resize(area, &ctx);
                content.render(frame, area, &ctx);
            }
        }

        self.toolbar.render(frame, &self.registry);
    }

    fn render_status_band(&self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        let band = Rect {
            height: self.registry.viewport().top_band.min(area.height),
            ..area
        };
        if band.height == 0 {
            return;
        }
        let style = Style::default()
            .bg(crate::theme::status_bg())
            .fg(crate::theme::status_fg());
        let blank = " ".repeat(band.width as usize);
        frame.set_string(band, band.x, band.y, &blank, style);

        let active = self
            .registry
            .active()
            .map(|k| k.config().title)
            .unwrap_or("-");
        let mut left = format!(" term-panels │ {} │ {}", self.time_slot().label(), active);
        let hint = self.controller.cursor_hint().label();
        if !hint.is_empty() {
            left.push_str(" │ ");
            left.push_str(hint);
        }
        frame.set_string(band, band.x, band.y, &left, style.add_modifier(Modifier::BOLD));

        let help = format!("{} ", self.bindings.status_hint());
        let help_width = help.chars().count() as u16;
        let left_width = left.chars().count() as u16;
        if band.width > left_width + help_width {
            frame.set_string(band, band.x + band.width - help_width, band.y, &help, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    fn deck() -> (Deck, Instant) {
        let now = Instant::now();
        let options = DeckOptions {
            hour: Some(10),
            ..DeckOptions::default()
        };
        (
            Deck::new(Viewport::new(160, 50), LayoutStore::in_memory(), options, now),
            now,
        )
    }

    fn rendered_text(deck: &mut Deck) -> String {
        let area = Rect {
            x: 0,
            y: 0,
            width: 160,
            height: 50,
        };
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        deck.render(&mut frame);
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn alt_digit_toggles_panel() {
        let (mut deck, now) = deck();
        let key = Event::Key(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT));
        deck.handle_event(&key, now);
        assert_eq!(deck.registry().state_of(PanelKind::GtdInbox), LifecycleState::Open);
        assert!(deck.has_content(PanelKind::GtdInbox));
        deck.handle_event(&key, now);
        assert_eq!(deck.registry().state_of(PanelKind::GtdInbox), LifecycleState::Closed);
        assert!(!deck.has_content(PanelKind::GtdInbox));
    }

    #[test]
    fn header_drag_moves_panel_and_remembers_it() {
        let (mut deck, now) = deck();
        deck.open_panel(PanelKind::VoiceNotes, now);
        let start = deck.registry().get(PanelKind::VoiceNotes).map(|i| i.position);
        let Some(start) = start else {
            panic!("panel should be open");
        };
        let header = (start.x as u16 + 3, start.y as u16 + 1);
        deck.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), header.0, header.1), now);
        assert!(deck.controller().is_active());
        deck.handle_event(
            &mouse(MouseEventKind::Drag(MouseButton::Left), header.0 + 10, header.1 + 5),
            now,
        );
        deck.handle_event(
            &mouse(MouseEventKind::Up(MouseButton::Left), header.0 + 10, header.1 + 5),
            now,
        );
        assert!(!deck.controller().is_active());
        let moved = Position::new(start.x + 10, start.y + 5);
        assert_eq!(
            deck.registry().get(PanelKind::VoiceNotes).map(|i| i.position),
            Some(moved)
        );
        assert_eq!(
            deck.record().panel(PanelKind::VoiceNotes).map(|g| g.position),
            Some(moved)
        );
    }

    #[test]
    fn reopened_panel_restores_geometry() {
        let (mut deck, now) = deck();
        deck.open_panel(PanelKind::GtdInbox, now);
        deck.registry = deck
            .registry
            .move_to(PanelKind::GtdInbox, Position::new(50, 20))
            .resize(PanelKind::GtdInbox, 60, 20);
        deck.close_panel(PanelKind::GtdInbox, now);
        deck.open_panel(PanelKind::GtdInbox, now);
        let instance = deck.registry().get(PanelKind::GtdInbox).cloned();
        assert_eq!(instance.as_ref().map(|i| i.position), Some(Position::new(50, 20)));
        assert_eq!(instance.map(|i| (i.size.width, i.size.height)), Some((60, 20)));
    }

    #[test]
    fn close_button_closes() {
        let (mut deck, now) = deck();
        deck.open_panel(PanelKind::AiAssistant, now);
        let Some(rect) = deck.registry().get(PanelKind::AiAssistant).map(|i| i.rect()) else {
            panic!("panel should be open");
        };
        let close_x = rect.x + rect.width - 3;
        deck.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), close_x, rect.y + 1), now);
        assert_eq!(
            deck.registry().state_of(PanelKind::AiAssistant),
            LifecycleState::Closed
        );
    }

    #[test]
    fn typing_reaches_active_panel() {
        let (mut deck, now) = deck();
        deck.open_panel(PanelKind::GtdInbox, now);
        assert!(!rendered_text(&mut deck).contains("> hi"));
        for c in ['h', 'i'] {
            let key = Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
            deck.handle_event(&key, now);
        }
        assert!(rendered_text(&mut deck).contains("> hi_"));
    }

    #[test]
    fn idle_sweep_forgets_long_closed_kinds() {
        let (mut deck, now) = deck();
        deck.open_panel(PanelKind::GtdInbox, now);
        deck.close_panel(PanelKind::GtdInbox, now);
        assert!(deck.record().panel(PanelKind::GtdInbox).is_some());
        let before = deck.engine().usage_signal(PanelKind::GtdInbox, now);
        assert!(before.frequency > 0.0);

        let later = now + IDLE_EVICTION_WINDOW + IDLE_SWEEP_INTERVAL;
        deck.tick(later);
        assert!(deck.record().panel(PanelKind::GtdInbox).is_none());
        assert_eq!(deck.engine().usage_signal(PanelKind::GtdInbox, later).frequency, 0.0);
    }

    #[test]
    fn idle_sweep_keeps_minimized_panels() {
        let (mut deck, now) = deck();
        deck.open_panel(PanelKind::GtdInbox, now);
        deck.registry = deck.registry.minimize(PanelKind::GtdInbox);
        deck.tick(now + IDLE_EVICTION_WINDOW * 3);
        assert_eq!(
            deck.registry().state_of(PanelKind::GtdInbox),
            LifecycleState::Minimized
        );
        assert!(deck.has_content(PanelKind::GtdInbox));
        assert!(deck.engine().usage_signal(PanelKind::GtdInbox, now).frequency > 0.0);
    }

    #[derive(Debug)]
    struct Banner(PanelKind);

    impl PanelContent for Banner {
        fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
            let text = format!("banner for {}", self.0.config().icon);
            frame.set_string(area, area.x, area.y, &text, Style::default());
        }
    }

    fn banner(kind: PanelKind) -> Box<dyn PanelContent> {
        Box::new(Banner(kind))
    }

    #[test]
    fn content_factory_supplies_panel_bodies() {
        let (deck, now) = deck();
        let mut deck = deck.with_content_factory(banner);
        deck.open_panel(PanelKind::TradingJournal, now);
        let text = rendered_text(&mut deck);
        let icon = PanelKind::TradingJournal.config().icon;
        assert!(text.contains(&format!("banner for {icon}")), "{text}");
    }

    #[test]
    fn status_band_shows_the_bound_keys() {
        let (deck, _) = deck();
        let mut bindings = KeyBindings::default();
        bindings.add(
            Action::Quit,
            crate::keybindings::KeyCombo::new(KeyCode::Char('0'), KeyModifiers::ALT),
        );
        let mut deck = deck.with_bindings(bindings);
        let band = rendered_text(&mut deck);
        let band = band.lines().next().unwrap_or_default();
        assert!(band.contains("Ctrl+Q quit"), "{band}");
        assert!(!band.contains("close all"), "{band}");
    }

    #[test]
    fn render_draws_status_band_and_panels() {
        let (mut deck, now) = deck();
        deck.open_panel(PanelKind::CognitiveLoad, now);
        let area = Rect {
            x: 0,
            y: 0,
            width: 160,
            height: 50,
        };
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        deck.render(&mut frame);
        let band: String = (0..40)
            .filter_map(|x| buffer.cell((x, 0)).map(|c| c.symbol().to_string()))
            .collect();
        assert!(band.contains("term-panels"), "{band}");
        assert!(band.contains("morning"), "{band}");
    }

    #[test]
    fn quit_binding_sets_flag() {
        let (mut deck, now) = deck();
        let key = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        deck.handle_event(&key, now);
        assert!(deck.should_quit());
    }
}
