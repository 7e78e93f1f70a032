//! Drag and resize gestures.
//!
//! A gesture lives from one pointer-down to the matching pointer-up. While it
//! is in flight the deck routes every pointer move here regardless of what is
//! under the pointer, so fast drags that leave the panel keep tracking. At
//! most one gesture exists at a time; a second pointer-down is ignored until
//! the first is released.

use std::time::Instant;

use crate::layout::floating::{ResizeEdge, apply_resize};
use crate::window::{PanelKind, PanelRegistry, Position, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// `offset` is the pointer position relative to the panel's top-left
    /// corner when the drag began.
    Drag { offset: Position },
    Resize { edge: ResizeEdge },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSession {
    pub kind: PanelKind,
    pub gesture: Gesture,
    pub origin_pointer: Position,
    pub origin_position: Position,
    pub origin_size: Size,
}

/// Pointer shape to advertise while a gesture is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Move,
    ResizeNs,
    ResizeEw,
    ResizeNwse,
    ResizeNesw,
}

impl CursorHint {
    pub fn for_edge(edge: ResizeEdge) -> Self {
        match edge {
            ResizeEdge::Top | ResizeEdge::Bottom => CursorHint::ResizeNs,
            ResizeEdge::Left | ResizeEdge::Right => CursorHint::ResizeEw,
            ResizeEdge::TopLeft | ResizeEdge::BottomRight => CursorHint::ResizeNwse,
            ResizeEdge::TopRight | ResizeEdge::BottomLeft => CursorHint::ResizeNesw,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CursorHint::Default => "",
            CursorHint::Move => "move",
            CursorHint::ResizeNs => "resize ↕",
            CursorHint::ResizeEw => "resize ↔",
            CursorHint::ResizeNwse => "resize ⤡",
            CursorHint::ResizeNesw => "resize ⤢",
        }
    }
}

#[derive(Debug, Default)]
pub struct PointerInteractionController {
    session: Option<GestureSession>,
}

impl PointerInteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    pub fn cursor_hint(&self) -> CursorHint {
        match self.session.map(|s| s.gesture) {
            None => CursorHint::Default,
            Some(Gesture::Drag { .. }) => CursorHint::Move,
            Some(Gesture::Resize { edge }) => CursorHint::for_edge(edge),
        }
    }

    /// Starts dragging `kind` from its header. Returns the focused snapshot, or
    /// `None` when no gesture was started.
    pub fn begin_drag(
        &mut self,
        registry: &PanelRegistry,
        kind: PanelKind,
        pointer: Position,
        now: Instant,
    ) -> Option<PanelRegistry> {
        if !kind.config().capabilities.draggable {
            return None;
        }
        let offset = registry
            .get(kind)
            .map(|i| Position::new(pointer.x - i.position.x, pointer.y - i.position.y))?;
        self.begin(registry, kind, Gesture::Drag { offset }, pointer, now)
    }

    /// Starts resizing `kind` from one of its eight edge handles.
    pub fn begin_resize(
        &mut self,
        registry: &PanelRegistry,
        kind: PanelKind,
        edge: ResizeEdge,
        pointer: Position,
        now: Instant,
    ) -> Option<PanelRegistry> {
        if !kind.config().capabilities.resizable {
            return None;
        }
        self.begin(registry, kind, Gesture::Resize { edge }, pointer, now)
    }

    fn begin(
        &mut self,
        registry: &PanelRegistry,
        kind: PanelKind,
        gesture: Gesture,
        pointer: Position,
        now: Instant,
    ) -> Option<PanelRegistry> {
        if let Some(active) = &self.session {
            tracing::trace!(panel = ?kind, busy = ?active.kind, "gesture ignored: another is active");
            return None;
        }
        let instance = registry.get(kind).filter(|i| i.is_visible())?;
        self.session = Some(GestureSession {
            kind,
            gesture,
            origin_pointer: pointer,
            origin_position: instance.position,
            origin_size: instance.size,
        });
        tracing::debug!(panel = ?kind, ?gesture, "gesture started");
        Some(registry.focus(kind, now))
    }

    /// Applies the current pointer position to the panel under gesture.
    pub fn pointer_move(&self, registry: &PanelRegistry, pointer: Position) -> Option<PanelRegistry> {
        let session = self.session?;
        let kind = session.kind;
        match session.gesture {
            Gesture::Drag { offset } => {
                let target = Position::new(pointer.x - offset.x, pointer.y - offset.y);
                Some(registry.move_to(kind, target))
            }
            Gesture::Resize { edge } => {
                let dx = pointer.x - session.origin_pointer.x;
                let dy = pointer.y - session.origin_pointer.y;
                let config = kind.config();
                let max = fit_max_to_viewport(registry, &session, edge, config.max_size);
                let (position, size) = apply_resize(
                    session.origin_position,
                    session.origin_size,
                    edge,
                    dx,
                    dy,
                    config.effective_min_size(),
                    Some(max),
                );
                Some(
                    registry
                        .resize(kind, size.width as i32, size.height as i32)
                        .move_to(kind, position),
                )
            }
        }
    }

    /// Ends the gesture, returning the session that was active.
    pub fn pointer_up(&mut self) -> Option<GestureSession> {
        let session = self.session.take();
        if let Some(session) = &session {
            tracing::debug!(panel = ?session.kind, "gesture released");
        }
        session
    }
}

/// Caps growth so the edge being dragged cannot push past the viewport while
/// the opposite edge stays put.
fn fit_max_to_viewport(
    registry: &PanelRegistry,
    session: &GestureSession,
    edge: ResizeEdge,
    catalog_max: Option<Size>,
) -> Size {
    let viewport = registry.viewport();
    let pad = viewport.padding as i32;
    let start = session.origin_position;
    let size = session.origin_size;
    let room_w = if edge.moves_left() {
        start.x + size.width as i32 - pad
    } else if edge.moves_right() {
        viewport.width as i32 - pad - start.x
    } else {
        size.width as i32
    };
    let room_h = if edge.moves_top() {
        start.y + size.height as i32 - viewport.top_band as i32
    } else if edge.moves_bottom() {
        viewport.height as i32 - pad - start.y
    } else {
        size.height as i32
    };
    let clamp = |room: i32, cap: Option<u16>| -> u16 {
        let room = room.clamp(0, u16::MAX as i32) as u16;
        cap.map_or(room, |cap| room.min(cap))
    };
    Size::new(
        clamp(room_w, catalog_max.map(|m| m.width)),
        clamp(room_h, catalog_max.map(|m| m.height)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Viewport;

    fn setup() -> (PanelRegistry, Instant) {
        let now = Instant::now();
        let reg = PanelRegistry::new(Viewport::new(120, 40)).open(
            PanelKind::GtdInbox,
            Some(Position::new(10, 5)),
            now,
        );
        (reg, now)
    }

    #[test]
    fn drag_keeps_grab_offset() {
        let (reg, now) = setup();
        let mut ctl = PointerInteractionController::new();
        let reg = ctl
            .begin_drag(&reg, PanelKind::GtdInbox, Position::new(14, 6), now)
            .unwrap_or(reg);
        assert_eq!(ctl.cursor_hint(), CursorHint::Move);
        let reg = ctl.pointer_move(&reg, Position::new(24, 9)).unwrap_or(reg);
        assert_eq!(
            reg.get(PanelKind::GtdInbox).map(|i| i.position),
            Some(Position::new(20, 8))
        );
        assert!(ctl.pointer_up().is_some());
        assert!(!ctl.is_active());
        assert_eq!(ctl.cursor_hint(), CursorHint::Default);
    }

    #[test]
    fn drag_past_the_edge_clamps() {
        let (reg, now) = setup();
        let mut ctl = PointerInteractionController::new();
        let reg = ctl
            .begin_drag(&reg, PanelKind::GtdInbox, Position::new(14, 6), now)
            .unwrap_or(reg);
        let reg = ctl.pointer_move(&reg, Position::new(-30, -30)).unwrap_or(reg);
        assert_eq!(
            reg.get(PanelKind::GtdInbox).map(|i| i.position),
            Some(Position::new(1, 1))
        );
    }

    #[test]
    fn second_gesture_is_ignored_while_one_is_active() {
        let (reg, now) = setup();
        let reg = reg.open(PanelKind::AiAssistant, Some(Position::new(60, 10)), now);
        let mut ctl = PointerInteractionController::new();
        assert!(
            ctl.begin_drag(&reg, PanelKind::GtdInbox, Position::new(14, 6), now)
                .is_some()
        );
        assert!(
            ctl.begin_resize(
                &reg,
                PanelKind::AiAssistant,
                ResizeEdge::Right,
                Position::new(107, 12),
                now
            )
            .is_none()
        );
        assert_eq!(ctl.session().map(|s| s.kind), Some(PanelKind::GtdInbox));
    }

    #[test]
    fn begin_focuses_the_panel() {
        let (reg, now) = setup();
        let reg = reg.open(PanelKind::AiAssistant, Some(Position::new(60, 10)), now);
        let mut ctl = PointerInteractionController::new();
        let reg = ctl
            .begin_drag(&reg, PanelKind::GtdInbox, Position::new(14, 6), now)
            .unwrap_or(reg);
        assert_eq!(reg.active(), Some(PanelKind::GtdInbox));
    }

    #[test]
    fn resize_floors_each_axis() {
        let (reg, now) = setup();
        let mut ctl = PointerInteractionController::new();
        let reg = ctl
            .begin_resize(
                &reg,
                PanelKind::GtdInbox,
                ResizeEdge::BottomRight,
                Position::new(49, 20),
                now,
            )
            .unwrap_or(reg);
        assert_eq!(ctl.cursor_hint(), CursorHint::ResizeNwse);
        let reg = ctl.pointer_move(&reg, Position::new(0, 30)).unwrap_or(reg);
        let instance = reg.get(PanelKind::GtdInbox).cloned();
        assert_eq!(instance.as_ref().map(|i| i.size), Some(Size::new(28, 26)));
        assert_eq!(instance.map(|i| i.position), Some(Position::new(10, 5)));
    }

    #[test]
    fn left_resize_keeps_right_edge() {
        let (reg, now) = setup();
        let mut ctl = PointerInteractionController::new();
        let reg = ctl
            .begin_resize(
                &reg,
                PanelKind::GtdInbox,
                ResizeEdge::Left,
                Position::new(10, 10),
                now,
            )
            .unwrap_or(reg);
        let reg = ctl.pointer_move(&reg, Position::new(6, 10)).unwrap_or(reg);
        let instance = reg.get(PanelKind::GtdInbox).cloned();
        assert_eq!(instance.as_ref().map(|i| i.size.width), Some(44));
        assert_eq!(instance.map(|i| i.position.x), Some(6));
    }

    #[test]
    fn resize_stops_at_viewport_edge() {
        let (reg, now) = setup();
        let mut ctl = PointerInteractionController::new();
        let reg = ctl
            .begin_resize(
                &reg,
                PanelKind::GtdInbox,
                ResizeEdge::Right,
                Position::new(49, 10),
                now,
            )
            .unwrap_or(reg);
        let reg = ctl.pointer_move(&reg, Position::new(500, 10)).unwrap_or(reg);
        let instance = reg.get(PanelKind::GtdInbox).cloned();
        assert_eq!(instance.as_ref().map(|i| i.size.width), Some(109));
        assert_eq!(instance.map(|i| i.position.x), Some(10));
    }

    #[test]
    fn capabilities_gate_gestures() {
        let now = Instant::now();
        let reg = PanelRegistry::new(Viewport::new(120, 40)).open(
            PanelKind::VoiceNotes,
            Some(Position::new(10, 5)),
            now,
        );
        let mut ctl = PointerInteractionController::new();
        assert!(
            ctl.begin_resize(
                &reg,
                PanelKind::VoiceNotes,
                ResizeEdge::Bottom,
                Position::new(20, 12),
                now
            )
            .is_none()
        );
        assert!(!ctl.is_active());
    }

    #[test]
    fn moves_without_session_do_nothing() {
        let (reg, _) = setup();
        let ctl = PointerInteractionController::new();
        assert!(ctl.pointer_move(&reg, Position::new(3, 3)).is_none());
    }
}
