use ratatui::prelude::Rect;

use super::{Viewport, rect_contains};
use crate::constants::{CASCADE_ORIGIN, CASCADE_STEP};
use crate::ui::UiFrame;
use crate::window::{Position, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 8] = [
        ResizeEdge::Left,
        ResizeEdge::Right,
        ResizeEdge::Top,
        ResizeEdge::Bottom,
        ResizeEdge::TopLeft,
        ResizeEdge::TopRight,
        ResizeEdge::BottomLeft,
        ResizeEdge::BottomRight,
    ];

    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResizeHandle<R: Copy + Eq + Ord> {
    pub id: R,
    pub rect: Rect,
    pub edge: ResizeEdge,
}

#[derive(Debug, Clone, Copy)]
pub struct DragHandle<R: Copy + Eq + Ord> {
    pub id: R,
    pub rect: Rect,
}

/// The eight one-cell-thick handles along a frame's border: four corners,
/// then the edges between them.
pub fn resize_handles_for_region<R: Copy + Eq + Ord>(id: R, rect: Rect) -> Vec<ResizeHandle<R>> {
    let mut handles = Vec::with_capacity(8);
    if rect.width == 0 || rect.height == 0 {
        return handles;
    }
    let right = rect.x.saturating_add(rect.width.saturating_sub(1));
    let bottom = rect.y.saturating_add(rect.height.saturating_sub(1));
    let cell = |x: u16, y: u16| Rect {
        x,
        y,
        width: 1,
        height: 1,
    };
    handles.push(ResizeHandle {
        id,
        rect: cell(rect.x, rect.y),
        edge: ResizeEdge::TopLeft,
    });
    handles.push(ResizeHandle {
        id,
        rect: cell(right, rect.y),
        edge: ResizeEdge::TopRight,
    });
    handles.push(ResizeHandle {
        id,
        rect: cell(rect.x, bottom),
        edge: ResizeEdge::BottomLeft,
    });
    handles.push(ResizeHandle {
        id,
        rect: cell(right, bottom),
        edge: ResizeEdge::BottomRight,
    });
    if rect.width > 2 {
        handles.push(ResizeHandle {
            id,
            rect: Rect {
                x: rect.x.saturating_add(1),
                y: rect.y,
                width: rect.width.saturating_sub(2),
                height: 1,
            },
            edge: ResizeEdge::Top,
        });
        handles.push(ResizeHandle {
            id,
            rect: Rect {
                x: rect.x.saturating_add(1),
                y: bottom,
                width: rect.width.saturating_sub(2),
                height: 1,
            },
            edge: ResizeEdge::Bottom,
        });
    }
    if rect.height > 2 {
        handles.push(ResizeHandle {
            id,
            rect: Rect {
                x: rect.x,
                y: rect.y.saturating_add(1),
                width: 1,
                height: rect.height.saturating_sub(2),
            },
            edge: ResizeEdge::Left,
        });
        handles.push(ResizeHandle {
            id,
            rect: Rect {
                x: right,
                y: rect.y.saturating_add(1),
                width: 1,
                height: rect.height.saturating_sub(2),
            },
            edge: ResizeEdge::Right,
        });
    }
    handles
}

/// The header row just inside the top border; the only place a drag starts.
pub fn floating_header_for_region<R: Copy + Eq + Ord>(id: R, rect: Rect) -> Option<DragHandle<R>> {
    if rect.width < 3 || rect.height < 3 {
        return None;
    }
    Some(DragHandle {
        id,
        rect: Rect {
            x: rect.x.saturating_add(1),
            y: rect.y.saturating_add(1),
            width: rect.width.saturating_sub(2),
            height: 1,
        },
    })
}

pub fn resize_edge_at(rect: Rect, column: u16, row: u16) -> Option<ResizeEdge> {
    resize_handles_for_region((), rect)
        .into_iter()
        .find(|handle| rect_contains(handle.rect, column, row))
        .map(|handle| handle.edge)
}

/// Applies a pointer delta to the geometry captured when a resize began.
///
/// Only the axes the edge controls change. Each changed axis is floored at
/// `min` (and capped at `max` when given) independently; when a left or top
/// edge hits a bound the opposite edge stays where it was.
pub fn apply_resize(
    start_pos: Position,
    start_size: Size,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    min: Size,
    max: Option<Size>,
) -> (Position, Size) {
    let (max_w, max_h) = max
        .map(|m| (m.width as i32, m.height as i32))
        .unwrap_or((u16::MAX as i32, u16::MAX as i32));
    let min_w = min.width as i32;
    let min_h = min.height as i32;
    let mut x = start_pos.x;
    let mut y = start_pos.y;
    let mut width = start_size.width as i32;
    let mut height = start_size.height as i32;

    if edge.moves_left() {
        let right = x + width;
        width = (width - dx).clamp(min_w, max_w.max(min_w));
        x = right - width;
    } else if edge.moves_right() {
        width = (width + dx).clamp(min_w, max_w.max(min_w));
    }
    if edge.moves_top() {
        let bottom = y + height;
        height = (height - dy).clamp(min_h, max_h.max(min_h));
        y = bottom - height;
    } else if edge.moves_bottom() {
        height = (height + dy).clamp(min_h, max_h.max(min_h));
    }

    (
        Position::new(x, y),
        Size::new(width as u16, height as u16),
    )
}

/// Where the next auto-placed panel goes.
///
/// Panels step diagonally from the cascade origin, one step per panel that is
/// already open. The sequence wraps back to the origin once the next step
/// would no longer fit inside the viewport.
pub fn cascade_position(viewport: Viewport, size: Size, open_count: usize) -> Position {
    let (min, max) = viewport.position_bounds(size);
    let origin = Position::new(CASCADE_ORIGIN.0.max(min.x), CASCADE_ORIGIN.1.max(min.y));
    let (step_x, step_y) = CASCADE_STEP;
    let room_x = (max.x - origin.x).max(0) / step_x;
    let room_y = (max.y - origin.y).max(0) / step_y;
    let slots = (room_x.min(room_y) + 1).max(1) as usize;
    let step = (open_count % slots) as i32;
    viewport.clamp_position(origin.offset(step_x * step, step_y * step), size)
}

/// Redraws a frame's border with heavy glyphs while it is being resized.
pub fn render_resize_outline(frame: &mut UiFrame<'_>, rect: Rect) {
    if rect.width < 3 || rect.height < 3 {
        return;
    }
    let bounds = frame.area();
    let buffer = frame.buffer_mut();
    let right = rect.x.saturating_add(rect.width.saturating_sub(1));
    let bottom = rect.y.saturating_add(rect.height.saturating_sub(1));
    let mut put = |x: u16, y: u16, symbol: &str| {
        if rect_contains(bounds, x, y)
            && let Some(cell) = buffer.cell_mut((x, y))
        {
            cell.set_symbol(symbol);
        }
    };
    for x in rect.x..=right {
        put(x, rect.y, "═");
        put(x, bottom, "═");
    }
    for y in rect.y..=bottom {
        put(rect.x, y, "║");
        put(right, y, "║");
    }
    put(rect.x, rect.y, "╔");
    put(right, rect.y, "╗");
    put(rect.x, bottom, "╚");
    put(right, bottom, "╝");
}
