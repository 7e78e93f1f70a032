pub mod floating;

use ratatui::prelude::Rect;

use crate::constants::{RESERVED_TOP_BAND, VIEWPORT_PADDING};
use crate::window::{Position, Size};

/// The area panels live in, plus the margins they must respect.
///
/// Panels stay fully on-screen: `padding` cells away from the left, right and
/// bottom edges and never above the `top_band` rows reserved for the status
/// band. When a panel is larger than the space available the top-left bound
/// wins, so the header (and its drag handle) stays reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub top_band: u16,
    pub padding: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            top_band: RESERVED_TOP_BAND,
            padding: VIEWPORT_PADDING,
        }
    }

    pub fn from_rect(area: Rect) -> Self {
        Self::new(area.width, area.height)
    }

    pub fn with_top_band(mut self, rows: u16) -> Self {
        self.top_band = rows;
        self
    }

    pub fn area(&self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    /// Inclusive `(min, max)` corners a panel of `size` may occupy.
    pub fn position_bounds(&self, size: Size) -> (Position, Position) {
        let pad = self.padding as i32;
        let min = Position::new(pad, self.top_band as i32);
        let max_x = self.width as i32 - size.width as i32 - pad;
        let max_y = self.height as i32 - size.height as i32 - pad;
        let max = Position::new(max_x.max(min.x), max_y.max(min.y));
        (min, max)
    }

    pub fn clamp_position(&self, pos: Position, size: Size) -> Position {
        let (min, max) = self.position_bounds(size);
        Position::new(pos.x.clamp(min.x, max.x), pos.y.clamp(min.y, max.y))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

/// Converts a signed origin and size into a `Rect`, clipping whatever lies
/// left of or above the origin of the screen.
pub fn rect_at(pos: Position, size: Size) -> Rect {
    let x = pos.x.max(0);
    let y = pos.y.max(0);
    let width = (size.width as i32 - (x - pos.x)).max(0);
    let height = (size.height as i32 - (y - pos.y)).max(0);
    Rect {
        x: x.min(u16::MAX as i32) as u16,
        y: y.min(u16::MAX as i32) as u16,
        width: width as u16,
        height: height as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_panel_inside_padding_and_below_band() {
        let vp = Viewport::new(100, 40);
        let size = Size::new(30, 10);
        assert_eq!(
            vp.clamp_position(Position::new(-50, -50), size),
            Position::new(1, 1)
        );
        assert_eq!(
            vp.clamp_position(Position::new(500, 500), size),
            Position::new(69, 29)
        );
        assert_eq!(
            vp.clamp_position(Position::new(20, 12), size),
            Position::new(20, 12)
        );
    }

    #[test]
    fn oversized_panel_pins_to_top_left_bound() {
        let vp = Viewport::new(20, 10).with_top_band(2);
        let size = Size::new(60, 30);
        assert_eq!(
            vp.clamp_position(Position::new(5, 5), size),
            Position::new(1, 2)
        );
    }

    #[test]
    fn rect_at_clips_negative_origin() {
        let r = rect_at(Position::new(-3, 2), Size::new(10, 4));
        assert_eq!(
            r,
            Rect {
                x: 0,
                y: 2,
                width: 7,
                height: 4
            }
        );
    }

    #[test]
    fn rect_contains_edge_cases() {
        let r = Rect {
            x: 0,
            y: 0,
            width: 0,
            height: 5,
        };
        assert!(!rect_contains(r, 0, 0));
        let r2 = Rect {
            x: 1,
            y: 1,
            width: 3,
            height: 3,
        };
        assert!(rect_contains(r2, 1, 1));
        assert!(!rect_contains(r2, 4, 1));
    }
}
