//! Shared content rendering context
//!
//! `ComponentContext` carries the frame state a content collaborator may care
//! about while rendering or handling input, so the `PanelContent` trait stays
//! stable as that state grows.

use crate::window::PanelKind;

#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    kind: PanelKind,
    focused: bool,
    pinned: bool,
}

impl ComponentContext {
    pub const fn new(kind: PanelKind) -> Self {
        Self {
            kind,
            focused: false,
            pinned: false,
        }
    }

    /// The panel kind hosting the content.
    pub const fn kind(&self) -> PanelKind {
        self.kind
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn pinned(&self) -> bool {
        self.pinned
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }
}
