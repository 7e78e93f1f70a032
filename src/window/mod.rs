pub mod catalog;
pub mod decorator;
pub mod registry;

use std::fmt;
use std::time::Instant;

use ratatui::prelude::Rect;
use serde::{Deserialize, Serialize};

pub use catalog::{Capabilities, PanelTypeConfig};
pub use decorator::{FrameHit, HeaderAction, PanelFrame, WindowDecorator};
pub use registry::PanelRegistry;

/// Signed top-left corner of a panel, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// Panel extent, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Every kind of panel the deck knows how to host. At most one live instance
/// exists per kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PanelKind {
    AiAssistant,
    GtdInbox,
    CognitiveLoad,
    Relationships,
    RoiCalculator,
    TradingJournal,
    VoiceNotes,
}

impl PanelKind {
    /// All kinds, in catalog order.
    pub const ALL: [PanelKind; 7] = [
        PanelKind::AiAssistant,
        PanelKind::GtdInbox,
        PanelKind::CognitiveLoad,
        PanelKind::Relationships,
        PanelKind::RoiCalculator,
        PanelKind::TradingJournal,
        PanelKind::VoiceNotes,
    ];

    pub fn config(self) -> &'static PanelTypeConfig {
        catalog::entry(self)
    }

    /// Position of this kind in the catalog; used as the stable tie-break
    /// wherever kinds are sorted.
    pub fn catalog_index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(Self::ALL.len())
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config().title)
    }
}

/// Lifecycle of one panel kind. CLOSED kinds have no instance in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Closed,
    Open,
    Minimized,
}

/// One live panel held by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelInstance {
    pub kind: PanelKind,
    pub state: LifecycleState,
    pub position: Position,
    pub size: Size,
    pub z_index: u64,
    pub pinned: bool,
    pub last_active: Instant,
    pub created_at: Instant,
}

impl PanelInstance {
    pub fn is_minimized(&self) -> bool {
        self.state == LifecycleState::Minimized
    }

    /// Open and not minimized, i.e. drawn on screen.
    pub fn is_visible(&self) -> bool {
        self.state == LifecycleState::Open
    }

    pub fn rect(&self) -> Rect {
        crate::layout::rect_at(self.position, self.size)
    }
}
