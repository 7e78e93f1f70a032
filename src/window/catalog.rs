//! Static description of every panel type the deck can host.
//!
//! Content collaborators own what is drawn inside a panel; the catalog only
//! records how the window layer should treat it. Entries are immutable.

use super::{PanelKind, Size};
use crate::constants::{PANEL_MIN_HEIGHT, PANEL_MIN_WIDTH};
use crate::priority::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub resizable: bool,
    pub draggable: bool,
    pub pinnable: bool,
    pub minimizable: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        resizable: true,
        draggable: true,
        pinnable: true,
        minimizable: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelTypeConfig {
    pub kind: PanelKind,
    pub title: &'static str,
    /// Short glyph shown on the collapsed launcher rail.
    pub icon: &'static str,
    pub description: &'static str,
    pub default_size: Size,
    pub min_size: Size,
    pub max_size: Option<Size>,
    pub capabilities: Capabilities,
    /// Tier used when the launcher is ordered statically instead of by the
    /// priority engine.
    pub base_tier: Priority,
}

impl PanelTypeConfig {
    /// The catalog minimum raised to the crate-wide floor.
    pub fn effective_min_size(&self) -> Size {
        Size::new(
            self.min_size.width.max(PANEL_MIN_WIDTH),
            self.min_size.height.max(PANEL_MIN_HEIGHT),
        )
    }

    /// Clamps a requested size into this panel type's bounds. Each axis is
    /// clamped independently; nothing is ever rejected.
    pub fn clamp_size(&self, width: i32, height: i32) -> Size {
        let min = self.effective_min_size();
        let (min_w, min_h) = (min.width as i32, min.height as i32);
        let (max_w, max_h) = match self.max_size {
            Some(max) => ((max.width as i32).max(min_w), (max.height as i32).max(min_h)),
            None => (u16::MAX as i32, u16::MAX as i32),
        };
        Size::new(width.clamp(min_w, max_w) as u16, height.clamp(min_h, max_h) as u16)
    }
}

static CATALOG: [PanelTypeConfig; 7] = [
    PanelTypeConfig {
        kind: PanelKind::AiAssistant,
        title: "AI Assistant",
        icon: "AI",
        description: "Conversational assistant for planning and drafting.",
        default_size: Size::new(48, 18),
        min_size: Size::new(30, 10),
        max_size: None,
        capabilities: Capabilities::ALL,
        base_tier: Priority::High,
    },
    PanelTypeConfig {
        kind: PanelKind::GtdInbox,
        title: "GTD Inbox",
        icon: "IN",
        description: "Capture and classify incoming tasks.",
        default_size: Size::new(40, 16),
        min_size: Size::new(28, 8),
        max_size: None,
        capabilities: Capabilities::ALL,
        base_tier: Priority::High,
    },
    PanelTypeConfig {
        kind: PanelKind::CognitiveLoad,
        title: "Cognitive Load",
        icon: "CL",
        description: "Track focus, energy and context switches.",
        default_size: Size::new(36, 12),
        min_size: Size::new(24, 8),
        max_size: Some(Size::new(72, 24)),
        capabilities: Capabilities::ALL,
        base_tier: Priority::Medium,
    },
    PanelTypeConfig {
        kind: PanelKind::Relationships,
        title: "Relationships",
        icon: "RL",
        description: "Keep in touch with the people who matter.",
        default_size: Size::new(44, 16),
        min_size: Size::new(28, 8),
        max_size: None,
        capabilities: Capabilities::ALL,
        base_tier: Priority::Medium,
    },
    PanelTypeConfig {
        kind: PanelKind::RoiCalculator,
        title: "ROI Calculator",
        icon: "$%",
        description: "Estimate the return on time and money spent.",
        default_size: Size::new(34, 12),
        min_size: Size::new(26, 9),
        max_size: Some(Size::new(60, 20)),
        capabilities: Capabilities {
            pinnable: false,
            ..Capabilities::ALL
        },
        base_tier: Priority::Low,
    },
    PanelTypeConfig {
        kind: PanelKind::TradingJournal,
        title: "Trading Journal",
        icon: "TJ",
        description: "Log trading decisions and their rationale.",
        default_size: Size::new(46, 18),
        min_size: Size::new(30, 10),
        max_size: None,
        capabilities: Capabilities::ALL,
        base_tier: Priority::Low,
    },
    PanelTypeConfig {
        kind: PanelKind::VoiceNotes,
        title: "Voice Notes",
        icon: "VN",
        description: "Dictate quick notes and reminders.",
        default_size: Size::new(32, 8),
        min_size: Size::new(24, 6),
        max_size: Some(Size::new(48, 12)),
        capabilities: Capabilities {
            resizable: false,
            ..Capabilities::ALL
        },
        base_tier: Priority::Medium,
    },
];

pub fn entry(kind: PanelKind) -> &'static PanelTypeConfig {
    &CATALOG[kind as usize]
}

pub fn entries() -> &'static [PanelTypeConfig] {
    &CATALOG
}
