//! Launcher ordering heuristics.
//!
//! A panel kind's priority starts from a time-of-day table, is raised by how
//! the user has been using it, and may be raised further by contextual
//! signals reported by content collaborators. The result only orders and
//! styles the launcher; it gates nothing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Timelike;

use crate::constants::RECENT_USE_WINDOW;
use crate::window::PanelKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn level(self) -> u32 {
        self as u32
    }

    /// Saturates at `Critical`.
    pub fn from_level(level: u32) -> Self {
        match level {
            0 => Priority::Low,
            1 => Priority::Medium,
            2 => Priority::High,
            _ => Priority::Critical,
        }
    }

    pub fn emphasis(self) -> Emphasis {
        match self {
            Priority::Low => Emphasis::Muted,
            Priority::Medium => Emphasis::Normal,
            Priority::High => Emphasis::Accent,
            Priority::Critical => Emphasis::Glow,
        }
    }
}

/// Cosmetic highlight intensity for a launcher entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Muted,
    Normal,
    Accent,
    Glow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSlot {
    /// 09:00 to 12:00
    Morning,
    /// 12:00 to 18:00
    Afternoon,
    /// 18:00 to 22:00
    Evening,
    /// 22:00 to 09:00
    Night,
}

impl TimeSlot {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            9..=11 => TimeSlot::Morning,
            12..=17 => TimeSlot::Afternoon,
            18..=21 => TimeSlot::Evening,
            _ => TimeSlot::Night,
        }
    }

    pub fn current() -> Self {
        Self::from_hour(chrono::Local::now().hour())
    }

    /// Kinds featured during this slot, most important first.
    pub fn featured(self) -> &'static [PanelKind] {
        use PanelKind::*;
        match self {
            TimeSlot::Morning => &[GtdInbox, AiAssistant, CognitiveLoad, VoiceNotes],
            TimeSlot::Afternoon => &[TradingJournal, AiAssistant, GtdInbox, CognitiveLoad],
            TimeSlot::Evening => &[Relationships, CognitiveLoad, VoiceNotes, AiAssistant],
            TimeSlot::Night => &[CognitiveLoad, VoiceNotes],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
            TimeSlot::Night => "night",
        }
    }
}

pub fn compute_base_priority(kind: PanelKind, slot: TimeSlot) -> Priority {
    match slot.featured().iter().position(|k| *k == kind) {
        Some(0) => Priority::Critical,
        Some(1) => Priority::High,
        Some(2) => Priority::Medium,
        _ => Priority::Low,
    }
}

/// What the engine knows about how a kind has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UsageSignal {
    pub used_recently: bool,
    /// Share of all opens that went to this kind, in `0.0..=1.0`.
    pub frequency: f64,
    pub avg_session_minutes: f64,
}

pub fn adjust_by_usage(base: Priority, usage: &UsageSignal) -> Priority {
    let mut bonus: f64 = 0.0;
    if usage.used_recently {
        bonus += 1.0;
    }
    if usage.frequency > 0.7 {
        bonus += 1.0;
    } else if usage.frequency > 0.4 {
        bonus += 0.5;
    }
    if usage.avg_session_minutes > 10.0 {
        bonus += 1.0;
    } else if usage.avg_session_minutes > 5.0 {
        bonus += 0.5;
    }
    Priority::from_level(base.level() + bonus.floor() as u32)
}

/// Signals reported from outside the window layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextFlags {
    pub unread_inbox: bool,
    pub market_volatility: bool,
    pub voice_input: bool,
    pub background_task: bool,
}

/// The highest priority any active flag demands for `kind`. Kinds ignore
/// flags that are not about them.
pub fn contextual_override(kind: PanelKind, ctx: &ContextFlags) -> Priority {
    let reactions: [(bool, PanelKind, Priority); 7] = [
        (ctx.unread_inbox, PanelKind::GtdInbox, Priority::High),
        (ctx.market_volatility, PanelKind::TradingJournal, Priority::Critical),
        (ctx.market_volatility, PanelKind::RoiCalculator, Priority::Medium),
        (ctx.voice_input, PanelKind::VoiceNotes, Priority::Critical),
        (ctx.voice_input, PanelKind::AiAssistant, Priority::High),
        (ctx.background_task, PanelKind::AiAssistant, Priority::High),
        (ctx.background_task, PanelKind::CognitiveLoad, Priority::Medium),
    ];
    reactions
        .iter()
        .filter(|(active, target, _)| *active && *target == kind)
        .map(|(_, _, priority)| *priority)
        .max()
        .unwrap_or(Priority::Low)
}

/// Contextual signals may raise the usage-adjusted baseline, never lower it.
pub fn final_priority(adjusted: Priority, contextual: Priority) -> Priority {
    adjusted.max(contextual)
}

#[derive(Debug, Clone, Default)]
struct UsageRecord {
    opens: u32,
    last_used: Option<Instant>,
    session_start: Option<Instant>,
    sessions: u32,
    session_time: Duration,
}

/// Owns usage history and the current context for one launcher.
#[derive(Debug, Clone, Default)]
pub struct PriorityEngine {
    usage: HashMap<PanelKind, UsageRecord>,
    total_opens: u32,
    context: ContextFlags,
}

impl PriorityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: ContextFlags) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    pub fn context(&self) -> ContextFlags {
        self.context
    }

    pub fn set_context(&mut self, context: ContextFlags) {
        self.context = context;
    }

    pub fn record_open(&mut self, kind: PanelKind, now: Instant) {
        let record = self.usage.entry(kind).or_default();
        record.opens = record.opens.saturating_add(1);
        record.last_used = Some(now);
        record.session_start.get_or_insert(now);
        self.total_opens = self.total_opens.saturating_add(1);
    }

    pub fn record_close(&mut self, kind: PanelKind, now: Instant) {
        let Some(record) = self.usage.get_mut(&kind) else {
            return;
        };
        if let Some(start) = record.session_start.take() {
            record.sessions = record.sessions.saturating_add(1);
            record.session_time += now.saturating_duration_since(start);
        }
        record.last_used = Some(now);
    }

    /// Drops the history of kinds that have been closed for at least
    /// `window` and returns them in catalog order. Kinds with a session still
    /// running are kept however long ago they were opened.
    pub fn forget_idle(&mut self, now: Instant, window: Duration) -> Vec<PanelKind> {
        let mut stale: Vec<PanelKind> = self
            .usage
            .iter()
            .filter(|(_, record)| {
                record.session_start.is_none()
                    && record
                        .last_used
                        .is_none_or(|t| now.saturating_duration_since(t) >= window)
            })
            .map(|(kind, _)| *kind)
            .collect();
        stale.sort_by_key(|kind| kind.catalog_index());
        for kind in &stale {
            if let Some(record) = self.usage.remove(kind) {
                self.total_opens = self.total_opens.saturating_sub(record.opens);
            }
        }
        if !stale.is_empty() {
            tracing::debug!(forgotten = ?stale, "dropped idle usage history");
        }
        stale
    }

    pub fn usage_signal(&self, kind: PanelKind, now: Instant) -> UsageSignal {
        let Some(record) = self.usage.get(&kind) else {
            return UsageSignal::default();
        };
        let used_recently = record.session_start.is_some()
            || record
                .last_used
                .is_some_and(|t| now.saturating_duration_since(t) <= RECENT_USE_WINDOW);
        let frequency = if self.total_opens == 0 {
            0.0
        } else {
            record.opens as f64 / self.total_opens as f64
        };
        let avg_session_minutes = if record.sessions == 0 {
            0.0
        } else {
            record.session_time.as_secs_f64() / 60.0 / record.sessions as f64
        };
        UsageSignal {
            used_recently,
            frequency,
            avg_session_minutes,
        }
    }

    pub fn priority(&self, kind: PanelKind, slot: TimeSlot, now: Instant) -> Priority {
        let base = compute_base_priority(kind, slot);
        let adjusted = adjust_by_usage(base, &self.usage_signal(kind, now));
        final_priority(adjusted, contextual_override(kind, &self.context))
    }

    /// Every kind with its priority, highest first; ties keep catalog order.
    pub fn ranked(&self, slot: TimeSlot, now: Instant) -> Vec<(PanelKind, Priority)> {
        let mut ranked: Vec<(PanelKind, Priority)> = PanelKind::ALL
            .iter()
            .map(|kind| (*kind, self.priority(*kind, slot, now)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}
