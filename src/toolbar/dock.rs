//! Docking and hover-driven collapse for the launcher.
//!
//! The launcher is either floating or docked to a side; a docked launcher is
//! either expanded or collapsed to a rail. Collapse and expand are delayed by
//! single-shot timers. Every transition that makes a pending timer pointless
//! cancels it explicitly, so a stale deadline can never fire later.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::constants::{COLLAPSE_DELAY, EXPAND_DELAY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockState {
    Floating,
    DockedExpanded(DockSide),
    DockedCollapsed(DockSide),
}

impl DockState {
    pub fn side(self) -> Option<DockSide> {
        match self {
            DockState::Floating => None,
            DockState::DockedExpanded(side) | DockState::DockedCollapsed(side) => Some(side),
        }
    }

    pub fn is_collapsed(self) -> bool {
        matches!(self, DockState::DockedCollapsed(_))
    }
}

/// A cancellable, single-shot deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarms and reports `true` once the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Collapse or expand caused by a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockTransition {
    Collapsed(DockSide),
    Expanded(DockSide),
}

#[derive(Debug, Clone)]
pub struct DockMachine {
    state: DockState,
    collapse_timer: Timer,
    expand_timer: Timer,
    hovered: bool,
    dragging: bool,
}

impl Default for DockMachine {
    fn default() -> Self {
        Self::restore(DockState::Floating)
    }
}

impl DockMachine {
    /// Starts in `state` with no timers armed; they only begin on the next
    /// live hover event.
    pub fn restore(state: DockState) -> Self {
        Self {
            state,
            collapse_timer: Timer::default(),
            expand_timer: Timer::default(),
            hovered: false,
            dragging: false,
        }
    }

    pub fn state(&self) -> DockState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn collapse_timer(&self) -> &Timer {
        &self.collapse_timer
    }

    pub fn expand_timer(&self) -> &Timer {
        &self.expand_timer
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.collapse_timer.deadline(), self.expand_timer.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Pointer entered the launcher or its edge trigger zone.
    pub fn hover(&mut self, now: Instant) {
        self.hovered = true;
        self.collapse_timer.cancel();
        if self.state.is_collapsed() && !self.expand_timer.is_armed() {
            self.expand_timer.arm(now, EXPAND_DELAY);
        }
    }

    /// Pointer left the launcher and its trigger zone.
    pub fn unhover(&mut self, now: Instant) {
        self.hovered = false;
        self.expand_timer.cancel();
        self.arm_collapse_if_idle(now);
    }

    /// A drag always shows the full launcher. Returns `true` when that
    /// un-collapsed it.
    pub fn begin_drag(&mut self) -> bool {
        self.dragging = true;
        self.collapse_timer.cancel();
        self.expand_timer.cancel();
        if let DockState::DockedCollapsed(side) = self.state {
            self.state = DockState::DockedExpanded(side);
            tracing::debug!(?side, "launcher expanded for drag");
            return true;
        }
        false
    }

    /// Commits the drag: docks to `side`, or floats when `None`.
    pub fn end_drag(&mut self, side: Option<DockSide>, now: Instant) {
        self.dragging = false;
        self.state = match side {
            Some(side) => DockState::DockedExpanded(side),
            None => DockState::Floating,
        };
        tracing::debug!(state = ?self.state, "launcher released");
        self.arm_collapse_if_idle(now);
    }

    /// Fires due timers.
    pub fn tick(&mut self, now: Instant) -> Option<DockTransition> {
        if self.collapse_timer.fire_if_due(now)
            && let DockState::DockedExpanded(side) = self.state
            && !self.hovered
            && !self.dragging
        {
            self.state = DockState::DockedCollapsed(side);
            tracing::debug!(?side, "launcher collapsed");
            return Some(DockTransition::Collapsed(side));
        }
        if self.expand_timer.fire_if_due(now)
            && let DockState::DockedCollapsed(side) = self.state
        {
            self.state = DockState::DockedExpanded(side);
            tracing::debug!(?side, "launcher expanded");
            return Some(DockTransition::Expanded(side));
        }
        None
    }

    fn arm_collapse_if_idle(&mut self, now: Instant) {
        if matches!(self.state, DockState::DockedExpanded(_)) && !self.hovered && !self.dragging {
            self.collapse_timer.arm(now, COLLAPSE_DELAY);
        } else {
            self.collapse_timer.cancel();
        }
    }
}
