//! The authoritative map of panel kind to panel instance.
//!
//! Every operation takes the current snapshot by reference and returns the
//! next one; the receiver is never mutated. Snapshots share their instance map
//! until a transition actually changes it, so handing them out is cheap.
//! Operations are total: a kind without an instance simply yields an
//! unchanged snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use super::{LifecycleState, PanelInstance, PanelKind, Position, Size};
use crate::layout::Viewport;
use crate::layout::floating::cascade_position;

#[derive(Debug, Clone)]
pub struct PanelRegistry {
    instances: Arc<BTreeMap<PanelKind, PanelInstance>>,
    active: Option<PanelKind>,
    next_z: u64,
    viewport: Viewport,
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl PanelRegistry {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            instances: Arc::default(),
            active: None,
            next_z: 1,
            viewport,
        }
    }

    // --- queries ---

    pub fn get(&self, kind: PanelKind) -> Option<&PanelInstance> {
        self.instances.get(&kind)
    }

    pub fn state_of(&self, kind: PanelKind) -> LifecycleState {
        self.get(kind)
            .map(|instance| instance.state)
            .unwrap_or(LifecycleState::Closed)
    }

    pub fn active(&self) -> Option<PanelKind> {
        self.active
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn instances(&self) -> impl Iterator<Item = &PanelInstance> {
        self.instances.values()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Highest z-index handed out so far (0 before the first one).
    pub fn last_issued_z(&self) -> u64 {
        self.next_z - 1
    }

    /// Visible panels, back to front.
    pub fn draw_order(&self) -> Vec<&PanelInstance> {
        let mut visible: Vec<&PanelInstance> =
            self.instances.values().filter(|i| i.is_visible()).collect();
        visible.sort_by_key(|i| i.z_index);
        visible
    }

    /// The front-most visible panel covering the given cell.
    pub fn topmost_at(&self, column: u16, row: u16) -> Option<PanelKind> {
        self.draw_order()
            .into_iter()
            .rev()
            .find(|i| crate::layout::rect_contains(i.rect(), column, row))
            .map(|i| i.kind)
    }

    // --- transitions ---

    /// Opens `kind`, or refocuses it when an instance already exists.
    ///
    /// New instances take their catalog default size and either the explicit
    /// position or the next cascade slot; both are clamped into the viewport.
    pub fn open(&self, kind: PanelKind, position: Option<Position>, now: Instant) -> Self {
        self.transform(|reg| {
            if reg.instances.contains_key(&kind) {
                if let Some(instance) = reg.instance_mut(kind) {
                    instance.state = LifecycleState::Open;
                }
                reg.bump(kind, now);
                tracing::debug!(panel = ?kind, z = reg.last_issued_z(), "refocused panel");
                return;
            }
            let size = default_size(kind);
            let open_count = reg.instances.values().filter(|i| i.is_visible()).count();
            let requested =
                position.unwrap_or_else(|| cascade_position(reg.viewport, size, open_count));
            let position = reg.viewport.clamp_position(requested, size);
            Arc::make_mut(&mut reg.instances).insert(
                kind,
                PanelInstance {
                    kind,
                    state: LifecycleState::Open,
                    position,
                    size,
                    z_index: 0,
                    pinned: false,
                    last_active: now,
                    created_at: now,
                },
            );
            reg.bump(kind, now);
            tracing::debug!(
                panel = ?kind,
                x = position.x,
                y = position.y,
                z = reg.last_issued_z(),
                "opened panel"
            );
        })
    }

    /// Removes `kind`, except that pinned panels are only minimized.
    pub fn close(&self, kind: PanelKind) -> Self {
        self.transform(|reg| {
            let Some(pinned) = reg.get(kind).map(|i| i.pinned) else {
                tracing::trace!(panel = ?kind, "close ignored: not open");
                return;
            };
            if pinned {
                if let Some(instance) = reg.instance_mut(kind) {
                    instance.state = LifecycleState::Minimized;
                }
                tracing::debug!(panel = ?kind, "pinned panel minimized instead of closed");
            } else {
                Arc::make_mut(&mut reg.instances).remove(&kind);
                tracing::debug!(panel = ?kind, "closed panel");
            }
            if reg.active == Some(kind) {
                reg.select_fallback_active();
            }
        })
    }

    pub fn minimize(&self, kind: PanelKind) -> Self {
        self.transform(|reg| {
            if !kind.config().capabilities.minimizable {
                return;
            }
            let Some(instance) = reg.instance_mut(kind) else {
                tracing::trace!(panel = ?kind, "minimize ignored: not open");
                return;
            };
            if instance.state != LifecycleState::Open {
                return;
            }
            instance.state = LifecycleState::Minimized;
            tracing::debug!(panel = ?kind, "minimized panel");
            if reg.active == Some(kind) {
                reg.select_fallback_active();
            }
        })
    }

    /// Restores a minimized panel; always raises it and makes it active.
    pub fn maximize(&self, kind: PanelKind, now: Instant) -> Self {
        self.transform(|reg| {
            let Some(instance) = reg.instance_mut(kind) else {
                tracing::trace!(panel = ?kind, "maximize ignored: not open");
                return;
            };
            instance.state = LifecycleState::Open;
            reg.bump(kind, now);
            tracing::debug!(panel = ?kind, z = reg.last_issued_z(), "restored panel");
        })
    }

    pub fn pin(&self, kind: PanelKind) -> Self {
        if !kind.config().capabilities.pinnable {
            return self.clone();
        }
        self.set_pinned(kind, true)
    }

    pub fn unpin(&self, kind: PanelKind) -> Self {
        self.set_pinned(kind, false)
    }

    /// Moves `kind` so its top-left corner is as close to `position` as the
    /// viewport allows.
    pub fn move_to(&self, kind: PanelKind, position: Position) -> Self {
        self.transform(|reg| {
            let viewport = reg.viewport;
            if let Some(instance) = reg.instance_mut(kind) {
                instance.position = viewport.clamp_position(position, instance.size);
            }
        })
    }

    /// Resizes `kind`, clamping each axis into its catalog bounds, then pulls
    /// the panel back inside the viewport if it now overhangs an edge.
    pub fn resize(&self, kind: PanelKind, width: i32, height: i32) -> Self {
        self.transform(|reg| {
            let viewport = reg.viewport;
            if let Some(instance) = reg.instance_mut(kind) {
                instance.size = kind.config().clamp_size(width, height);
                instance.position = viewport.clamp_position(instance.position, instance.size);
            }
        })
    }

    /// Raises `kind` and makes it the active panel.
    pub fn focus(&self, kind: PanelKind, now: Instant) -> Self {
        self.transform(|reg| {
            if reg.instances.contains_key(&kind) {
                reg.bump(kind, now);
            }
        })
    }

    /// Minimizes every pinned panel and removes all others.
    pub fn close_all(&self) -> Self {
        self.transform(|reg| {
            let instances = Arc::make_mut(&mut reg.instances);
            instances.retain(|_, instance| instance.pinned);
            for instance in instances.values_mut() {
                instance.state = LifecycleState::Minimized;
            }
            reg.active = None;
            tracing::debug!(kept = instances.len(), "closed all panels");
        })
    }

    pub fn toggle(&self, kind: PanelKind, now: Instant) -> Self {
        match self.state_of(kind) {
            LifecycleState::Closed => self.open(kind, None, now),
            LifecycleState::Minimized => self.maximize(kind, now),
            LifecycleState::Open => self.close(kind),
        }
    }

    /// Adopts a new viewport and pulls every panel back inside it.
    pub fn set_viewport(&self, viewport: Viewport) -> Self {
        self.transform(|reg| {
            reg.viewport = viewport;
            if reg.instances.is_empty() {
                return;
            }
            for instance in Arc::make_mut(&mut reg.instances).values_mut() {
                instance.position = viewport.clamp_position(instance.position, instance.size);
            }
        })
    }

    // --- internals ---

    fn transform(&self, apply: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        apply(&mut next);
        next
    }

    fn instance_mut(&mut self, kind: PanelKind) -> Option<&mut PanelInstance> {
        if !self.instances.contains_key(&kind) {
            return None;
        }
        Arc::make_mut(&mut self.instances).get_mut(&kind)
    }

    fn set_pinned(&self, kind: PanelKind, pinned: bool) -> Self {
        self.transform(|reg| {
            if let Some(instance) = reg.instance_mut(kind) {
                instance.pinned = pinned;
                tracing::debug!(panel = ?kind, pinned, "pin changed");
            }
        })
    }

    fn bump(&mut self, kind: PanelKind, now: Instant) {
        let z = self.next_z;
        let Some(instance) = self.instance_mut(kind) else {
            return;
        };
        instance.z_index = z;
        instance.last_active = now;
        self.next_z = z.saturating_add(1);
        self.active = Some(kind);
    }

    fn select_fallback_active(&mut self) {
        self.active = self
            .instances
            .values()
            .filter(|i| i.is_visible())
            .max_by_key(|i| (i.last_active, i.z_index))
            .map(|i| i.kind);
    }
}

/// Default size a freshly opened panel of `kind` gets.
pub fn default_size(kind: PanelKind) -> Size {
    let config = kind.config();
    config.clamp_size(
        config.default_size.width as i32,
        config.default_size.height as i32,
    )
}
