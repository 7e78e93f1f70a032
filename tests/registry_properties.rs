use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use proptest::prelude::*;
use term_panels::layout::Viewport;
use term_panels::window::{LifecycleState, PanelKind, PanelRegistry, Position};

#[derive(Debug, Clone)]
enum Op {
    Open(PanelKind, Option<(i32, i32)>),
    Close(PanelKind),
    Minimize(PanelKind),
    Maximize(PanelKind),
    Toggle(PanelKind),
    Pin(PanelKind),
    Unpin(PanelKind),
    Focus(PanelKind),
    Move(PanelKind, i32, i32),
    Resize(PanelKind, i32, i32),
    CloseAll,
}

fn kind() -> impl Strategy<Value = PanelKind> {
    (0..PanelKind::ALL.len()).prop_map(|idx| PanelKind::ALL[idx])
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (kind(), prop::option::of((-500i32..500, -500i32..500)))
            .prop_map(|(k, pos)| Op::Open(k, pos)),
        kind().prop_map(Op::Close),
        kind().prop_map(Op::Minimize),
        kind().prop_map(Op::Maximize),
        kind().prop_map(Op::Toggle),
        kind().prop_map(Op::Pin),
        kind().prop_map(Op::Unpin),
        kind().prop_map(Op::Focus),
        (kind(), -1000i32..1000, -1000i32..1000).prop_map(|(k, x, y)| Op::Move(k, x, y)),
        (kind(), -200i32..400, -200i32..400).prop_map(|(k, w, h)| Op::Resize(k, w, h)),
        Just(Op::CloseAll),
    ]
}

fn apply(reg: &PanelRegistry, op: &Op, now: Instant) -> PanelRegistry {
    match *op {
        Op::Open(k, pos) => reg.open(k, pos.map(|(x, y)| Position::new(x, y)), now),
        Op::Close(k) => reg.close(k),
        Op::Minimize(k) => reg.minimize(k),
        Op::Maximize(k) => reg.maximize(k, now),
        Op::Toggle(k) => reg.toggle(k, now),
        Op::Pin(k) => reg.pin(k),
        Op::Unpin(k) => reg.unpin(k),
        Op::Focus(k) => reg.focus(k, now),
        Op::Move(k, x, y) => reg.move_to(k, Position::new(x, y)),
        Op::Resize(k, w, h) => reg.resize(k, w, h),
        Op::CloseAll => reg.close_all(),
    }
}

fn pinned(reg: &PanelRegistry) -> BTreeSet<PanelKind> {
    reg.instances().filter(|i| i.pinned).map(|i| i.kind).collect()
}

proptest! {
    #[test]
    fn pinned_panels_are_never_removed(ops in prop::collection::vec(op(), 1..60)) {
        let t0 = Instant::now();
        let mut reg = PanelRegistry::new(Viewport::new(120, 40));
        for (step, op) in ops.iter().enumerate() {
            let before = pinned(&reg);
            reg = apply(&reg, op, t0 + Duration::from_secs(step as u64));
            for kind in before {
                prop_assert_ne!(reg.state_of(kind), LifecycleState::Closed);
            }
        }
    }

    #[test]
    fn one_instance_per_kind(ops in prop::collection::vec(op(), 1..60)) {
        let t0 = Instant::now();
        let mut reg = PanelRegistry::new(Viewport::new(120, 40));
        for op in &ops {
            reg = apply(&reg, op, t0);
            let kinds: BTreeSet<PanelKind> = reg.instances().map(|i| i.kind).collect();
            prop_assert_eq!(kinds.len(), reg.len());
            prop_assert!(reg.len() <= PanelKind::ALL.len());
        }
    }

    #[test]
    fn issued_z_indexes_only_grow(ops in prop::collection::vec(op(), 1..60)) {
        let t0 = Instant::now();
        let mut reg = PanelRegistry::new(Viewport::new(120, 40));
        let mut high_water = reg.last_issued_z();
        for op in &ops {
            let next = apply(&reg, op, t0);
            prop_assert!(next.last_issued_z() >= high_water);
            for instance in next.instances() {
                let previous = reg.get(instance.kind).map(|i| i.z_index);
                if previous != Some(instance.z_index) {
                    prop_assert!(instance.z_index > high_water);
                }
                prop_assert!(instance.z_index <= next.last_issued_z());
            }
            high_water = next.last_issued_z();
            reg = next;
        }
    }

    #[test]
    fn resize_respects_effective_minimum(k in kind(), w in -1000i32..1000, h in -1000i32..1000) {
        let reg = PanelRegistry::new(Viewport::new(120, 40))
            .open(k, None, Instant::now())
            .resize(k, w, h);
        let size = reg.get(k).map(|i| i.size);
        prop_assert!(size.is_some());
        if let Some(size) = size {
            let min = k.config().effective_min_size();
            prop_assert!(size.width >= min.width.max(16));
            prop_assert!(size.height >= min.height.max(5));
            if let Some(max) = k.config().max_size {
                prop_assert!(size.width <= max.width.max(min.width));
                prop_assert!(size.height <= max.height.max(min.height));
            }
        }
    }

    #[test]
    fn move_lands_inside_viewport_bounds(
        k in kind(),
        x in -10_000i32..10_000,
        y in -10_000i32..10_000,
        width in 60u16..240,
        height in 24u16..80,
    ) {
        let viewport = Viewport::new(width, height);
        let reg = PanelRegistry::new(viewport)
            .open(k, None, Instant::now())
            .move_to(k, Position::new(x, y));
        let instance = reg.get(k).cloned();
        prop_assert!(instance.is_some());
        if let Some(instance) = instance {
            let (min, max) = viewport.position_bounds(instance.size);
            prop_assert!(instance.position.x >= min.x && instance.position.x <= max.x);
            prop_assert!(instance.position.y >= min.y && instance.position.y <= max.y);
            prop_assert!(instance.position.x >= 1);
            prop_assert!(instance.position.y >= 1);
        }
    }

    #[test]
    fn every_panel_stays_inside_the_viewport(ops in prop::collection::vec(op(), 1..60)) {
        let t0 = Instant::now();
        let viewport = Viewport::new(120, 40);
        let mut reg = PanelRegistry::new(viewport);
        for op in &ops {
            reg = apply(&reg, op, t0);
            for instance in reg.instances() {
                let (min, max) = viewport.position_bounds(instance.size);
                prop_assert!(
                    instance.position.x >= min.x && instance.position.x <= max.x,
                    "{:?} after {:?}", instance, op
                );
                prop_assert!(
                    instance.position.y >= min.y && instance.position.y <= max.y,
                    "{:?} after {:?}", instance, op
                );
            }
        }
    }

    #[test]
    fn double_toggle_from_closed_is_closed(k in kind()) {
        let t0 = Instant::now();
        let reg = PanelRegistry::new(Viewport::new(120, 40))
            .toggle(k, t0)
            .toggle(k, t0);
        prop_assert_eq!(reg.state_of(k), LifecycleState::Closed);
    }
}
