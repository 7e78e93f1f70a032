use std::time::{Duration, Instant};

use term_panels::priority::{
    ContextFlags, Priority, PriorityEngine, TimeSlot, UsageSignal, adjust_by_usage,
};
use term_panels::window::PanelKind;

const SLOTS: [TimeSlot; 4] = [
    TimeSlot::Morning,
    TimeSlot::Afternoon,
    TimeSlot::Evening,
    TimeSlot::Night,
];

#[test]
fn first_featured_kind_is_critical_without_bonuses() {
    let engine = PriorityEngine::new();
    let now = Instant::now();
    for slot in SLOTS {
        let lead = slot.featured()[0];
        assert_eq!(engine.priority(lead, slot, now), Priority::Critical, "{slot:?}");
    }
}

#[test]
fn kind_absent_from_every_slot_is_low() {
    let engine = PriorityEngine::new();
    let now = Instant::now();
    assert!(SLOTS
        .iter()
        .all(|slot| !slot.featured().contains(&PanelKind::RoiCalculator)));
    for slot in SLOTS {
        assert_eq!(
            engine.priority(PanelKind::RoiCalculator, slot, now),
            Priority::Low
        );
    }
}

#[test]
fn context_raises_but_never_lowers() {
    let now = Instant::now();
    let calm = PriorityEngine::new();
    let volatile = PriorityEngine::with_context(ContextFlags {
        market_volatility: true,
        ..ContextFlags::default()
    });

    assert_eq!(
        volatile.priority(PanelKind::TradingJournal, TimeSlot::Night, now),
        Priority::Critical
    );
    assert_eq!(
        volatile.priority(PanelKind::RoiCalculator, TimeSlot::Night, now),
        Priority::Medium
    );
    // Unrelated kinds keep their time-of-day baseline.
    for kind in [PanelKind::CognitiveLoad, PanelKind::GtdInbox] {
        assert_eq!(
            volatile.priority(kind, TimeSlot::Morning, now),
            calm.priority(kind, TimeSlot::Morning, now)
        );
    }
}

#[test]
fn usage_bonus_is_floored_and_capped() {
    let half_bonuses = UsageSignal {
        used_recently: false,
        frequency: 0.5,
        avg_session_minutes: 6.0,
    };
    assert_eq!(adjust_by_usage(Priority::Low, &half_bonuses), Priority::Medium);

    let one_and_a_half = UsageSignal {
        used_recently: true,
        frequency: 0.5,
        avg_session_minutes: 0.0,
    };
    assert_eq!(adjust_by_usage(Priority::Medium, &one_and_a_half), Priority::High);

    let everything = UsageSignal {
        used_recently: true,
        frequency: 0.9,
        avg_session_minutes: 45.0,
    };
    assert_eq!(adjust_by_usage(Priority::High, &everything), Priority::Critical);
}

#[test]
fn recent_use_promotes_in_ranking() {
    let t0 = Instant::now();
    let mut engine = PriorityEngine::new();
    engine.record_open(PanelKind::TradingJournal, t0);
    engine.record_close(PanelKind::TradingJournal, t0 + Duration::from_secs(60));

    let ranked = engine.ranked(TimeSlot::Night, t0 + Duration::from_secs(120));
    let position = |kind| ranked.iter().position(|(k, _)| *k == kind);
    // Only kind ever opened, so recency and frequency both count.
    assert_eq!(
        engine.priority(PanelKind::TradingJournal, TimeSlot::Night, t0 + Duration::from_secs(120)),
        Priority::High
    );
    assert!(position(PanelKind::TradingJournal) < position(PanelKind::RoiCalculator));
    assert_eq!(ranked[0].0, PanelKind::CognitiveLoad);
}

#[test]
fn ranking_ties_keep_catalog_order() {
    let engine = PriorityEngine::new();
    let ranked = engine.ranked(TimeSlot::Night, Instant::now());
    let lows: Vec<PanelKind> = ranked
        .iter()
        .filter(|(_, p)| *p == Priority::Low)
        .map(|(k, _)| *k)
        .collect();
    let mut sorted = lows.clone();
    sorted.sort_by_key(|k| k.catalog_index());
    assert_eq!(lows, sorted);
}
