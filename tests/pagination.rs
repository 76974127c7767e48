use tipfeed_terminal::pagination::{LoadGates, ScrollPager, SentinelSample, DEFAULT_LOOKAHEAD};

fn sample(sentinel_top: f32) -> SentinelSample {
    SentinelSample {
        sentinel_top,
        viewport_bottom: 600.0,
    }
}

fn gates(has_more: bool, is_loading: bool) -> LoadGates {
    LoadGates {
        has_more,
        is_loading,
    }
}

const OFFSCREEN: f32 = 2_000.0;
const ONSCREEN: f32 = 400.0;

#[test]
fn fires_once_per_visibility_transition() {
    let mut pager = ScrollPager::default();
    pager.attach(1);

    assert!(!pager.observe(sample(OFFSCREEN), gates(true, false)));
    assert!(pager.observe(sample(ONSCREEN), gates(true, false)));
    // Still visible on the next frames: the transition is spent.
    assert!(!pager.observe(sample(ONSCREEN), gates(true, false)));
    assert!(!pager.observe(sample(ONSCREEN - 100.0), gates(true, false)));
}

#[test]
fn loading_gate_suppresses_trigger() {
    let mut pager = ScrollPager::default();
    pager.attach(1);

    assert!(pager.observe(sample(ONSCREEN), gates(true, false)));

    // The caller set is_loading; a re-observation of the still-visible
    // sentinel must not fire again.
    assert!(!pager.observe(sample(ONSCREEN), gates(true, true)));

    // Even a fresh transition is swallowed while the load is in flight.
    assert!(!pager.observe(sample(OFFSCREEN), gates(true, true)));
    assert!(!pager.observe(sample(ONSCREEN), gates(true, true)));

    // Load finished and the sentinel re-enters: fires again.
    assert!(!pager.observe(sample(OFFSCREEN), gates(true, false)));
    assert!(pager.observe(sample(ONSCREEN), gates(true, false)));
}

#[test]
fn end_of_data_is_respected() {
    let mut pager = ScrollPager::default();
    pager.attach(1);

    for _ in 0..5 {
        assert!(!pager.observe(sample(ONSCREEN), gates(false, false)));
        assert!(!pager.observe(sample(OFFSCREEN), gates(false, false)));
    }
}

#[test]
fn restored_has_more_needs_a_fresh_transition() {
    let mut pager = ScrollPager::default();
    pager.attach(1);

    assert!(pager.observe(sample(ONSCREEN), gates(true, false)));

    // End of data reached while the sentinel stays on screen.
    assert!(!pager.observe(sample(ONSCREEN), gates(false, false)));

    // has_more flips back on, sentinel never left: still nothing.
    assert!(!pager.observe(sample(ONSCREEN), gates(true, false)));

    // Only leaving and re-entering re-arms the trigger.
    assert!(!pager.observe(sample(OFFSCREEN), gates(true, false)));
    assert!(pager.observe(sample(ONSCREEN), gates(true, false)));
}

#[test]
fn retargeting_drops_the_old_observation() {
    let mut pager = ScrollPager::default();
    pager.attach(1);

    assert!(pager.observe(sample(ONSCREEN), gates(true, false)));
    assert!(!pager.observe(sample(ONSCREEN), gates(true, false)));

    // The list re-rendered and the sentinel is a new element at the same
    // place: that is a fresh transition for the new target.
    pager.attach(2);
    assert!(pager.observe(sample(ONSCREEN), gates(true, false)));

    // Re-attaching the same target is a no-op.
    pager.attach(2);
    assert!(!pager.observe(sample(ONSCREEN), gates(true, false)));
}

#[test]
fn lookahead_extends_the_viewport() {
    let mut pager = ScrollPager::new(DEFAULT_LOOKAHEAD);
    pager.attach(1);

    // 50 points below the fold, within the 100-point margin.
    assert!(pager.observe(sample(650.0), gates(true, false)));

    let mut pager = ScrollPager::new(DEFAULT_LOOKAHEAD);
    pager.attach(1);
    // 150 points below the fold: not visible yet.
    assert!(!pager.observe(sample(750.0), gates(true, false)));
}

#[test]
fn disposed_pager_stays_silent() {
    let mut pager = ScrollPager::default();
    pager.attach(1);
    pager.dispose();

    assert!(pager.is_disposed());
    assert!(!pager.observe(sample(ONSCREEN), gates(true, false)));

    // Attaching after disposal does not revive it.
    pager.attach(2);
    assert!(!pager.observe(sample(ONSCREEN), gates(true, false)));
}

#[test]
fn observe_without_target_is_inert() {
    let mut pager = ScrollPager::default();
    assert!(!pager.observe(sample(ONSCREEN), gates(true, false)));
}
