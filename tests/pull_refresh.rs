use std::time::{Duration, Instant};

use tipfeed_terminal::pull_refresh::{PullConfig, PullGesture, Release, SNAP_BACK};

fn pulled(travel: f32) -> PullGesture {
    let mut gesture = PullGesture::default();
    assert!(gesture.press(0.0, 0.0));
    gesture.drag(travel);
    gesture
}

#[test]
fn pull_distance_is_damped_and_capped() {
    let mut gesture = PullGesture::default();
    assert!(gesture.press(0.0, 0.0));

    for travel in [0.0, 5.0, 50.0, 150.0, 200.0, 300.0, 5_000.0] {
        let distance = gesture.drag(travel);
        assert!(distance >= 0.0, "distance negative for travel {travel}");
        assert!(distance <= 120.0, "distance over cap for travel {travel}");
    }

    // threshold 80, resistance 2.5: 150 raw points damp to 60.
    assert_eq!(gesture.drag(150.0), 60.0);
    // 300 raw points would damp to 120, exactly the cap.
    assert_eq!(gesture.drag(300.0), 120.0);
    assert_eq!(gesture.drag(5_000.0), 120.0);
}

#[test]
fn upward_travel_keeps_the_indicator_at_zero() {
    let mut gesture = PullGesture::default();
    assert!(gesture.press(100.0, 0.0));

    assert_eq!(gesture.drag(40.0), 0.0);
    assert!(gesture.is_pulling());

    // Dragging back below the origin after a real pull retracts fully.
    gesture.drag(200.0);
    assert_eq!(gesture.drag(60.0), 0.0);
}

#[test]
fn below_threshold_release_never_refreshes() {
    let mut gesture = pulled(150.0);
    assert_eq!(gesture.pull_distance(), 60.0);

    let t0 = Instant::now();
    assert_eq!(gesture.release(t0), Release::Settled);
    assert!(!gesture.is_refreshing());

    // Halfway through the snap-back the indicator has visibly retracted.
    gesture.settle(t0 + SNAP_BACK / 2);
    assert!(gesture.pull_distance() < 60.0);
    assert!(gesture.pull_distance() > 0.0);

    // Fully retracted within the bound.
    gesture.settle(t0 + SNAP_BACK);
    assert_eq!(gesture.pull_distance(), 0.0);
}

#[test]
fn past_threshold_release_refreshes_exactly_once() {
    let mut gesture = pulled(300.0);
    assert_eq!(gesture.pull_distance(), 120.0);

    assert_eq!(gesture.release(Instant::now()), Release::Refresh);
    assert!(gesture.is_refreshing());

    // A stray second release while refreshing does not double-trigger.
    assert_eq!(gesture.release(Instant::now()), Release::Settled);
    assert!(gesture.is_refreshing());
}

#[test]
fn exact_threshold_triggers() {
    let mut gesture = pulled(200.0);
    assert_eq!(gesture.pull_distance(), 80.0);
    assert_eq!(gesture.release(Instant::now()), Release::Refresh);
}

#[test]
fn new_drag_is_refused_while_refreshing() {
    let mut gesture = pulled(300.0);
    assert_eq!(gesture.release(Instant::now()), Release::Refresh);

    assert!(!gesture.press(50.0, 0.0));
    assert!(gesture.is_refreshing());

    // Moves from the refused gesture leave the pinned indicator alone.
    let pinned = gesture.pull_distance();
    assert_eq!(gesture.drag(500.0), pinned);
}

#[test]
fn refresh_completion_resets_state_on_failure_too() {
    let mut gesture = pulled(300.0);
    assert_eq!(gesture.release(Instant::now()), Release::Refresh);

    // The feed reported an error; completion handling is identical to
    // success.
    gesture.finish_refresh();
    assert!(!gesture.is_refreshing());
    assert_eq!(gesture.pull_distance(), 0.0);

    // And the machine accepts a new gesture afterwards.
    assert!(gesture.press(0.0, 0.0));
}

#[test]
fn press_is_refused_unless_scrolled_to_top() {
    let mut gesture = PullGesture::default();
    assert!(!gesture.press(0.0, 5.0));
    assert!(!gesture.is_pulling());
    assert_eq!(gesture.drag(400.0), 0.0);
}

#[test]
fn release_without_a_drag_is_a_no_op() {
    let mut gesture = PullGesture::default();
    assert_eq!(gesture.release(Instant::now()), Release::Settled);
    assert_eq!(gesture.pull_distance(), 0.0);
}

#[test]
fn custom_config_scales_threshold_and_resistance() {
    let config = PullConfig {
        threshold: 40.0,
        resistance: 4.0,
    };

    let mut gesture = PullGesture::new(config);
    assert!(gesture.press(0.0, 0.0));
    assert_eq!(gesture.drag(80.0), 20.0);
    assert_eq!(gesture.release(Instant::now()), Release::Settled);

    let mut gesture = PullGesture::new(config);
    assert!(gesture.press(0.0, 0.0));
    // Cap at threshold * 1.5 still holds.
    assert_eq!(gesture.drag(1_000.0), 60.0);
    assert_eq!(gesture.release(Instant::now()), Release::Refresh);
}

#[test]
fn settle_is_inert_while_dragging_or_refreshing() {
    let mut gesture = pulled(150.0);
    let before = gesture.pull_distance();
    gesture.settle(Instant::now() + Duration::from_secs(5));
    assert_eq!(gesture.pull_distance(), before);

    let mut gesture = pulled(300.0);
    gesture.release(Instant::now());
    gesture.settle(Instant::now() + Duration::from_secs(5));
    assert!(gesture.is_refreshing());
    assert_eq!(gesture.pull_distance(), gesture.threshold());
}
