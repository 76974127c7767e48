use std::time::{Duration, Instant};

pub const DEFAULT_THRESHOLD: f32 = 80.0;
pub const DEFAULT_RESISTANCE: f32 = 2.5;

/// A leftover pull indicator must be fully retracted this long after the
/// gesture settles, even if no further input arrives.
pub const SNAP_BACK: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy)]
pub struct PullConfig {
    /// Minimum damped pull distance, in points, required at release to
    /// trigger a refresh.
    pub threshold: f32,
    /// Divisor applied to raw drag travel. Larger values make the indicator
    /// lag further behind the finger.
    pub resistance: f32,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            resistance: DEFAULT_RESISTANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Dragging,
    Refreshing,
}

/// Outcome of ending a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Below threshold (or no drag was active): the indicator snaps back.
    Settled,
    /// At or past threshold: the caller must start a refresh and report its
    /// completion through [`PullGesture::finish_refresh`].
    Refresh,
}

/// Pull-to-refresh drag state machine: `Idle -> Dragging -> Refreshing -> Idle`.
///
/// The damped distance is always `min(raw / resistance, threshold * 1.5)`,
/// recomputed from the full travel on every move, so dragging back up retracts
/// the indicator. Only one refresh can be in flight per instance: while
/// `Refreshing`, new presses are refused and the drag origin is untouched.
#[derive(Debug)]
pub struct PullGesture {
    config: PullConfig,
    phase: Phase,
    drag_origin_y: f32,
    pull_distance: f32,
    snap_from: f32,
    snap_started: Option<Instant>,
}

impl Default for PullGesture {
    fn default() -> Self {
        Self::new(PullConfig::default())
    }
}

impl PullGesture {
    pub fn new(config: PullConfig) -> Self {
        Self {
            config: PullConfig {
                threshold: config.threshold.max(1.0),
                resistance: config.resistance.max(f32::EPSILON),
            },
            phase: Phase::Idle,
            drag_origin_y: 0.0,
            pull_distance: 0.0,
            snap_from: 0.0,
            snap_started: None,
        }
    }

    /// Begin a drag at vertical position `y`. Captures the gesture only when
    /// the container is scrolled to its top and no refresh is in flight; the
    /// caller should suppress its normal scroll handling while captured.
    pub fn press(&mut self, y: f32, scroll_offset: f32) -> bool {
        if self.phase == Phase::Refreshing || scroll_offset > 0.0 {
            return false;
        }
        self.phase = Phase::Dragging;
        self.drag_origin_y = y;
        self.pull_distance = 0.0;
        self.snap_started = None;
        true
    }

    /// Track a move to vertical position `y`. Returns the damped pull
    /// distance; upward travel keeps it at zero without ending the drag.
    pub fn drag(&mut self, y: f32) -> f32 {
        if self.phase != Phase::Dragging {
            return self.pull_distance;
        }
        let raw = y - self.drag_origin_y;
        self.pull_distance = if raw <= 0.0 {
            0.0
        } else {
            (raw / self.config.resistance).min(self.config.threshold * 1.5)
        };
        self.pull_distance
    }

    /// End the active drag. Past threshold the machine enters `Refreshing`
    /// with the indicator pinned at the spinner position; otherwise the
    /// indicator begins its snap-back and the machine is `Idle` again.
    pub fn release(&mut self, now: Instant) -> Release {
        if self.phase != Phase::Dragging {
            return Release::Settled;
        }
        if self.pull_distance >= self.config.threshold {
            self.phase = Phase::Refreshing;
            self.pull_distance = self.config.threshold;
            self.snap_started = None;
            Release::Refresh
        } else {
            self.phase = Phase::Idle;
            self.snap_from = self.pull_distance;
            self.snap_started = Some(now);
            Release::Settled
        }
    }

    /// Report refresh completion. Must be called whether the refresh
    /// succeeded or failed; both leave `Refreshing` and retract the indicator.
    pub fn finish_refresh(&mut self) {
        if self.phase != Phase::Refreshing {
            return;
        }
        self.phase = Phase::Idle;
        self.pull_distance = 0.0;
        self.snap_from = 0.0;
        self.snap_started = None;
    }

    /// Advance the snap-back retraction. Safe to call every tick; only does
    /// work while an indicator is left over from a settled gesture.
    pub fn settle(&mut self, now: Instant) {
        if self.phase != Phase::Idle {
            return;
        }
        let Some(started) = self.snap_started else {
            return;
        };
        let elapsed = now.saturating_duration_since(started);
        if elapsed >= SNAP_BACK {
            self.pull_distance = 0.0;
            self.snap_from = 0.0;
            self.snap_started = None;
        } else {
            let frac = elapsed.as_secs_f32() / SNAP_BACK.as_secs_f32();
            self.pull_distance = self.snap_from * (1.0 - frac);
        }
    }

    pub fn pull_distance(&self) -> f32 {
        self.pull_distance
    }

    pub fn is_pulling(&self) -> bool {
        self.phase == Phase::Dragging
    }

    pub fn is_refreshing(&self) -> bool {
        self.phase == Phase::Refreshing
    }

    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }
}
