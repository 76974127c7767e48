/// Default lookahead margin in points: the sentinel counts as visible this far
/// before it actually enters the viewport.
pub const DEFAULT_LOOKAHEAD: f32 = 100.0;

/// Loading gates owned by the feed screen, sampled at each observation.
#[derive(Debug, Clone, Copy)]
pub struct LoadGates {
    pub has_more: bool,
    pub is_loading: bool,
}

/// One frame's worth of sentinel geometry, in points from the top of the
/// scrollable viewport. The sentinel sits just past the last rendered item.
#[derive(Debug, Clone, Copy)]
pub struct SentinelSample {
    pub sentinel_top: f32,
    pub viewport_bottom: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchPhase {
    Offscreen,
    Visible,
}

/// Watches a sentinel region at the end of a scrolling list and signals when
/// another page should be requested.
///
/// The watcher is edge-triggered: a signal can only fire on the transition
/// from offscreen to visible, and only when the gates allow it at that exact
/// moment. A transition consumed while loading (or after the end of data) is
/// spent; the sentinel must leave and re-enter the extended viewport before
/// another signal is possible.
#[derive(Debug)]
pub struct ScrollPager {
    lookahead: f32,
    target: Option<u64>,
    phase: WatchPhase,
    disposed: bool,
}

impl Default for ScrollPager {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKAHEAD)
    }
}

impl ScrollPager {
    pub fn new(lookahead: f32) -> Self {
        Self {
            lookahead: lookahead.max(0.0),
            target: None,
            phase: WatchPhase::Offscreen,
            disposed: false,
        }
    }

    /// Point the watcher at a sentinel identity. A list re-render that moves
    /// the sentinel must present a new identity here; the previous observation
    /// is dropped and the new target starts offscreen, so a sentinel that is
    /// already inside the extended viewport produces a fresh transition.
    pub fn attach(&mut self, target: u64) {
        if self.disposed {
            return;
        }
        if self.target != Some(target) {
            self.target = Some(target);
            self.phase = WatchPhase::Offscreen;
        }
    }

    /// Feed one geometry sample. Returns true when the caller should request
    /// the next page. Never true twice for one visibility transition, never
    /// true while `is_loading`, never true once `has_more` is false.
    pub fn observe(&mut self, sample: SentinelSample, gates: LoadGates) -> bool {
        if self.disposed || self.target.is_none() {
            return false;
        }
        let visible = sample.sentinel_top <= sample.viewport_bottom + self.lookahead;
        let entered = visible && self.phase == WatchPhase::Offscreen;
        self.phase = if visible {
            WatchPhase::Visible
        } else {
            WatchPhase::Offscreen
        };
        entered && gates.has_more && !gates.is_loading
    }

    /// Stop watching. No signal fires after this, whatever samples arrive.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.target = None;
        self.phase = WatchPhase::Offscreen;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
