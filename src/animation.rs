//! Time-based reveal animation, decoupled from whatever schedules frames.
//!
//! The scheduler (an egui repaint loop, or the simulated clock used by the
//! exporter) calls [`RevealAnimation::frame`] with a wall-clock timestamp and
//! keeps scheduling while it returns [`FrameOutcome::Continue`].

/// Reveal length used by the site.
pub const DEFAULT_DURATION_MS: f64 = 700.0;

/// `1 - (1 - p)^3`
pub fn ease_out_cubic(p: f64) -> f64 {
    1.0 - (1.0 - p).powi(3)
}

/// Linear progress in [0, 1]. A non-positive duration is already complete.
pub fn linear_progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 || !duration_ms.is_finite() {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// Eased progress for a frame `elapsed_ms` after the animation started.
pub fn compute_frame(elapsed_ms: f64, duration_ms: f64) -> f64 {
    ease_out_cubic(linear_progress(elapsed_ms, duration_ms))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealState {
    /// Never started.
    Idle,
    /// Running. The start timestamp is captured on the first frame.
    Animating { started_at: Option<f64> },
    /// Reached progress 1.
    Settled,
}

/// What the scheduler should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Rendered; schedule another frame.
    Continue,
    /// Rendered the final frame at progress 1.
    Finished,
    /// Nothing to animate, nothing rendered.
    Idle,
}

impl FrameOutcome {
    pub fn needs_another_frame(self) -> bool {
        self == FrameOutcome::Continue
    }
}

/// `Idle -> Animating -> Settled`, with `restart` re-entering `Animating`
/// from any state.
#[derive(Debug, Clone)]
pub struct RevealAnimation {
    duration_ms: f64,
    state: RevealState,
}

impl Default for RevealAnimation {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_MS)
    }
}

impl RevealAnimation {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            state: RevealState::Idle,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Begin a fresh timeline from progress 0. The running timeline's start
    /// timestamp is dropped, so its remaining frames render the new one.
    pub fn restart(&mut self) {
        self.state = RevealState::Animating { started_at: None };
        log::debug!("reveal restarted ({} ms)", self.duration_ms);
    }

    /// Advance to `now_ms` and hand the eased progress to `render`.
    pub fn frame<F>(&mut self, now_ms: f64, mut render: F) -> FrameOutcome
    where
        F: FnMut(f64),
    {
        let RevealState::Animating { started_at } = self.state else {
            return FrameOutcome::Idle;
        };

        let start = started_at.unwrap_or(now_ms);
        let elapsed = now_ms - start;
        render(compute_frame(elapsed, self.duration_ms));

        if linear_progress(elapsed, self.duration_ms) < 1.0 {
            self.state = RevealState::Animating {
                started_at: Some(start),
            };
            FrameOutcome::Continue
        } else {
            self.state = RevealState::Settled;
            log::debug!("reveal settled after {elapsed} ms");
            FrameOutcome::Finished
        }
    }
}
