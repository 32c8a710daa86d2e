/// Result of advancing the oscillator by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Phase after the advance, wrapped into [0, 1).
    pub phase: f32,
    /// Whether the swing crossed its center or extreme position during
    /// this advance.
    pub beat: bool,
}

/// Phase accumulator for the pendulum swing.
///
/// The oscillator is driven by monotonic timestamps supplied by the host,
/// so the animation stays independent of the frame rate: a slow frame
/// simply advances the phase further. Beats fire when the accumulated
/// phase crosses the half-cycle mark (the swing's center) or wraps past a
/// full cycle (the opposite extreme), one beat per pendulum extreme.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SwingOscillator {
    phase: f32,
    last_tick_ms: Option<f64>,
}

impl SwingOscillator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase within one full swing cycle, [0, 1).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Advances the phase by the time elapsed since the previous call.
    ///
    /// The first call, and any call with a non-increasing timestamp,
    /// advances by zero and can never fire a beat. Both crossing checks
    /// run against the pre-wrap accumulated phase, so an advance that
    /// spans several cycles still lands in [0, 1) afterwards.
    pub fn advance(&mut self, now_ms: f64, cycle_length_ms: f32) -> Tick {
        let elapsed = self.progress_time(now_ms);
        let progression = (elapsed / f64::from(cycle_length_ms)) as f32;
        let reached = self.phase + progression;

        let beat = (self.phase < 0.5 && reached >= 0.5) || (self.phase < 1.0 && reached >= 1.0);

        self.phase = reached;
        while self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        Tick {
            phase: self.phase,
            beat,
        }
    }

    /// Returns to phase zero and forgets the previous timestamp, so the
    /// next advance starts a fresh cycle.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.last_tick_ms = None;
    }

    fn progress_time(&mut self, now_ms: f64) -> f64 {
        let elapsed = match self.last_tick_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_tick_ms = Some(now_ms);
        elapsed
    }
}
