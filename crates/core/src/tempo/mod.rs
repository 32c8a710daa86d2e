use crate::{MetronomeError, Result};

const MS_PER_MINUTE: f32 = 60_000.0;

/// One full swing passes both extremes, so a cycle spans two beats.
const BEATS_PER_CYCLE: f32 = 2.0;

/// Validated tempo bounds for the slider. The ordering
/// `0 < min < default < max` is enforced by the only constructor and can
/// never be violated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmBounds {
    min: f32,
    default: f32,
    max: f32,
}

impl BpmBounds {
    /// Builds the bounds, rejecting non-positive or out-of-order values
    /// with [`MetronomeError::InvalidConfiguration`].
    pub fn new(min: f32, default: f32, max: f32) -> Result<Self> {
        if !(min > 0.0) {
            return Err(MetronomeError::invalid_configuration(format!(
                "min bpm must be > 0, got {min}"
            )));
        }

        if !(min < default && default < max) {
            return Err(MetronomeError::invalid_configuration(format!(
                "min < default < max must hold, got {min} / {default} / {max}"
            )));
        }

        Ok(Self { min, default, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn default_bpm(&self) -> f32 {
        self.default
    }

    pub fn max(&self) -> f32 {
        self.max
    }
}

/// Bidirectional mapping between a bounded BPM value and a normalized
/// slider position.
///
/// Position 0 sits at the fast end of the slider (max BPM), position 1 at
/// the slow end (min BPM). The position argument is deliberately not
/// clamped here; the widget clamps the resulting BPM instead, so that any
/// pointer overshoot saturates at the bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmRange {
    bounds: BpmBounds,
}

impl BpmRange {
    pub fn new(bounds: BpmBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &BpmBounds {
        &self.bounds
    }

    /// Maps a normalized position measured from the top of the control to
    /// a BPM value: `min + (1 - p) * (max - min)`.
    pub fn bpm_from_normalized_position(&self, position: f32) -> f32 {
        self.bounds.min + (1.0 - position) * (self.bounds.max - self.bounds.min)
    }

    /// Exact inverse of [`Self::bpm_from_normalized_position`], used when
    /// restoring a slider position from a stored BPM.
    pub fn normalized_position_from_bpm(&self, bpm: f32) -> f32 {
        1.0 - self.normalized_bpm(bpm)
    }

    /// Rescales a BPM value into [0, 1] between the configured bounds.
    /// Drives the weight placement along the swing arm.
    pub fn normalized_bpm(&self, bpm: f32) -> f32 {
        (bpm - self.bounds.min) / (self.bounds.max - self.bounds.min)
    }

    /// Clamps a BPM value into the configured bounds.
    pub fn clamp(&self, bpm: f32) -> f32 {
        if bpm < self.bounds.min {
            self.bounds.min
        } else if bpm > self.bounds.max {
            self.bounds.max
        } else {
            bpm
        }
    }
}

/// Length of one full swing cycle in milliseconds at the given tempo.
pub fn cycle_length_ms(bpm: f32) -> f32 {
    BEATS_PER_CYCLE * MS_PER_MINUTE / bpm
}

/// Formats a BPM value for display, rounded to the nearest integer.
pub fn display_text(bpm: f32) -> String {
    format!("{} bpm", (bpm + 0.5) as u32)
}
