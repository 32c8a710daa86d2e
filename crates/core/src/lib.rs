//! Core library for the Swing Metronome control.
//!
//! The crate implements a visual metronome: a vertical tempo slider whose
//! handle position sets a BPM value, driving a continuously animated
//! pendulum swing that fires a beat event at each extreme. Each module
//! owns a distinct subsystem — tempo mapping, the phase oscillator, the
//! perspective plate projection, and the widget that wires them together
//! and turns phase plus geometry into draw primitives. The host shell
//! (windowing, audio playback, preference storage) stays outside; it
//! feeds pointer, resize and timer-tick events in and observes beats and
//! BPM changes out.

pub mod config;
pub mod error;
pub mod geometry;
pub mod oscillator;
pub mod render;
pub mod tempo;
pub mod widget;

pub use config::{AppConfig, DisplayConfig, TempoConfig};
pub use error::{MetronomeError, Result};
pub use geometry::{Orientation, PlateMetrics, PlateProjector};
pub use oscillator::{SwingOscillator, Tick};
pub use render::{CanvasTransform, Color, DrawPlan, GradientSpec, SwingArm, WeightMarker};
pub use tempo::{cycle_length_ms, display_text, BpmBounds, BpmRange};
pub use widget::{MetronomeWidget, WidgetEvent};
