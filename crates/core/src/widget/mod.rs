use std::f32::consts::TAU;
use std::fmt;

use crate::{
    config::AppConfig,
    geometry::{Orientation, PlateProjector},
    oscillator::SwingOscillator,
    render::{CanvasTransform, Color, DrawPlan, GradientSpec, SwingArm, WeightMarker},
    tempo::{cycle_length_ms, BpmBounds, BpmRange},
    MetronomeError, Result,
};

/// Reference plate the projection is scaled against.
const PLATE_REFERENCE_WIDTH: f32 = 10.0;
const PLATE_REFERENCE_HEIGHT: f32 = 20.0;

const ARM_FRACTION_OF_VISIBLE_HEIGHT: f32 = 7.0 / 8.0;
const ARM_WIDTH_FRACTION_OF_PLATE_WIDTH: f32 = 1.0 / 20.0;
const SWINGING_FRACTION_OF_PLATE_WIDTH: f32 = 4.0 / 5.0;

const WEIGHT_WIDTH_FRACTION_OF_ARM_WIDTH: f32 = 5.7;
const WEIGHT_HEIGHT_FRACTION_OF_WEIGHT_WIDTH: f32 = 1.0 / 1.6;
const CORNER_RADIUS_FRACTION_OF_ARM_WIDTH: f32 = 1.0 / 3.0;

const BACKGROUND_COLOR: Color = 0xFF00_0000;
const ARM_GRADIENT_START: Color = 0xFF44_4444;
const ARM_GRADIENT_END: Color = 0xFFDD_DDDD;
const WEIGHT_GRADIENT_START: Color = 0xFFFF_FFFF;
const WEIGHT_GRADIENT_END: Color = 0xFFAA_AAAA;

/// Inputs the widget reacts to, delivered serially by the host's event
/// dispatch. One entry point over a tagged union keeps every mutation of
/// widget state on a single path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    Resize {
        width: u32,
        height: u32,
        orientation: Orientation,
    },
    PointerInput {
        fraction_from_top: f32,
    },
    Tick {
        now_ms: f64,
    },
}

type BeatObserver = Box<dyn FnMut()>;
type BpmChangedObserver = Box<dyn FnMut(f32)>;

/// Drawing constants that scale with the plate; rebuilt on every resize.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScaledLayout {
    arm_width: f32,
    weight_width: f32,
    weight_height: f32,
    corner_radius: f32,
    arm_gradient: GradientSpec,
    weight_gradient: GradientSpec,
}

/// The metronome control: a vertical tempo slider with a continuously
/// swinging pendulum arm.
///
/// The widget owns all of its state and is driven from a single thread:
/// the host forwards resize, pointer and render-tick events, and reads a
/// [`DrawPlan`] back per frame. Beat and BPM-changed observers are
/// synchronous callbacks on that same thread.
pub struct MetronomeWidget {
    range: BpmRange,
    default_bpm: f32,
    bpm: f32,
    normalized_bpm: f32,
    cycle_length_ms: f32,
    oscillator: SwingOscillator,
    projector: PlateProjector,
    canvas_size: Option<(u32, u32)>,
    layout: Option<ScaledLayout>,
    beat_observer: Option<BeatObserver>,
    bpm_changed_observer: Option<BpmChangedObserver>,
}

impl MetronomeWidget {
    /// Builds the widget from already-validated bounds. The initial BPM is
    /// the configured default; rendering needs a resize first.
    pub fn new(bounds: BpmBounds) -> Self {
        let mut projector = PlateProjector::new();
        // The reference plate is a crate constant the setter cannot reject.
        let _ = projector.set_reference_size(PLATE_REFERENCE_WIDTH, PLATE_REFERENCE_HEIGHT);

        let range = BpmRange::new(bounds);
        let default_bpm = bounds.default_bpm();

        Self {
            range,
            default_bpm,
            bpm: default_bpm,
            normalized_bpm: range.normalized_bpm(default_bpm),
            cycle_length_ms: cycle_length_ms(default_bpm),
            oscillator: SwingOscillator::new(),
            projector,
            canvas_size: None,
            layout: None,
            beat_observer: None,
            bpm_changed_observer: None,
        }
    }

    /// Builds and sizes the widget in one step from an application
    /// configuration, failing before any state exists if the tempo bounds
    /// are unusable.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut widget = Self::new(config.tempo.bounds()?);
        widget.on_resize(
            config.display.width,
            config.display.height,
            config.display.orientation,
        )?;
        Ok(widget)
    }

    /// Registers the callback invoked on every beat. Replaces any
    /// previously registered observer.
    pub fn set_beat_observer(&mut self, observer: impl FnMut() + 'static) {
        self.beat_observer = Some(Box::new(observer));
    }

    /// Registers the callback invoked when the clamped BPM value changes.
    pub fn set_bpm_changed_observer(&mut self, observer: impl FnMut(f32) + 'static) {
        self.bpm_changed_observer = Some(Box::new(observer));
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn default_bpm(&self) -> f32 {
        self.default_bpm
    }

    /// Current BPM rescaled into [0, 1] between the configured bounds.
    pub fn normalized_bpm(&self) -> f32 {
        self.normalized_bpm
    }

    /// Current swing phase, [0, 1).
    pub fn phase(&self) -> f32 {
        self.oscillator.phase()
    }

    /// Single entry point over the event union. `Resize` propagates setup
    /// errors; pointer and tick events are total.
    pub fn handle_event(&mut self, event: WidgetEvent) -> Result<()> {
        match event {
            WidgetEvent::Resize {
                width,
                height,
                orientation,
            } => self.on_resize(width, height, orientation),
            WidgetEvent::PointerInput { fraction_from_top } => {
                self.on_pointer_input(fraction_from_top);
                Ok(())
            }
            WidgetEvent::Tick { now_ms } => {
                self.tick(now_ms);
                Ok(())
            }
        }
    }

    /// Sets the tempo, clamped into the configured bounds. The cycle
    /// length and the weight placement follow immediately; the observer is
    /// notified only when the clamped value actually changed.
    pub fn set_bpm(&mut self, bpm: f32) {
        let clamped = self.range.clamp(bpm);
        self.cycle_length_ms = cycle_length_ms(clamped);
        self.normalized_bpm = self.range.normalized_bpm(clamped);

        let changed = clamped != self.bpm;
        self.bpm = clamped;

        if changed {
            tracing::debug!(bpm = clamped, "bpm changed");
            if let Some(observer) = self.bpm_changed_observer.as_mut() {
                observer(clamped);
            }
        }
    }

    /// Adopts a new canvas size and orientation, then rescales every
    /// geometry-dependent drawing constant to the new plate width.
    pub fn on_resize(&mut self, width: u32, height: u32, orientation: Orientation) -> Result<()> {
        self.projector.set_canvas_size(width, height)?;
        self.projector.set_orientation(orientation);

        let plate_width = self.projector.plate_width()?;
        let arm_width = plate_width * ARM_WIDTH_FRACTION_OF_PLATE_WIDTH;
        let weight_width = arm_width * WEIGHT_WIDTH_FRACTION_OF_ARM_WIDTH;
        let weight_height = weight_width * WEIGHT_HEIGHT_FRACTION_OF_WEIGHT_WIDTH;
        let center_x = width as f32 / 2.0;

        self.layout = Some(ScaledLayout {
            arm_width,
            weight_width,
            weight_height,
            corner_radius: arm_width * CORNER_RADIUS_FRACTION_OF_ARM_WIDTH,
            arm_gradient: GradientSpec {
                start: (center_x + arm_width / 3.0, 0.0),
                end: (center_x + arm_width * 4.0 / 3.0, 0.0),
                start_color: ARM_GRADIENT_START,
                end_color: ARM_GRADIENT_END,
            },
            weight_gradient: GradientSpec {
                start: (weight_width / 4.0, weight_height / 4.0),
                end: (weight_width * 5.0 / 4.0, weight_height * 5.0 / 4.0),
                start_color: WEIGHT_GRADIENT_START,
                end_color: WEIGHT_GRADIENT_END,
            },
        });
        self.canvas_size = Some((width, height));

        tracing::debug!(width, height, ?orientation, "canvas resized");
        Ok(())
    }

    /// Handles a pointer press or drag at the given fraction of the
    /// control's length, measured from the top. Ignored (returns `false`)
    /// until a canvas size is known; the resulting BPM saturates at the
    /// bounds for positions outside [0, 1].
    pub fn on_pointer_input(&mut self, fraction_from_top: f32) -> bool {
        if self.canvas_size.is_none() {
            return false;
        }

        let bpm = self.range.bpm_from_normalized_position(fraction_from_top);
        self.set_bpm(bpm);
        true
    }

    /// Advances the swing to the given monotonic timestamp and fires the
    /// beat observer on a center or extreme crossing. Returns whether a
    /// beat fired. Invoked once per render frame.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let tick = self.oscillator.advance(now_ms, self.cycle_length_ms);
        if tick.beat {
            tracing::trace!(phase = tick.phase, "beat");
            if let Some(observer) = self.beat_observer.as_mut() {
                observer();
            }
        }
        tick.beat
    }

    /// Translates the current phase and geometry into draw primitives.
    ///
    /// The arm angle follows the live phase; the weight's position along
    /// the arm follows the configured tempo, so a glance reads speed even
    /// while the arm is mid-swing.
    pub fn render_frame(&self) -> Result<DrawPlan> {
        let layout = self
            .layout
            .ok_or(MetronomeError::NotInitialized("widget has not been resized"))?;
        let (canvas_width, canvas_height) = self
            .canvas_size
            .ok_or(MetronomeError::NotInitialized("widget has not been resized"))?;
        let metrics = self.projector.metrics()?;

        let visible_height = metrics.visible_height();
        let arm_length = visible_height * ARM_FRACTION_OF_VISIBLE_HEIGHT;
        let top_offset = (visible_height - arm_length) / 2.0;
        let pivot = (canvas_width as f32 / 2.0, metrics.height);

        let swinging_width = metrics.width * SWINGING_FRACTION_OF_PLATE_WIDTH;
        let swing_extent = ((swinging_width / 2.0) / metrics.height).atan();
        let angular_offset = (self.oscillator.phase() * TAU).sin();
        let rotation_degrees = (angular_offset * swing_extent).to_degrees();

        Ok(DrawPlan {
            background_color: BACKGROUND_COLOR,
            canvas_transform: CanvasTransform {
                rotate_degrees: -90.0,
                translate: (-(canvas_height as f32), 0.0),
            },
            rotation_degrees,
            pivot,
            arm: SwingArm {
                start: (pivot.0, top_offset),
                end: (pivot.0, top_offset + arm_length),
                stroke_width: layout.arm_width,
                round_cap: true,
                gradient: layout.arm_gradient,
            },
            weight: WeightMarker {
                x: pivot.0 - layout.weight_width / 2.0,
                y: top_offset + self.normalized_bpm * arm_length - layout.weight_height / 2.0,
                width: layout.weight_width,
                height: layout.weight_height,
                corner_radius: layout.corner_radius,
                gradient: layout.weight_gradient,
            },
        })
    }
}

impl fmt::Debug for MetronomeWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetronomeWidget")
            .field("bpm", &self.bpm)
            .field("normalized_bpm", &self.normalized_bpm)
            .field("cycle_length_ms", &self.cycle_length_ms)
            .field("oscillator", &self.oscillator)
            .field("canvas_size", &self.canvas_size)
            .field("has_beat_observer", &self.beat_observer.is_some())
            .field(
                "has_bpm_changed_observer",
                &self.bpm_changed_observer.is_some(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::config::TempoConfig;

    fn bounds() -> BpmBounds {
        BpmBounds::new(40.0, 120.0, 240.0).unwrap()
    }

    fn resized_widget() -> MetronomeWidget {
        let mut widget = MetronomeWidget::new(bounds());
        widget.on_resize(1080, 1920, Orientation::Portrait).unwrap();
        widget
    }

    #[test]
    fn starts_at_the_default_bpm() {
        let widget = MetronomeWidget::new(bounds());
        assert_eq!(widget.bpm(), 120.0);
        assert_eq!(widget.default_bpm(), 120.0);
        assert!((widget.normalized_bpm() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn invalid_bounds_never_produce_a_widget() {
        let config = AppConfig {
            tempo: TempoConfig {
                min_bpm: 100.0,
                default_bpm: 50.0,
                max_bpm: 200.0,
            },
            ..AppConfig::default()
        };
        assert!(MetronomeWidget::from_config(&config).is_err());
    }

    #[test]
    fn set_bpm_clamps_to_bounds() {
        let mut widget = MetronomeWidget::new(bounds());
        widget.set_bpm(300.0);
        assert_eq!(widget.bpm(), 240.0);
        widget.set_bpm(10.0);
        assert_eq!(widget.bpm(), 40.0);
    }

    #[test]
    fn bpm_observer_fires_only_on_change() {
        let mut widget = MetronomeWidget::new(bounds());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        widget.set_bpm_changed_observer(move |bpm| sink.borrow_mut().push(bpm));

        widget.set_bpm(180.0);
        widget.set_bpm(180.0);
        widget.set_bpm(400.0);
        widget.set_bpm(250.0); // clamps to 240 again, no change

        assert_eq!(*seen.borrow(), vec![180.0, 240.0]);
    }

    #[test]
    fn pointer_input_is_ignored_before_resize() {
        let mut widget = MetronomeWidget::new(bounds());
        assert!(!widget.on_pointer_input(0.25));
        assert_eq!(widget.bpm(), 120.0);
    }

    #[test]
    fn pointer_position_maps_top_to_max() {
        let mut widget = resized_widget();
        assert!(widget.on_pointer_input(0.0));
        assert_eq!(widget.bpm(), 240.0);

        widget.on_pointer_input(1.0);
        assert_eq!(widget.bpm(), 40.0);

        widget.on_pointer_input(0.5);
        assert_eq!(widget.bpm(), 140.0);
    }

    #[test]
    fn pointer_overshoot_saturates_at_the_bounds() {
        let mut widget = resized_widget();
        widget.on_pointer_input(-0.5);
        assert_eq!(widget.bpm(), 240.0);
        widget.on_pointer_input(1.5);
        assert_eq!(widget.bpm(), 40.0);
    }

    #[test]
    fn tick_fires_the_beat_observer() {
        let mut widget = resized_widget();
        let beats = Rc::new(Cell::new(0));
        let counter = Rc::clone(&beats);
        widget.set_beat_observer(move || counter.set(counter.get() + 1));

        // 120 bpm: one full cycle is 1000 ms, beats at 500 and 1000.
        widget.tick(0.0);
        assert!(!widget.tick(100.0));
        assert!(widget.tick(500.0));
        assert!(!widget.tick(900.0));
        assert!(widget.tick(1_000.0));
        assert_eq!(beats.get(), 2);
    }

    #[test]
    fn handle_event_dispatches_to_all_handlers() {
        let mut widget = MetronomeWidget::new(bounds());
        widget
            .handle_event(WidgetEvent::Resize {
                width: 1080,
                height: 1920,
                orientation: Orientation::Portrait,
            })
            .unwrap();
        widget
            .handle_event(WidgetEvent::PointerInput {
                fraction_from_top: 0.0,
            })
            .unwrap();
        assert_eq!(widget.bpm(), 240.0);

        widget.handle_event(WidgetEvent::Tick { now_ms: 0.0 }).unwrap();
        widget.handle_event(WidgetEvent::Tick { now_ms: 125.0 }).unwrap();
        assert!(widget.phase() > 0.0);
    }

    #[test]
    fn resize_with_degenerate_canvas_fails() {
        let mut widget = MetronomeWidget::new(bounds());
        assert!(widget.on_resize(0, 1920, Orientation::Portrait).is_err());
        assert!(widget.render_frame().is_err());
    }

    #[test]
    fn render_before_resize_is_not_initialized() {
        let widget = MetronomeWidget::new(bounds());
        assert!(matches!(
            widget.render_frame(),
            Err(MetronomeError::NotInitialized(_))
        ));
    }

    #[test]
    fn render_geometry_matches_the_plate() {
        let widget = resized_widget();
        let plan = widget.render_frame().unwrap();

        // Plate is 1080 x 2160 with 1920 visible.
        assert_eq!(plan.pivot, (540.0, 2160.0));
        assert_eq!(plan.arm.start, (540.0, 120.0));
        assert_eq!(plan.arm.end, (540.0, 1800.0));
        assert!((plan.arm.stroke_width - 54.0).abs() < 1e-3);
        assert_eq!(plan.canvas_transform.rotate_degrees, -90.0);
        assert_eq!(plan.canvas_transform.translate, (-1920.0, 0.0));
        assert_eq!(plan.background_color, 0xFF00_0000);

        // At rest the arm hangs straight down.
        assert_eq!(plan.rotation_degrees, 0.0);
    }

    #[test]
    fn rotation_peaks_at_a_quarter_phase() {
        let mut widget = resized_widget();
        widget.tick(0.0);
        widget.tick(250.0); // quarter of the 1000 ms cycle

        let plan = widget.render_frame().unwrap();
        let expected = (432.0_f32 / 2160.0).atan().to_degrees();
        assert!((plan.rotation_degrees - expected).abs() < 1e-2);
    }

    #[test]
    fn weight_rides_the_arm_with_the_tempo() {
        let mut widget = resized_widget();
        let plan = widget.render_frame().unwrap();

        // normalized bpm 0.4 along the 1680 px arm, centered on the line.
        let expected_center = 120.0 + 0.4 * 1680.0;
        assert!((plan.weight.y + plan.weight.height / 2.0 - expected_center).abs() < 1e-2);
        assert!((plan.weight.x + plan.weight.width / 2.0 - 540.0).abs() < 1e-2);

        widget.on_pointer_input(1.0); // min bpm, weight at the arm's top
        let slow = widget.render_frame().unwrap();
        assert!((slow.weight.y + slow.weight.height / 2.0 - 120.0).abs() < 1e-2);
        assert!(slow.weight.y < plan.weight.y);
    }

    #[test]
    fn resize_rescales_the_drawing_constants() {
        let mut widget = resized_widget();
        let before = widget.render_frame().unwrap();

        widget.on_resize(540, 960, Orientation::Portrait).unwrap();
        let after = widget.render_frame().unwrap();

        assert!((after.arm.stroke_width - before.arm.stroke_width / 2.0).abs() < 1e-3);
        assert!((after.weight.width - before.weight.width / 2.0).abs() < 1e-3);
        assert!((after.weight.corner_radius - before.weight.corner_radius / 2.0).abs() < 1e-3);
    }

    #[test]
    fn landscape_resize_switches_the_projection_branch() {
        let mut widget = resized_widget();
        widget.on_resize(1920, 1080, Orientation::Landscape).unwrap();

        let plan = widget.render_frame().unwrap();
        // Landscape plate: width 607.5, height 1215, visible 1080.
        assert_eq!(plan.pivot, (960.0, 1215.0));
        assert!((plan.arm.start.1 - 67.5).abs() < 1e-3);
        assert!((plan.arm.end.1 - 1012.5).abs() < 1e-3);
        assert!((plan.arm.stroke_width - 30.375).abs() < 1e-3);
    }
}
