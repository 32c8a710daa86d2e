use serde::{Deserialize, Serialize};

use crate::Result;

/// Packed ARGB color, `0xAARRGGBB`.
pub type Color = u32;

/// Mirrored linear gradient between two anchor points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientSpec {
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub start_color: Color,
    pub end_color: Color,
}

/// Outermost transform applied before anything else is drawn. It turns a
/// horizontally-native drawing routine into the vertically-oriented
/// control: rotate the whole canvas, then shift it back into view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    pub rotate_degrees: f32,
    pub translate: (f32, f32),
}

/// The swing arm, drawn as a single thick line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingArm {
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub stroke_width: f32,
    pub round_cap: bool,
    pub gradient: GradientSpec,
}

/// Rounded-rectangle weight marker riding on the swing arm. Its position
/// along the arm signals the configured tempo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightMarker {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub gradient: GradientSpec,
}

/// Complete set of primitives for one frame of the control.
///
/// The host applies `canvas_transform` first, fills the background, then
/// rotates by `rotation_degrees` about `pivot` and draws the arm and the
/// weight in that rotated frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawPlan {
    pub background_color: Color,
    pub canvas_transform: CanvasTransform,
    /// Live swing angle for this frame.
    pub rotation_degrees: f32,
    /// Rotation pivot at the bottom center of the plate.
    pub pivot: (f32, f32),
    pub arm: SwingArm,
    pub weight: WeightMarker,
}

impl DrawPlan {
    /// Serializes the plan so a host in another process or language can
    /// consume it.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
