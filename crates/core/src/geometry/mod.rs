use serde::{Deserialize, Serialize};

use crate::{MetronomeError, Result};

/// Orientation of the hosting canvas. Anything a platform reports that is
/// not landscape is treated as portrait, so the enum only carries the two
/// cases the projection distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Derived plate projection for one canvas/orientation combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateMetrics {
    pub width: f32,
    pub height: f32,
    /// Extra vertical extent below the canvas that preserves the
    /// reference aspect ratio under projection.
    pub descent: f32,
}

impl PlateMetrics {
    /// Portion of the plate that actually falls on the canvas.
    pub fn visible_height(&self) -> f32 {
        self.height - self.descent
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CanvasSize {
    width: u32,
    height: u32,
    /// Dimensions swapped so that width <= height, giving a stable
    /// reference computation regardless of how the host reports them.
    portrait_width: u32,
    portrait_height: u32,
}

/// Projects a reference rectangle onto an arbitrary canvas as a
/// perspective-scaled plate, so the same normalized design scales
/// consistently across portrait and landscape.
///
/// The derived values are recomputed from the inputs on every read rather
/// than cached behind a dirty flag, so a read immediately after a resize
/// always reflects the latest canvas.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PlateProjector {
    canvas: Option<CanvasSize>,
    reference: Option<(f32, f32)>,
    orientation: Orientation,
}

impl PlateProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the canvas dimensions in pixels. Both must be positive.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(MetronomeError::invalid_configuration(format!(
                "canvas dimensions must be > 0, got {width}x{height}"
            )));
        }

        let (portrait_width, portrait_height) = if width < height {
            (width, height)
        } else {
            (height, width)
        };

        self.canvas = Some(CanvasSize {
            width,
            height,
            portrait_width,
            portrait_height,
        });
        Ok(())
    }

    /// Records the reference rectangle the plate is scaled against.
    pub fn set_reference_size(&mut self, width: f32, height: f32) -> Result<()> {
        if !(width > 0.0 && height > 0.0) {
            return Err(MetronomeError::invalid_configuration(format!(
                "reference dimensions must be > 0, got {width}x{height}"
            )));
        }

        self.reference = Some((width, height));
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Computes the plate projection from the current inputs.
    ///
    /// Fails with [`MetronomeError::NotInitialized`] until both the canvas
    /// and the reference size have been supplied.
    pub fn metrics(&self) -> Result<PlateMetrics> {
        let canvas = self
            .canvas
            .ok_or(MetronomeError::NotInitialized("canvas size has not been set"))?;
        let (reference_width, reference_height) = self
            .reference
            .ok_or(MetronomeError::NotInitialized("reference size has not been set"))?;

        let pcw = canvas.portrait_width as f32;
        let pch = canvas.portrait_height as f32;

        let portrait_descent = reference_height * pcw / reference_width - pch;
        let landscape_descent = portrait_descent * pcw / pch;
        let landscape_width = reference_width * (landscape_descent + pcw) / reference_height;

        let (width, descent) = match self.orientation {
            Orientation::Portrait => (pcw, portrait_descent),
            Orientation::Landscape => (landscape_width, landscape_descent),
        };

        // The height uses the canvas as reported, not the portrait-normalized one.
        let height = canvas.height as f32 + descent;

        Ok(PlateMetrics {
            width,
            height,
            descent,
        })
    }

    pub fn plate_width(&self) -> Result<f32> {
        Ok(self.metrics()?.width)
    }

    pub fn plate_height(&self) -> Result<f32> {
        Ok(self.metrics()?.height)
    }

    pub fn plate_descent(&self) -> Result<f32> {
        Ok(self.metrics()?.descent)
    }

    pub fn plate_visible_height(&self) -> Result<f32> {
        Ok(self.metrics()?.visible_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> PlateProjector {
        let mut projector = PlateProjector::new();
        projector.set_reference_size(10.0, 20.0).unwrap();
        projector
    }

    #[test]
    fn portrait_projection_matches_reference_aspect() {
        let mut projector = projector();
        projector.set_canvas_size(1080, 1920).unwrap();
        projector.set_orientation(Orientation::Portrait);

        let metrics = projector.metrics().unwrap();
        assert_eq!(metrics.width, 1080.0);
        assert_eq!(metrics.descent, 240.0);
        assert_eq!(metrics.height, 2160.0);
        assert_eq!(metrics.visible_height(), 1920.0);
    }

    #[test]
    fn landscape_projection_uses_the_landscape_branch() {
        let mut projector = projector();
        projector.set_canvas_size(1920, 1080).unwrap();
        projector.set_orientation(Orientation::Landscape);

        let metrics = projector.metrics().unwrap();
        assert_eq!(metrics.descent, 135.0);
        assert_eq!(metrics.width, 607.5);
        assert_eq!(metrics.height, 1215.0);
        assert_eq!(metrics.visible_height(), 1080.0);
    }

    #[test]
    fn accessors_agree_with_metrics() {
        let mut projector = projector();
        projector.set_canvas_size(1080, 1920).unwrap();

        assert_eq!(projector.plate_width().unwrap(), 1080.0);
        assert_eq!(projector.plate_height().unwrap(), 2160.0);
        assert_eq!(projector.plate_descent().unwrap(), 240.0);
        assert_eq!(projector.plate_visible_height().unwrap(), 1920.0);
    }

    #[test]
    fn fails_before_fully_initialized() {
        let empty = PlateProjector::new();
        assert!(matches!(
            empty.metrics(),
            Err(MetronomeError::NotInitialized(_))
        ));

        let reference_only = projector();
        assert!(matches!(
            reference_only.plate_width(),
            Err(MetronomeError::NotInitialized(_))
        ));

        let mut canvas_only = PlateProjector::new();
        canvas_only.set_canvas_size(100, 200).unwrap();
        assert!(matches!(
            canvas_only.metrics(),
            Err(MetronomeError::NotInitialized(_))
        ));
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        let mut projector = PlateProjector::new();
        assert!(projector.set_canvas_size(0, 1920).is_err());
        assert!(projector.set_canvas_size(1080, 0).is_err());
        assert!(projector.set_reference_size(0.0, 20.0).is_err());
        assert!(projector.set_reference_size(10.0, -1.0).is_err());
    }

    #[test]
    fn rapid_resizes_are_never_stale() {
        let mut projector = projector();
        projector.set_canvas_size(1080, 1920).unwrap();
        let _ = projector.metrics().unwrap();

        projector.set_canvas_size(540, 960).unwrap();
        projector.set_canvas_size(720, 1280).unwrap();

        let metrics = projector.metrics().unwrap();
        assert_eq!(metrics.width, 720.0);
        assert_eq!(metrics.visible_height(), 1280.0);
    }

    #[test]
    fn non_portrait_canvas_is_normalized_before_projection() {
        // The same physical screen reported both ways projects the same
        // portrait plate width.
        let mut portrait = projector();
        portrait.set_canvas_size(1080, 1920).unwrap();

        let mut rotated = projector();
        rotated.set_canvas_size(1920, 1080).unwrap();

        assert_eq!(
            portrait.plate_width().unwrap(),
            rotated.plate_width().unwrap()
        );
        assert_eq!(
            portrait.plate_descent().unwrap(),
            rotated.plate_descent().unwrap()
        );
    }
}
