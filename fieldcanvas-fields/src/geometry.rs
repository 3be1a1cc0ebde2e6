//! Field geometry in reference-viewport units, and the layout contract that
//! turns it into on-screen rectangles.
//!
//! Geometry is stored relative to the viewport the template was authored in,
//! never in live pixels. Converting to pixels for whatever size the canvas is
//! currently rendered at is the job of a [`LayoutEngine`].

use serde::{Deserialize, Serialize};

use crate::error::{FieldsError, Result};

/// Position and size of a field in reference-viewport units.
///
/// All four values are finite and non-negative; width and height are
/// strictly positive. Deserialization enforces the same rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct Geometry {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawGeometry {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = FieldsError;

    fn try_from(raw: RawGeometry) -> Result<Self> {
        Geometry::new(raw.left, raw.top, raw.width, raw.height)
    }
}

impl Geometry {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Result<Self> {
        for (name, value) in [
            ("left", left),
            ("top", top),
            ("width", width),
            ("height", height),
        ] {
            if !value.is_finite() {
                return Err(FieldsError::InvalidGeometry {
                    message: format!("{name} must be finite, got {value}"),
                });
            }
            if value < 0.0 {
                return Err(FieldsError::InvalidGeometry {
                    message: format!("{name} must be non-negative, got {value}"),
                });
            }
        }
        if width == 0.0 || height == 0.0 {
            return Err(FieldsError::InvalidGeometry {
                message: format!("size must be positive, got {width}x{height}"),
            });
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Size of a viewport. Both dimensions are finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawViewport")]
pub struct Viewport {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawViewport {
    width: f64,
    height: f64,
}

impl TryFrom<RawViewport> for Viewport {
    type Error = FieldsError;

    fn try_from(raw: RawViewport) -> Result<Self> {
        Viewport::new(raw.width, raw.height)
    }
}

impl Viewport {
    /// A4 portrait in PDF points.
    pub const A4: Viewport = Viewport {
        width: 595.0,
        height: 842.0,
    };

    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FieldsError::InvalidViewport {
                message: format!("dimensions must be finite and positive, got {width}x{height}"),
            });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::A4
    }
}

/// A rectangle in live screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Converts stored geometry into screen pixels for the current viewport.
pub trait LayoutEngine {
    fn to_screen_rect(
        &self,
        geometry: &Geometry,
        reference: Viewport,
        current: Viewport,
    ) -> ScreenRect;
}

/// Scales each axis independently by `current / reference`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalLayout;

impl LayoutEngine for ProportionalLayout {
    fn to_screen_rect(
        &self,
        geometry: &Geometry,
        reference: Viewport,
        current: Viewport,
    ) -> ScreenRect {
        let sx = current.width / reference.width;
        let sy = current.height / reference.height;
        ScreenRect {
            left: geometry.left * sx,
            top: geometry.top * sy,
            width: geometry.width * sx,
            height: geometry.height * sy,
        }
    }
}
