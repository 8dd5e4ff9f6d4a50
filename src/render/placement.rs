use serde::Serialize;

use crate::foundation::core::{Affine, Canvas, Rect};

/// Output pixels per document point.
pub const PIXELS_PER_POINT: f64 = 2.0;

/// Placed layer rectangle in output pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Place a layer of natural size `natural_w × natural_h` on `canvas`.
///
/// The width is `natural_w × scale × 2`; the height follows from the natural aspect ratio. The
/// result is centered on the canvas, then shifted by `translation × 2`.
pub fn place(
    natural_w: f64,
    natural_h: f64,
    scale: f64,
    translation: [f64; 2],
    canvas: Canvas,
) -> Placement {
    let aspect = natural_w / natural_h;
    let width = natural_w * scale * PIXELS_PER_POINT;
    let height = width / aspect;

    let x = (f64::from(canvas.width) - width) / 2.0;
    let y = (f64::from(canvas.height) - height) / 2.0;

    Placement {
        x: x + translation[0] * PIXELS_PER_POINT,
        y: y + translation[1] * PIXELS_PER_POINT,
        width,
        height,
    }
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Whether the rectangle has a drawable, finite extent.
    pub fn is_drawable(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Transform mapping a `src_w × src_h` pixel image onto this rectangle.
    pub fn transform_for(&self, src_w: u32, src_h: u32) -> Affine {
        let sx = self.width / f64::from(src_w.max(1));
        let sy = self.height / f64::from(src_h.max(1));
        Affine::translate((self.x, self.y)) * Affine::scale_non_uniform(sx, sy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/placement.rs"]
mod tests;
