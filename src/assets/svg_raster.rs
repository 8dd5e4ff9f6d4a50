use std::sync::Arc;

use crate::assets::decode::{PreparedImage, PreparedSvg};
use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{IconError, IconResult};

/// Largest raster edge accepted for a single vector layer, the same as the largest canvas.
const MAX_DIM: u32 = u16::MAX as u32;

/// Pixel size a vector layer is rasterized at for a `width × height` rectangle.
pub fn svg_raster_size(width: f64, height: f64) -> IconResult<(u32, u32)> {
    fn to_px(v: f64) -> IconResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(IconError::decode("svg layer has invalid placed size"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let (w, h) = (to_px(width)?, to_px(height)?);
    if w > MAX_DIM || h > MAX_DIM {
        return Err(IconError::decode(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, h))
}

/// Whole-pixel part of `placed` that lands on `canvas`, or `None` when none of it does.
pub fn visible_window(placed: Rect, canvas: Canvas) -> Option<Rect> {
    let x0 = placed.x0.max(0.0).floor();
    let y0 = placed.y0.max(0.0).floor();
    let x1 = placed.x1.min(f64::from(canvas.width)).ceil();
    let y1 = placed.y1.min(f64::from(canvas.height)).ceil();
    let window = Rect::new(x0, y0, x1, y1);
    ([x0, y0, x1, y1].iter().all(|v| v.is_finite()) && x1 > x0 && y1 > y0).then_some(window)
}

/// Render the `window` part of `svg` stretched over `placed`, both in canvas pixels.
///
/// The result is `window`-sized and drawn 1:1 at the window's origin, so a layer scaled far past
/// the canvas only costs the pixels that are visible.
pub fn rasterize_svg_window(
    svg: &PreparedSvg,
    placed: Rect,
    window: Rect,
) -> IconResult<PreparedImage> {
    let (pw, ph) = (placed.width(), placed.height());
    if !(pw.is_finite() && ph.is_finite() && pw > 0.0 && ph > 0.0) {
        return Err(IconError::decode("svg layer has invalid placed size"));
    }
    let (width, height) = svg_raster_size(window.width(), window.height())?;

    let tree = &svg.tree;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| IconError::decode("failed to allocate svg pixmap"))?;

    let size = tree.size();
    let sx = (pw / f64::from(size.width())) as f32;
    let sy = (ph / f64::from(size.height())) as f32;
    let tx = (placed.x0 - window.x0) as f32;
    let ty = (placed.y0 - window.y0) as f32;
    let xform = resvg::tiny_skia::Transform::from_row(sx, 0.0, 0.0, sy, tx, ty);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
        canvas_rect: Some(Rect::new(
            window.x0,
            window.y0,
            window.x0 + f64::from(width),
            window.y0 + f64::from(height),
        )),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
