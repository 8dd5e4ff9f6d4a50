use std::io::Cursor;

use anyhow::Context;

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::foundation::error::{IconError, IconResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::backend::Frame;
use crate::render::composite::mask_apply_alpha_in_place;
use crate::render::cpu::CpuBackend;
use crate::render::opts::RenderOpts;
use crate::render::plan::ClipShape;

/// Clip `frame` to the icon's rounded rect and return straight-alpha RGBA8 bytes.
///
/// The clip is rebuilt from `opts` with the same geometry the render used.
pub fn clipped_straight_rgba(frame: &Frame, opts: &RenderOpts) -> IconResult<Vec<u8>> {
    opts.validate()?;
    let canvas = opts.canvas();
    if frame.width != canvas.width || frame.height != canvas.height {
        return Err(IconError::validation(format!(
            "frame is {}x{} but options expect {}x{}",
            frame.width, frame.height, canvas.width, canvas.height
        )));
    }
    if frame.data.len() != canvas.rgba8_len()? {
        return Err(IconError::render("frame buffer size mismatch"));
    }

    let clip = CpuBackend::new().clip_coverage(
        &ClipShape {
            radius: opts.corner_radius(),
        },
        canvas,
    )?;

    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        mask_apply_alpha_in_place(&mut rgba, &clip)?;
        unpremultiply_rgba8_in_place(&mut rgba);
    } else {
        for (px, &m) in rgba.chunks_exact_mut(4).zip(&clip) {
            px[3] = mul_div255_u8(u16::from(px[3]), u16::from(m));
        }
    }
    Ok(rgba)
}

/// Encode `frame` as a PNG of the clipped icon.
#[tracing::instrument(skip_all, fields(width = frame.width, height = frame.height))]
pub fn export_png(frame: &Frame, opts: &RenderOpts) -> IconResult<Vec<u8>> {
    let rgba = clipped_straight_rgba(frame, opts)?;
    let mut out = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut out),
        &rgba,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/export.rs"]
mod tests;
