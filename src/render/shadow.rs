use serde::Serialize;

use crate::foundation::core::Canvas;
use crate::foundation::error::{IconError, IconResult};
use crate::foundation::math::mul_div255_u8;
use crate::render::blur::{BlurSpec, blur_alpha_plane_q16, gaussian_kernel_q16};
use crate::render::composite::premul_over_in_place_opacity;
use crate::scene::color::Color;
use crate::scene::model::ShadowSpec;

/// Scale from shadow opacity to the soft pass color alpha.
const BASE_ALPHA_SCALE: f64 = 0.15;

/// One shadow pass: a tinted, offset, blurred copy of the layer's coverage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ShadowParams {
    /// Straight-alpha RGB is always black; only the alpha varies.
    pub color_alpha: f64,
    /// 2D-canvas `shadowBlur`.
    pub blur: f64,
    pub offset_x: i32,
    pub offset_y: i32,
    /// Alpha applied when compositing the finished pass onto the output.
    pub composite_alpha: f64,
}

impl ShadowParams {
    pub fn color(&self) -> Color {
        Color::rgba(0, 0, 0, self.color_alpha)
    }
}

/// The two passes of a group shadow, soft first.
///
/// `base = opacity * 0.15`. The soft pass uses `base` with blur 40 and offset `(8, 8)`; the
/// overlay pass uses `base * 1.5`, blur 20 and offset `(4, 0)`, composited at 0.3.
pub fn shadow_passes(spec: &ShadowSpec) -> [ShadowParams; 2] {
    let base = spec.opacity() * BASE_ALPHA_SCALE;
    [
        ShadowParams {
            color_alpha: base,
            blur: 40.0,
            offset_x: 8,
            offset_y: 8,
            composite_alpha: 1.0,
        },
        ShadowParams {
            color_alpha: base * 1.5,
            blur: 20.0,
            offset_x: 4,
            offset_y: 0,
            composite_alpha: 0.3,
        },
    ]
}

/// Premultiplied RGBA8 surface holding one shadow pass: the tinted shadow with the placed
/// layer drawn over it.
#[derive(Clone, Debug)]
pub struct ShadowBuffer {
    pub canvas: Canvas,
    pub rgba8_premul: Vec<u8>,
}

impl ShadowBuffer {
    /// Synthesize a pass from the layer's coverage plane (one alpha byte per canvas pixel).
    pub fn synthesize(coverage: &[u8], canvas: Canvas, params: &ShadowParams) -> IconResult<Self> {
        let (w, h) = (canvas.width as usize, canvas.height as usize);
        if coverage.len() != w.saturating_mul(h) {
            return Err(IconError::render("shadow coverage length mismatch"));
        }

        let mut plane = vec![0u8; coverage.len()];
        shift_plane(coverage, &mut plane, w, h, params.offset_x, params.offset_y);

        let spec = BlurSpec::from_shadow_blur(params.blur);
        let kernel = gaussian_kernel_q16(spec.radius, spec.sigma)?;
        blur_alpha_plane_q16(&mut plane, canvas.width, canvas.height, &kernel)?;

        let tint = params.color().to_premul();
        let mut rgba8_premul = vec![0u8; canvas.rgba8_len()?];
        for (px, &a) in rgba8_premul.chunks_exact_mut(4).zip(&plane) {
            if a == 0 {
                continue;
            }
            let a = u16::from(a);
            px[0] = mul_div255_u8(u16::from(tint.r), a);
            px[1] = mul_div255_u8(u16::from(tint.g), a);
            px[2] = mul_div255_u8(u16::from(tint.b), a);
            px[3] = mul_div255_u8(u16::from(tint.a), a);
        }

        Ok(Self {
            canvas,
            rgba8_premul,
        })
    }

    /// Draw the placed layer (premultiplied, canvas-sized) source-over the shadow.
    pub fn cover_with(&mut self, layer: &[u8]) -> IconResult<()> {
        premul_over_in_place_opacity(&mut self.rgba8_premul, layer, 1.0)
    }
}

fn shift_plane(src: &[u8], dst: &mut [u8], w: usize, h: usize, dx: i32, dy: i32) {
    let (dx, dy) = (dx as isize, dy as isize);
    for y in 0..h as isize {
        let sy = y - dy;
        if sy < 0 || sy >= h as isize {
            continue;
        }
        for x in 0..w as isize {
            let sx = x - dx;
            if sx < 0 || sx >= w as isize {
                continue;
            }
            dst[y as usize * w + x as usize] = src[sy as usize * w + sx as usize];
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/shadow.rs"]
mod tests;
