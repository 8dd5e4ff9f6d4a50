use crate::foundation::error::{IconError, IconResult};

/// Gaussian parameters for a 2D-canvas style `shadowBlur` value.
///
/// `sigma = blur / 2` and the kernel spans `ceil(3 * sigma)` pixels on each side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurSpec {
    pub radius: u32,
    pub sigma: f32,
}

impl BlurSpec {
    pub fn from_shadow_blur(blur: f64) -> Self {
        if !blur.is_finite() || blur <= 0.0 {
            return Self {
                radius: 0,
                sigma: 0.0,
            };
        }
        let sigma = blur / 2.0;
        Self {
            radius: (3.0 * sigma).ceil() as u32,
            sigma: sigma as f32,
        }
    }
}

/// Normalized Gaussian weights in Q16 fixed point (they sum to exactly `1 << 16`).
pub fn gaussian_kernel_q16(radius: u32, sigma: f32) -> IconResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(IconError::validation("blur sigma must be finite and > 0"));
    }

    // Tail half `0..=radius`; the kernel is its mirror image around the center tap.
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let half: Vec<f64> = (0..=radius)
        .map(|i| (-f64::from(i) * f64::from(i) / denom).exp())
        .collect();
    let sum = half[0] + 2.0 * half[1..].iter().sum::<f64>();
    if sum <= 0.0 {
        return Err(IconError::render("gaussian kernel sum is zero"));
    }

    let quantize = |w: f64| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32;
    let mut weights: Vec<u32> = half
        .iter()
        .rev()
        .chain(&half[1..])
        .map(|&w| quantize(w))
        .collect();

    // Rounding residue goes to the center tap so the taps sum to exactly 1.0 in Q16.
    let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = radius as usize;
    weights[mid] = (i64::from(weights[mid]) + 65536 - total).clamp(0, 65536) as u32;

    Ok(weights)
}

/// Pixel bounds `[x0, x1) × [y0, y1)` of the non-zero entries of an alpha plane.
fn coverage_bounds(plane: &[u8], width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let w = width as usize;
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for y in 0..height as usize {
        let row = &plane[y * w..(y + 1) * w];
        let Some(first) = row.iter().position(|&a| a != 0) else {
            continue;
        };
        let last = row.iter().rposition(|&a| a != 0).unwrap_or(first);
        let (y, first, last) = (y as u32, first as u32, last as u32);
        bounds = Some(match bounds {
            None => (first, y, last + 1, y + 1),
            Some((x0, y0, x1, _)) => (x0.min(first), y0, x1.max(last + 1), y + 1),
        });
    }
    bounds
}

/// Gaussian-blur a single-channel coverage plane in place.
///
/// Samples outside the plane count as zero. Work is limited to the covered region grown by the
/// kernel radius.
pub fn blur_alpha_plane_q16(
    plane: &mut [u8],
    width: u32,
    height: u32,
    kernel_q16: &[u32],
) -> IconResult<()> {
    if plane.len() != (width as usize).saturating_mul(height as usize) {
        return Err(IconError::render("blur plane length mismatch"));
    }
    if kernel_q16.len() <= 1 {
        return Ok(());
    }
    let Some((x0, y0, x1, y1)) = coverage_bounds(plane, width, height) else {
        return Ok(());
    };

    let radius = (kernel_q16.len() / 2) as u32;
    let rx0 = x0.saturating_sub(radius) as usize;
    let ry0 = y0.saturating_sub(radius) as usize;
    let rx1 = (x1 + radius).min(width) as usize;
    let ry1 = (y1 + radius).min(height) as usize;

    let w = width as usize;
    let rw = rx1 - rx0;
    let rh = ry1 - ry0;
    let r = radius as isize;

    // Horizontal pass into a region-sized scratch buffer.
    let mut tmp = vec![0u8; rw * rh];
    for ry in 0..rh {
        let src_row = &plane[(ry0 + ry) * w..(ry0 + ry + 1) * w];
        for rx in 0..rw {
            let x = (rx0 + rx) as isize;
            let mut acc = 0u64;
            for (ki, &kw) in kernel_q16.iter().enumerate() {
                let sx = x + ki as isize - r;
                if sx < 0 || sx >= w as isize {
                    continue;
                }
                acc += u64::from(kw) * u64::from(src_row[sx as usize]);
            }
            tmp[ry * rw + rx] = q16_to_u8(acc);
        }
    }

    // Vertical pass back into the plane.
    for ry in 0..rh {
        let y = ry as isize;
        for rx in 0..rw {
            let mut acc = 0u64;
            for (ki, &kw) in kernel_q16.iter().enumerate() {
                let sy = y + ki as isize - r;
                if sy < 0 || sy >= rh as isize {
                    continue;
                }
                acc += u64::from(kw) * u64::from(tmp[sy as usize * rw + rx]);
            }
            plane[(ry0 + ry) * w + rx0 + rx] = q16_to_u8(acc);
        }
    }
    Ok(())
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
