use crate::foundation::core::{Canvas, Rgba8Premul};
use crate::foundation::error::IconResult;
use crate::scene::color::Color;
use crate::scene::model::Fill;

/// Top stop of the automatic background.
pub const AUTOMATIC_TOP: Color = Color::rgba(255, 255, 255, 1.0);
/// Bottom stop of the automatic background.
pub const AUTOMATIC_BOTTOM: Color = Color::rgba(235, 235, 235, 1.0);

/// Resolved background paint, ready to rasterize.
#[derive(Clone, Debug, PartialEq)]
pub enum FillPaint {
    /// Flat color.
    Solid(Color),
    /// Top-to-bottom gradient with two or more evenly spaced stops.
    Vertical(Vec<Color>),
}

impl FillPaint {
    /// Resolve a document fill into paint.
    ///
    /// `None` and an empty stop list fall back to the automatic gradient; a single stop is solid.
    pub fn resolve(fill: &Fill) -> Self {
        match fill {
            Fill::Automatic | Fill::None => Self::automatic(),
            Fill::AutomaticGradient(spec) => {
                let base = spec.to_rgba();
                Self::Vertical(vec![base.lighten(), base])
            }
            Fill::LinearGradient(specs) => match specs.as_slice() {
                [] => Self::automatic(),
                [only] => Self::Solid(only.to_rgba()),
                many => Self::Vertical(many.iter().map(|s| s.to_rgba()).collect()),
            },
            Fill::Solid(spec) => Self::Solid(spec.to_rgba()),
        }
    }

    pub fn automatic() -> Self {
        Self::Vertical(vec![AUTOMATIC_TOP, AUTOMATIC_BOTTOM])
    }

    /// Gradient stops as `(offset, color)`, offsets at `i / (n - 1)`.
    pub fn stops(&self) -> Vec<(f64, Color)> {
        match self {
            Self::Solid(c) => vec![(0.0, *c)],
            Self::Vertical(colors) => {
                let last = (colors.len().max(2) - 1) as f64;
                colors
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (i as f64 / last, *c))
                    .collect()
            }
        }
    }

    /// Premultiplied color at vertical position `t` in `[0, 1]`.
    pub fn sample(&self, t: f64) -> Rgba8Premul {
        match self {
            Self::Solid(c) => c.to_premul(),
            Self::Vertical(colors) => sample_stops(colors, t),
        }
    }

    /// Rasterize to a tightly packed premultiplied RGBA8 buffer covering `canvas`.
    pub fn rasterize(&self, canvas: Canvas) -> IconResult<Vec<u8>> {
        let mut bytes = vec![0u8; canvas.rgba8_len()?];
        let row_len = canvas.width as usize * 4;
        if row_len == 0 {
            return Ok(bytes);
        }
        let h = f64::from(canvas.height.max(1));
        for (y, row) in bytes.chunks_exact_mut(row_len).enumerate() {
            // Sampled at pixel centers, like a canvas gradient spanning `0..h`.
            let t = (y as f64 + 0.5) / h;
            let c = self.sample(t).to_array();
            for px in row.chunks_exact_mut(4) {
                px.copy_from_slice(&c);
            }
        }
        Ok(bytes)
    }
}

fn sample_stops(colors: &[Color], t: f64) -> Rgba8Premul {
    let (first, last) = match colors {
        [] => return Rgba8Premul::transparent(),
        [only] => return only.to_premul(),
        [first, .., last] => (first, last),
    };
    let t = t.clamp(0.0, 1.0);
    let segments = (colors.len() - 1) as f64;
    if t <= 0.0 {
        return first.to_premul();
    }
    if t >= 1.0 {
        return last.to_premul();
    }

    let pos = t * segments;
    let i = (pos.floor() as usize).min(colors.len() - 2);
    let u = pos - i as f64;
    let a = colors[i].to_premul();
    let b = colors[i + 1].to_premul();
    let lerp = |a: u8, b: u8| -> u8 {
        let af = f64::from(a);
        let bf = f64::from(b);
        (af + (bf - af) * u).round().clamp(0.0, 255.0) as u8
    };
    Rgba8Premul {
        r: lerp(a.r, b.r),
        g: lerp(a.g, b.g),
        b: lerp(a.b, b.b),
        a: lerp(a.a, b.a),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fill.rs"]
mod tests;
