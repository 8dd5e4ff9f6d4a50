use crate::foundation::error::{IconError, IconResult};
use crate::foundation::math::mul_div255_u8;

/// Blend mode of a layer draw, named as in `blend-mode` values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    SourceOver,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    PlusLighter,
    PlusDarker,
}

impl BlendMode {
    /// Parse a blend mode name. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "normal" | "source-over" => Self::SourceOver,
            "multiply" => Self::Multiply,
            "screen" => Self::Screen,
            "overlay" => Self::Overlay,
            "darken" => Self::Darken,
            "lighten" => Self::Lighten,
            "color-dodge" => Self::ColorDodge,
            "color-burn" => Self::ColorBurn,
            "hard-light" => Self::HardLight,
            "soft-light" => Self::SoftLight,
            "difference" => Self::Difference,
            "exclusion" => Self::Exclusion,
            "hue" => Self::Hue,
            "saturation" => Self::Saturation,
            "color" => Self::Color,
            "luminosity" => Self::Luminosity,
            "plus-lighter" | "lighter" => Self::PlusLighter,
            "plus-darker" => Self::PlusDarker,
            _ => return None,
        })
    }

    /// Blend mode for an optional layer `blend-mode`; unknown names are logged and draw as
    /// source-over.
    pub fn for_layer(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return Self::SourceOver;
        };
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!(blend_mode = name, "unknown blend mode, using source-over");
            Self::SourceOver
        })
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::SourceOver => "source-over",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
            Self::PlusLighter => "plus-lighter",
            Self::PlusDarker => "plus-darker",
        }
    }
}

fn check_rgba_pair(dst: &[u8], src: &[u8], what: &str) -> IconResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(IconError::render(format!(
            "{what} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Premultiplied source-over of `src` scaled by `opacity` onto `dst`.
pub fn premul_over_in_place_opacity(dst: &mut [u8], src: &[u8], opacity: f32) -> IconResult<()> {
    check_rgba_pair(dst, src, "premul_over_in_place_opacity")?;
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = add_sat_u8(sa, mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(sc, dc);
        }
    }
    Ok(())
}

/// Composite premultiplied `src` onto `dst` with `blend`, scaling the source by `opacity`.
pub fn composite_over_rgba8_premul(
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
    blend: BlendMode,
) -> IconResult<()> {
    check_rgba_pair(dst, src, "composite_over_rgba8_premul")?;

    // Dispatch once per draw; each arm monomorphizes its own kernel.
    match blend {
        BlendMode::SourceOver => premul_over_in_place_opacity(dst, src, opacity),
        BlendMode::Multiply => separable(dst, src, opacity, |s, d| s * d),
        BlendMode::Screen => separable(dst, src, opacity, |s, d| s + d - s * d),
        BlendMode::Overlay => separable(dst, src, opacity, |s, d| hard_light(d, s)),
        BlendMode::Darken => separable(dst, src, opacity, |s, d| s.min(d)),
        BlendMode::Lighten => separable(dst, src, opacity, |s, d| s.max(d)),
        BlendMode::ColorDodge => separable(dst, src, opacity, |s, d| {
            if d <= 0.0 {
                0.0
            } else if s >= 1.0 {
                1.0
            } else {
                (d / (1.0 - s)).min(1.0)
            }
        }),
        BlendMode::ColorBurn => separable(dst, src, opacity, |s, d| {
            if d >= 1.0 {
                1.0
            } else if s <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - d) / s).min(1.0)
            }
        }),
        BlendMode::HardLight => separable(dst, src, opacity, hard_light),
        BlendMode::SoftLight => separable(dst, src, opacity, |s, d| {
            if s <= 0.5 {
                d - (1.0 - 2.0 * s) * d * (1.0 - d)
            } else {
                let g = if d <= 0.25 {
                    ((16.0 * d - 12.0) * d + 4.0) * d
                } else {
                    d.sqrt()
                };
                d + (2.0 * s - 1.0) * (g - d)
            }
        }),
        BlendMode::Difference => separable(dst, src, opacity, |s, d| (d - s).abs()),
        BlendMode::Exclusion => separable(dst, src, opacity, |s, d| d + s - 2.0 * d * s),
        BlendMode::Hue => non_separable(dst, src, opacity, |s, d| {
            set_lum(set_sat(s, sat(d)), lum(d))
        }),
        BlendMode::Saturation => non_separable(dst, src, opacity, |s, d| {
            set_lum(set_sat(d, sat(s)), lum(d))
        }),
        BlendMode::Color => non_separable(dst, src, opacity, |s, d| set_lum(s, lum(d))),
        BlendMode::Luminosity => non_separable(dst, src, opacity, |s, d| set_lum(d, lum(s))),
        BlendMode::PlusLighter => {
            plus(dst, src, opacity, |sp, dp, _sa, _da, _oa| (sp + dp).min(1.0))
        }
        BlendMode::PlusDarker => plus(dst, src, opacity, |sp, dp, sa, da, oa| {
            (oa - (sa - sp) - (da - dp)).max(0.0)
        }),
    }
}

fn hard_light(s: f32, d: f32) -> f32 {
    if s <= 0.5 {
        2.0 * s * d
    } else {
        1.0 - 2.0 * (1.0 - s) * (1.0 - d)
    }
}

#[inline(always)]
fn separable<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F) -> IconResult<()>
where
    F: Fn(f32, f32) -> f32,
{
    non_separable(dst, src, opacity, |s, d| {
        [blend_fn(s[0], d[0]), blend_fn(s[1], d[1]), blend_fn(s[2], d[2])]
    })
}

#[inline(always)]
fn non_separable<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F) -> IconResult<()>
where
    F: Fn([f32; 3], [f32; 3]) -> [f32; 3],
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        // Source-over with the blend result weighted by both alphas:
        // out_a = sa + da * (1 - sa)
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sp = [
            (s[0] as f32 / 255.0) * opacity,
            (s[1] as f32 / 255.0) * opacity,
            (s[2] as f32 / 255.0) * opacity,
        ];
        let sa = (s[3] as f32 / 255.0) * opacity;
        let dp = [d[0] as f32 / 255.0, d[1] as f32 / 255.0, d[2] as f32 / 255.0];
        let da = d[3] as f32 / 255.0;

        let sc = unpremul(sp, sa);
        let dc = unpremul(dp, da);
        let b = blend_fn(sc, dc);

        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);
        for c in 0..3 {
            let bc = b[c].clamp(0.0, 1.0);
            let out = (sp[c] * (1.0 - da) + dp[c] * (1.0 - sa) + bc * sa * da).clamp(0.0, 1.0);
            d[c] = unit_f32_to_u8(out);
        }
        d[3] = unit_f32_to_u8(out_a);
    }

    Ok(())
}

/// Additive modes: `channel(sp, dp, sa, da, out_a)` yields each premultiplied color channel;
/// alpha is `min(1, sa + da)`.
#[inline(always)]
fn plus<F>(dst: &mut [u8], src: &[u8], opacity: f32, channel: F) -> IconResult<()>
where
    F: Fn(f32, f32, f32, f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let sa = (s[3] as f32 / 255.0) * opacity;
        let da = d[3] as f32 / 255.0;
        let out_a = (sa + da).min(1.0);
        for c in 0..3 {
            let sp = (s[c] as f32 / 255.0) * opacity;
            let dp = d[c] as f32 / 255.0;
            d[c] = unit_f32_to_u8(channel(sp, dp, sa, da, out_a).clamp(0.0, out_a));
        }
        d[3] = unit_f32_to_u8(out_a);
    }
    Ok(())
}

fn unpremul(p: [f32; 3], a: f32) -> [f32; 3] {
    if a <= 0.0 {
        return [0.0; 3];
    }
    [
        (p[0] / a).clamp(0.0, 1.0),
        (p[1] / a).clamp(0.0, 1.0),
        (p[2] / a).clamp(0.0, 1.0),
    ]
}

fn unit_f32_to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn lum(c: [f32; 3]) -> f32 {
    0.3 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 {
        let k = l - n;
        for v in &mut out {
            *v = if k > 0.0 { l + (*v - l) * l / k } else { l };
        }
    }
    if x > 1.0 {
        let k = x - l;
        for v in &mut out {
            *v = if k > 0.0 { l + (*v - l) * (1.0 - l) / k } else { l };
        }
    }
    out
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

fn sat(c: [f32; 3]) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

fn set_sat(c: [f32; 3], s: f32) -> [f32; 3] {
    let mut idx = [0usize, 1, 2];
    idx.sort_by(|&a, &b| c[a].total_cmp(&c[b]));
    let [min_i, mid_i, max_i] = idx;

    let mut out = [0.0f32; 3];
    let range = c[max_i] - c[min_i];
    if range > 0.0 {
        out[mid_i] = (c[mid_i] - c[min_i]) * s / range;
        out[max_i] = s;
    }
    out
}

/// Multiply every channel of premultiplied `rgba` by the 8-bit coverage `mask` (one byte per
/// pixel).
pub fn mask_apply_alpha_in_place(rgba: &mut [u8], mask: &[u8]) -> IconResult<()> {
    if rgba.len() != mask.len().saturating_mul(4) {
        return Err(IconError::render(
            "mask_apply_alpha_in_place expects one mask byte per rgba8 pixel",
        ));
    }
    for (px, &m) in rgba.chunks_exact_mut(4).zip(mask) {
        match m {
            255 => {}
            0 => px.fill(0),
            _ => {
                let w = u16::from(m);
                for c in px.iter_mut() {
                    *c = mul_div255_u8(u16::from(*c), w);
                }
            }
        }
    }
    Ok(())
}

/// Alpha channel of a premultiplied RGBA8 buffer as a coverage plane.
pub fn alpha_plane(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4).map(|px| px[3]).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
