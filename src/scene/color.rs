use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{IconError, IconResult};
use crate::foundation::math::unit_to_u8;

/// Display-P3 to sRGB transform applied to the raw components.
const P3_TO_SRGB: [[f64; 3]; 3] = [
    [1.2249, -0.2247, -0.0002],
    [-0.0420, 1.0420, 0.0000],
    [-0.0197, -0.0786, 1.0983],
];

/// Per-channel offsets used to derive the top stop of an automatic gradient.
const LIGHTEN_R: u8 = 94;
const LIGHTEN_G: u8 = 33;

/// Color space tag of a [`ColorSpecifier`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    /// `extended-srgb`
    ExtendedSrgb,
    /// `display-p3`
    DisplayP3,
    /// `extended-gray`
    ExtendedGray,
    /// Any other tag; interpreted as sRGB with a warning.
    Unknown(String),
}

impl ColorSpace {
    fn parse(tag: &str) -> Self {
        match tag {
            "extended-srgb" => Self::ExtendedSrgb,
            "display-p3" => Self::DisplayP3,
            "extended-gray" => Self::ExtendedGray,
            other => Self::Unknown(other.to_owned()),
        }
    }

    fn tag(&self) -> &str {
        match self {
            Self::ExtendedSrgb => "extended-srgb",
            Self::DisplayP3 => "display-p3",
            Self::ExtendedGray => "extended-gray",
            Self::Unknown(s) => s,
        }
    }
}

/// A color-space-qualified color value before conversion to canonical RGBA.
///
/// Component counts are checked on construction: three channels for RGB spaces, one for gray.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorSpecifier {
    /// Extended sRGB components.
    Srgb { rgb: [f64; 3], alpha: f64 },
    /// Display-P3 components.
    DisplayP3 { rgb: [f64; 3], alpha: f64 },
    /// Extended gray luminance.
    Gray { white: f64, alpha: f64 },
    /// Unrecognized space carrying RGB-shaped components.
    Unknown {
        space: String,
        rgb: [f64; 3],
        alpha: f64,
    },
}

impl ColorSpecifier {
    /// Build a specifier from a space and its component list (alpha excluded).
    pub fn new(space: ColorSpace, components: &[f64], alpha: f64) -> IconResult<Self> {
        if components.iter().any(|c| !c.is_finite()) || !alpha.is_finite() {
            return Err(IconError::color("color components must be finite"));
        }
        let rgb = |components: &[f64]| -> IconResult<[f64; 3]> {
            match components {
                [r, g, b] => Ok([*r, *g, *b]),
                _ => Err(IconError::color(format!(
                    "{} expects 3 components, got {}",
                    space.tag(),
                    components.len()
                ))),
            }
        };
        match &space {
            ColorSpace::ExtendedSrgb => Ok(Self::Srgb {
                rgb: rgb(components)?,
                alpha,
            }),
            ColorSpace::DisplayP3 => Ok(Self::DisplayP3 {
                rgb: rgb(components)?,
                alpha,
            }),
            ColorSpace::ExtendedGray => match components {
                [white] => Ok(Self::Gray {
                    white: *white,
                    alpha,
                }),
                _ => Err(IconError::color(format!(
                    "extended-gray expects 1 component, got {}",
                    components.len()
                ))),
            },
            ColorSpace::Unknown(name) => Ok(Self::Unknown {
                space: name.clone(),
                rgb: rgb(components)?,
                alpha,
            }),
        }
    }

    /// Opaque sRGB color from unit components.
    pub fn srgb(r: f64, g: f64, b: f64) -> Self {
        Self::Srgb {
            rgb: [r, g, b],
            alpha: 1.0,
        }
    }

    /// Color space tag of this specifier.
    pub fn space(&self) -> ColorSpace {
        match self {
            Self::Srgb { .. } => ColorSpace::ExtendedSrgb,
            Self::DisplayP3 { .. } => ColorSpace::DisplayP3,
            Self::Gray { .. } => ColorSpace::ExtendedGray,
            Self::Unknown { space, .. } => ColorSpace::Unknown(space.clone()),
        }
    }

    /// Convert to canonical 8-bit RGBA.
    pub fn to_rgba(&self) -> Color {
        match self {
            Self::Srgb { rgb, alpha } => srgb_to_color(*rgb, *alpha),
            Self::DisplayP3 { rgb, alpha } => {
                let mut out = [0.0; 3];
                for (row, o) in P3_TO_SRGB.iter().zip(out.iter_mut()) {
                    *o = (row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]).clamp(0.0, 1.0);
                }
                srgb_to_color(out, *alpha)
            }
            Self::Gray { white, alpha } => {
                let v = unit_to_u8(*white);
                Color {
                    r: v,
                    g: v,
                    b: v,
                    a: *alpha,
                }
            }
            Self::Unknown { space, rgb, alpha } => {
                tracing::warn!(space = %space, "unknown color space, falling back to sRGB");
                srgb_to_color(*rgb, *alpha)
            }
        }
    }

    /// Parse leniently: malformed input is logged and replaced by opaque black sRGB.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|err| {
            tracing::warn!(spec = s, error = %err, "malformed color specifier, using black");
            Self::srgb(0.0, 0.0, 0.0)
        })
    }
}

fn srgb_to_color(rgb: [f64; 3], alpha: f64) -> Color {
    Color {
        r: unit_to_u8(rgb[0]),
        g: unit_to_u8(rgb[1]),
        b: unit_to_u8(rgb[2]),
        a: alpha,
    }
}

impl FromStr for ColorSpecifier {
    type Err = IconError;

    /// Parse `"<space>:<c1>,<c2>,<c3>[,<alpha>]"`. Gray also takes `"extended-gray:<v>[,<alpha>]"`.
    fn from_str(s: &str) -> IconResult<Self> {
        let (tag, values) = s
            .split_once(':')
            .ok_or_else(|| IconError::color(format!("missing color space in '{s}'")))?;
        let space = ColorSpace::parse(tag.trim());
        let values = values
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .map_err(|_| IconError::color(format!("invalid component '{v}' in '{s}'")))
            })
            .collect::<IconResult<Vec<f64>>>()?;

        // Gray also accepts the RGB-shaped form; only the first value and alpha count.
        if space == ColorSpace::ExtendedGray {
            let (white, alpha) = match values.as_slice() {
                [v] | [v, _, _] => (*v, 1.0),
                [v, a] | [v, _, _, a] => (*v, *a),
                _ => {
                    return Err(IconError::color(format!(
                        "extended-gray expects 1, 2, 3 or 4 values, got {}",
                        values.len()
                    )));
                }
            };
            return Self::new(space, &[white], alpha);
        }

        let channels = 3;
        let (components, alpha) = match values.len() {
            n if n == channels => (&values[..], 1.0),
            n if n == channels + 1 => (&values[..channels], values[channels]),
            n => {
                return Err(IconError::color(format!(
                    "{} expects {} or {} values, got {n}",
                    space.tag(),
                    channels,
                    channels + 1
                )));
            }
        };
        Self::new(space, components, alpha)
    }
}

impl fmt::Display for ColorSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.space();
        match self {
            Self::Srgb { rgb, alpha }
            | Self::DisplayP3 { rgb, alpha }
            | Self::Unknown { rgb, alpha, .. } => write!(
                f,
                "{}:{},{},{},{}",
                tag.tag(),
                rgb[0],
                rgb[1],
                rgb[2],
                alpha
            ),
            Self::Gray { white, alpha } => write!(f, "{}:{},{}", tag.tag(), white, alpha),
        }
    }
}

impl serde::Serialize for ColorSpecifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ColorSpecifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&s))
    }
}

/// Canonical straight-alpha color: 8-bit channels, unit-float alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red, 0..=255.
    pub r: u8,
    /// Green, 0..=255.
    pub g: u8,
    /// Blue, 0..=255.
    pub b: u8,
    /// Alpha, nominally 0..=1.
    pub a: f64,
}

impl Color {
    /// Build a color from 8-bit channels and a unit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Lighter variant used as the top stop of an automatic gradient.
    ///
    /// Red and green are offset by fixed amounts and saturate at 255; blue and alpha are kept.
    pub fn lighten(self) -> Self {
        Self {
            r: self.r.saturating_add(LIGHTEN_R),
            g: self.g.saturating_add(LIGHTEN_G),
            b: self.b,
            a: self.a,
        }
    }

    /// Premultiplied RGBA8 form, alpha quantized to a byte.
    pub fn to_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, unit_to_u8(self.a))
    }

    /// CSS `rgba()` notation, as written into SVG `fill` attributes.
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/color.rs"]
mod tests;
