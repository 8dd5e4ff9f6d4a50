use serde::{Deserialize, Serialize};

use crate::foundation::error::{IconError, IconResult};
use crate::scene::color::ColorSpecifier;

/// Root of an icon description: a background fill plus ordered groups of layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconDocument {
    /// Background fill. Absent means [`Fill::Automatic`].
    #[serde(default)]
    pub fill: Fill,
    /// Groups in render order.
    pub groups: Vec<Group>,
}

impl IconDocument {
    /// Parse an `icon.json` document.
    pub fn from_json(s: &str) -> IconResult<Self> {
        serde_json::from_str(s).map_err(|e| IconError::serde(format!("icon document: {e}")))
    }

    /// Parse an `icon.json` document from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> IconResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| IconError::serde(format!("icon document: {e}")))
    }
}

/// Ordered collection of layers sharing an optional shadow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Layers in declaration order. The last-declared layer paints first.
    #[serde(default)]
    pub layers: Vec<Layer>,
    /// Shadow applied beneath every visible layer of the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<ShadowSpec>,
}

/// One positioned image element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Layer {
    #[serde(default)]
    pub name: String,
    /// Asset key, matched case-sensitively.
    #[serde(default)]
    pub image_name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LayerPosition>,
    /// Only the `solid` form affects rendering (as a vector fill override).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_specializations: Option<Vec<FillSpecialization>>,
}

impl Layer {
    /// Layer scale. Absent, zero or non-finite values mean 1.
    pub fn scale(&self) -> f64 {
        self.position
            .as_ref()
            .and_then(|p| p.scale)
            .filter(|s| s.is_finite() && *s != 0.0)
            .unwrap_or(1.0)
    }

    /// Translation in points, `[0, 0]` when absent.
    pub fn translation_in_points(&self) -> [f64; 2] {
        self.position
            .as_ref()
            .and_then(|p| p.translation_in_points)
            .unwrap_or([0.0, 0.0])
    }

    /// Solid fill override requested for vector assets, if any.
    pub fn solid_fill(&self) -> Option<&ColorSpecifier> {
        match &self.fill {
            Some(Fill::Solid(spec)) => Some(spec),
            _ => None,
        }
    }

    /// Value of the first fill specialization when it is a plain keyword.
    pub fn first_specialization_keyword(&self) -> Option<&str> {
        self.fill_specializations
            .as_ref()
            .and_then(|s| s.first())
            .and_then(|s| s.value.as_str())
    }
}

/// Placement inputs of a layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayerPosition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_in_points: Option<[f64; 2]>,
}

/// Per-appearance fill override entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillSpecialization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    pub value: serde_json::Value,
}

/// Group shadow settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl ShadowSpec {
    pub const DEFAULT_OPACITY: f64 = 0.5;

    /// Configured opacity, [`Self::DEFAULT_OPACITY`] when absent.
    pub fn opacity(&self) -> f64 {
        self.opacity.unwrap_or(Self::DEFAULT_OPACITY)
    }
}

/// Background paint style.
///
/// JSON forms: `"automatic"`, `"none"`, `{"automatic-gradient": c}`, `{"linear-gradient": [c..]}`,
/// `{"solid": c}`. Unrecognized forms are logged and treated as automatic.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Fill {
    #[default]
    Automatic,
    AutomaticGradient(ColorSpecifier),
    LinearGradient(Vec<ColorSpecifier>),
    Solid(ColorSpecifier),
    None,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FillRepr {
    Keyword(String),
    AutomaticGradient {
        #[serde(rename = "automatic-gradient")]
        automatic_gradient: ColorSpecifier,
    },
    LinearGradient {
        #[serde(rename = "linear-gradient")]
        linear_gradient: Vec<ColorSpecifier>,
    },
    Solid {
        solid: ColorSpecifier,
    },
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for Fill {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match FillRepr::deserialize(deserializer)? {
            FillRepr::Keyword(k) => match k.as_str() {
                "automatic" => Fill::Automatic,
                "none" => Fill::None,
                other => {
                    tracing::warn!(fill = other, "unknown fill keyword, using automatic");
                    Fill::Automatic
                }
            },
            FillRepr::AutomaticGradient { automatic_gradient } => {
                Fill::AutomaticGradient(automatic_gradient)
            }
            FillRepr::LinearGradient { linear_gradient } => Fill::LinearGradient(linear_gradient),
            FillRepr::Solid { solid } => Fill::Solid(solid),
            FillRepr::Other(v) => {
                tracing::warn!(fill = %v, "unrecognized fill, using automatic");
                Fill::Automatic
            }
        })
    }
}

impl Serialize for Fill {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let repr = match self {
            Fill::Automatic => FillRepr::Keyword("automatic".to_owned()),
            Fill::None => FillRepr::Keyword("none".to_owned()),
            Fill::AutomaticGradient(c) => FillRepr::AutomaticGradient {
                automatic_gradient: c.clone(),
            },
            Fill::LinearGradient(cs) => FillRepr::LinearGradient {
                linear_gradient: cs.clone(),
            },
            Fill::Solid(c) => FillRepr::Solid { solid: c.clone() },
        };
        repr.serialize(serializer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
