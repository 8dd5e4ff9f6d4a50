use std::borrow::Cow;
use std::ops::Range;

use crate::scene::color::Color;
use crate::scene::model::Layer;

/// Elements whose `fill` attribute is rewritten by a solid override.
const FILLABLE: [&str; 7] = ["path", "rect", "circle", "ellipse", "polygon", "polyline", "g"];

/// Color used for `none`/`automatic` specializations under [`AutomaticFillPolicy::ForceOpaqueBlack`].
const FORCED_BLACK: Color = Color::rgba(0, 0, 0, 1.0);

/// How a `none`/`automatic` fill specialization is honored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AutomaticFillPolicy {
    /// Keep the asset's own colors.
    #[default]
    Preserve,
    /// Repaint fillable shapes opaque black.
    ForceOpaqueBlack,
}

/// Fill change to apply to a vector asset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FillOverride {
    Preserve,
    Solid(Color),
}

impl FillOverride {
    /// Resolve the override requested by `layer`.
    ///
    /// A first fill specialization of `none` or `automatic` wins over any solid fill; otherwise
    /// the layer's solid fill (if any) is applied.
    pub fn for_layer(layer: &Layer, policy: AutomaticFillPolicy) -> Self {
        if let Some("none" | "automatic") = layer.first_specialization_keyword() {
            return match policy {
                AutomaticFillPolicy::Preserve => Self::Preserve,
                AutomaticFillPolicy::ForceOpaqueBlack => Self::Solid(FORCED_BLACK),
            };
        }
        match layer.solid_fill() {
            Some(spec) => Self::Solid(spec.to_rgba()),
            None => Self::Preserve,
        }
    }
}

/// Apply `fill` to vector markup, returning the input untouched when nothing changes.
///
/// Every fillable element gets `fill="rgba(r, g, b, a)"`, replacing an existing `fill`
/// attribute in place or inserting one after the tag name. The rest of the markup is kept
/// byte for byte. Markup that fails to parse is logged and returned unchanged.
pub fn specialize<'a>(markup: &'a str, fill: FillOverride) -> Cow<'a, str> {
    let FillOverride::Solid(color) = fill else {
        return Cow::Borrowed(markup);
    };

    let doc = match roxmltree::Document::parse(markup) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(error = %err, "vector markup parse failed, keeping original colors");
            return Cow::Borrowed(markup);
        }
    };

    let css = color.to_css();
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    for node in doc.descendants().filter(|n| n.is_element()) {
        if !FILLABLE.contains(&node.tag_name().name()) {
            continue;
        }
        let existing = node
            .attributes()
            .find(|a| a.name() == "fill" && a.namespace().is_none());
        match existing {
            Some(attr) => edits.push((attr.range_value(), css.clone())),
            None => {
                let at = tag_name_end(markup, node.range().start);
                edits.push((at..at, format!(" fill=\"{css}\"")));
            }
        }
    }

    if edits.is_empty() {
        return Cow::Borrowed(markup);
    }

    edits.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
    let mut out = markup.to_owned();
    for (range, text) in edits {
        out.replace_range(range, &text);
    }
    Cow::Owned(out)
}

/// Byte offset just past the qualified tag name of the start tag at `start` (`<` position).
fn tag_name_end(markup: &str, start: usize) -> usize {
    let name_start = start + 1;
    let len = markup[name_start..]
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(markup.len() - name_start);
    name_start + len
}

#[cfg(test)]
#[path = "../../tests/unit/assets/specialize.rs"]
mod tests;
