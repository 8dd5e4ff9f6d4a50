use crate::assets::decode::{raster_dimensions, svg_natural_size};
use crate::assets::specialize::FillOverride;
use crate::assets::store::{Asset, AssetSource};
use crate::foundation::core::{BezPath, Canvas, Point};
use crate::foundation::error::IconResult;
use crate::render::composite::BlendMode;
use crate::render::fill::FillPaint;
use crate::render::opts::RenderOpts;
use crate::render::placement::{Placement, place};
use crate::render::shadow::{ShadowParams, shadow_passes};
use crate::scene::model::IconDocument;

#[derive(Clone, Debug)]
/// Ordered draw operations for one render, plus the layer sources they reference.
///
/// Ops execute strictly in order. Sources are decoded before execution and may be prepared in
/// parallel; each visible layer owns exactly one source.
pub struct RenderPlan {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
    pub sources: Vec<LayerSource>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Reset the output surface to transparent.
    Clear,
    /// Install the rounded-rect clip used by every later draw.
    Clip(ClipShape),
    /// Paint the background inside the clip.
    Background(FillPaint),
    /// One shadow pass beneath a layer.
    Shadow(ShadowDraw),
    /// The layer image itself.
    Layer(LayerDraw),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Index into [`RenderPlan::sources`].
pub struct SourceId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
/// Position of a layer in the document, in declaration order.
pub struct LayerRef {
    pub group: usize,
    pub layer: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerSource {
    pub image_name: String,
    pub kind: SourceKind,
    /// Natural size the placement was computed from.
    pub natural_size: (u32, u32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SourceKind {
    /// Vector markup, specialized with `fill` and rasterized at the placed size.
    Vector { fill: FillOverride },
    /// Encoded raster, decoded at its intrinsic size.
    Raster,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowDraw {
    pub target: LayerRef,
    pub source: SourceId,
    pub placement: Placement,
    pub pass: ShadowParams,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerDraw {
    pub target: LayerRef,
    pub name: String,
    pub source: SourceId,
    pub placement: Placement,
    pub blend: BlendMode,
}

/// Rounded-rect clip covering the whole canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipShape {
    pub radius: f64,
}

impl ClipShape {
    /// Outline with straight edges and quadratic corners whose control points are the canvas
    /// corners.
    pub fn path(&self, canvas: Canvas) -> BezPath {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let r = self.radius;

        let mut p = BezPath::new();
        p.move_to(Point::new(r, 0.0));
        p.line_to(Point::new(w - r, 0.0));
        p.quad_to(Point::new(w, 0.0), Point::new(w, r));
        p.line_to(Point::new(w, h - r));
        p.quad_to(Point::new(w, h), Point::new(w - r, h));
        p.line_to(Point::new(r, h));
        p.quad_to(Point::new(0.0, h), Point::new(0.0, h - r));
        p.line_to(Point::new(0.0, r));
        p.quad_to(Point::new(0.0, 0.0), Point::new(r, 0.0));
        p.close_path();
        p
    }
}

impl RenderPlan {
    pub fn source(&self, id: SourceId) -> Option<&LayerSource> {
        self.sources.get(id.0 as usize)
    }

    /// Layer draws in execution order.
    pub fn layer_draws(&self) -> impl Iterator<Item = &LayerDraw> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Layer(l) => Some(l),
            _ => None,
        })
    }

    /// The clip shape installed by this plan.
    pub fn clip(&self) -> Option<ClipShape> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Clip(c) => Some(*c),
            _ => None,
        })
    }
}

/// Resolve `doc` against `assets` into an ordered [`RenderPlan`].
///
/// Groups are visited in document order and layers in reverse declaration order. Hidden layers
/// are skipped before any asset lookup; layers whose asset is missing or whose raster header
/// cannot be read are skipped with a log entry.
#[tracing::instrument(skip_all, fields(groups = doc.groups.len(), size = opts.size))]
pub fn compile_document<A>(
    doc: &IconDocument,
    assets: &A,
    opts: &RenderOpts,
) -> IconResult<RenderPlan>
where
    A: AssetSource + ?Sized,
{
    opts.validate()?;
    let canvas = opts.canvas();

    let mut plan = RenderPlan {
        canvas,
        ops: vec![
            DrawOp::Clear,
            DrawOp::Clip(ClipShape {
                radius: opts.corner_radius(),
            }),
            DrawOp::Background(FillPaint::resolve(&doc.fill)),
        ],
        sources: Vec::new(),
    };

    for (gi, group) in doc.groups.iter().enumerate() {
        for (li, layer) in group.layers.iter().enumerate().rev() {
            if layer.hidden {
                tracing::debug!(group = gi, layer = %layer.name, "skipping hidden layer");
                continue;
            }
            let Some(asset) = assets.get(&layer.image_name) else {
                tracing::debug!(
                    group = gi,
                    layer = %layer.name,
                    image = %layer.image_name,
                    "skipping layer with missing asset"
                );
                continue;
            };

            let (kind, natural_size) = match asset {
                Asset::Vector(markup) => (
                    SourceKind::Vector {
                        fill: FillOverride::for_layer(layer, opts.automatic_fill),
                    },
                    svg_natural_size(markup),
                ),
                Asset::Raster(bytes) => match raster_dimensions(&layer.image_name, bytes) {
                    Ok(dims) => (SourceKind::Raster, dims),
                    Err(err) => {
                        tracing::warn!(
                            image = %layer.image_name,
                            error = %err,
                            "unreadable raster asset, skipping layer"
                        );
                        continue;
                    }
                },
            };

            let placement = place(
                f64::from(natural_size.0),
                f64::from(natural_size.1),
                layer.scale(),
                layer.translation_in_points(),
                canvas,
            );
            if !placement.is_drawable() {
                tracing::debug!(layer = %layer.name, ?placement, "skipping layer with empty placement");
                continue;
            }
            tracing::debug!(group = gi, layer = %layer.name, ?placement, "placed layer");

            let source = SourceId(plan.sources.len() as u32);
            plan.sources.push(LayerSource {
                image_name: layer.image_name.clone(),
                kind,
                natural_size,
            });

            let target = LayerRef {
                group: gi,
                layer: li,
            };
            if let Some(shadow) = &group.shadow {
                for pass in shadow_passes(shadow) {
                    plan.ops.push(DrawOp::Shadow(ShadowDraw {
                        target,
                        source,
                        placement,
                        pass,
                    }));
                }
            }
            plan.ops.push(DrawOp::Layer(LayerDraw {
                target,
                name: layer.name.clone(),
                source,
                placement,
                blend: BlendMode::for_layer(layer.blend_mode.as_deref()),
            }));
        }
    }

    Ok(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
