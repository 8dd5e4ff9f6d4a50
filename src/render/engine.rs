use rayon::prelude::*;

use crate::assets::decode::{PreparedImage, decode_image, parse_svg};
use crate::assets::specialize::specialize;
use crate::assets::store::{Asset, AssetSource};
use crate::assets::svg_raster::{rasterize_svg_window, visible_window};
use crate::foundation::core::Canvas;
use crate::foundation::error::IconResult;
use crate::render::backend::{Frame, RenderBackend};
use crate::render::cpu::CpuBackend;
use crate::render::export::export_png;
use crate::render::opts::RenderOpts;
use crate::render::placement::Placement;
use crate::render::plan::{LayerSource, RenderPlan, SourceKind, compile_document};
use crate::scene::model::IconDocument;

/// Renders icon documents to frames.
///
/// The engine owns its backend, so repeated renders reuse the rasterizer's scratch state.
pub struct CompositionEngine {
    opts: RenderOpts,
    backend: CpuBackend,
}

impl CompositionEngine {
    pub fn new(opts: RenderOpts) -> IconResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            backend: CpuBackend::new(),
        })
    }

    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    /// Compile `doc` without rendering it.
    pub fn plan<A>(&self, doc: &IconDocument, assets: &A) -> IconResult<RenderPlan>
    where
        A: AssetSource + ?Sized,
    {
        compile_document(doc, assets, &self.opts)
    }

    /// Render `doc` to a premultiplied frame.
    ///
    /// Layer sources are decoded up front (on the rayon pool when
    /// [`RenderOpts::parallel_decode`] is set); drawing is sequential. A source that fails to
    /// decode is logged and its layer is skipped.
    #[tracing::instrument(skip_all, fields(size = self.opts.size))]
    pub fn render<A>(&mut self, doc: &IconDocument, assets: &A) -> IconResult<&Frame>
    where
        A: AssetSource + Sync + ?Sized,
    {
        let plan = self.plan(doc, assets)?;
        let sources = prepare_sources(&plan, assets, self.opts.parallel_decode);
        self.backend.execute(&plan, &sources)?;
        Ok(self.backend.frame())
    }

    /// Render `doc` and encode the result as PNG.
    pub fn render_png<A>(&mut self, doc: &IconDocument, assets: &A) -> IconResult<Vec<u8>>
    where
        A: AssetSource + Sync + ?Sized,
    {
        let opts = self.opts;
        let frame = self.render(doc, assets)?;
        export_png(frame, &opts)
    }
}

/// Decode every source referenced by `plan`, indexed by [`crate::render::plan::SourceId`].
pub fn prepare_sources<A>(plan: &RenderPlan, assets: &A, parallel: bool) -> Vec<Option<PreparedImage>>
where
    A: AssetSource + Sync + ?Sized,
{
    let jobs: Vec<(usize, Placement)> = plan
        .layer_draws()
        .map(|d| (d.source.0 as usize, d.placement))
        .collect();

    let run = |&(idx, placement): &(usize, Placement)| {
        let source = plan.sources.get(idx)?;
        let image = match prepare_source(source, &placement, plan.canvas, assets) {
            Ok(image) => image?,
            Err(err) => {
                tracing::warn!(image = %source.image_name, error = %err, "failed to prepare layer source");
                return None;
            }
        };
        Some((idx, image))
    };

    let prepared: Vec<(usize, PreparedImage)> = if parallel {
        jobs.par_iter().filter_map(run).collect()
    } else {
        jobs.iter().filter_map(run).collect()
    };

    let mut out = vec![None; plan.sources.len()];
    for (idx, image) in prepared {
        out[idx] = Some(image);
    }
    out
}

fn prepare_source<A>(
    source: &LayerSource,
    placement: &Placement,
    canvas: Canvas,
    assets: &A,
) -> IconResult<Option<PreparedImage>>
where
    A: AssetSource + ?Sized,
{
    let Some(asset) = assets.get(&source.image_name) else {
        return Ok(None);
    };
    let image = match (asset, source.kind) {
        (Asset::Vector(markup), SourceKind::Vector { fill }) => {
            let Some(window) = visible_window(placement.rect(), canvas) else {
                tracing::debug!(image = %source.image_name, "vector layer is off canvas");
                return Ok(None);
            };
            let markup = specialize(markup, fill);
            let svg = parse_svg(&markup)?;
            rasterize_svg_window(&svg, placement.rect(), window)?
        }
        (Asset::Raster(bytes), SourceKind::Raster) => decode_image(&source.image_name, bytes)?,
        _ => {
            tracing::warn!(image = %source.image_name, "asset kind changed since planning");
            return Ok(None);
        }
    };
    Ok(Some(image))
}

#[cfg(test)]
#[path = "../../tests/unit/render/engine.rs"]
mod tests;
