use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::core::{Affine, BezPath, Canvas};
use crate::foundation::error::{IconError, IconResult};
use crate::render::backend::{Frame, RenderBackend};
use crate::render::composite::{alpha_plane, composite_over_rgba8_premul, mask_apply_alpha_in_place};
use crate::render::fill::FillPaint;
use crate::render::placement::Placement;
use crate::render::plan::{ClipShape, DrawOp, LayerDraw, RenderPlan, ShadowDraw, SourceId};
use crate::render::shadow::ShadowBuffer;
use crate::render::state::{DrawState, DrawStateStack};

/// CPU backend built on `vello_cpu`.
///
/// Geometry (clip outline, placed images) is rasterized by `vello_cpu`; compositing onto the
/// output surface runs through the premultiplied RGBA8 kernels in [`crate::render::composite`].
pub struct CpuBackend {
    surface: Frame,
    clip: Option<Vec<u8>>,
    states: DrawStateStack,
    ctx: Option<vello_cpu::RenderContext>,
    // Shadows and the layer itself draw the same placed source back to back.
    last_layer: Option<(SourceId, Vec<u8>)>,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    pub fn new() -> Self {
        Self {
            surface: Frame {
                premultiplied: true,
                ..Frame::default()
            },
            clip: None,
            states: DrawStateStack::new(),
            ctx: None,
            last_layer: None,
        }
    }

    /// Coverage plane of the last installed clip, one byte per pixel.
    pub fn clip_plane(&self) -> Option<&[u8]> {
        self.clip.as_deref()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> IconResult<R>,
    ) -> IconResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn reset_surface(&mut self, canvas: Canvas) -> IconResult<()> {
        let len = canvas.rgba8_len()?;
        self.surface.width = canvas.width;
        self.surface.height = canvas.height;
        self.surface.premultiplied = true;
        self.surface.data.clear();
        self.surface.data.resize(len, 0);
        self.clip = None;
        self.last_layer = None;
        Ok(())
    }

    fn install_clip(&mut self, shape: &ClipShape, canvas: Canvas) -> IconResult<()> {
        let plane = self.clip_coverage(shape, canvas)?;
        self.clip = Some(plane);
        Ok(())
    }

    pub(crate) fn clip_coverage(&mut self, shape: &ClipShape, canvas: Canvas) -> IconResult<Vec<u8>> {
        let (w, h) = canvas.dims_u16()?;
        let path = bezpath_to_cpu(&shape.path(canvas));
        let pixmap = self.with_ctx_mut(w, h, |_, ctx| {
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            ctx.fill_path(&path);
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })?;
        Ok(alpha_plane(pixmap.data_as_u8_slice()))
    }

    /// Draw `image` into a transparent canvas-sized buffer at `placement`, or 1:1 at its own
    /// canvas rectangle when it was rendered already placed.
    fn render_source(
        &mut self,
        image: &PreparedImage,
        placement: &Placement,
        canvas: Canvas,
    ) -> IconResult<Vec<u8>> {
        let (w, h) = canvas.dims_u16()?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap_from_premul_bytes(
                &image.rgba8_premul,
                image.width,
                image.height,
            )?)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let transform = match image.canvas_rect {
            Some(rect) => Affine::translate((rect.x0, rect.y0)),
            None => placement.transform_for(image.width, image.height),
        };
        let (iw, ih) = (f64::from(image.width), f64::from(image.height));

        let pixmap = self.with_ctx_mut(w, h, |_, ctx| {
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })?;
        Ok(pixmap.data_as_u8_slice().to_vec())
    }

    fn placed_layer(
        &mut self,
        id: SourceId,
        placement: &Placement,
        canvas: Canvas,
        sources: &[Option<PreparedImage>],
    ) -> IconResult<Option<Vec<u8>>> {
        if let Some((cached, bytes)) = &self.last_layer
            && *cached == id
        {
            return Ok(Some(bytes.clone()));
        }
        let Some(image) = sources.get(id.0 as usize).and_then(Option::as_ref) else {
            return Ok(None);
        };
        let bytes = self.render_source(image, placement, canvas)?;
        self.last_layer = Some((id, bytes.clone()));
        Ok(Some(bytes))
    }

    fn apply_clip(&self, rgba: &mut [u8]) -> IconResult<()> {
        match &self.clip {
            Some(plane) => mask_apply_alpha_in_place(rgba, plane),
            None => Ok(()),
        }
    }

    /// Composite `src` onto the surface using the current draw state.
    fn composite(&mut self, src: &[u8]) -> IconResult<()> {
        let state = self.states.current();
        composite_over_rgba8_premul(&mut self.surface.data, src, state.opacity, state.blend)
    }

    fn exec_background(&mut self, paint: &FillPaint, canvas: Canvas) -> IconResult<()> {
        let mut bytes = paint.rasterize(canvas)?;
        self.apply_clip(&mut bytes)?;
        self.composite(&bytes)
    }

    fn exec_shadow(
        &mut self,
        draw: &ShadowDraw,
        canvas: Canvas,
        sources: &[Option<PreparedImage>],
    ) -> IconResult<()> {
        let Some(layer) = self.placed_layer(draw.source, &draw.placement, canvas, sources)? else {
            return Ok(());
        };
        let coverage = alpha_plane(&layer);
        let mut buffer = ShadowBuffer::synthesize(&coverage, canvas, &draw.pass)?;
        buffer.cover_with(&layer)?;
        self.apply_clip(&mut buffer.rgba8_premul)?;

        let state = DrawState::with_opacity(draw.pass.composite_alpha as f32);
        let states = &mut self.states;
        let surface = &mut self.surface.data;
        states.scoped(state, |s| {
            let cur = s.current();
            composite_over_rgba8_premul(surface, &buffer.rgba8_premul, cur.opacity, cur.blend)
        })
    }

    fn exec_layer(
        &mut self,
        draw: &LayerDraw,
        canvas: Canvas,
        sources: &[Option<PreparedImage>],
    ) -> IconResult<()> {
        let Some(mut layer) = self.placed_layer(draw.source, &draw.placement, canvas, sources)?
        else {
            tracing::debug!(layer = %draw.name, "layer source unavailable, skipping");
            return Ok(());
        };
        self.apply_clip(&mut layer)?;

        let states = &mut self.states;
        let surface = &mut self.surface.data;
        states.scoped(DrawState::with_blend(draw.blend), |s| {
            let cur = s.current();
            composite_over_rgba8_premul(surface, &layer, cur.opacity, cur.blend)
        })
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(skip_all, fields(ops = plan.ops.len(), sources = sources.len()))]
    fn execute(&mut self, plan: &RenderPlan, sources: &[Option<PreparedImage>]) -> IconResult<()> {
        if sources.len() != plan.sources.len() {
            return Err(IconError::render(format!(
                "plan has {} sources but {} were prepared",
                plan.sources.len(),
                sources.len()
            )));
        }
        let canvas = plan.canvas;
        self.reset_surface(canvas)?;

        for op in &plan.ops {
            match op {
                DrawOp::Clear => self.surface.data.fill(0),
                DrawOp::Clip(shape) => self.install_clip(shape, canvas)?,
                DrawOp::Background(paint) => self.exec_background(paint, canvas)?,
                DrawOp::Shadow(draw) => self.exec_shadow(draw, canvas, sources)?,
                DrawOp::Layer(draw) => self.exec_layer(draw, canvas, sources)?,
            }
        }
        self.last_layer = None;
        Ok(())
    }

    fn frame(&self) -> &Frame {
        &self.surface
    }
}

/// Wrap premultiplied RGBA8 bytes in a `vello_cpu` pixmap.
pub(crate) fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> IconResult<vello_cpu::Pixmap> {
    let (w, h) = Canvas { width, height }.dims_u16()?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(IconError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
