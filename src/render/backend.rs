use crate::assets::decode::PreparedImage;
use crate::foundation::error::IconResult;
use crate::render::plan::RenderPlan;

/// A rendered icon as RGBA8 pixels.
///
/// Frames produced by the engine are premultiplied alpha; the flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl Frame {
    /// RGBA8 value at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Executes a compiled [`RenderPlan`] against decoded layer sources.
///
/// `sources` is indexed by [`crate::render::plan::SourceId`]; a `None` entry marks a source that
/// failed to decode, and every op referencing it is skipped.
pub trait RenderBackend {
    fn execute(&mut self, plan: &RenderPlan, sources: &[Option<PreparedImage>]) -> IconResult<()>;

    /// Output of the last [`RenderBackend::execute`].
    fn frame(&self) -> &Frame;
}
