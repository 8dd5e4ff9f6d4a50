use crate::assets::specialize::AutomaticFillPolicy;
use crate::foundation::core::Canvas;
use crate::foundation::error::{IconError, IconResult};

/// Canonical output edge length in pixels.
pub const DEFAULT_SIZE: u32 = 2048;

/// Clip corner radius as a fraction of the canvas edge.
pub const CORNER_RADIUS_FACTOR: f64 = 0.305_909_26;

/// Options controlling a render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOpts {
    /// Square output edge length in pixels.
    pub size: u32,
    pub automatic_fill: AutomaticFillPolicy,
    /// Decode layer sources on the rayon pool before drawing.
    pub parallel_decode: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            automatic_fill: AutomaticFillPolicy::Preserve,
            parallel_decode: true,
        }
    }
}

impl RenderOpts {
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_automatic_fill(mut self, policy: AutomaticFillPolicy) -> Self {
        self.automatic_fill = policy;
        self
    }

    pub fn with_parallel_decode(mut self, parallel: bool) -> Self {
        self.parallel_decode = parallel;
        self
    }

    pub fn validate(&self) -> IconResult<()> {
        if self.size == 0 || self.size > u32::from(u16::MAX) {
            return Err(IconError::validation(format!(
                "size must be in 1..={}, got {}",
                u16::MAX,
                self.size
            )));
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::square(self.size)
    }

    /// Rounded-rect clip radius, `round(size * 0.30590926)`.
    pub fn corner_radius(&self) -> f64 {
        (f64::from(self.size) * CORNER_RADIUS_FACTOR).round()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/opts.rs"]
mod tests;
