use crate::render::composite::BlendMode;

/// Compositing state applied to a single draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawState {
    pub blend: BlendMode,
    pub opacity: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            blend: BlendMode::SourceOver,
            opacity: 1.0,
        }
    }
}

impl DrawState {
    pub fn with_blend(blend: BlendMode) -> Self {
        Self {
            blend,
            ..Self::default()
        }
    }

    pub fn with_opacity(opacity: f32) -> Self {
        Self {
            opacity,
            ..Self::default()
        }
    }
}

/// Stack of draw states. The bottom entry is the default state and is never popped.
///
/// State changes only exist inside [`DrawStateStack::scoped`], so a draw can never leak its
/// blend mode or opacity to the next one.
#[derive(Clone, Debug)]
pub struct DrawStateStack {
    stack: Vec<DrawState>,
}

impl Default for DrawStateStack {
    fn default() -> Self {
        Self {
            stack: vec![DrawState::default()],
        }
    }
}

impl DrawStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// State in effect for the next draw.
    pub fn current(&self) -> DrawState {
        self.stack.last().copied().unwrap_or_default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Run `f` with `state` pushed, popping it afterwards regardless of `f`'s result.
    pub fn scoped<R>(&mut self, state: DrawState, f: impl FnOnce(&mut Self) -> R) -> R {
        self.stack.push(state);
        let out = f(self);
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/state.rs"]
mod tests;
