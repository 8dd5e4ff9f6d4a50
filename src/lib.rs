//! Layered icon composition.
//!
//! An [`IconDocument`] describes a background fill and groups of layers, each layer referencing a
//! vector or raster asset by name. [`CompositionEngine`] compiles the document into a
//! [`RenderPlan`], decodes the referenced assets and draws them onto a square canvas clipped to a
//! rounded rect:
//!
//! - Load a bundle with [`IconBundle::open`] (or fill an [`AssetStore`] directly)
//! - Render with [`CompositionEngine::render`]
//! - Encode with [`export_png`]
#![forbid(unsafe_code)]

mod foundation;

/// Asset storage, decoding and vector fill specialization.
pub mod assets;
/// Planning, rasterization and compositing.
pub mod render;
/// Icon document model and color specifiers.
pub mod scene;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{IconError, IconResult};

pub use crate::assets::bundle::IconBundle;
pub use crate::assets::specialize::AutomaticFillPolicy;
pub use crate::assets::store::{Asset, AssetSource, AssetStore, mime_for_name};
pub use crate::render::backend::{Frame, RenderBackend};
pub use crate::render::composite::BlendMode;
pub use crate::render::engine::CompositionEngine;
pub use crate::render::export::export_png;
pub use crate::render::opts::RenderOpts;
pub use crate::render::plan::{DrawOp, RenderPlan, compile_document};
pub use crate::scene::color::{Color, ColorSpace, ColorSpecifier};
pub use crate::scene::model::{Fill, Group, IconDocument, Layer};
