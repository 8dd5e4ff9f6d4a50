use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;

use crate::assets::store::mime_for_name;
use crate::foundation::core::Rect;
use crate::foundation::error::{IconError, IconResult};

/// Natural size used for vector assets whose root `width`/`height` is missing, zero or unparsable.
pub const DEFAULT_VECTOR_EXTENT: u32 = 120;

#[derive(Clone, Debug)]
/// Decoded layer source in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Canvas rectangle the pixels cover 1:1 when they were rendered already placed.
    pub canvas_rect: Option<Rect>,
}

#[derive(Clone, Debug)]
/// Vector asset parsed into a `usvg` tree.
pub struct PreparedSvg {
    pub tree: Arc<usvg::Tree>,
}

fn format_hint(name: &str) -> Option<image::ImageFormat> {
    image::ImageFormat::from_mime_type(mime_for_name(name))
}

fn reader<'a>(name: &str, bytes: &'a [u8]) -> IconResult<image::ImageReader<Cursor<&'a [u8]>>> {
    let mut reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")?;
    if reader.format().is_none() {
        if let Some(hint) = format_hint(name) {
            reader.set_format(hint);
        }
    }
    Ok(reader)
}

/// Decode an encoded raster asset into premultiplied RGBA8.
///
/// The format is sniffed from the content; the file extension is only a fallback.
pub fn decode_image(name: &str, bytes: &[u8]) -> IconResult<PreparedImage> {
    let dyn_img = reader(name, bytes)?
        .decode()
        .with_context(|| format!("decode image '{name}'"))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(IconError::decode(format!("image '{name}' has zero extent")));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
        canvas_rect: None,
    })
}

/// Intrinsic pixel size of an encoded raster asset, read from its header only.
pub fn raster_dimensions(name: &str, bytes: &[u8]) -> IconResult<(u32, u32)> {
    let (w, h) = reader(name, bytes)?
        .into_dimensions()
        .with_context(|| format!("read dimensions of '{name}'"))?;
    if w == 0 || h == 0 {
        return Err(IconError::decode(format!("image '{name}' has zero extent")));
    }
    Ok((w, h))
}

pub fn parse_svg(markup: &str) -> IconResult<PreparedSvg> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(markup.as_bytes(), &opts).context("parse svg tree")?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

/// Natural size of vector markup from the root element's `width`/`height` attributes.
///
/// Each attribute is read with leading-integer semantics (`"64px"` is 64, `"63.9"` is 63).
/// Missing, unparsable or zero values fall back to [`DEFAULT_VECTOR_EXTENT`] independently.
/// Markup that is not well-formed XML yields the fallback for both axes.
pub fn svg_natural_size(markup: &str) -> (u32, u32) {
    let Ok(doc) = roxmltree::Document::parse(markup) else {
        return (DEFAULT_VECTOR_EXTENT, DEFAULT_VECTOR_EXTENT);
    };
    let root = doc.root_element();
    let extent = |attr: &str| {
        root.attribute(attr)
            .and_then(leading_int)
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_VECTOR_EXTENT)
    };
    (extent("width"), extent("height"))
}

/// Leading integer of `s` after optional whitespace and sign. Negative values yield `None`.
fn leading_int(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let (neg, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let v = rest[..digits].parse::<u64>().ok()?;
    if neg && v != 0 {
        return None;
    }
    u32::try_from(v).ok()
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
