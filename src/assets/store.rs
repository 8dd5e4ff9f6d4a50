use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Raw asset content keyed by file name in an [`AssetStore`].
pub enum Asset {
    /// Vector markup (SVG text).
    Vector(String),
    /// Encoded raster bytes (PNG, JPEG, GIF).
    Raster(Vec<u8>),
}

impl Asset {
    /// Classify a file by extension. `.svg` is matched exactly; raster extensions ignore case.
    ///
    /// Returns `Ok(None)` for files that are not icon assets.
    pub fn from_file(name: &str, bytes: Vec<u8>) -> Result<Option<Self>, std::string::FromUtf8Error> {
        if name.ends_with(".svg") {
            return String::from_utf8(bytes).map(|s| Some(Self::Vector(s)));
        }
        match extension(name).as_deref() {
            Some("png" | "jpg" | "jpeg" | "gif") => Ok(Some(Self::Raster(bytes))),
            _ => Ok(None),
        }
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        match self {
            Self::Vector(s) => s.len(),
            Self::Raster(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lookup of assets by case-sensitive file name.
///
/// The composition engine only ever asks for assets of visible layers.
pub trait AssetSource {
    /// Asset registered under `name`, if any.
    fn get(&self, name: &str) -> Option<&Asset>;
}

/// In-memory [`AssetSource`].
#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    assets: BTreeMap<String, Asset>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an asset.
    pub fn insert(&mut self, name: impl Into<String>, asset: Asset) -> Option<Asset> {
        self.assets.insert(name.into(), asset)
    }

    /// Register vector markup under `name`.
    pub fn insert_vector(&mut self, name: impl Into<String>, markup: impl Into<String>) {
        self.insert(name, Asset::Vector(markup.into()));
    }

    /// Register encoded raster bytes under `name`.
    pub fn insert_raster(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.insert(name, Asset::Raster(bytes.into()));
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }
}

impl AssetSource for AssetStore {
    fn get(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }
}

impl<S: AssetSource + ?Sized> AssetSource for &S {
    fn get(&self, name: &str) -> Option<&Asset> {
        (**self).get(name)
    }
}

/// MIME type for an asset file name, by extension. Unknown extensions map to `image/png`.
pub fn mime_for_name(name: &str) -> &'static str {
    match extension(name).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}

fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
