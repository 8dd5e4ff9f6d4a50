use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::assets::store::{Asset, AssetStore};
use crate::foundation::error::IconResult;
use crate::scene::model::IconDocument;

/// Document file name inside a bundle directory.
pub const DOCUMENT_FILE: &str = "icon.json";
/// Asset directory name inside a bundle directory.
pub const ASSETS_DIR: &str = "Assets";

/// An icon bundle loaded from disk: `icon.json` plus everything under `Assets/`.
#[derive(Clone, Debug)]
pub struct IconBundle {
    pub root: PathBuf,
    pub document: IconDocument,
    pub assets: AssetStore,
}

impl IconBundle {
    /// Load a bundle directory.
    ///
    /// A missing or unreadable `icon.json` is an error. A missing `Assets/` directory yields an
    /// empty store; files with unsupported extensions are skipped.
    pub fn open(dir: impl AsRef<Path>) -> IconResult<Self> {
        let root = dir.as_ref().to_path_buf();
        let doc_path = root.join(DOCUMENT_FILE);
        let bytes = std::fs::read(&doc_path)
            .with_context(|| format!("read icon document '{}'", doc_path.display()))?;
        let document = IconDocument::from_slice(&bytes)?;
        let assets = load_assets(&root.join(ASSETS_DIR))?;

        tracing::debug!(
            root = %root.display(),
            groups = document.groups.len(),
            assets = assets.len(),
            "loaded icon bundle"
        );
        Ok(Self {
            root,
            document,
            assets,
        })
    }
}

fn load_assets(dir: &Path) -> IconResult<AssetStore> {
    let mut store = AssetStore::new();
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "bundle has no asset directory");
        return Ok(store);
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("list assets in '{}'", dir.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("list assets in '{}'", dir.display()))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_owned) else {
            tracing::debug!(path = %path.display(), "skipping asset with non-utf8 name");
            continue;
        };
        let bytes =
            std::fs::read(&path).with_context(|| format!("read asset '{}'", path.display()))?;
        match Asset::from_file(&name, bytes) {
            Ok(Some(asset)) => {
                tracing::debug!(asset = %name, bytes = asset.len(), "loaded asset");
                store.insert(name, asset);
            }
            Ok(None) => tracing::debug!(asset = %name, "skipping unsupported asset file"),
            Err(err) => {
                tracing::warn!(asset = %name, error = %err, "vector asset is not utf-8, skipping");
            }
        }
    }
    Ok(store)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/bundle.rs"]
mod tests;
