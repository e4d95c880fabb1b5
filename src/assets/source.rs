use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::foundation::error::{ScrollError, ScrollResult};

/// Byte provider for frame URIs of the form `{location}/{frame}.{ext}`.
///
/// Implementations are called from loader threads.
pub trait AssetSource: Send + Sync {
    /// Fetch the raw encoded bytes behind `uri`.
    fn fetch(&self, uri: &str) -> ScrollResult<Vec<u8>>;
}

/// Serves URIs from a directory; the URI is treated as a path relative to `root`.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for DirSource {
    fn fetch(&self, uri: &str) -> ScrollResult<Vec<u8>> {
        let rel = normalize_uri_path(uri)?;
        let path = self.root.join(Path::new(&rel));
        std::fs::read(&path)
            .with_context(|| format!("read frame bytes from '{}'", path.display()))
            .map_err(ScrollError::from)
    }
}

/// In-memory source keyed by normalized URI.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    blobs: HashMap<String, Arc<Vec<u8>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` under `uri`.
    pub fn insert(&mut self, uri: &str, bytes: Vec<u8>) -> ScrollResult<()> {
        self.blobs.insert(normalize_uri_path(uri)?, Arc::new(bytes));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, uri: &str) -> ScrollResult<Vec<u8>> {
        let key = normalize_uri_path(uri)?;
        self.blobs
            .get(&key)
            .map(|b| b.as_ref().clone())
            .ok_or_else(|| ScrollError::asset(format!("no asset at '{uri}'")))
    }
}

/// Normalize a site-rooted frame URI into a relative path.
///
/// Uses `/` separators, drops a leading `/` and `.` segments, and rejects parent traversals
/// (`..`) and empty results.
pub fn normalize_uri_path(uri: &str) -> ScrollResult<String> {
    let s = uri.replace('\\', "/");
    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ScrollError::validation(format!(
                "asset uri '{uri}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ScrollError::validation(format!(
            "asset uri '{uri}' must contain a file name"
        )));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
