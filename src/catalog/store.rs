use std::path::Path;

use anyhow::Context;

use crate::{
    catalog::model::{ProductRecord, ensure_unique_ids},
    foundation::core::FrameIndex,
    foundation::error::{ScrollError, ScrollResult},
};

/// Still-image encoding of the frame files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    /// `.jpg` files, always available.
    #[default]
    Jpg,
    /// `.webp` files, used when the host can decode them.
    Webp,
}

impl FrameFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// WebP when supported, JPEG otherwise.
    pub fn preferred(webp_supported: bool) -> Self {
        if webp_supported { Self::Webp } else { Self::Jpg }
    }
}

/// Address of one frame: `{location}/{frame}.{ext}`.
pub fn frame_uri(location: &str, frame: FrameIndex, format: FrameFormat) -> String {
    let base = location.trim_end_matches('/');
    format!("{base}/{}.{}", frame.0, format.extension())
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CatalogueDoc {
    List(Vec<ProductRecord>),
    Wrapped { products: Vec<ProductRecord> },
}

/// Ordered, validated, read-only list of products.
#[derive(Clone, Debug)]
pub struct Catalogue {
    products: Vec<ProductRecord>,
}

impl Catalogue {
    /// Validate records and keep their order.
    pub fn new(products: Vec<ProductRecord>) -> ScrollResult<Self> {
        if products.is_empty() {
            return Err(ScrollError::validation(
                "catalogue must contain at least one product",
            ));
        }
        for p in &products {
            p.validate()?;
        }
        ensure_unique_ids(&products)?;
        Ok(Self { products })
    }

    /// Parse either a bare JSON array or `{ "products": [...] }`.
    pub fn from_json_str(s: &str) -> ScrollResult<Self> {
        let doc: CatalogueDoc = serde_json::from_str(s)?;
        let products = match doc {
            CatalogueDoc::List(v) => v,
            CatalogueDoc::Wrapped { products } => products,
        };
        Self::new(products)
    }

    /// Read and parse a catalogue file.
    pub fn from_path(path: &Path) -> ScrollResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read catalogue '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Always `false`; construction rejects empty catalogues.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products in catalogue order.
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    /// Product at `index`.
    pub fn get(&self, index: usize) -> ScrollResult<&ProductRecord> {
        self.products.get(index).ok_or_else(|| {
            ScrollError::validation(format!(
                "product index {index} out of range (catalogue has {})",
                self.products.len()
            ))
        })
    }

    /// Product with `id`.
    pub fn by_id(&self, id: &str) -> ScrollResult<&ProductRecord> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ScrollError::validation(format!("unknown product id '{id}'")))
    }

    /// Position of `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    /// Following index, wrapping to the first product.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.products.len()
    }

    /// Preceding index, wrapping to the last product.
    pub fn prev_index(&self, index: usize) -> usize {
        let n = self.products.len();
        (index % n + n - 1) % n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/store.rs"]
mod tests;
