//! Product catalog loading from CSV.

use std::io::Read;
use std::path::Path;

use crate::types::{CatalogItem, ShopError, ShopResult};

/// An ordered, index-addressable product catalog.
///
/// Row order is significant: it is the tie-break when two rows score equally.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Create a catalog from rows in their original order.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Load a catalog from a CSV file with a `Name, ReviewCount, Brand, ImageURL, Rating, Tags` header.
    pub fn from_path(path: impl AsRef<Path>) -> ShopResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ShopError::CatalogNotFound(path.display().to_string()));
        }

        let file = std::fs::File::open(path)?;
        let catalog = Self::from_reader(file)?;
        tracing::info!(
            "Loaded catalog {} ({} products)",
            path.display(),
            catalog.len()
        );
        Ok(catalog)
    }

    /// Load a catalog from any CSV reader. Extra columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> ShopResult<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = reader.headers()?.clone();
        if !headers.iter().any(|h| h == "Name") {
            return Err(ShopError::InvalidInput(format!(
                "Catalog header has no 'Name' column: {:?}",
                headers.iter().collect::<Vec<_>>()
            )));
        }

        let mut items = Vec::new();
        let mut skipped = 0usize;

        for (row, result) in reader.deserialize::<CatalogItem>().enumerate() {
            match result {
                Ok(item) => items.push(item),
                Err(e) => {
                    // +2: one for the header line, one for 1-based numbering
                    tracing::warn!("Skipping catalog row {}: {e}", row + 2);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {skipped} malformed catalog rows");
        }

        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// Index of the first row with exactly this name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    /// First row with exactly this name.
    pub fn find(&self, name: &str) -> Option<&CatalogItem> {
        self.position(name).and_then(|i| self.items.get(i))
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> &[CatalogItem] {
        &self.items[..n.min(self.items.len())]
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Tag text of every row, in catalog order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.tags.as_str())
    }
}

impl From<Vec<CatalogItem>> for Catalog {
    fn from(items: Vec<CatalogItem>) -> Self {
        Self::new(items)
    }
}
