//! Catalog store.
//!
//! Records are loaded once from a JSON file at process start, cached for
//! the process lifetime and treated as read-only from then on.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use vera_common::CatalogItem;

/// In-memory catalog, immutable after construction.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    items: Vec<CatalogItem>,
}

impl CatalogStore {
    /// Read the full catalog from a JSON array file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog from {}", path.display()))?;
        let items: Vec<CatalogItem> =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        info!("Loaded {} catalog items from {}", items.len(), path.display());
        Ok(Self { items })
    }

    /// Build a store from already-materialised records (tests, fixtures).
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Full scan in load order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact model lookup, case-insensitive.
    pub fn find_by_model(&self, model: &str) -> Option<&CatalogItem> {
        let needle = model.trim().to_lowercase();
        self.items.iter().find(|item| item.model_key() == needle)
    }

    /// Unique brand names, lowercased and sorted.
    pub fn brands(&self) -> Vec<String> {
        let mut brands: Vec<String> = self
            .items
            .iter()
            .map(|item| item.brand.to_lowercase())
            .collect();
        brands.sort();
        brands.dedup();
        brands
    }

    /// Cheapest and most expensive price across the catalog.
    pub fn price_range(&self) -> Option<(u32, u32)> {
        let min = self.items.iter().map(|i| i.price).min()?;
        let max = self.items.iter().map(|i| i.price).max()?;
        Some((min, max))
    }
}
