use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::storage::{KeyValueStorage, StorageError};

/// Store key holding the JSON-encoded product sequence.
pub const PRODUCTS_KEY: &str = "products";

/// Store key holding the pending edit position, present only between
/// "start edit" and "submit edit".
pub const EDIT_INDEX_KEY: &str = "editIndex";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode product sequence: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

/// One catalog record. The on-disk field names (`desc`, optional `id`)
/// match the original store format, so a store seeded by the legacy app
/// deserializes as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    pub category: String,
    #[serde(deserialize_with = "flexible_price")]
    pub price: f64,
    #[serde(rename = "desc", default)]
    pub description: String,
    pub image: String,
}

impl Product {
    /// Identifier used for card actions, 0 when the record has none.
    pub fn display_id(&self) -> u64 {
        self.id.unwrap_or(0)
    }
}

// Legacy stores carry the price as entered text ("9.99"); newer writes are
// numeric. Accept both, falling back to 0.0 for unparseable text.
fn flexible_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
    })
}

/// Millisecond Unix timestamp, the locally generated identifier for new
/// records.
pub fn timestamp_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The product repository: an ordered sequence addressed by position, plus
/// the transient edit position, both persisted through a [`KeyValueStorage`].
#[derive(Clone, Debug)]
pub struct Catalog<S> {
    storage: S,
}

impl<S: KeyValueStorage> Catalog<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether the product sequence key exists at all. An empty sequence
    /// counts as seeded; bootstrap keys off existence, not contents.
    pub fn is_seeded(&self) -> Result<bool, CatalogError> {
        Ok(self.storage.contains(PRODUCTS_KEY)?)
    }

    /// The full product sequence. Absent or malformed data falls back to
    /// the empty sequence; only storage I/O failures are errors.
    pub fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let Some(raw) = self.storage.get(PRODUCTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<Product>>(&raw) {
            Ok(products) => Ok(products),
            Err(_) => {
                crate::app::warn_line("stored product data is malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    pub fn save(&mut self, products: &[Product]) -> Result<(), CatalogError> {
        let encoded =
            serde_json::to_string(products).map_err(|e| CatalogError::Encode { source: e })?;
        self.storage.set(PRODUCTS_KEY, &encoded)?;
        Ok(())
    }

    /// Appends a record and persists, returning the new sequence length.
    pub fn append(&mut self, product: Product) -> Result<usize, CatalogError> {
        let mut products = self.products()?;
        products.push(product);
        self.save(&products)?;
        Ok(products.len())
    }

    /// Replaces the record at `index` and persists. Out-of-range positions
    /// leave the store untouched and return `false`.
    pub fn replace_at(&mut self, index: usize, product: Product) -> Result<bool, CatalogError> {
        let mut products = self.products()?;
        let Some(slot) = products.get_mut(index) else {
            return Ok(false);
        };
        *slot = product;
        self.save(&products)?;
        Ok(true)
    }

    /// Removes the record at `index` and persists, returning it. An
    /// out-of-range position removes nothing and is not an error.
    pub fn remove_at(&mut self, index: usize) -> Result<Option<Product>, CatalogError> {
        let mut products = self.products()?;
        if index >= products.len() {
            return Ok(None);
        }
        let removed = products.remove(index);
        self.save(&products)?;
        Ok(Some(removed))
    }

    /// Records the pending edit position. Returns `false` without writing
    /// when the position does not address a record.
    pub fn begin_edit(&mut self, index: usize) -> Result<bool, CatalogError> {
        if index >= self.products()?.len() {
            return Ok(false);
        }
        self.storage.set(EDIT_INDEX_KEY, &index.to_string())?;
        Ok(true)
    }

    /// The pending edit position, if any. Unparseable values count as
    /// absent.
    pub fn pending_edit(&self) -> Result<Option<usize>, CatalogError> {
        let Some(raw) = self.storage.get(EDIT_INDEX_KEY)? else {
            return Ok(None);
        };
        Ok(raw.trim().parse::<usize>().ok())
    }

    pub fn clear_pending_edit(&mut self) -> Result<(), CatalogError> {
        self.storage.remove(EDIT_INDEX_KEY)?;
        Ok(())
    }
}
