//! Shopping cart state and its persistence port.
//!
//! A [`CartStore`] owns the ordered list of [`CartLineItem`]s for one visitor.
//! It loads the stored cart once when constructed and writes the full line
//! sequence back through its [`CartPersistence`] after every mutation.
//!
//! Persistence is best-effort on both ends: a stored cart that cannot be read
//! or parsed yields an empty cart, and a failed write is reported as
//! [`SaveOutcome::Ignored`] instead of an error. Neither ever aborts a cart
//! operation.
//!
//! # Example
//!
//! ```rust
//! use std::num::NonZeroU32;
//! use haqq_core::cart::{CartStore, JsonBlobPersistence, MemoryBlobStore};
//! use haqq_core::ProductId;
//!
//! let mut cart = CartStore::open(JsonBlobPersistence::new(MemoryBlobStore::default()));
//! let two = NonZeroU32::new(2).expect("non-zero");
//! let _ = cart.add_item(ProductId::new("tee"), two, None);
//! assert_eq!(cart.cart_count(), 2);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProductId;

/// Fixed storage key for the serialized cart.
pub const CART_STORAGE_KEY: &str = "tareeqalhaqq_cart";

/// Chosen value per variant type (e.g., `"Size" -> "M"`).
pub type VariantSelection = BTreeMap<String, String>;

/// One entry in the cart. There is at most one line per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    /// Always at least 1 while the line is in a cart.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantSelection>,
}

// =============================================================================
// Persistence Port
// =============================================================================

/// Errors raised by cart storage backends.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing store could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The stored cart is not valid JSON for a line-item sequence.
    #[error("stored cart is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The stored cart parsed but breaks a cart invariant.
    #[error("stored cart is invalid: {0}")]
    Invalid(String),
}

/// A key-value store holding string blobs.
pub trait BlobStore {
    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn write(&mut self, key: &str, value: String) -> Result<(), PersistenceError>;
}

/// Load and save a whole cart.
pub trait CartPersistence {
    /// Load the stored cart. `Ok(None)` means nothing was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart is unreadable or corrupt.
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, PersistenceError>;

    /// Replace the stored cart with `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be written.
    fn save(&mut self, items: &[CartLineItem]) -> Result<(), PersistenceError>;
}

/// In-process blob store, useful for tests and single-process sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<String, String>,
}

impl MemoryBlobStore {
    /// Create a store pre-populated with one blob.
    #[must_use]
    pub fn with_blob(key: &str, value: impl Into<String>) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(key.to_string(), value.into());
        Self { blobs }
    }

    /// Peek at a stored blob.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }
}

/// Stores the cart as a JSON array under [`CART_STORAGE_KEY`].
#[derive(Debug, Clone, Default)]
pub struct JsonBlobPersistence<B> {
    blob: B,
}

impl<B: BlobStore> JsonBlobPersistence<B> {
    /// Wrap a blob store.
    #[must_use]
    pub const fn new(blob: B) -> Self {
        Self { blob }
    }

    /// Borrow the underlying blob store.
    #[must_use]
    pub const fn blob(&self) -> &B {
        &self.blob
    }

    /// Recover the underlying blob store.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.blob
    }
}

impl<B: BlobStore> CartPersistence for JsonBlobPersistence<B> {
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, PersistenceError> {
        let Some(raw) = self.blob.read(CART_STORAGE_KEY)? else {
            return Ok(None);
        };

        let items: Vec<CartLineItem> = serde_json::from_str(&raw)?;
        if let Some(line) = items.iter().find(|line| line.quantity == 0) {
            return Err(PersistenceError::Invalid(format!(
                "line for product {} has zero quantity",
                line.product_id
            )));
        }

        let mut seen = HashSet::with_capacity(items.len());
        if let Some(line) = items.iter().find(|line| !seen.insert(&line.product_id)) {
            return Err(PersistenceError::Invalid(format!(
                "product {} appears on more than one line",
                line.product_id
            )));
        }

        Ok(Some(items))
    }

    fn save(&mut self, items: &[CartLineItem]) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(items)?;
        self.blob.write(CART_STORAGE_KEY, raw)
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// What happened when the store loaded its initial state.
#[derive(Debug)]
pub enum LoadOutcome {
    /// A stored cart was restored.
    Restored,
    /// Nothing was stored; the cart starts empty.
    Empty,
    /// The stored cart could not be used and was dropped.
    Discarded(PersistenceError),
}

/// What happened when a mutation was written through.
#[derive(Debug)]
pub enum SaveOutcome {
    /// The new cart state was persisted.
    Saved,
    /// The write failed; the in-memory cart is still updated.
    Ignored(PersistenceError),
}

impl SaveOutcome {
    /// Whether the write reached storage.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

// =============================================================================
// CartStore
// =============================================================================

/// The visitor's cart with write-through persistence.
#[derive(Debug)]
pub struct CartStore<P> {
    items: Vec<CartLineItem>,
    persistence: P,
    load_outcome: LoadOutcome,
}

impl<P: CartPersistence> CartStore<P> {
    /// Build the store and load the stored cart once.
    ///
    /// Load failures are never returned; they leave the cart empty and are
    /// recorded in [`CartStore::load_outcome`].
    pub fn open(persistence: P) -> Self {
        let (items, load_outcome) = match persistence.load() {
            Ok(Some(items)) => (items, LoadOutcome::Restored),
            Ok(None) => (Vec::new(), LoadOutcome::Empty),
            Err(err) => (Vec::new(), LoadOutcome::Discarded(err)),
        };

        Self {
            items,
            persistence,
            load_outcome,
        }
    }

    /// How the initial load went.
    pub const fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn cart_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Add units of a product.
    ///
    /// If the product is already in the cart its quantity grows and its
    /// existing variant selection is kept; `variant` is only used for a new
    /// line. A different variant for the same product therefore does not get
    /// a line of its own.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: NonZeroU32,
        variant: Option<VariantSelection>,
    ) -> SaveOutcome {
        if let Some(line) = self.line_mut(&product_id) {
            line.quantity = line.quantity.saturating_add(quantity.get());
        } else {
            self.items.push(CartLineItem {
                product_id,
                quantity: quantity.get(),
                variant,
            });
        }
        self.persist()
    }

    /// Remove a product's line. Missing products are ignored.
    pub fn remove_item(&mut self, product_id: &ProductId) -> SaveOutcome {
        self.items.retain(|line| &line.product_id != product_id);
        self.persist()
    }

    /// Set a line's quantity; zero or negative removes the line.
    ///
    /// Products not in the cart are ignored.
    pub fn update_item_quantity(&mut self, product_id: &ProductId, quantity: i64) -> SaveOutcome {
        if quantity <= 0 {
            return self.remove_item(product_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
        self.persist()
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) -> SaveOutcome {
        self.items.clear();
        self.persist()
    }

    /// Hand back the persistence backend.
    pub fn into_persistence(self) -> P {
        self.persistence
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }

    fn persist(&mut self) -> SaveOutcome {
        match self.persistence.save(&self.items) {
            Ok(()) => SaveOutcome::Saved,
            Err(err) => SaveOutcome::Ignored(err),
        }
    }
}
