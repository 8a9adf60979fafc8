//! Session-backed cart storage.
//!
//! The cart lives in the visitor's session as one JSON string under
//! [`CART_STORAGE_KEY`]. Each request opens a [`SessionCart`], mutates it
//! through the core [`CartStore`], and commits it back before responding.

use std::collections::HashMap;

use tower_sessions::Session;
use tracing::{debug, instrument, warn};

use haqq_core::cart::{
    BlobStore, CART_STORAGE_KEY, CartStore, JsonBlobPersistence, LoadOutcome, PersistenceError,
    SaveOutcome,
};
use haqq_core::{CartLineItem, Product, ProductId};

use crate::printify::PrintifyClient;

// =============================================================================
// SessionBlob
// =============================================================================

/// A snapshot of the session's cart blob.
///
/// Reads come from the snapshot; writes replace it and mark it dirty so
/// [`SessionCart::commit`] knows to write it back.
#[derive(Debug, Default)]
pub struct SessionBlob {
    value: Option<String>,
    dirty: bool,
}

impl SessionBlob {
    #[must_use]
    pub const fn new(value: Option<String>) -> Self {
        Self {
            value,
            dirty: false,
        }
    }
}

impl BlobStore for SessionBlob {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        if key == CART_STORAGE_KEY {
            Ok(self.value.clone())
        } else {
            Ok(None)
        }
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        if key != CART_STORAGE_KEY {
            return Err(PersistenceError::Unavailable(format!(
                "session cart has no slot for {key}"
            )));
        }
        self.value = Some(value);
        self.dirty = true;
        Ok(())
    }
}

// =============================================================================
// SessionCart
// =============================================================================

/// The current visitor's cart.
pub struct SessionCart {
    session: Session,
    store: CartStore<JsonBlobPersistence<SessionBlob>>,
}

impl SessionCart {
    /// Open the cart stored in `session`.
    ///
    /// Session read failures and unusable blobs both yield an empty cart.
    pub async fn load(session: Session) -> Self {
        let raw = match session.get::<String>(CART_STORAGE_KEY).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to read cart from session");
                None
            }
        };

        let store = CartStore::open(JsonBlobPersistence::new(SessionBlob::new(raw)));
        if let LoadOutcome::Discarded(e) = store.load_outcome() {
            warn!(error = %e, "Discarded unreadable stored cart");
        }

        Self { session, store }
    }

    /// The underlying cart.
    #[must_use]
    pub const fn store(&self) -> &CartStore<JsonBlobPersistence<SessionBlob>> {
        &self.store
    }

    /// Mutable access for cart operations.
    pub fn store_mut(&mut self) -> &mut CartStore<JsonBlobPersistence<SessionBlob>> {
        &mut self.store
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        self.store.items()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.store.cart_count()
    }

    /// Write any change back to the session.
    ///
    /// Persistence is best-effort: failures are logged and the response
    /// proceeds with the in-memory cart.
    pub async fn commit(self) {
        let blob = self.store.into_persistence().into_inner();
        if !blob.dirty {
            return;
        }

        let Some(value) = blob.value else {
            return;
        };

        if let Err(e) = self.session.insert(CART_STORAGE_KEY, value).await {
            warn!(error = %e, "Failed to write cart to session");
        }
    }
}

/// Log a write-through failure. The cart itself is already updated.
pub fn log_save(outcome: &SaveOutcome) {
    if let SaveOutcome::Ignored(e) = outcome {
        warn!(error = %e, "Cart change was not persisted");
    }
}

// =============================================================================
// Product resolution
// =============================================================================

/// Fetch the product behind each cart line, one at a time.
///
/// A failed lookup is logged and skipped; the remaining lines are still
/// resolved.
#[instrument(skip_all, fields(lines = items.len()))]
pub async fn resolve_products(
    printify: &PrintifyClient,
    items: &[CartLineItem],
) -> HashMap<ProductId, Product> {
    let mut products = HashMap::new();

    for line in items {
        if products.contains_key(&line.product_id) {
            continue;
        }
        match printify.get_product(line.product_id.as_str()).await {
            Ok(product) => {
                products.insert(line.product_id.clone(), product);
            }
            Err(e) => {
                warn!(product_id = %line.product_id, error = %e, "Failed to fetch cart product");
            }
        }
    }

    debug!(resolved = products.len(), "Resolved cart products");
    products
}
