//! Persistent cart identity.
//!
//! The session remembers exactly one thing across reloads: the id of the
//! remote cart. [`IdentityStore`] keeps it under a fixed key in a
//! [`KeyValueStore`] substrate.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

use crate::cart::CartId;

mod file;

pub use file::FileStore;

/// Key under which the current cart id is stored.
pub const CART_ID_KEY: &str = "shopify_cart_id";

/// Errors raised by a persistence substrate.
#[derive(Debug, Error)]
pub enum IdentityStoreError {
    /// Reading or writing the backing file failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document was not a JSON object of strings.
    #[error("storage document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A previous writer panicked while holding the store lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for IdentityStoreError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

/// Durable string key-value storage, scoped to one client.
#[automock]
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error when the substrate cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, IdentityStoreError>;

    /// Overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns an error when the substrate cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), IdentityStoreError>;

    /// Remove a value; removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the substrate cannot be written.
    fn remove(&self, key: &str) -> Result<(), IdentityStoreError>;
}

/// Process-local storage; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<FxHashMap<String, String>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, IdentityStoreError> {
        Ok(self.values.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), IdentityStoreError> {
        self.values.lock()?.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), IdentityStoreError> {
        self.values.lock()?.remove(key);

        Ok(())
    }
}

/// The stored cart id.
#[derive(Clone)]
pub struct IdentityStore {
    substrate: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityStore")
            .field("key", &CART_ID_KEY)
            .finish_non_exhaustive()
    }
}

impl IdentityStore {
    /// Keep the cart id in `substrate`.
    pub fn new(substrate: Arc<dyn KeyValueStore>) -> Self {
        Self { substrate }
    }

    /// An identity store backed by process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// The stored cart id, if any.
    ///
    /// Never fails: an unreadable substrate or a blank value reads as "no
    /// cart yet".
    pub fn read(&self) -> Option<CartId> {
        match self.substrate.get(CART_ID_KEY) {
            Ok(value) => CartId::new(value?).ok(),
            Err(error) => {
                warn!("failed to read stored cart id: {error}");

                None
            }
        }
    }

    /// Replace the stored cart id.
    ///
    /// # Errors
    ///
    /// Returns the substrate error when the id could not be persisted.
    pub fn write(&self, cart: &CartId) -> Result<(), IdentityStoreError> {
        self.substrate.set(CART_ID_KEY, cart.as_str())
    }

    /// Forget the stored cart id.
    ///
    /// # Errors
    ///
    /// Returns the substrate error when the id could not be removed.
    pub fn clear(&self) -> Result<(), IdentityStoreError> {
        self.substrate.remove(CART_ID_KEY)
    }
}
