//! Interning context
//!
//! Owns both registries behind one [`GlobalLock`]. Every operation, reads
//! included, goes through that lock, so the two registries are never used in
//! parallel even though their data is independent. Share a context by
//! reference (or `Arc`) across threads.

use crate::config::InternConfig;
use crate::error::{InternError, Result};
use crate::indices::{IndexRegistry, SlotIndex};
use crate::keys::{InternedKey, KeyId, StringKeyRegistry, checked_key};
use crate::lock::GlobalLock;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Default)]
struct Registries {
    keys: StringKeyRegistry,
    indices: IndexRegistry,
}

/// Snapshot of registry sizes. Capacities never decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternStats {
    pub keys: usize,
    pub key_capacity: usize,
    pub indices: usize,
    pub index_capacity: usize,
    pub position_slots: usize,
}

#[derive(Debug, Default)]
pub struct InternContext {
    registries: GlobalLock<Registries>,
}

impl InternContext {
    /// Empty context with default growth. Allocates nothing up front.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context sized and configured from `config`.
    pub fn with_config(config: &InternConfig) -> Result<Self> {
        config.validate()?;
        let registries = Registries {
            keys: StringKeyRegistry::new(config)?,
            indices: IndexRegistry::new(config)?,
        };
        Ok(Self {
            registries: GlobalLock::new(registries),
        })
    }

    /// Stable id for `key`. Aborts the process if storage cannot grow.
    pub fn intern_key(&self, key: impl AsRef<[u8]>) -> KeyId {
        or_abort(self.registries.acquire().keys.intern(key.as_ref()), "intern_key")
    }

    /// Stable id for the first `len` bytes of `bytes`.
    pub fn try_intern_key(&self, bytes: &[u8], len: i32) -> Result<KeyId> {
        let key = checked_key(bytes, len)?;
        self.registries.acquire().keys.intern(key)
    }

    /// Stable internal index for `position`. Aborts the process if storage
    /// cannot grow.
    pub fn resolve_array_index(&self, position: usize) -> SlotIndex {
        or_abort(
            self.registries.acquire().indices.resolve(position),
            "resolve_array_index",
        )
    }

    /// Stable internal index for a signed host position.
    pub fn try_resolve_array_index(&self, position: i64) -> Result<SlotIndex> {
        if position < 0 {
            return Err(InternError::NegativePosition(position));
        }
        let position = usize::try_from(position)
            .map_err(|_| InternError::IdSpaceExhausted { registry: "index" })?;
        self.registries.acquire().indices.resolve(position)
    }

    /// Id already assigned to `key`, if any.
    pub fn lookup_key(&self, key: impl AsRef<[u8]>) -> Option<KeyId> {
        self.registries.acquire().keys.get(key.as_ref())
    }

    /// Index already assigned to `position`, if any.
    pub fn lookup_index(&self, position: usize) -> Option<SlotIndex> {
        self.registries.acquire().indices.get(position)
    }

    pub fn key(&self, id: KeyId) -> Option<InternedKey> {
        self.registries.acquire().keys.resolve(id).cloned()
    }

    pub fn position_of(&self, index: SlotIndex) -> Option<usize> {
        self.registries.acquire().indices.position_of(index)
    }

    /// All interned keys in id order.
    pub fn keys(&self) -> Vec<InternedKey> {
        self.registries.acquire().keys.iter().cloned().collect()
    }

    pub fn stats(&self) -> InternStats {
        let registries = self.registries.acquire();
        InternStats {
            keys: registries.keys.len(),
            key_capacity: registries.keys.capacity(),
            indices: registries.indices.len(),
            index_capacity: registries.indices.capacity(),
            position_slots: registries.indices.position_slots(),
        }
    }
}

fn or_abort<T>(result: Result<T>, operation: &'static str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!(operation, %err, "interning storage exhausted, aborting");
            std::process::abort()
        }
    }
}
