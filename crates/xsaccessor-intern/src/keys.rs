//! String key registry
//!
//! Append-only table of interned key records plus the reverse map that
//! de-duplicates them. Ids are dense, start at 0 and follow first-seen order.
//! The registry itself takes no lock; [`InternContext`](crate::InternContext)
//! only reaches it through the global lock.

use crate::config::{GrowthPolicy, InternConfig};
use crate::error::{InternError, Result};
use crate::growable::GrowableArray;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Capacity increment on top of doubling (`2n + 1`).
pub(crate) const KEY_GROWTH_STEP: usize = 1;

/// Largest id handed out. Ids stay representable as a signed 32-bit value.
pub const MAX_KEY_ID: u32 = i32::MAX as u32;

/// Id assigned to an interned key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(u32);

impl KeyId {
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    fn from_slot(slot: usize) -> Option<Self> {
        u32::try_from(slot)
            .ok()
            .filter(|id| *id <= MAX_KEY_ID)
            .map(KeyId)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A key record as stored in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternedKey {
    key: Arc<[u8]>,
    len: usize,
    id: KeyId,
}

impl InternedKey {
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn id(&self) -> KeyId {
        self.id
    }

    /// The key as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.key).ok()
    }
}

/// Validate a host-style `(bytes, len)` pair and return the key it names.
///
/// `len` must be non-negative and no longer than `bytes`.
pub fn checked_key(bytes: &[u8], len: i32) -> Result<&[u8]> {
    let wanted = usize::try_from(len).map_err(|_| InternError::NegativeLength { len })?;
    bytes
        .get(..wanted)
        .ok_or(InternError::LengthOutOfBounds {
            len,
            available: bytes.len(),
        })
}

#[derive(Debug)]
pub struct StringKeyRegistry {
    table: GrowableArray<InternedKey>,
    reverse: HashMap<Arc<[u8]>, KeyId>,
    growth: GrowthPolicy,
}

impl Default for StringKeyRegistry {
    fn default() -> Self {
        Self {
            table: GrowableArray::new(),
            reverse: HashMap::new(),
            growth: GrowthPolicy::default(),
        }
    }
}

impl StringKeyRegistry {
    pub fn new(config: &InternConfig) -> Result<Self> {
        let mut reverse = HashMap::new();
        reverse.try_reserve(config.initial_key_capacity)?;
        Ok(Self {
            table: GrowableArray::with_capacity(config.initial_key_capacity)?,
            reverse,
            growth: config.growth,
        })
    }

    /// Return the id for `key`, assigning the next one on first sight.
    pub fn intern(&mut self, key: &[u8]) -> Result<KeyId> {
        if let Some(&id) = self.reverse.get(key) {
            if self.is_consistent(id, key) {
                return Ok(id);
            }
            warn!(%id, "reverse key entry does not match its record, allocating a fresh id");
        }

        let bytes: Arc<[u8]> = Arc::from(key);
        let id = self.new_key(Arc::clone(&bytes))?;
        self.reverse.insert(bytes, id);
        Ok(id)
    }

    /// Id already assigned to `key`, without allocating.
    pub fn get(&self, key: &[u8]) -> Option<KeyId> {
        self.reverse
            .get(key)
            .copied()
            .filter(|id| self.is_consistent(*id, key))
    }

    pub fn resolve(&self, id: KeyId) -> Option<&InternedKey> {
        self.table.get(id.as_usize())
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InternedKey> {
        self.table.iter()
    }

    fn new_key(&mut self, key: Arc<[u8]>) -> Result<KeyId> {
        if self.table.is_full() {
            let old = self.table.capacity();
            let new = self
                .growth
                .next_capacity(old, KEY_GROWTH_STEP)
                .ok_or(InternError::IdSpaceExhausted { registry: "key" })?;
            debug!(old, new, "extending key storage");
            self.table.resize(new)?;
        }

        let id = KeyId::from_slot(self.table.len())
            .ok_or(InternError::IdSpaceExhausted { registry: "key" })?;
        let len = key.len();
        self.table.push(InternedKey { key, len, id });
        trace!(%id, len, "interned key");
        Ok(id)
    }

    fn is_consistent(&self, id: KeyId, key: &[u8]) -> bool {
        self.resolve(id).is_some_and(|record| record.key() == key)
    }

    #[cfg(test)]
    pub(crate) fn corrupt_reverse_entry(&mut self, key: &[u8], id: KeyId) {
        self.reverse.insert(Arc::from(key), id);
    }
}
