//! Array index registry
//!
//! Maps external object positions to dense internal indices. The reverse
//! array is indexed by position and grows to cover whatever position is
//! asked for; slots nobody has asked for stay unset (`None`). Once a slot is
//! set it never changes.

use crate::config::{GrowthPolicy, InternConfig};
use crate::error::{InternError, Result};
use crate::growable::GrowableArray;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

/// Capacity increment on top of doubling (`2n + 2`).
pub(crate) const INDEX_GROWTH_STEP: usize = 2;

/// Largest internal index handed out.
pub const MAX_SLOT_INDEX: u32 = i32::MAX as u32;

/// Internal index resolved for an external array position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotIndex(u32);

impl SlotIndex {
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    fn from_slot(slot: usize) -> Option<Self> {
        u32::try_from(slot)
            .ok()
            .filter(|index| *index <= MAX_SLOT_INDEX)
            .map(SlotIndex)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct IndexRegistry {
    /// Slot `i` records the external position internal index `i` belongs to.
    table: GrowableArray<usize>,
    reverse: GrowableArray<Option<SlotIndex>>,
    growth: GrowthPolicy,
}

impl IndexRegistry {
    pub fn new(config: &InternConfig) -> Result<Self> {
        let mut reverse = GrowableArray::new();
        reverse.resize_filled(config.initial_position_slots, None)?;
        Ok(Self {
            table: GrowableArray::with_capacity(config.initial_index_capacity)?,
            reverse,
            growth: config.growth,
        })
    }

    /// Internal index for `position`, allocating one on first sight.
    pub fn resolve(&mut self, position: usize) -> Result<SlotIndex> {
        if position >= self.reverse.len() {
            let new_len = position
                .checked_add(1)
                .ok_or(InternError::IdSpaceExhausted { registry: "index" })?;
            debug!(old = self.reverse.len(), new = new_len, "extending reverse index array");
            self.reverse.resize_filled(new_len, None)?;
        }

        if let Some(Some(index)) = self.reverse.get(position) {
            return Ok(*index);
        }

        let index = self.intern_index(position)?;
        if let Some(slot) = self.reverse.get_mut(position) {
            *slot = Some(index);
        }
        Ok(index)
    }

    /// Index already assigned to `position`, without growing anything.
    pub fn get(&self, position: usize) -> Option<SlotIndex> {
        self.reverse.get(position).copied().flatten()
    }

    /// The external position `index` was allocated for.
    pub fn position_of(&self, index: SlotIndex) -> Option<usize> {
        self.table.get(index.as_usize()).copied()
    }

    /// Number of internal indices handed out.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Length of the reverse array, set or not.
    pub fn position_slots(&self) -> usize {
        self.reverse.len()
    }

    pub fn reverse_slots(&self) -> &[Option<SlotIndex>] {
        self.reverse.as_slice()
    }

    // Caller holds the global lock.
    fn intern_index(&mut self, position: usize) -> Result<SlotIndex> {
        if self.table.is_full() {
            let old = self.table.capacity();
            let new = self
                .growth
                .next_capacity(old, INDEX_GROWTH_STEP)
                .ok_or(InternError::IdSpaceExhausted { registry: "index" })?;
            debug!(old, new, "extending array index storage");
            self.table.resize(new)?;
        }

        let index = SlotIndex::from_slot(self.table.len())
            .ok_or(InternError::IdSpaceExhausted { registry: "index" })?;
        self.table.push(position);
        trace!(%index, position, "interned array index");
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grows_reverse_array_with_unset_slots() {
        let mut indices = IndexRegistry::default();
        assert_eq!(indices.resolve(5).unwrap().as_u32(), 0);
        assert_eq!(indices.position_slots(), 6);
        assert_eq!(
            indices.reverse_slots(),
            &[None, None, None, None, None, Some(SlotIndex(0))]
        );
    }

    #[test]
    fn test_lower_position_does_not_grow() {
        let mut indices = IndexRegistry::default();
        indices.resolve(5).unwrap();
        assert_eq!(indices.resolve(2).unwrap().as_u32(), 1);
        assert_eq!(indices.resolve(5).unwrap().as_u32(), 0);
        assert_eq!(indices.position_slots(), 6);
        assert_eq!(indices.len(), 2);
    }

    #[test]
    fn test_capacity_grows_two_n_plus_two() {
        let mut indices = IndexRegistry::default();
        let mut seen = Vec::new();
        for position in 0..20 {
            indices.resolve(position).unwrap();
            if seen.last() != Some(&indices.capacity()) {
                seen.push(indices.capacity());
            }
        }
        assert_eq!(seen, vec![2, 6, 14, 30]);
    }

    #[test]
    fn test_position_of_round_trips() {
        let mut indices = IndexRegistry::default();
        let a = indices.resolve(9).unwrap();
        let b = indices.resolve(0).unwrap();
        assert_eq!(indices.position_of(a), Some(9));
        assert_eq!(indices.position_of(b), Some(0));
        assert_eq!(indices.position_of(SlotIndex(7)), None);
    }

    #[test]
    fn test_get_never_grows() {
        let mut indices = IndexRegistry::default();
        assert_eq!(indices.get(100), None);
        assert_eq!(indices.position_slots(), 0);
        let index = indices.resolve(3).unwrap();
        assert_eq!(indices.get(3), Some(index));
        assert_eq!(indices.get(1), None);
    }

    #[test]
    fn test_preallocated_slots() {
        let config = InternConfig {
            initial_position_slots: 4,
            initial_index_capacity: 8,
            ..Default::default()
        };
        let mut indices = IndexRegistry::new(&config).unwrap();
        assert_eq!(indices.position_slots(), 4);
        assert_eq!(indices.capacity(), 8);

        indices.resolve(1).unwrap();
        assert_eq!(indices.position_slots(), 4);
        assert_eq!(indices.capacity(), 8);
    }
}
