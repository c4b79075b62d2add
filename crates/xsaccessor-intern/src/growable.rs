//! Resize-with-copy storage used by both registries.
//!
//! The logical capacity is tracked separately from the backing `Vec` so the
//! registries can grow by their own formulas and report exactly what they
//! asked for. Shrinking is never requested.

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct GrowableArray<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Default for GrowableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowableArray<T> {
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut array = Self::new();
        array.resize(capacity)?;
        Ok(array)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// No room left for [`push`](Self::push) without a resize.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Grow capacity to `new_capacity`, keeping the current contents.
    pub fn resize(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(
            new_capacity >= self.capacity,
            "shrink requested: {} -> {}",
            self.capacity,
            new_capacity
        );
        if new_capacity > self.items.capacity() {
            self.items
                .try_reserve_exact(new_capacity - self.items.len())?;
        }
        self.capacity = self.capacity.max(new_capacity);
        Ok(())
    }

    /// Append into reserved space and return the slot used.
    ///
    /// Callers resize first when [`is_full`](Self::is_full).
    pub fn push(&mut self, item: T) -> usize {
        debug_assert!(!self.is_full(), "push into full array");
        let slot = self.items.len();
        self.items.push(item);
        self.capacity = self.capacity.max(self.items.len());
        slot
    }
}

impl<T: Clone> GrowableArray<T> {
    /// Grow length (and capacity) to `new_len`, setting every new slot to `fill`.
    pub fn resize_filled(&mut self, new_len: usize, fill: T) -> Result<()> {
        debug_assert!(
            new_len >= self.items.len(),
            "shrink requested: {} -> {}",
            self.items.len(),
            new_len
        );
        if new_len <= self.items.len() {
            return Ok(());
        }
        self.items.try_reserve_exact(new_len - self.items.len())?;
        self.items.resize(new_len, fill);
        self.capacity = self.capacity.max(new_len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_keeps_contents() {
        let mut array = GrowableArray::with_capacity(2).unwrap();
        array.push(10);
        array.push(20);
        assert!(array.is_full());

        array.resize(5).unwrap();
        assert_eq!(array.capacity(), 5);
        assert_eq!(array.as_slice(), &[10, 20]);
        assert!(!array.is_full());
    }

    #[test]
    fn test_resize_filled_only_touches_new_slots() {
        let mut array: GrowableArray<Option<u32>> = GrowableArray::new();
        array.resize_filled(3, None).unwrap();
        *array.get_mut(1).unwrap() = Some(7);

        array.resize_filled(6, None).unwrap();
        assert_eq!(array.len(), 6);
        assert_eq!(array.capacity(), 6);
        assert_eq!(array.as_slice(), &[None, Some(7), None, None, None, None]);
    }

    #[test]
    fn test_resize_filled_same_length_is_noop() {
        let mut array = GrowableArray::new();
        array.resize_filled(2, -1i32).unwrap();
        array.resize_filled(2, 99).unwrap();
        assert_eq!(array.as_slice(), &[-1, -1]);
    }

    #[test]
    fn test_capacity_survives_push() {
        let mut array = GrowableArray::new();
        array.resize(1).unwrap();
        assert_eq!(array.push("a"), 0);
        assert_eq!(array.capacity(), 1);
        assert_eq!(array.len(), 1);
        assert!(array.is_full());
    }
}
