// Fixed-capacity ordered sequence.
//
// `BoundedSequence<T, N>` is the container every other type in this crate is
// built on: digit vectors (N = 8), pitch-class sets (N = 12) and interval
// sequences. Storage is an inline `SmallVec<[T; N]>`, so sequences never touch
// the heap, and the capacity is a compile-time constant.
//
// Growth past `N` is an error (`SetError::CapacityExceeded`), never a silent
// truncation. Index access through `[]` panics when out of bounds like any
// slice; use `get` when the index comes from outside.

use crate::error::SetError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// An ordered sequence of at most `N` elements; insertion order is kept.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundedSequence<T, const N: usize> {
    items: SmallVec<[T; N]>,
}

impl<T, const N: usize> BoundedSequence<T, N> {
    /// Maximum number of elements.
    pub const CAPACITY: usize = N;

    pub fn new() -> Self {
        Self {
            items: SmallVec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == N
    }

    /// Append an element, failing if the sequence is already full.
    pub fn push(&mut self, value: T) -> Result<(), SetError> {
        if self.is_full() {
            return Err(SetError::CapacityExceeded { capacity: N });
        }
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Remove and return the element at `index`, shifting later elements down.
    pub fn remove(&mut self, index: usize) -> Result<T, SetError> {
        if index >= self.items.len() {
            return Err(SetError::OutOfRange {
                value: index as u64,
                limit: self.items.len() as u64,
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    /// Remove consecutive repeated elements (the sequence should be sorted
    /// first if all duplicates are to go).
    pub fn dedup(&mut self)
    where
        T: PartialEq,
    {
        self.items.dedup();
    }

    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.items.sort_unstable();
    }

    /// Index of the first element equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|v| v == value)
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(value)
    }

    /// Grow or shrink to `len`, filling new slots with `fill`.
    pub fn resize(&mut self, len: usize, fill: T) -> Result<(), SetError>
    where
        T: Clone,
    {
        if len > N {
            return Err(SetError::CapacityExceeded { capacity: N });
        }
        self.items.resize(len, fill);
        Ok(())
    }

    /// Copy a slice into a new sequence, failing if it is longer than `N`.
    pub fn from_slice(values: &[T]) -> Result<Self, SetError>
    where
        T: Clone,
    {
        Self::try_from_iter(values.iter().cloned())
    }

    /// Collect an iterator, failing as soon as it yields more than `N` items.
    pub fn try_from_iter(values: impl IntoIterator<Item = T>) -> Result<Self, SetError> {
        let mut seq = Self::new();
        for v in values {
            seq.push(v)?;
        }
        Ok(seq)
    }
}

impl<T, const N: usize> Default for BoundedSequence<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Index<usize> for BoundedSequence<T, N> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for BoundedSequence<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a BoundedSequence<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Clone, const N: usize> TryFrom<&[T]> for BoundedSequence<T, N> {
    type Error = SetError;

    fn try_from(values: &[T]) -> Result<Self, SetError> {
        Self::from_slice(values)
    }
}

// Serialized as a plain JSON array; deserialization re-checks the capacity.
impl<T: Serialize, const N: usize> Serialize for BoundedSequence<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

impl<'de, T: Deserialize<'de>, const N: usize> Deserialize<'de> for BoundedSequence<T, N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        let len = values.len();
        Self::try_from_iter(values)
            .map_err(|_| D::Error::custom(format!("{len} elements exceed capacity {N}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut seq: BoundedSequence<u8, 3> = BoundedSequence::new();
        seq.push(1).unwrap();
        seq.push(2).unwrap();
        seq.push(3).unwrap();
        assert!(seq.is_full());
        assert_eq!(seq.push(4), Err(SetError::CapacityExceeded { capacity: 3 }));
        assert_eq!(seq.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn test_sort_reverse_find() {
        let mut seq: BoundedSequence<u8, 8> = BoundedSequence::from_slice(&[5, 1, 4, 1]).unwrap();
        seq.sort();
        assert_eq!(seq.as_slice(), &[1, 1, 4, 5]);
        seq.reverse();
        assert_eq!(seq.as_slice(), &[5, 4, 1, 1]);
        assert_eq!(seq.find(&1), Some(2));
        assert_eq!(seq.find(&9), None);
        seq.dedup();
        assert_eq!(seq.as_slice(), &[5, 4, 1]);
    }

    #[test]
    fn test_resize_respects_capacity() {
        let mut seq: BoundedSequence<u8, 4> = BoundedSequence::new();
        seq.resize(4, 7).unwrap();
        assert_eq!(seq.as_slice(), &[7, 7, 7, 7]);
        assert!(seq.resize(5, 0).is_err());
        seq.resize(2, 0).unwrap();
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_from_slice_too_long() {
        let result: Result<BoundedSequence<u8, 2>, _> = BoundedSequence::from_slice(&[1, 2, 3]);
        assert!(matches!(result, Err(SetError::CapacityExceeded { capacity: 2 })));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut seq: BoundedSequence<u8, 4> = BoundedSequence::from_slice(&[1, 2]).unwrap();
        assert_eq!(seq.remove(0), Ok(1));
        assert!(seq.remove(3).is_err());
    }

    #[test]
    fn test_serde_checks_capacity() {
        let seq: BoundedSequence<u8, 3> = BoundedSequence::from_slice(&[1, 2, 3]).unwrap();
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: BoundedSequence<u8, 3> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seq);
        let too_long: Result<BoundedSequence<u8, 2>, _> = serde_json::from_str("[1,2,3]");
        assert!(too_long.is_err());
    }
}
