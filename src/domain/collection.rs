use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::models::Entity;

/// An immutable, ordered sequence of records of one kind.
///
/// Every mutation returns a new `Collection`; the receiver is never touched.
/// An operation that changes nothing hands back a clone sharing the same
/// allocation, so [`Collection::ptr_eq`] is a valid change test.
///
/// # Examples
///
/// ```
/// use farmdesk::domain::{Collection, Entity, Field};
///
/// let empty: Collection<Field> = Collection::default();
/// let one = empty.add(Field::from_values(&["F1".to_string()]));
/// assert_eq!(one.len(), 1);
/// assert!(empty.is_empty());
/// ```
#[derive(Debug)]
pub struct Collection<T> {
    items: Arc<[T]>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }
}

impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.items[..] == other.items[..]
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.items.iter())
    }
}

impl<T> Collection<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// True when both collections share one allocation, i.e. neither has
    /// been replaced since one was cloned from the other.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }
}

impl<T: Entity> Collection<T> {
    /// Returns a new collection with `record` appended at the end.
    ///
    /// No uniqueness check is made; an empty identity key is accepted.
    pub fn add(&self, record: T) -> Self {
        self.items.iter().cloned().chain(std::iter::once(record)).collect()
    }

    /// Returns a new collection without any record whose key equals `key`.
    ///
    /// When nothing matches the result shares `self`'s allocation.
    pub fn delete(&self, key: &str) -> Self {
        if !self.contains_key(key) {
            return self.clone();
        }
        self.items.iter().filter(|record| record.key() != key).cloned().collect()
    }

    /// Returns a new collection where the first record keyed `key` is replaced
    /// in place by `record`. Every attribute is overwritten.
    ///
    /// When nothing matches the result shares `self`'s allocation.
    pub fn update(&self, key: &str, record: T) -> Self {
        let Some(index) = self.position(key) else {
            return self.clone();
        };
        let mut items = self.items.to_vec();
        items[index] = record;
        items.into_iter().collect()
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|record| record.key() == key)
    }

    pub fn find(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|record| record.key() == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
