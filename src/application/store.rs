//! Per-kind reducer: `old collection x operation -> new collection`.

use crate::domain::{Collection, Entity, Operation, StoreError, StoreResult};

/// Whether `add` checks the identity key against existing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Duplicate keys are accepted.
    #[default]
    Permissive,
    /// An add whose key is already present is rejected with
    /// [`StoreError::DuplicateKey`].
    Unique,
}

/// What an operation did to its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The collection was replaced.
    Applied,
    /// No record carried the key; the collection is untouched.
    NoMatch,
}

/// Applies one operation to a collection.
///
/// The input is never modified. A `NoMatch` result hands back a collection
/// sharing the input's allocation.
pub fn reduce<T: Entity>(
    collection: &Collection<T>,
    operation: Operation<T>,
    policy: KeyPolicy,
) -> StoreResult<(Collection<T>, Change)> {
    let next = match operation {
        Operation::Add(record) => {
            if policy == KeyPolicy::Unique && collection.contains_key(record.key()) {
                return Err(StoreError::DuplicateKey {
                    kind: T::KIND,
                    key: record.key().to_string(),
                });
            }
            return Ok((collection.add(record), Change::Applied));
        }
        Operation::Delete(key) => collection.delete(&key),
        Operation::Update { key, record } => collection.update(&key, record),
    };

    let change = if next.ptr_eq(collection) {
        Change::NoMatch
    } else {
        Change::Applied
    };
    Ok((next, change))
}
