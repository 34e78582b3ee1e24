use std::collections::BTreeMap;
use std::fmt::Debug;

use super::reducer::Reducer;
use crate::error::AggregateError;

#[derive(Debug, Clone)]
struct GroupEntry<S> {
    members: u64,
    state: S,
}

/// Per-key running state over the records currently inside the filter.
///
/// A grouping never rescans its input. Each record entering or leaving the
/// active set is reported exactly once through [`Grouping::on_record_enters`]
/// or [`Grouping::on_record_leaves`], and only the state of that record's key
/// is touched.
///
/// Keys are kept after their last member leaves so that charts can keep
/// showing an empty group. Iteration is in ascending key order.
pub struct Grouping<T, K, R: Reducer<T>> {
    key_fn: Box<dyn Fn(&T) -> K>,
    reducer: R,
    groups: BTreeMap<K, GroupEntry<R::State>>,
}

impl<T, K, R> Grouping<T, K, R>
where
    K: Ord + Debug,
    R: Reducer<T>,
{
    /// Create an empty grouping from a key projection and a reducer
    pub fn new(key_fn: impl Fn(&T) -> K + 'static, reducer: R) -> Self {
        Self {
            key_fn: Box::new(key_fn),
            reducer,
            groups: BTreeMap::new(),
        }
    }

    pub fn key_of(&self, item: &T) -> K {
        (self.key_fn)(item)
    }

    pub fn reducer(&self) -> &R {
        &self.reducer
    }

    /// Fold a record into its group, creating the group on first sight
    pub fn on_record_enters(&mut self, item: &T) {
        let key = (self.key_fn)(item);
        let reducer = &self.reducer;
        let entry = self.groups.entry(key).or_insert_with(|| GroupEntry {
            members: 0,
            state: reducer.initial(),
        });
        entry.members += 1;
        reducer.add(&mut entry.state, item);
    }

    /// Take a record back out of its group
    ///
    /// Fails if the record's key was never seen or the group is already empty.
    /// The grouping is left untouched in both cases.
    pub fn on_record_leaves(&mut self, item: &T) -> Result<(), AggregateError> {
        let key = (self.key_fn)(item);
        let entry = match self.groups.get_mut(&key) {
            Some(entry) => entry,
            None => {
                return Err(AggregateError::UnknownGroup {
                    key: format!("{key:?}"),
                })
            }
        };
        if entry.members == 0 {
            return Err(AggregateError::GroupUnderflow {
                key: format!("{key:?}"),
            });
        }
        entry.members -= 1;
        self.reducer.remove(&mut entry.state, item);
        Ok(())
    }

    /// Every known key with its current state, in key order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &R::State)> + '_ {
        self.groups.iter().map(|(key, entry)| (key, &entry.state))
    }

    pub fn all(&self) -> Vec<(&K, &R::State)> {
        self.iter().collect()
    }

    pub fn get(&self, key: &K) -> Option<&R::State> {
        self.groups.get(key).map(|entry| &entry.state)
    }

    /// Number of records currently inside the group for `key`
    pub fn members(&self, key: &K) -> u64 {
        self.groups.get(key).map_or(0, |entry| entry.members)
    }

    /// Apply a presentation accessor to one group's state
    pub fn value_of<V>(&self, key: &K, accessor: impl Fn(&R::State) -> V) -> Option<V> {
        self.get(key).map(accessor)
    }

    /// Apply a presentation accessor to every group, in key order
    pub fn values<V>(&self, accessor: impl Fn(&R::State) -> V) -> Vec<(&K, V)> {
        self.iter().map(|(key, state)| (key, accessor(state))).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Forget every key and state
    pub fn reset(&mut self) {
        self.groups.clear();
    }
}
