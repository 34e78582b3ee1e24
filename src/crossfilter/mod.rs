//! # Cross-filtering
//!
//! [`CrossFilter`] owns the record set, the filters placed on its dimensions
//! and every registered [`Grouping`]. A record is active when it passes the
//! filter of every dimension. Whenever a filter changes, each record whose
//! active flag flips is reported once to every grouping, no matter which
//! dimension changed, so all aggregates stay consistent with the current
//! selection.
//!
//! ```
//! use salarystats::aggregation::{AverageBy, AverageState};
//! use salarystats::crossfilter::CrossFilter;
//! use salarystats::types::{Rank, Record, Sex};
//!
//! let mut cf = CrossFilter::new(vec![
//!     Record::new("A", Sex::Female, Rank::Prof, 100_000, 10, 12),
//!     Record::new("B", Sex::Male, Rank::AsstProf, 70_000, 1, 2),
//! ]);
//! let sex = cf.dimension(|r: &Record| r.sex);
//! let discipline = cf.dimension(|r: &Record| r.discipline.clone());
//! let salaries = cf.register(sex.group(AverageBy::new(|r: &Record| r.salary)));
//!
//! cf.filter_exact(&discipline, "A".to_string()).unwrap();
//! let male = cf.value_of(&salaries, &Sex::Male, AverageState::average).unwrap();
//! assert_eq!(male, Some(0.0));
//! ```

mod dimension;

pub use dimension::Dimension;

use std::any::Any;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Range;
use std::rc::Rc;

use crate::aggregation::{Grouping, Reducer};
use crate::error::AggregateError;

type Filter<T> = Box<dyn Fn(&T) -> bool>;

/// Type-erased view of a grouping so groupings of different key and state
/// types can share one registry.
trait AnyGrouping<T> {
    fn enter(&mut self, item: &T);
    fn leave(&mut self, item: &T) -> Result<(), AggregateError>;
    fn reset(&mut self);
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T, K, R> AnyGrouping<T> for Grouping<T, K, R>
where
    T: 'static,
    K: Ord + Debug + 'static,
    R: Reducer<T> + 'static,
    R::State: 'static,
{
    fn enter(&mut self, item: &T) {
        self.on_record_enters(item);
    }

    fn leave(&mut self, item: &T) -> Result<(), AggregateError> {
        self.on_record_leaves(item)
    }

    fn reset(&mut self) {
        Grouping::reset(self);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Handle to a grouping registered with a [`CrossFilter`].
///
/// Handles are not reused: once unregistered, any query through the same id
/// fails with [`AggregateError::StaleHandle`].
pub struct GroupingHandle<T, K, R> {
    id: usize,
    _marker: PhantomData<fn() -> (T, K, R)>,
}

impl<T, K, R> GroupingHandle<T, K, R> {
    pub fn id(&self) -> usize {
        self.id
    }
}

/// Records entering and leaving the active set on one filter change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterDelta {
    pub entered: usize,
    pub left: usize,
}

/// Record set with per-dimension filters and incrementally maintained groupings.
pub struct CrossFilter<T> {
    records: Vec<T>,
    active: Vec<bool>,
    filters: Vec<Option<Filter<T>>>,
    groupings: Vec<Option<Box<dyn AnyGrouping<T>>>>,
}

impl<T: 'static> Default for CrossFilter<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: 'static> CrossFilter<T> {
    /// Create a cross-filter over `records`, all of them active
    pub fn new(records: Vec<T>) -> Self {
        let active = vec![true; records.len()];
        Self {
            records,
            active,
            filters: Vec::new(),
            groupings: Vec::new(),
        }
    }

    /// Append records; those passing the current filters enter every grouping
    pub fn add_records(&mut self, records: impl IntoIterator<Item = T>) -> FilterDelta {
        let mut delta = FilterDelta::default();
        for record in records {
            let is_active = passes(&self.filters, &record);
            if is_active {
                for grouping in self.groupings.iter_mut().flatten() {
                    grouping.enter(&record);
                }
                delta.entered += 1;
            }
            self.records.push(record);
            self.active.push(is_active);
        }
        log::debug!(
            "added records, {} entered the filter ({} total)",
            delta.entered,
            self.records.len()
        );
        delta
    }

    /// Create a dimension over a record projection
    pub fn dimension<V: 'static>(
        &mut self,
        value_fn: impl Fn(&T) -> V + 'static,
    ) -> Dimension<T, V> {
        let id = self.filters.len();
        self.filters.push(None);
        Dimension {
            id,
            value_fn: Rc::new(value_fn),
        }
    }

    /// Keep only records whose dimension value equals `value`
    pub fn filter_exact<V>(
        &mut self,
        dimension: &Dimension<T, V>,
        value: V,
    ) -> Result<FilterDelta, AggregateError>
    where
        V: PartialEq + 'static,
    {
        let value_fn = Rc::clone(&dimension.value_fn);
        self.set_filter(dimension.id, Some(Box::new(move |item: &T| value_fn(item) == value)))
    }

    /// Keep only records whose dimension value lies in `[start, end)`
    pub fn filter_range<V>(
        &mut self,
        dimension: &Dimension<T, V>,
        range: Range<V>,
    ) -> Result<FilterDelta, AggregateError>
    where
        V: PartialOrd + 'static,
    {
        let value_fn = Rc::clone(&dimension.value_fn);
        let filter = move |item: &T| range.contains(&value_fn(item));
        self.set_filter(dimension.id, Some(Box::new(filter)))
    }

    /// Keep only records whose dimension value satisfies `predicate`
    pub fn filter_fn<V>(
        &mut self,
        dimension: &Dimension<T, V>,
        predicate: impl Fn(&V) -> bool + 'static,
    ) -> Result<FilterDelta, AggregateError>
    where
        V: 'static,
    {
        let value_fn = Rc::clone(&dimension.value_fn);
        self.set_filter(dimension.id, Some(Box::new(move |item: &T| predicate(&value_fn(item)))))
    }

    /// Remove the filter on a dimension
    pub fn filter_all<V>(
        &mut self,
        dimension: &Dimension<T, V>,
    ) -> Result<FilterDelta, AggregateError> {
        self.set_filter(dimension.id, None)
    }

    /// Fails with [`AggregateError::UnknownDimension`] for a dimension created
    /// by another cross-filter; the current filters are left untouched.
    fn set_filter(
        &mut self,
        dimension: usize,
        filter: Option<Filter<T>>,
    ) -> Result<FilterDelta, AggregateError> {
        let slot = self
            .filters
            .get_mut(dimension)
            .ok_or(AggregateError::UnknownDimension { id: dimension })?;
        *slot = filter;
        self.refresh(dimension)
    }

    /// Bring every record's active flag and every grouping in line with the
    /// current filters.
    ///
    /// The pass always runs to completion: active flags and the groupings
    /// that accept the change are updated even when some grouping rejects a
    /// removal. The first rejection is returned; the grouping that raised it
    /// is then out of step and should be unregistered.
    fn refresh(&mut self, dimension: usize) -> Result<FilterDelta, AggregateError> {
        let mut delta = FilterDelta::default();
        let mut first_error = None;

        for (record, active) in self.records.iter().zip(self.active.iter_mut()) {
            let now_active = passes(&self.filters, record);
            if now_active == *active {
                continue;
            }
            for grouping in self.groupings.iter_mut().flatten() {
                if now_active {
                    grouping.enter(record);
                } else if let Err(err) = grouping.leave(record) {
                    log::warn!("grouping rejected a record leaving the filter: {err}");
                    first_error.get_or_insert(err);
                }
            }
            if now_active {
                delta.entered += 1;
            } else {
                delta.left += 1;
            }
            *active = now_active;
        }

        log::debug!(
            "filter on dimension {} changed: {} entered, {} left, {} groupings updated",
            dimension,
            delta.entered,
            delta.left,
            self.groupings.iter().flatten().count()
        );
        match first_error {
            Some(err) => Err(err),
            None => Ok(delta),
        }
    }

    /// Register a grouping and prime it with the currently active records
    pub fn register<K, R>(&mut self, mut grouping: Grouping<T, K, R>) -> GroupingHandle<T, K, R>
    where
        K: Ord + Debug + 'static,
        R: Reducer<T> + 'static,
        R::State: 'static,
    {
        grouping.reset();
        for (record, _) in self.records.iter().zip(&self.active).filter(|(_, active)| **active) {
            grouping.on_record_enters(record);
        }

        let id = self.groupings.len();
        self.groupings.push(Some(Box::new(grouping)));
        log::trace!("registered grouping {id}");

        GroupingHandle {
            id,
            _marker: PhantomData,
        }
    }

    /// Tear down a grouping and hand it back to the caller
    pub fn unregister<K, R>(
        &mut self,
        handle: GroupingHandle<T, K, R>,
    ) -> Result<Grouping<T, K, R>, AggregateError>
    where
        K: Ord + Debug + 'static,
        R: Reducer<T> + 'static,
        R::State: 'static,
    {
        let stale = AggregateError::StaleHandle { id: handle.id };
        let slot = self.groupings.get_mut(handle.id).ok_or_else(|| stale.clone())?;
        let boxed = slot.take().ok_or_else(|| stale.clone())?;
        let grouping = boxed.into_any().downcast::<Grouping<T, K, R>>().map_err(|_| stale)?;
        log::trace!("unregistered grouping {}", handle.id);
        Ok(*grouping)
    }

    pub fn grouping<K, R>(
        &self,
        handle: &GroupingHandle<T, K, R>,
    ) -> Result<&Grouping<T, K, R>, AggregateError>
    where
        K: Ord + Debug + 'static,
        R: Reducer<T> + 'static,
        R::State: 'static,
    {
        self.groupings
            .get(handle.id)
            .and_then(Option::as_ref)
            .and_then(|grouping| grouping.as_any().downcast_ref::<Grouping<T, K, R>>())
            .ok_or(AggregateError::StaleHandle { id: handle.id })
    }

    /// Every group of a registered grouping, in key order
    pub fn all_groups<K, R>(
        &self,
        handle: &GroupingHandle<T, K, R>,
    ) -> Result<Vec<(&K, &R::State)>, AggregateError>
    where
        K: Ord + Debug + 'static,
        R: Reducer<T> + 'static,
        R::State: 'static,
    {
        Ok(self.grouping(handle)?.all())
    }

    pub fn value_of<K, R, V>(
        &self,
        handle: &GroupingHandle<T, K, R>,
        key: &K,
        accessor: impl Fn(&R::State) -> V,
    ) -> Result<Option<V>, AggregateError>
    where
        K: Ord + Debug + 'static,
        R: Reducer<T> + 'static,
        R::State: 'static,
    {
        Ok(self.grouping(handle)?.value_of(key, accessor))
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Records passing every current filter
    pub fn active_records(&self) -> impl Iterator<Item = &T> + '_ {
        self.records
            .iter()
            .zip(&self.active)
            .filter_map(|(record, active)| active.then_some(record))
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active.get(index).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|active| **active).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn passes<T>(filters: &[Option<Filter<T>>], item: &T) -> bool {
    filters.iter().flatten().all(|filter| filter(item))
}
