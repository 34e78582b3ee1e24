use serde::Serialize;
use std::marker::PhantomData;

/// Add/remove/initial triple maintaining one group's running state.
///
/// `remove` must undo `add`: for any reachable state `s` and record `r`,
/// adding then removing `r` leaves `s` unchanged.
pub trait Reducer<T> {
    type State;

    fn initial(&self) -> Self::State;
    fn add(&self, state: &mut Self::State, item: &T);
    fn remove(&self, state: &mut Self::State, item: &T);
}

/// Reducer built from three closures. See [`reducer`].
pub struct FnReducer<T, S, I, A, R> {
    initial: I,
    add: A,
    remove: R,
    _marker: PhantomData<fn(&T) -> S>,
}

/// Build a reducer from plain functions.
///
/// ```
/// use salarystats::aggregation::{reducer, Reducer};
///
/// let total = reducer(|| 0i64, |s: &mut i64, x: &i64| *s += x, |s: &mut i64, x: &i64| *s -= x);
/// let mut state = total.initial();
/// total.add(&mut state, &5);
/// total.remove(&mut state, &5);
/// assert_eq!(state, 0);
/// ```
pub fn reducer<T, S, I, A, R>(initial: I, add: A, remove: R) -> FnReducer<T, S, I, A, R>
where
    I: Fn() -> S,
    A: Fn(&mut S, &T),
    R: Fn(&mut S, &T),
{
    FnReducer {
        initial,
        add,
        remove,
        _marker: PhantomData,
    }
}

impl<T, S, I, A, R> Reducer<T> for FnReducer<T, S, I, A, R>
where
    I: Fn() -> S,
    A: Fn(&mut S, &T),
    R: Fn(&mut S, &T),
{
    type State = S;

    fn initial(&self) -> S {
        (self.initial)()
    }

    fn add(&self, state: &mut S, item: &T) {
        (self.add)(state, item)
    }

    fn remove(&self, state: &mut S, item: &T) {
        (self.remove)(state, item)
    }
}

/// Number of records in the group.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl<T> Reducer<T> for Count {
    type State = u64;

    fn initial(&self) -> u64 {
        0
    }

    fn add(&self, state: &mut u64, _item: &T) {
        *state += 1;
    }

    fn remove(&self, state: &mut u64, _item: &T) {
        debug_assert!(*state > 0, "count removed below zero");
        *state = state.saturating_sub(1);
    }
}

/// Sum of an integer projection, accumulated in `i128` so any number of
/// `i64` values can be added without overflow.
pub struct SumBy<F> {
    value: F,
}

impl<F> SumBy<F> {
    pub fn new(value: F) -> Self {
        Self { value }
    }
}

impl<T, F> Reducer<T> for SumBy<F>
where
    F: Fn(&T) -> i64,
{
    type State = i128;

    fn initial(&self) -> i128 {
        0
    }

    fn add(&self, state: &mut i128, item: &T) {
        *state += i128::from((self.value)(item));
    }

    fn remove(&self, state: &mut i128, item: &T) {
        *state -= i128::from((self.value)(item));
    }
}

/// Running count and total, from which the mean is derived on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AverageState {
    pub count: u64,
    pub total: i128,
}

impl AverageState {
    /// Mean of the group, or 0 for an empty group
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total as f64 / self.count as f64
        }
    }
}

/// Mean of an integer projection.
pub struct AverageBy<F> {
    value: F,
}

impl<F> AverageBy<F> {
    pub fn new(value: F) -> Self {
        Self { value }
    }
}

impl<T, F> Reducer<T> for AverageBy<F>
where
    F: Fn(&T) -> i64,
{
    type State = AverageState;

    fn initial(&self) -> AverageState {
        AverageState::default()
    }

    fn add(&self, state: &mut AverageState, item: &T) {
        state.count += 1;
        state.total += i128::from((self.value)(item));
    }

    fn remove(&self, state: &mut AverageState, item: &T) {
        debug_assert!(state.count > 0, "average removed from an empty group");
        state.count = state.count.saturating_sub(1);
        if state.count == 0 {
            // Drop any residue so an emptied group is exactly the initial state.
            state.total = 0;
        } else {
            state.total -= i128::from((self.value)(item));
        }
    }
}

/// Records reaching the group and how many of them satisfy a predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RatioState {
    pub total: u64,
    pub matched: u64,
}

impl RatioState {
    /// `matched / total`, or 0 for an empty group
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }

    pub fn percent(&self) -> f64 {
        self.ratio() * 100.0
    }
}

/// Share of records satisfying a predicate, e.g. the share of professors.
pub struct MatchRatio<P> {
    predicate: P,
}

impl<P> MatchRatio<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<T, P> Reducer<T> for MatchRatio<P>
where
    P: Fn(&T) -> bool,
{
    type State = RatioState;

    fn initial(&self) -> RatioState {
        RatioState::default()
    }

    fn add(&self, state: &mut RatioState, item: &T) {
        state.total += 1;
        if (self.predicate)(item) {
            state.matched += 1;
        }
    }

    fn remove(&self, state: &mut RatioState, item: &T) {
        debug_assert!(state.total > 0, "ratio removed from an empty group");
        state.total = state.total.saturating_sub(1);
        if (self.predicate)(item) {
            debug_assert!(state.matched > 0, "matched count removed below zero");
            state.matched = state.matched.saturating_sub(1);
        }
    }
}
