//! Incremental grouped aggregation.
//!
//! A [`Grouping`] pairs a key projection with a [`Reducer`] and keeps one
//! reducer state per key. States are updated one record at a time as records
//! enter and leave the active set; reading a value never touches the records.

mod grouping;
mod reducer;

pub use grouping::Grouping;
pub use reducer::{
    reducer, AverageBy, AverageState, Count, FnReducer, MatchRatio, RatioState, Reducer, SumBy,
};
