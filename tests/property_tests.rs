//! Property-based tests using proptest.
//!
//! Tests the invariants of incremental aggregation:
//! - adding then removing a record restores every reducer state
//! - commutative reducers do not depend on insertion order
//! - derived values are finite for empty groups
//! - cross-filtered groupings match a from-scratch aggregation of the
//!   active records after any sequence of filter changes

use proptest::prelude::*;
use salarystats::aggregation::{AverageBy, AverageState, Count, Grouping, MatchRatio, RatioState, Reducer, SumBy};
use salarystats::crossfilter::CrossFilter;
use salarystats::{Rank, Record, Sex};
use std::fmt::Debug;

// ── Strategies ─────────────────────────────────────────────────────────────

fn arb_sex() -> impl Strategy<Value = Sex> {
    prop_oneof![Just(Sex::Female), Just(Sex::Male)]
}

fn arb_rank() -> impl Strategy<Value = Rank> {
    prop_oneof![Just(Rank::AsstProf), Just(Rank::AssocProf), Just(Rank::Prof)]
}

fn arb_record() -> impl Strategy<Value = Record> {
    (
        prop_oneof![Just("A"), Just("B")],
        arb_sex(),
        arb_rank(),
        50_000i64..250_000,
        0i64..60,
        1i64..60,
    )
        .prop_map(|(discipline, sex, rank, salary, service, phd)| {
            Record::new(discipline, sex, rank, salary, service, phd)
        })
}

fn arb_records() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(arb_record(), 0..40)
}

/// A selection change on one of the dashboard dimensions.
#[derive(Debug, Clone)]
enum FilterOp {
    Sex(Option<Sex>),
    Discipline(Option<&'static str>),
    Service(Option<(i64, i64)>),
}

fn arb_filter_op() -> impl Strategy<Value = FilterOp> {
    prop_oneof![
        prop::option::of(arb_sex()).prop_map(FilterOp::Sex),
        prop::option::of(prop_oneof![Just("A"), Just("B")]).prop_map(FilterOp::Discipline),
        prop::option::of((0i64..60, 0i64..60)).prop_map(FilterOp::Service),
    ]
}

fn salary(record: &Record) -> i64 {
    record.salary
}

fn is_prof(record: &Record) -> bool {
    record.rank == Rank::Prof
}

fn inverse_holds<R>(reducer: &R, prefix: &[Record], record: &Record) -> bool
where
    R: Reducer<Record>,
    R::State: PartialEq + Clone,
{
    let mut state = reducer.initial();
    for item in prefix {
        reducer.add(&mut state, item);
    }
    let before = state.clone();
    reducer.add(&mut state, record);
    reducer.remove(&mut state, record);
    state == before
}

/// Groups with at least one member, owned for comparison.
fn live_groups<K, R>(grouping: &Grouping<Record, K, R>) -> Vec<(K, R::State)>
where
    K: Ord + Debug + Clone,
    R: Reducer<Record>,
    R::State: Clone,
{
    grouping
        .iter()
        .filter(|(key, _)| grouping.members(key) > 0)
        .map(|(key, state)| (key.clone(), state.clone()))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ── Inverse law ────────────────────────────────────────────────

    #[test]
    fn prop_average_inverse(prefix in arb_records(), record in arb_record()) {
        prop_assert!(inverse_holds(&AverageBy::new(salary as fn(&Record) -> i64), &prefix, &record));
    }

    #[test]
    fn prop_ratio_inverse(prefix in arb_records(), record in arb_record()) {
        prop_assert!(inverse_holds(&MatchRatio::new(is_prof as fn(&Record) -> bool), &prefix, &record));
    }

    #[test]
    fn prop_count_and_sum_inverse(prefix in arb_records(), record in arb_record()) {
        prop_assert!(inverse_holds(&Count, &prefix, &record));
        prop_assert!(inverse_holds(&SumBy::new(salary as fn(&Record) -> i64), &prefix, &record));
    }

    #[test]
    fn prop_add_all_remove_all_restores_initial(
        (records, removal_order) in arb_records().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let mut grouping = Grouping::new(|r: &Record| r.sex, AverageBy::new(salary as fn(&Record) -> i64));
        for record in &records {
            grouping.on_record_enters(record);
        }
        for record in &removal_order {
            prop_assert!(grouping.on_record_leaves(record).is_ok());
        }
        for (_, state) in grouping.iter() {
            prop_assert_eq!(*state, AverageState::default());
        }
    }

    // ── Order independence ─────────────────────────────────────────

    #[test]
    fn prop_order_independent(
        (records, shuffled) in arb_records().prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let build = |items: &[Record]| {
            let mut grouping = Grouping::new(
                |r: &Record| (r.sex, r.discipline.clone()),
                MatchRatio::new(is_prof as fn(&Record) -> bool),
            );
            for item in items {
                grouping.on_record_enters(item);
            }
            live_groups(&grouping)
        };
        prop_assert_eq!(build(&records), build(&shuffled));
    }

    // ── Zero guard ─────────────────────────────────────────────────

    #[test]
    fn prop_derived_values_are_finite(records in arb_records()) {
        let mut grouping = Grouping::new(|r: &Record| r.rank, MatchRatio::new(is_prof as fn(&Record) -> bool));
        for record in &records {
            grouping.on_record_enters(record);
        }
        for record in &records {
            grouping.on_record_leaves(record).unwrap();
            for (_, percent) in grouping.values(RatioState::percent) {
                prop_assert!(percent.is_finite());
                prop_assert!((0.0..=100.0).contains(&percent));
            }
        }
    }

    // ── Cross-filter consistency ───────────────────────────────────

    #[test]
    fn prop_crossfilter_matches_recompute(
        records in arb_records(),
        ops in prop::collection::vec(arb_filter_op(), 0..12),
    ) {
        let mut cf = CrossFilter::new(records);
        let sex = cf.dimension(|r: &Record| r.sex);
        let discipline = cf.dimension(|r: &Record| r.discipline.clone());
        let service = cf.dimension(|r: &Record| r.yrs_service);
        let by_sex = cf.register(sex.group(AverageBy::new(salary as fn(&Record) -> i64)));
        let by_rank = cf.register(Grouping::new(
            |r: &Record| (r.rank, r.discipline.clone()),
            MatchRatio::new(is_prof as fn(&Record) -> bool),
        ));

        for op in ops {
            let result = match op {
                FilterOp::Sex(Some(value)) => cf.filter_exact(&sex, value),
                FilterOp::Sex(None) => cf.filter_all(&sex),
                FilterOp::Discipline(Some(value)) => cf.filter_exact(&discipline, value.to_string()),
                FilterOp::Discipline(None) => cf.filter_all(&discipline),
                FilterOp::Service(Some((lo, hi))) => cf.filter_range(&service, lo..hi),
                FilterOp::Service(None) => cf.filter_all(&service),
            };
            prop_assert!(result.is_ok());

            let mut expected_sex = Grouping::new(|r: &Record| r.sex, AverageBy::new(salary as fn(&Record) -> i64));
            let mut expected_rank = Grouping::new(
                |r: &Record| (r.rank, r.discipline.clone()),
                MatchRatio::new(is_prof as fn(&Record) -> bool),
            );
            for record in cf.active_records() {
                expected_sex.on_record_enters(record);
                expected_rank.on_record_enters(record);
            }

            prop_assert_eq!(live_groups(cf.grouping(&by_sex).unwrap()), live_groups(&expected_sex));
            prop_assert_eq!(live_groups(cf.grouping(&by_rank).unwrap()), live_groups(&expected_rank));
        }
    }
}
