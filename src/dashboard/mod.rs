//! # Salary dashboard
//!
//! The chart set of the faculty salary page, expressed as groupings over one
//! [`CrossFilter`]. Selections made on any chart are dimension filters, and
//! [`SalaryDashboard::snapshot`] reads every chart's current values for an
//! external renderer.

mod snapshot;

pub use snapshot::{DashboardSnapshot, GroupValue, RankShare, ScatterPoint};

use std::ops::Range;

use crate::aggregation::{AverageBy, AverageState, Count, MatchRatio, RatioState};
use crate::config::DashboardConfig;
use crate::crossfilter::{CrossFilter, Dimension, FilterDelta, GroupingHandle};
use crate::error::{AggregateError, Error};
use crate::ingest;
use crate::types::{Rank, Record, Sex};

/// Predicate selecting records of one rank
pub type RankPredicate = Box<dyn Fn(&Record) -> bool>;

/// Scatter plot coordinates: (x, salary, sex)
pub type ScatterKey = (i64, i64, Sex);

type SalaryFn = fn(&Record) -> i64;
type RankShareHandle = GroupingHandle<Record, Sex, MatchRatio<RankPredicate>>;
type ScatterHandle = GroupingHandle<Record, ScatterKey, Count>;

fn salary(record: &Record) -> i64 {
    record.salary
}

fn rank_is(rank: Rank) -> MatchRatio<RankPredicate> {
    let predicate: RankPredicate = Box::new(move |record: &Record| record.rank == rank);
    MatchRatio::new(predicate)
}

pub struct SalaryDashboard {
    config: DashboardConfig,
    filter: CrossFilter<Record>,
    discipline_dim: Dimension<Record, String>,
    sex_dim: Dimension<Record, Sex>,
    rank_dim: Dimension<Record, Rank>,
    service_dim: Dimension<Record, i64>,
    disciplines: GroupingHandle<Record, String, Count>,
    gender_balance: GroupingHandle<Record, Sex, Count>,
    average_salary: GroupingHandle<Record, Sex, AverageBy<SalaryFn>>,
    rank_shares: Vec<(Rank, RankShareHandle)>,
    target_rank_share: RankShareHandle,
    service_vs_salary: ScatterHandle,
    phd_vs_salary: ScatterHandle,
}

impl SalaryDashboard {
    /// Build every chart grouping over `records`
    pub fn new(records: Vec<Record>, config: DashboardConfig) -> Self {
        let mut filter = CrossFilter::new(records);

        let discipline_dim = filter.dimension(|r: &Record| r.discipline.clone());
        let sex_dim = filter.dimension(|r: &Record| r.sex);
        let rank_dim = filter.dimension(|r: &Record| r.rank);
        let service_dim = filter.dimension(|r: &Record| r.yrs_service);
        let service_salary_dim = filter.dimension(|r: &Record| (r.yrs_service, r.salary, r.sex));
        let phd_salary_dim = filter.dimension(|r: &Record| (r.yrs_since_phd, r.salary, r.sex));

        let disciplines = filter.register(discipline_dim.group(Count));
        let gender_balance = filter.register(sex_dim.group(Count));
        let average_salary = filter.register(sex_dim.group(AverageBy::new(salary as SalaryFn)));
        let rank_shares = Rank::ALL
            .iter()
            .map(|&rank| (rank, filter.register(sex_dim.group(rank_is(rank)))))
            .collect();
        let target_rank_share = filter.register(sex_dim.group(rank_is(config.target_rank)));
        let service_vs_salary = filter.register(service_salary_dim.group(Count));
        let phd_vs_salary = filter.register(phd_salary_dim.group(Count));

        log::info!(
            "dashboard built over {} records (target rank {})",
            filter.len(),
            config.target_rank
        );

        Self {
            config,
            filter,
            discipline_dim,
            sex_dim,
            rank_dim,
            service_dim,
            disciplines,
            gender_balance,
            average_salary,
            rank_shares,
            target_rank_share,
            service_vs_salary,
            phd_vs_salary,
        }
    }

    /// Load the dataset named by the config and build the dashboard
    pub fn load(config: DashboardConfig) -> Result<Self, Error> {
        let records = ingest::load_records_from_path(&config.dataset_path)?;
        Ok(Self::new(records, config))
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn crossfilter(&self) -> &CrossFilter<Record> {
        &self.filter
    }

    pub fn add_records(&mut self, records: Vec<Record>) -> FilterDelta {
        self.filter.add_records(records)
    }

    /// Restrict every chart to one discipline, or clear with `None`
    pub fn select_discipline(
        &mut self,
        discipline: Option<&str>,
    ) -> Result<FilterDelta, AggregateError> {
        match discipline {
            Some(value) => self.filter.filter_exact(&self.discipline_dim, value.to_string()),
            None => self.filter.filter_all(&self.discipline_dim),
        }
    }

    pub fn select_sex(&mut self, sex: Option<Sex>) -> Result<FilterDelta, AggregateError> {
        match sex {
            Some(value) => self.filter.filter_exact(&self.sex_dim, value),
            None => self.filter.filter_all(&self.sex_dim),
        }
    }

    pub fn select_rank(&mut self, rank: Option<Rank>) -> Result<FilterDelta, AggregateError> {
        match rank {
            Some(value) => self.filter.filter_exact(&self.rank_dim, value),
            None => self.filter.filter_all(&self.rank_dim),
        }
    }

    /// Brush the years-of-service axis, `[start, end)`
    pub fn select_service_range(
        &mut self,
        range: Option<Range<i64>>,
    ) -> Result<FilterDelta, AggregateError> {
        match range {
            Some(range) => self.filter.filter_range(&self.service_dim, range),
            None => self.filter.filter_all(&self.service_dim),
        }
    }

    /// Clear every selection
    pub fn reset_selections(&mut self) -> Result<(), AggregateError> {
        self.select_discipline(None)?;
        self.select_sex(None)?;
        self.select_rank(None)?;
        self.select_service_range(None)?;
        Ok(())
    }

    /// Current values of every chart
    pub fn snapshot(&self) -> Result<DashboardSnapshot, AggregateError> {
        let cf = &self.filter;

        let disciplines = cf
            .all_groups(&self.disciplines)?
            .into_iter()
            .map(|(key, count)| GroupValue {
                key: key.clone(),
                value: *count,
            })
            .collect();

        let gender_balance = cf
            .all_groups(&self.gender_balance)?
            .into_iter()
            .map(|(key, count)| GroupValue {
                key: *key,
                value: *count,
            })
            .collect();

        let average_salary_by_sex = cf
            .grouping(&self.average_salary)?
            .values(AverageState::average)
            .into_iter()
            .map(|(key, value)| GroupValue { key: *key, value })
            .collect();

        let mut rank_distribution = Vec::new();
        for (rank, handle) in &self.rank_shares {
            for (sex, percent) in cf.grouping(handle)?.values(RatioState::percent) {
                rank_distribution.push(RankShare {
                    rank: *rank,
                    sex: *sex,
                    percent: self.config.round_percent(percent),
                });
            }
        }

        let target_rank_percent_by_sex = cf
            .grouping(&self.target_rank_share)?
            .values(RatioState::percent)
            .into_iter()
            .map(|(key, value)| GroupValue {
                key: *key,
                value: self.config.round_percent(value),
            })
            .collect();

        Ok(DashboardSnapshot {
            total_records: cf.len(),
            active_records: cf.active_count(),
            disciplines,
            gender_balance,
            average_salary_by_sex,
            rank_distribution,
            target_rank: self.config.target_rank,
            target_rank_percent_by_sex,
            service_vs_salary: self.scatter(&self.service_vs_salary)?,
            phd_vs_salary: self.scatter(&self.phd_vs_salary)?,
        })
    }

    fn scatter(&self, handle: &ScatterHandle) -> Result<Vec<ScatterPoint>, AggregateError> {
        Ok(self
            .filter
            .all_groups(handle)?
            .into_iter()
            .filter(|(_, count)| **count > 0)
            .map(|(&(x, salary, sex), &count)| ScatterPoint { x, salary, sex, count })
            .collect())
    }
}
