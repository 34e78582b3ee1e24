use serde::Serialize;

use crate::error::Error;
use crate::types::{Rank, Sex};

/// One bar or slice: a group key and its display value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupValue<K, V> {
    pub key: K,
    pub value: V,
}

/// Share of one rank among the active records of one sex, as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankShare {
    pub rank: Rank,
    pub sex: Sex,
    pub percent: f64,
}

/// One dot of a salary scatter plot.
///
/// `count` is the number of active records sharing the same coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScatterPoint {
    pub x: i64,
    pub salary: i64,
    pub sex: Sex,
    pub count: u64,
}

/// Everything a renderer needs to draw the dashboard for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub total_records: usize,
    pub active_records: usize,
    pub disciplines: Vec<GroupValue<String, u64>>,
    pub gender_balance: Vec<GroupValue<Sex, u64>>,
    pub average_salary_by_sex: Vec<GroupValue<Sex, f64>>,
    /// Stacked by rank within each sex
    pub rank_distribution: Vec<RankShare>,
    pub target_rank: Rank,
    pub target_rank_percent_by_sex: Vec<GroupValue<Sex, f64>>,
    pub service_vs_salary: Vec<ScatterPoint>,
    pub phd_vs_salary: Vec<ScatterPoint>,
}

impl DashboardSnapshot {
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn gender_count(&self, sex: Sex) -> u64 {
        self.gender_balance
            .iter()
            .find(|group| group.key == sex)
            .map_or(0, |group| group.value)
    }

    pub fn average_salary(&self, sex: Sex) -> f64 {
        self.average_salary_by_sex
            .iter()
            .find(|group| group.key == sex)
            .map_or(0.0, |group| group.value)
    }

    pub fn rank_percent(&self, sex: Sex, rank: Rank) -> f64 {
        self.rank_distribution
            .iter()
            .find(|share| share.sex == sex && share.rank == rank)
            .map_or(0.0, |share| share.percent)
    }
}
