//! # Common Types
//!
//! This module contains the record type loaded from the salary dataset and the
//! categorical values it carries. Every grouping in the crate is keyed by a
//! projection of these fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sex of a faculty member as recorded in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// All variants in key order.
    pub const ALL: [Sex; 2] = [Sex::Female, Sex::Male];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Female" => Ok(Sex::Female),
            "Male" => Ok(Sex::Male),
            _ => Err(()),
        }
    }
}

/// Academic rank, ordered from junior to senior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    AsstProf,
    AssocProf,
    Prof,
}

impl Rank {
    /// All variants in key order.
    pub const ALL: [Rank; 3] = [Rank::AsstProf, Rank::AssocProf, Rank::Prof];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::AsstProf => "AsstProf",
            Rank::AssocProf => "AssocProf",
            Rank::Prof => "Prof",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rank {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AsstProf" => Ok(Rank::AsstProf),
            "AssocProf" => Ok(Rank::AssocProf),
            "Prof" => Ok(Rank::Prof),
            _ => Err(()),
        }
    }
}

/// One row of the salary dataset.
///
/// Records are immutable once ingested. Numeric fields have already been
/// parsed and validated by [`crate::ingest`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Department category (`A` for theoretical, `B` for applied in the source data)
    pub discipline: String,
    pub sex: Sex,
    pub rank: Rank,
    /// Nine-month salary in dollars
    pub salary: i64,
    /// Years of service at the institution
    pub yrs_service: i64,
    /// Years since the PhD was awarded
    pub yrs_since_phd: i64,
}

impl Record {
    pub fn new(
        discipline: impl Into<String>,
        sex: Sex,
        rank: Rank,
        salary: i64,
        yrs_service: i64,
        yrs_since_phd: i64,
    ) -> Self {
        Self {
            discipline: discipline.into(),
            sex,
            rank,
            salary,
            yrs_service,
            yrs_since_phd,
        }
    }
}
