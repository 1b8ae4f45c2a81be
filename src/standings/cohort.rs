use std::collections::BTreeSet;
use std::fmt;

use crate::scoring::ScoredEntry;

/// A set of scored entries aggregated together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cohort {
    Season(u32),
    AllTime,
}

impl Cohort {
    /// `Some(n)` selects a season, `None` the all-time cohort.
    pub fn from_season(season: Option<u32>) -> Self {
        season.map(Cohort::Season).unwrap_or(Cohort::AllTime)
    }

    /// File-name stem: `season1`, `total`.
    pub fn slug(&self) -> String {
        match self {
            Cohort::Season(n) => format!("season{}", n),
            Cohort::AllTime => "total".to_string(),
        }
    }

    pub fn includes(&self, entry: &ScoredEntry) -> bool {
        match self {
            Cohort::Season(n) => entry.season == *n,
            Cohort::AllTime => true,
        }
    }

    pub fn select(&self, entries: &[ScoredEntry]) -> Vec<ScoredEntry> {
        entries.iter().filter(|e| self.includes(e)).cloned().collect()
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cohort::Season(n) => write!(f, "Season {}", n),
            Cohort::AllTime => f.write_str("All-time"),
        }
    }
}

/// Every season present in `entries`, ascending, followed by all-time.
pub fn cohorts_of(entries: &[ScoredEntry]) -> Vec<Cohort> {
    let seasons: BTreeSet<u32> = entries.iter().map(|e| e.season).collect();
    seasons
        .into_iter()
        .map(Cohort::Season)
        .chain(std::iter::once(Cohort::AllTime))
        .collect()
}
