use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date range mapped to a season number.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeasonWindow {
    pub season: u32,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl SeasonWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Season assignment rule: the first window containing a date wins,
/// dates outside every window fall into `fallback`.
///
/// Example YAML:
/// ```yaml
/// seasons:
///   windows:
///     - { season: 1, from: "2023-01-01", to: "2023-07-31" }
///   fallback: 2
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeasonCalendar {
    #[serde(default)]
    pub windows: Vec<SeasonWindow>,
    pub fallback: u32,
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        Self {
            windows: vec![SeasonWindow {
                season: 1,
                from: NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid literal date"),
                to: NaiveDate::from_ymd_opt(2023, 7, 31).expect("valid literal date"),
            }],
            fallback: 2,
        }
    }
}

impl SeasonCalendar {
    pub fn season_of(&self, date: NaiveDate) -> u32 {
        self.windows
            .iter()
            .find(|w| w.contains(date))
            .map(|w| w.season)
            .unwrap_or(self.fallback)
    }
}
