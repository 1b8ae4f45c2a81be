use serde::{Deserialize, Serialize};
use std::fmt;

/// Match format, derived from how many players attended a fixture.
///
/// Selects which coefficient column of the rule table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchFormat {
    Small,
    Medium,
    Large,
}

impl MatchFormat {
    pub const ALL: [MatchFormat; 3] = [MatchFormat::Small, MatchFormat::Medium, MatchFormat::Large];

    /// Column label used in the parameter and roster sheets.
    pub fn label(&self) -> &'static str {
        match self {
            MatchFormat::Small => "5-a-side",
            MatchFormat::Medium => "7-a-side",
            MatchFormat::Large => "11-a-side",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        MatchFormat::ALL.into_iter().find(|f| f.label() == label)
    }
}

impl fmt::Display for MatchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Headcount breakpoints between match formats.
///
/// `headcount <= small_max` is Small, `headcount <= medium_max` is Medium,
/// anything above is Large.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FormatBreakpoints {
    pub small_max: u32,
    pub medium_max: u32,
}

impl Default for FormatBreakpoints {
    fn default() -> Self {
        Self {
            small_max: 10,
            medium_max: 16,
        }
    }
}

impl FormatBreakpoints {
    pub fn classify(&self, headcount: u32) -> MatchFormat {
        if headcount <= self.small_max {
            MatchFormat::Small
        } else if headcount <= self.medium_max {
            MatchFormat::Medium
        } else {
            MatchFormat::Large
        }
    }
}
