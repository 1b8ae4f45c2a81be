use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fantasy::FantasyConfig;
use crate::games::{FormatBreakpoints, SeasonCalendar};
use crate::tiers::TierConfig;

fn default_input_dir() -> PathBuf {
    PathBuf::from("Input")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Output")
}

/// Top-level configuration file.
///
/// Example YAML:
/// ```yaml
/// input_dir: Input
/// output_dir: Output
/// seasons:
///   windows:
///     - season: 1
///       from: "2023-01-01"
///       to: "2023-07-31"
///   fallback: 2
/// match_formats:
///   small_max: 10
///   medium_max: 16
/// tiers:
///   season: 1
/// fantasy:
///   season: 2
/// ```
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// One sub-directory per league
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub seasons: SeasonCalendar,
    #[serde(default)]
    pub match_formats: FormatBreakpoints,
    #[serde(default)]
    pub tiers: TierConfig,
    #[serde(default)]
    pub fantasy: FantasyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            seasons: SeasonCalendar::default(),
            match_formats: FormatBreakpoints::default(),
            tiers: TierConfig::default(),
            fantasy: FantasyConfig::default(),
        }
    }
}
