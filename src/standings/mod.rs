pub mod cohort;
pub mod rank;
pub mod summary;

pub use cohort::{cohorts_of, Cohort};
pub use rank::{ensure_unique_entries, latest_rank_changes, min_rank, rank_trajectory, round2, TrajectoryPoint};
pub use summary::{build_standings, PlayerSummary, Standings};
