pub mod formatter;
pub mod writer;

pub use formatter::{
    format_leaderboard, format_leaderboard_json, format_leaderboard_tsv, format_points,
    format_rank_change, format_win_ratio, should_use_colors,
};
pub use writer::{
    rows, write_csv, CsvRow, FantasyPickRow, FantasyStandingRow, GameRow, PointsRow, SummaryRow,
    TierRow, TrajectoryRow,
};
