pub mod format;
pub mod preprocess;
pub mod season;

pub use format::{FormatBreakpoints, MatchFormat};
pub use preprocess::{preprocess_games, winner_of, GameRecord, Team, Winner};
pub use season::{SeasonCalendar, SeasonWindow};
