mod types;

pub use types::{AttendanceRow, FixtureRow, RosterRow};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::StandingsError;
use crate::fantasy::FantasyTeam;
use crate::scoring::{ParameterSheet, RuleTable};

pub const GAMES_FILE: &str = "games.csv";
pub const PARAMETERS_FILE: &str = "parameters.csv";
pub const POINTS_FILE: &str = "points.csv";
pub const PLAYERS_FILE: &str = "players.csv";
pub const FANTASY_FILE: &str = "fantasy.csv";

const GAMES_COLUMNS: &[&str] = &["Date", "Team A Goals", "Team B Goals"];
const POINTS_COLUMNS: &[&str] = &[
    "Date",
    "Player",
    "Team",
    "Game Position",
    "Goals",
    "Own Goals",
    "SPL Bonus",
    "MVP",
    "Friend Referrals",
    "Penalty",
];
const PLAYERS_COLUMNS: &[&str] = &[
    "Player",
    "Position 5-a-side",
    "Position 7-a-side",
    "Position 11-a-side",
];
const FANTASY_COLUMNS: &[&str] = &["Owner", "Team"];

/// The four record sets of one league, plus optional fantasy teams.
#[derive(Debug, Clone)]
pub struct LeagueDataset {
    pub name: String,
    pub fixtures: Vec<FixtureRow>,
    pub rules: RuleTable,
    pub attendance: Vec<AttendanceRow>,
    pub roster: HashMap<String, RosterRow>,
    pub fantasy: Option<Vec<FantasyTeam>>,
}

/// Find league directories: every `<input_dir>/*/games.csv`, sorted by path.
pub fn discover_leagues(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*/{}",
        glob::Pattern::escape(&input_dir.to_string_lossy()),
        GAMES_FILE
    );
    let mut dirs = Vec::new();
    for entry in glob::glob(&pattern).context("Invalid input directory pattern")? {
        let path = entry.context("Failed to read input directory entry")?;
        if let Some(parent) = path.parent() {
            dirs.push(parent.to_path_buf());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// League name: the directory's final component.
pub fn league_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Load every record set of the league in `dir`.
pub fn load_league(dir: &Path) -> Result<LeagueDataset> {
    let fixtures: Vec<FixtureRow> = read_table(&dir.join(GAMES_FILE), GAMES_COLUMNS)?;
    let sheet = read_parameter_sheet(&dir.join(PARAMETERS_FILE))?;
    let rules = RuleTable::from_sheet(PARAMETERS_FILE, &sheet)?;
    let attendance: Vec<AttendanceRow> = read_table(&dir.join(POINTS_FILE), POINTS_COLUMNS)?;
    let roster_rows: Vec<RosterRow> = read_table(&dir.join(PLAYERS_FILE), PLAYERS_COLUMNS)?;

    let mut roster = HashMap::with_capacity(roster_rows.len());
    for row in roster_rows {
        if roster.contains_key(&row.player) {
            return Err(StandingsError::DuplicatePlayer {
                table: PLAYERS_FILE.to_string(),
                player: row.player,
            }
            .into());
        }
        roster.insert(row.player.clone(), row);
    }

    let fantasy_path = dir.join(FANTASY_FILE);
    let fantasy = if fantasy_path.exists() {
        Some(read_fantasy_teams(&fantasy_path)?)
    } else {
        None
    };

    Ok(LeagueDataset {
        name: league_name(dir),
        fixtures,
        rules,
        attendance,
        roster,
        fantasy,
    })
}

fn open_reader(path: &Path) -> Result<csv::Reader<File>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(csv::ReaderBuilder::new().trim(csv::Trim::Fields).from_reader(file))
}

fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn require_columns(
    table: &str,
    headers: &csv::StringRecord,
    required: &[&str],
) -> Result<(), StandingsError> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(StandingsError::MissingColumn {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Read a CSV table into typed rows after checking its header names.
fn read_table<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    let table = table_name(path);
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();
    require_columns(&table, &headers, required)?;

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            // +2: header line, 1-based
            row.with_context(|| format!("{}: invalid row on line {}", table, i + 2))
        })
        .collect()
}

/// Read `parameters.csv`: a `Parameter` column then one column per format.
/// Blank cells are left out of the sheet.
pub fn read_parameter_sheet(path: &Path) -> Result<ParameterSheet> {
    let table = table_name(path);
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();
    if headers.get(0) != Some("Parameter") {
        return Err(StandingsError::MissingColumn {
            table,
            column: "Parameter".to_string(),
        }
        .into());
    }

    let mut sheet = ParameterSheet::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to read {}", path.display()))?;
        let Some(key) = record.get(0).filter(|k| !k.is_empty()) else {
            continue;
        };
        if sheet.contains_key(key) {
            anyhow::bail!("{}: parameter '{}' is defined more than once", table, key);
        }
        let mut row = std::collections::BTreeMap::new();
        for (label, cell) in headers.iter().zip(record.iter()).skip(1) {
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell.parse().with_context(|| {
                format!("{}: '{}' for {} is not a number: '{}'", table, key, label, cell)
            })?;
            row.insert(label.to_string(), value);
        }
        sheet.insert(key.to_string(), row);
    }
    Ok(sheet)
}

/// Read `fantasy.csv`: `Owner`, `Team`, then any number of pick columns
/// holding comma-separated player names.
pub fn read_fantasy_teams(path: &Path) -> Result<Vec<FantasyTeam>> {
    let table = table_name(path);
    let mut reader = open_reader(path)?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .clone();
    require_columns(&table, &headers, FANTASY_COLUMNS)?;

    let mut teams = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to read {}", path.display()))?;
        let mut owner = String::new();
        let mut name = String::new();
        let mut picks = Vec::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            match header {
                "Owner" => owner = cell.to_string(),
                "Team" => name = cell.to_string(),
                _ => picks.extend(
                    cell.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(str::to_string),
                ),
            }
        }
        if name.is_empty() {
            continue;
        }
        teams.push(FantasyTeam { owner, name, picks });
    }
    Ok(teams)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    pub(crate) const PARAMETERS_CSV: &str = "\
Parameter,5-a-side,7-a-side,11-a-side
Participation,2,2,2
Goal,1,1,1
Own Goal,-1,-1,-1
SPL Bonus,1,1,1
MVP,3,3,3
Friend Referrals,1,1,1
Penalty,-2,-2,-2
Goalkeeper Score,2,2,2
Defensive Score,5,5,5
Win,3,3,3
Draw,1,1,1
Loss,0,0,0
";

    fn temp_league(name: &str) -> PathBuf {
        let dir = env::temp_dir().join("spl_standings_dataset_tests").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_minimal(dir: &Path) {
        fs::write(dir.join(GAMES_FILE), "Date,Team A Goals,Team B Goals\n2023-03-02,2,1\n").unwrap();
        fs::write(dir.join(PARAMETERS_FILE), PARAMETERS_CSV).unwrap();
        fs::write(
            dir.join(POINTS_FILE),
            "Date,Player,Team,Game Position,Goals,Own Goals,SPL Bonus,MVP,Friend Referrals,Penalty\n\
             2023-03-02,Ada,Team A,,2,,,1,,\n\
             2023-03-02,Bo,Team B,Goalkeeper,0,0,0,0,0,0\n",
        )
        .unwrap();
        fs::write(
            dir.join(PLAYERS_FILE),
            "Player,Position 5-a-side,Position 7-a-side,Position 11-a-side\n\
             Ada,Forward,Midfielder,Midfielder\n\
             Bo,Defender,,\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_minimal_league() {
        let dir = temp_league("Milano");
        write_minimal(&dir);

        let league = load_league(&dir).unwrap();
        assert_eq!(league.name, "Milano");
        assert_eq!(league.fixtures.len(), 1);
        assert_eq!(league.fixtures[0].date, NaiveDate::from_ymd_opt(2023, 3, 2).unwrap());
        assert_eq!(league.attendance.len(), 2);
        assert_eq!(league.attendance[0].game_position, None);
        assert_eq!(league.attendance[0].goals, 2);
        assert_eq!(league.attendance[0].own_goals, 0);
        assert_eq!(league.attendance[0].mvp, 1);
        assert_eq!(league.attendance[1].game_position.as_deref(), Some("Goalkeeper"));
        assert_eq!(league.roster["Bo"].position_medium, None);
        assert_eq!(league.rules.formats().len(), 3);
        assert!(league.fantasy.is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let dir = temp_league("NoGoals");
        write_minimal(&dir);
        fs::write(dir.join(GAMES_FILE), "Date,Team A Goals\n2023-03-02,2\n").unwrap();

        let err = load_league(&dir).unwrap_err();
        let schema = err.downcast_ref::<StandingsError>().unwrap();
        assert_eq!(
            schema,
            &StandingsError::MissingColumn {
                table: GAMES_FILE.to_string(),
                column: "Team B Goals".to_string(),
            }
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_header_names_are_exact() {
        let dir = temp_league("PaddedHeader");
        write_minimal(&dir);
        fs::write(dir.join(GAMES_FILE), "Date,Team A Goals, Team B Goals\n2023-03-02,2,1\n").unwrap();

        let err = load_league(&dir).unwrap_err();
        let schema = err.downcast_ref::<StandingsError>().unwrap();
        assert_eq!(
            schema,
            &StandingsError::MissingColumn {
                table: GAMES_FILE.to_string(),
                column: "Team B Goals".to_string(),
            }
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_duplicate_roster_player() {
        let dir = temp_league("Twins");
        write_minimal(&dir);
        fs::write(
            dir.join(PLAYERS_FILE),
            "Player,Position 5-a-side,Position 7-a-side,Position 11-a-side\nAda,Forward,,\nAda,Defender,,\n",
        )
        .unwrap();

        let err = load_league(&dir).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StandingsError>(),
            Some(StandingsError::DuplicatePlayer { .. })
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_fantasy_picks_split() {
        let dir = temp_league("Fanta");
        fs::write(
            dir.join(FANTASY_FILE),
            "Owner,Team,Pick 1,Pick 2\nOlga,Rockets,\"Ada, Bo\",Cy\nIvo,Falcons,Ada,\n",
        )
        .unwrap();

        let teams = read_fantasy_teams(&dir.join(FANTASY_FILE)).unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].picks, vec!["Ada", "Bo", "Cy"]);
        assert_eq!(teams[1].name, "Falcons");
        assert_eq!(teams[1].picks, vec!["Ada"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_discover_leagues_sorted() {
        let root = env::temp_dir().join("spl_standings_discover_test");
        let _ = fs::remove_dir_all(&root);
        for name in ["Torino", "Milano", "Empty"] {
            fs::create_dir_all(root.join(name)).unwrap();
        }
        fs::write(root.join("Torino").join(GAMES_FILE), "").unwrap();
        fs::write(root.join("Milano").join(GAMES_FILE), "").unwrap();

        let leagues = discover_leagues(&root).unwrap();
        let names: Vec<_> = leagues.iter().map(|d| league_name(d)).collect();
        assert_eq!(names, vec!["Milano", "Torino"]);

        let _ = fs::remove_dir_all(&root);
    }
}
