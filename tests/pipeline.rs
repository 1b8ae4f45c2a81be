use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use spl_standings::config::Config;
use spl_standings::error::StandingsError;
use spl_standings::pipeline::{run_all, run_league, select_leagues};
use spl_standings::standings::{min_rank, Cohort};

const PARAMETERS: &str = "\
Parameter,5-a-side,7-a-side,11-a-side
Participation,2,3,4
Goal,1,1,1
Own Goal,-1,-1,-1
SPL Bonus,1,1,1
MVP,3,3,3
Friend Referrals,1,1,1
Penalty,-2,-2,-2
Goalkeeper Score,2,2,2
Defensive Score,5,6,7
Win,3,3,3
Draw,1,1,1
Loss,0,0,0
";

const GAMES: &str = "\
Date,Team A Goals,Team B Goals
2023-03-02,2,1
2023-03-09,0,2
2023-09-14,1,1
";

const POINTS: &str = "\
Date,Player,Team,Game Position,Goals,Own Goals,SPL Bonus,MVP,Friend Referrals,Penalty
2023-03-02,Ada,Team A,,2,0,0,1,0,0
2023-03-02,Bo,Team B,,0,0,0,0,0,0
2023-03-02,Cy,Team A,,0,0,0,0,1,0
2023-03-02,Dee,Team B,,1,0,0,0,0,0
2023-03-09,Ada,Team B,,2,0,0,0,0,0
2023-03-09,Bo,Team A,,0,0,0,0,0,0
2023-03-09,Cy,Team B,,0,0,0,0,0,0
2023-03-09,Dee,Team A,,0,0,0,0,0,1
2023-09-14,Ada,Team A,,1,0,0,0,0,0
2023-09-14,Cy,Team B,,1,0,0,0,0,0
2023-09-14,Dee,Team A,Midfielder,0,0,0,0,0,0
";

const PLAYERS: &str = "\
Player,Position 5-a-side,Position 7-a-side,Position 11-a-side
Ada,Forward,Forward,Forward
Bo,Goalkeeper,Goalkeeper,Goalkeeper
Cy,Midfielder,Midfielder,Midfielder
Dee,Defender,Defender,Defender
";

/// Fresh workspace with one league named `Milano`.
fn workspace(name: &str) -> (PathBuf, Config) {
    let root = env::temp_dir().join("spl_standings_it").join(name);
    let _ = fs::remove_dir_all(&root);
    let league = root.join("Input").join("Milano");
    fs::create_dir_all(&league).unwrap();
    fs::write(league.join("games.csv"), GAMES).unwrap();
    fs::write(league.join("parameters.csv"), PARAMETERS).unwrap();
    fs::write(league.join("points.csv"), POINTS).unwrap();
    fs::write(league.join("players.csv"), PLAYERS).unwrap();

    let config = Config {
        input_dir: root.join("Input"),
        output_dir: root.join("Output"),
        ..Config::default()
    };
    (root, config)
}

/// Read a written table as one map per row, keyed by header.
fn read_table(path: &Path) -> Vec<HashMap<String, String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader.headers().unwrap().clone();
    reader
        .records()
        .map(|r| {
            let record = r.unwrap();
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.to_string(), v.to_string()))
                .collect()
        })
        .collect()
}

fn row<'a>(table: &'a [HashMap<String, String>], player: &str) -> &'a HashMap<String, String> {
    table.iter().find(|r| r["Player"] == player).unwrap()
}

fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .map(|p| (p.file_name().unwrap().to_string_lossy().into_owned(), fs::read(&p).unwrap()))
        .collect();
    files.sort();
    files
}

#[test]
fn test_end_to_end_all_time_standings() {
    let (root, config) = workspace("end_to_end");
    let dirs = select_leagues(&config, None).unwrap();
    run_all(&config, &dirs, true, false).unwrap();

    let out = root.join("Output").join("Milano");
    let total = read_table(&out.join("total.csv"));
    let players: Vec<&str> = total.iter().map(|r| r["Player"].as_str()).collect();
    assert_eq!(players, vec!["Cy", "Ada", "Bo", "Dee"]);

    let cy = row(&total, "Cy");
    assert_eq!(cy["Rank"], "1");
    assert_eq!(cy["Total"], "25.0");
    assert_eq!(cy["Win Ratio"], "67%");

    let ada = row(&total, "Ada");
    assert_eq!(ada["Rank"], "2");
    assert_eq!(ada["Total"], "23.0");
    assert_eq!(ada["Total Goals"], "5");
    // first after game two, second after game three
    assert_eq!(ada["Rank Change"], "-1");

    // 14 points each: shared rank 3
    assert_eq!(row(&total, "Bo")["Rank"], "3");
    let dee = row(&total, "Dee");
    assert_eq!(dee["Rank"], "3");
    assert_eq!(dee["Rank Change"], "1");
    assert_eq!(dee["Win Ratio"], "0%");

    let season1 = read_table(&out.join("season1.csv"));
    let ranks: Vec<(&str, &str)> = season1
        .iter()
        .map(|r| (r["Player"].as_str(), r["Rank"].as_str()))
        .collect();
    assert_eq!(ranks, vec![("Ada", "1"), ("Cy", "1"), ("Bo", "3"), ("Dee", "4")]);

    for file in ["games.csv", "points.csv", "season2.csv", "trajectory_total.csv", "tiers.csv"] {
        assert!(out.join(file).exists(), "missing {}", file);
    }
    assert!(!out.join("fantasy_standings.csv").exists());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_itemized_points_rows() {
    let (root, config) = workspace("itemized");
    let dirs = select_leagues(&config, Some("Milano")).unwrap();
    run_all(&config, &dirs, true, false).unwrap();

    let points = read_table(&root.join("Output").join("Milano").join("points.csv"));
    assert_eq!(points.len(), 11);

    let bo = points
        .iter()
        .find(|r| r["Player"] == "Bo" && r["Date"] == "2023-03-02")
        .unwrap();
    assert_eq!(bo["Position"], "Goalkeeper");
    assert_eq!(bo["Match Type"], "5-a-side");
    assert_eq!(bo["Goals Conceded"], "2");
    assert_eq!(bo["Game Outcome"], "Loss");
    assert_eq!(bo["Goalkeeper Points"], "2.0");
    assert_eq!(bo["Defensive Score Points"], "3.0");
    assert_eq!(bo["Total Points"], "7.0");

    let dee = points
        .iter()
        .find(|r| r["Player"] == "Dee" && r["Date"] == "2023-09-14")
        .unwrap();
    assert_eq!(dee["Position"], "Midfielder");
    assert_eq!(dee["Season"], "2");
    assert_eq!(dee["Gameweek"], "1");

    let games = read_table(&root.join("Output").join("Milano").join("games.csv"));
    let winners: Vec<&str> = games.iter().map(|g| g["Winning Team"].as_str()).collect();
    assert_eq!(winners, vec!["Team A", "Team B", "Draw"]);
    assert_eq!(games[1]["Gameweek"], "2");
    assert_eq!(games[2]["Number of Players"], "3");

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_rerun_is_byte_identical() {
    let (root, config) = workspace("determinism");
    let dirs = select_leagues(&config, None).unwrap();
    let out = root.join("Output").join("Milano");

    run_all(&config, &dirs, true, false).unwrap();
    let first = snapshot(&out);
    run_all(&config, &dirs, true, false).unwrap();
    let second = snapshot(&out);

    assert!(!first.is_empty());
    assert_eq!(first, second);

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_scored_entry_properties() {
    let (root, config) = workspace("properties");
    let report = run_league(&config.input_dir.join("Milano"), &config, false).unwrap();

    for entry in &report.entries {
        let sum: f64 = entry.points.values().iter().sum();
        assert_eq!(entry.total(), sum);
        assert!(entry.points.defensive >= 0.0);
        assert!(entry.points.midfield >= 0.0);
    }
    for cohort in [Cohort::Season(1), Cohort::Season(2), Cohort::AllTime] {
        for summary in report.summaries(cohort) {
            let ratio = summary.win_ratio();
            assert!((0.0..=1.0).contains(&ratio));
        }
    }

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_min_rank_on_ties() {
    assert_eq!(min_rank(&[50.0, 50.0, 40.0]), vec![1, 1, 3]);
}

#[test]
fn test_duplicate_player_row_rejected() {
    let (root, config) = workspace("duplicate");
    let points = config.input_dir.join("Milano").join("points.csv");
    let mut content = fs::read_to_string(&points).unwrap();
    content.push_str("2023-03-02,Ada,Team A,,0,0,0,0,0,0\n");
    fs::write(&points, content).unwrap();

    let dirs = select_leagues(&config, None).unwrap();
    let err = run_all(&config, &dirs, true, false).unwrap_err();
    let typed = err
        .chain()
        .find_map(|e| e.downcast_ref::<StandingsError>())
        .unwrap();
    assert!(matches!(typed, StandingsError::DuplicateEntry { player, .. } if player == "Ada"));
    assert!(!root.join("Output").join("Milano").exists());

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_fixture_without_attendance_rejected() {
    let (root, config) = workspace("no_attendance");
    let games = config.input_dir.join("Milano").join("games.csv");
    fs::write(&games, format!("{}2023-10-01,0,0\n", GAMES)).unwrap();

    let err = run_league(&config.input_dir.join("Milano"), &config, false).unwrap_err();
    let typed = err
        .chain()
        .find_map(|e| e.downcast_ref::<StandingsError>())
        .unwrap();
    assert!(matches!(typed, StandingsError::NoAttendance { .. }));

    let _ = fs::remove_dir_all(&root);
}

#[test]
fn test_unknown_league_filter() {
    let (root, config) = workspace("filter");
    let err = select_leagues(&config, Some("Torino")).unwrap_err();
    assert!(err.to_string().contains("Torino"));
    let _ = fs::remove_dir_all(&root);
}
