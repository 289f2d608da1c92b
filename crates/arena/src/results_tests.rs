use super::*;

fn entry(engine1: &str, engine2: &str, wins: u32, losses: u32, draws: u32) -> MatchEntry {
    MatchEntry {
        engine1: engine1.to_string(),
        engine2: engine2.to_string(),
        result: MatchResult {
            wins,
            losses,
            draws,
        },
        games: Vec::new(),
    }
}

#[test]
fn test_match_result_score() {
    let mut result = MatchResult::new();
    assert_eq!(result.score(), 0.5);
    result.record(GameResult::Win);
    result.record(GameResult::Draw);
    result.record(GameResult::Loss.flipped());
    assert_eq!(result.total_games(), 3);
    assert!((result.score() - 2.5 / 3.0).abs() < 1e-12);
    assert!(result.elo_difference() > 0.0);

    let even = MatchResult {
        wins: 2,
        losses: 2,
        draws: 0,
    };
    assert!(even.elo_difference().abs() < 1e-9);

    let shutout = MatchResult {
        wins: 0,
        losses: 10,
        draws: 0,
    };
    assert!(shutout.elo_difference().is_finite());
    assert!(shutout.elo_difference() < -700.0);
}

#[test]
fn test_game_record_result_for() {
    let record = GameRecord {
        first: "a".into(),
        second: "b".into(),
        seed: 3,
        winner: Some(1),
        moves: vec!["c1xd1".into(), "resign".into()],
        fallbacks: 0,
        duration_ms: 4,
    };
    assert_eq!(record.plies(), 2);
    assert_eq!(record.result_for(1), GameResult::Win);
    assert_eq!(record.result_for(0), GameResult::Loss);

    let drawn = GameRecord {
        winner: None,
        ..record
    };
    assert_eq!(drawn.result_for(0), GameResult::Draw);
}

#[test]
fn test_standings_and_report() {
    let mut results = TournamentResults::new(
        "tzaar-lite",
        vec!["ab".into(), "uct".into(), "random".into()],
        4,
    );
    results.add_match(entry("ab", "uct", 2, 1, 1));
    results.add_match(entry("ab", "random", 4, 0, 0));
    results.add_match(entry("uct", "random", 3, 1, 0));

    let standings = results.standings();
    assert_eq!(standings[0], ("ab".to_string(), 6.5, 8));
    assert_eq!(standings[1], ("uct".to_string(), 4.5, 8));
    assert_eq!(standings[2], ("random".to_string(), 1.0, 8));

    let report = results.generate_report();
    assert!(report.contains("tzaar-lite"));
    assert!(report.contains(" 1. ab"));
    assert!(report.contains(" 3. random"));
}

#[test]
fn test_save_and_load() {
    let mut results = TournamentResults::new("tzaar-lite", vec!["a".into(), "b".into()], 1);
    results.add_match(entry("a", "b", 1, 0, 0));

    let path = std::env::temp_dir().join(format!("arena_results_{}.json", std::process::id()));
    results.save(&path).unwrap();
    let loaded = TournamentResults::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, results);

    assert!(matches!(
        TournamentResults::load(&path),
        Err(ArenaError::Io { .. })
    ));
}
