use courtside::error::TrackerError;
use courtside::game::GamePhase;
use courtside::stats::{MAX_MAGNITUDE, StatType};
use courtside::tracker::{LiveGameTracker, TrackerCommand, apply_command};

const PLAYER_A: u32 = 23;

fn lakers_celtics() -> LiveGameTracker {
    let mut tracker = LiveGameTracker::default();
    tracker
        .configure("Lakers", "Celtics")
        .expect("fresh tracker accepts configure");
    tracker
}

#[test]
fn made_field_goal_credits_two_points_to_home() {
    let mut tracker = lakers_celtics();
    tracker
        .record_stat(PLAYER_A, StatType::FieldGoalMade, 1)
        .unwrap();

    let game = tracker.game();
    assert_eq!(game.home_score, 2);
    assert_eq!(game.away_score, 0);
    let line = game.stats_for(PLAYER_A).expect("line created on first event");
    assert_eq!(line.field_goals_made, 1);
    assert_eq!(line.field_goals_attempted, 1);
    assert_eq!(tracker.history_len(), 1);
}

#[test]
fn made_three_counts_as_field_goal_plus_extra_point() {
    let mut tracker = lakers_celtics();
    tracker
        .record_stat(PLAYER_A, StatType::ThreePointerMade, 1)
        .unwrap();

    let line = tracker.game().stats_for(PLAYER_A).unwrap();
    assert_eq!(line.field_goals_made, 1);
    assert_eq!(line.field_goals_attempted, 1);
    assert_eq!(line.three_pointers_made, 1);
    assert_eq!(line.three_pointers_attempted, 1);
    assert_eq!(line.points(), 3);
    assert_eq!(tracker.game().home_score, 3);
}

#[test]
fn missed_free_throw_only_counts_the_attempt() {
    let mut tracker = lakers_celtics();
    tracker
        .record_stat(PLAYER_A, StatType::FreeThrowMissed, 1)
        .unwrap();

    let line = tracker.game().stats_for(PLAYER_A).unwrap();
    assert_eq!(line.free_throws_attempted, 1);
    assert_eq!(line.free_throws_made, 0);
    assert_eq!(tracker.game().home_score, 0);
}

#[test]
fn non_scoring_stats_leave_score_alone() {
    let mut tracker = lakers_celtics();
    for stat in [
        StatType::Rebound,
        StatType::OffensiveRebound,
        StatType::Assist,
        StatType::Steal,
        StatType::Block,
        StatType::Turnover,
        StatType::Foul,
    ] {
        tracker.record_stat(PLAYER_A, stat, 1).unwrap();
    }
    let line = tracker.game().stats_for(PLAYER_A).unwrap();
    assert_eq!(line.defensive_rebounds, 1);
    assert_eq!(line.offensive_rebounds, 1);
    assert_eq!(line.total_rebounds(), 2);
    assert_eq!(line.assists, 1);
    assert_eq!(line.steals, 1);
    assert_eq!(line.blocks, 1);
    assert_eq!(line.turnovers, 1);
    assert_eq!(line.personal_fouls, 1);
    assert_eq!(tracker.game().home_score, 0);
}

#[test]
fn magnitude_scales_counters_and_score() {
    let mut tracker = lakers_celtics();
    tracker
        .record_stat(PLAYER_A, StatType::FreeThrowMade, 2)
        .unwrap();
    assert_eq!(tracker.game().home_score, 2);
    assert_eq!(tracker.game().stats_for(PLAYER_A).unwrap().free_throws_made, 2);

    let err = tracker
        .record_stat(PLAYER_A, StatType::FreeThrowMade, 0)
        .unwrap_err();
    assert_eq!(err, TrackerError::InvalidMagnitude(0));
    assert_eq!(tracker.history_len(), 1);
}

#[test]
fn oversized_magnitudes_are_rejected_without_touching_state() {
    let mut tracker = lakers_celtics();
    tracker
        .record_stat(PLAYER_A, StatType::FreeThrowMade, 1)
        .unwrap();
    let before = tracker.game().clone();

    for stat in [
        StatType::FieldGoalMade,
        StatType::ThreePointerMade,
        StatType::FreeThrowMade,
        StatType::Rebound,
    ] {
        for value in [i32::MAX, MAX_MAGNITUDE + 1, i32::MIN] {
            let err = tracker.record_stat(PLAYER_A, stat, value).unwrap_err();
            assert_eq!(err, TrackerError::InvalidMagnitude(value));
        }
    }
    assert_eq!(tracker.game(), &before);
    assert_eq!(tracker.history_len(), 1);

    // The console path reports the same rejection.
    let result = apply_command(
        &mut tracker,
        TrackerCommand::RecordStat {
            player_id: 12,
            stat: StatType::FieldGoalMade,
            value: 2_000_000_000,
        },
    );
    assert_eq!(result, Err(TrackerError::InvalidMagnitude(2_000_000_000)));
    assert!(tracker.game().stats_for(12).is_none());
}

#[test]
fn repeated_large_magnitudes_undo_exactly() {
    let mut tracker = lakers_celtics();
    let before = tracker.game().clone();

    for _ in 0..50 {
        tracker
            .record_stat(PLAYER_A, StatType::ThreePointerMade, MAX_MAGNITUDE)
            .unwrap();
        tracker
            .record_stat(PLAYER_A, StatType::FreeThrowMade, MAX_MAGNITUDE)
            .unwrap();
    }
    let per_round = 3 * MAX_MAGNITUDE as u32 + MAX_MAGNITUDE as u32;
    assert_eq!(tracker.game().home_score, 50 * per_round);
    assert_eq!(
        tracker.game().stats_for(PLAYER_A).unwrap().points(),
        50 * per_round
    );

    while tracker.undo_last_action().is_ok() {}
    assert_eq!(tracker.game().home_score, before.home_score);
    assert_eq!(tracker.game().player_stats, before.player_stats);
}

#[test]
fn configure_rejects_blank_names_and_running_games() {
    let mut tracker = LiveGameTracker::default();
    assert!(tracker.configure("  ", "Celtics").unwrap_err().is_invalid_transition());
    assert!(!tracker.is_configured());

    tracker.configure("Lakers", "Celtics").unwrap();
    tracker.toggle_clock().unwrap();
    assert!(tracker.configure("Bulls", "Knicks").unwrap_err().is_invalid_transition());
    assert_eq!(tracker.game().home.name, "Lakers");
}

#[test]
fn operations_before_configure_are_rejected() {
    let mut tracker = LiveGameTracker::default();
    assert!(
        tracker
            .record_stat(PLAYER_A, StatType::Assist, 1)
            .unwrap_err()
            .is_invalid_transition()
    );
    assert!(tracker.toggle_clock().unwrap_err().is_invalid_transition());
    assert!(tracker.reset_game().unwrap_err().is_invalid_transition());
    assert_eq!(tracker.phase(), GamePhase::Setup);
}

#[test]
fn undo_with_empty_history_is_rejected() {
    let mut tracker = lakers_celtics();
    assert_eq!(
        tracker.undo_last_action().unwrap_err(),
        TrackerError::EmptyHistory
    );
    assert!(!tracker.can_undo());
}

#[test]
fn clock_toggles_between_running_and_paused() {
    let mut tracker = lakers_celtics();
    assert!(tracker.toggle_clock().unwrap());
    assert_eq!(tracker.phase(), GamePhase::Running);
    assert!(tracker.game().is_live);

    assert!(!tracker.toggle_clock().unwrap());
    assert_eq!(tracker.phase(), GamePhase::Paused);
    assert!(!tracker.game().is_live);
}

#[test]
fn timeout_stops_running_clock_only() {
    let mut tracker = lakers_celtics();
    tracker.timeout().unwrap();
    assert_eq!(tracker.game().timeouts, 0);

    tracker.toggle_clock().unwrap();
    tracker.tick();
    tracker.record_stat(PLAYER_A, StatType::FieldGoalMade, 1).unwrap();
    tracker.timeout().unwrap();

    let game = tracker.game();
    assert!(!game.is_live);
    assert_eq!(tracker.phase(), GamePhase::Paused);
    assert_eq!(game.quarter, 1);
    assert_eq!(game.time_remaining, 719);
    assert_eq!(game.home_score, 2);
    assert_eq!(game.timeouts, 1);
}

#[test]
fn reset_clock_keeps_quarter_score_and_stats() {
    let mut tracker = lakers_celtics();
    tracker.advance_quarter().unwrap();
    tracker.toggle_clock().unwrap();
    for _ in 0..30 {
        tracker.tick();
    }
    tracker.record_stat(PLAYER_A, StatType::Steal, 1).unwrap();
    tracker.reset_clock().unwrap();

    let game = tracker.game();
    assert_eq!(game.time_remaining, 720);
    assert!(!game.is_live);
    assert_eq!(game.quarter, 2);
    assert_eq!(game.stats_for(PLAYER_A).unwrap().steals, 1);
}

#[test]
fn manual_quarter_advance_snapshots_score_and_waits_for_restart() {
    let mut tracker = lakers_celtics();
    tracker.toggle_clock().unwrap();
    tracker.record_stat(PLAYER_A, StatType::FieldGoalMade, 1).unwrap();
    tracker.advance_quarter().unwrap();

    let game = tracker.game();
    assert_eq!(game.quarter, 2);
    assert_eq!(game.time_remaining, 720);
    assert!(!game.is_live);
    assert_eq!(tracker.phase(), GamePhase::QuarterBreak);
    let q1 = game.quarter_scores[0].expect("first quarter recorded");
    assert_eq!((q1.home, q1.away), (2, 0));
    assert!(game.quarter_scores[1].is_none());
}

#[test]
fn advancing_past_fourth_quarter_completes_game() {
    let mut tracker = lakers_celtics();
    for _ in 0..4 {
        tracker.advance_quarter().unwrap();
    }
    let game = tracker.game();
    assert!(game.is_completed);
    assert!(!game.is_live);
    assert_eq!(game.quarter, 4);
    assert!(game.quarter_scores.iter().all(Option::is_some));
    assert!(game.completed_at.is_some());
    assert!(tracker.advance_quarter().unwrap_err().is_invalid_transition());
}

#[test]
fn end_game_is_idempotent_and_freezes_the_game() {
    let mut tracker = lakers_celtics();
    tracker.record_stat(PLAYER_A, StatType::FieldGoalMade, 1).unwrap();
    tracker.toggle_clock().unwrap();
    tracker.end_game().unwrap();

    let before = tracker.snapshot();
    tracker.end_game().unwrap();
    let after = tracker.snapshot();
    assert_eq!(before.game, after.game);
    assert_eq!(after.phase, GamePhase::Completed);
    assert!(!after.can_undo);

    assert!(
        tracker
            .record_stat(PLAYER_A, StatType::FieldGoalMade, 1)
            .unwrap_err()
            .is_invalid_transition()
    );
    assert!(tracker.undo_last_action().unwrap_err().is_invalid_transition());
    assert!(tracker.toggle_clock().unwrap_err().is_invalid_transition());
    assert!(tracker.timeout().unwrap_err().is_invalid_transition());
    assert!(tracker.reset_clock().unwrap_err().is_invalid_transition());
    assert_eq!(tracker.game().home_score, 2);
}

#[test]
fn reset_game_clears_everything_but_the_teams() {
    let mut tracker = lakers_celtics();
    let first_id = tracker.game().id;
    tracker.toggle_clock().unwrap();
    tracker.record_stat(PLAYER_A, StatType::ThreePointerMade, 1).unwrap();
    tracker.record_stat(7, StatType::Rebound, 1).unwrap();
    tracker.advance_quarter().unwrap();
    tracker.reset_game().unwrap();

    let game = tracker.game();
    assert_ne!(game.id, first_id);
    assert_eq!((game.home_score, game.away_score), (0, 0));
    assert_eq!(game.quarter, 1);
    assert_eq!(game.time_remaining, 720);
    assert!(game.player_stats.is_empty());
    assert!(game.quarter_scores.iter().all(Option::is_none));
    assert_eq!(tracker.history_len(), 0);
    assert_eq!(game.home.name, "Lakers");
    assert_eq!(game.away.name, "Celtics");
    assert_eq!(tracker.phase(), GamePhase::Setup);
    // Unfinished games are discarded, not archived.
    assert!(tracker.completed_games().is_empty());
}

#[test]
fn reset_after_completion_archives_the_finished_game() {
    let mut tracker = lakers_celtics();
    tracker.record_stat(PLAYER_A, StatType::FieldGoalMade, 1).unwrap();
    tracker.end_game().unwrap();
    let finished_id = tracker.game().id;

    tracker.reset_game().unwrap();
    assert_eq!(tracker.completed_games().len(), 1);
    assert_eq!(tracker.completed_games()[0].id, finished_id);
    assert!(!tracker.game().is_completed);
    tracker.record_stat(PLAYER_A, StatType::FieldGoalMade, 1).unwrap();
    assert_eq!(tracker.game().home_score, 2);
}

#[test]
fn apply_command_routes_and_logs_rejections() {
    let mut tracker = LiveGameTracker::default();
    let err = apply_command(&mut tracker, TrackerCommand::Undo).unwrap_err();
    assert!(err.is_invalid_transition());
    assert!(tracker.logs().back().is_some_and(|l| l.starts_with("[WARN]")));

    apply_command(
        &mut tracker,
        TrackerCommand::Configure {
            home: "Lakers".to_string(),
            away: "Celtics".to_string(),
        },
    )
    .unwrap();
    apply_command(
        &mut tracker,
        TrackerCommand::RecordStat {
            player_id: PLAYER_A,
            stat: StatType::FieldGoalMade,
            value: 1,
        },
    )
    .unwrap();
    assert_eq!(tracker.game().home_score, 2);
    apply_command(&mut tracker, TrackerCommand::Undo).unwrap();
    assert_eq!(tracker.game().home_score, 0);
}

#[test]
fn snapshot_serializes_for_observers() {
    let mut tracker = lakers_celtics();
    tracker.record_stat(PLAYER_A, StatType::Assist, 1).unwrap();
    let json = serde_json::to_value(tracker.snapshot()).expect("snapshot serializes");
    assert_eq!(json["phase"], "setup");
    assert_eq!(json["history_len"], 1);
    assert_eq!(json["can_undo"], true);
    assert_eq!(json["game"]["home"]["id"], "lakers");
}

#[test]
fn stats_are_accepted_only_between_configure_and_final() {
    let mut tracker = LiveGameTracker::default();
    assert!(!tracker.accepts_stats());
    tracker.configure("Lakers", "Celtics").unwrap();
    assert!(tracker.accepts_stats());
    tracker.end_game().unwrap();
    assert!(!tracker.accepts_stats());
    tracker.reset_game().unwrap();
    assert!(tracker.accepts_stats());
}
