use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use courtside::season::{player_season_lines, team_season_stats};
use courtside::sim_feed::random_stat;
use courtside::stats::StatType;
use courtside::tracker::LiveGameTracker;

fn events(n: usize) -> Vec<(u32, StatType)> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..n)
        .map(|_| (rng.gen_range(1..=24), random_stat(&mut rng)))
        .collect()
}

fn configured() -> LiveGameTracker {
    let mut tracker = LiveGameTracker::default();
    tracker
        .configure("Lakers", "Celtics")
        .expect("configure");
    tracker
}

fn bench_record_and_undo(c: &mut Criterion) {
    let script = events(400);
    c.bench_function("record_400_then_undo_all", |b| {
        b.iter(|| {
            let mut tracker = configured();
            for (player, stat) in &script {
                tracker.record_stat(*player, *stat, 1).unwrap();
            }
            while tracker.undo_last_action().is_ok() {}
            black_box(tracker.game().home_score);
        })
    });
}

fn bench_full_game_clock(c: &mut Criterion) {
    c.bench_function("tick_four_quarters", |b| {
        b.iter(|| {
            let mut tracker = configured();
            while !tracker.game().is_completed {
                tracker.toggle_clock().unwrap();
                for _ in 0..720 {
                    tracker.tick();
                }
            }
            black_box(tracker.game().quarter);
        })
    });
}

fn bench_season_aggregate(c: &mut Criterion) {
    let script = events(200);
    let mut tracker = configured();
    for _ in 0..82 {
        for (player, stat) in &script {
            tracker.record_stat(*player, *stat, 1).unwrap();
        }
        tracker.end_game().unwrap();
        tracker.reset_game().unwrap();
    }
    let games = tracker.completed_games().to_vec();

    c.bench_function("season_82_games", |b| {
        b.iter(|| {
            let team = team_season_stats(black_box(&games), "lakers", None);
            let lines = player_season_lines(black_box(&games));
            black_box((team.games_played, lines.len()));
        })
    });
}

criterion_group!(
    benches,
    bench_record_and_undo,
    bench_full_game_clock,
    bench_season_aggregate
);
criterion_main!(benches);
