use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use courtside::config::{self, TrackerConfig};
use courtside::report;
use courtside::roster::{Roster, RosterPlayer};
use courtside::stats::{PlayerId, StatType};
use courtside::tracker::LiveGameTracker;

#[derive(Debug, Deserialize)]
struct ReplayScript {
    home: String,
    away: String,
    #[serde(default)]
    scoring_rule: Option<String>,
    #[serde(default)]
    roster: Vec<RosterPlayer>,
    steps: Vec<ReplayStep>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum ReplayStep {
    Stat {
        player_id: PlayerId,
        stat: StatType,
        #[serde(default = "one")]
        value: i32,
    },
    Undo,
    ToggleClock,
    Tick {
        #[serde(default = "one_sec")]
        seconds: u32,
    },
    Timeout,
    ResetClock,
    NextQuarter,
    EndGame,
}

fn one() -> i32 {
    1
}

fn one_sec() -> u32 {
    1
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/replay_script.json"));

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let script: ReplayScript = serde_json::from_str(&raw).context("parse replay script")?;

    let mut cfg = TrackerConfig::default();
    if let Some(rule) = script.scoring_rule.as_deref() {
        cfg.scoring_rule = config::parse_scoring_rule(rule)
            .ok_or_else(|| anyhow!("unknown scoring_rule {rule:?}"))?;
    }
    let mut tracker = LiveGameTracker::new(cfg);
    if !script.roster.is_empty() {
        tracker.set_roster(Roster::new(script.roster)?);
    }
    tracker.configure(&script.home, &script.away)?;

    // Replays are offline: clock time only moves through explicit `tick` steps.
    for (idx, step) in script.steps.into_iter().enumerate() {
        let res = match step {
            ReplayStep::Stat {
                player_id,
                stat,
                value,
            } => tracker.record_stat(player_id, stat, value),
            ReplayStep::Undo => tracker.undo_last_action().map(|_| ()),
            ReplayStep::ToggleClock => tracker.toggle_clock().map(|_| ()),
            ReplayStep::Tick { seconds } => {
                for _ in 0..seconds {
                    tracker.tick();
                }
                Ok(())
            }
            ReplayStep::Timeout => tracker.timeout(),
            ReplayStep::ResetClock => tracker.reset_clock(),
            ReplayStep::NextQuarter => tracker.advance_quarter(),
            ReplayStep::EndGame => tracker.end_game(),
        };
        if let Err(err) = res {
            eprintln!("step {idx}: {err}");
        }
    }

    let out = serde_json::json!({
        "snapshot": tracker.snapshot(),
        "box_score": report::box_score(tracker.game(), tracker.roster()),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
