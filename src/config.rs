use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::game::{DEFAULT_QUARTER_SECS, DEFAULT_REGULATION_QUARTERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringRule {
    /// Every score change is credited to the home team.
    HomeOnly,
    /// The credited team follows the player's roster team.
    TeamAware,
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub quarter_secs: u32,
    pub regulation_quarters: u8,
    pub scoring_rule: ScoringRule,
    pub tick_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            quarter_secs: DEFAULT_QUARTER_SECS,
            regulation_quarters: DEFAULT_REGULATION_QUARTERS,
            scoring_rule: ScoringRule::HomeOnly,
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Self {
        let quarter_secs = env::var("QUARTER_SECS")
            .ok()
            .and_then(|val| val.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_QUARTER_SECS)
            .clamp(60, 3600);
        let regulation_quarters = env::var("REGULATION_QUARTERS")
            .ok()
            .and_then(|val| val.trim().parse::<u8>().ok())
            .unwrap_or(DEFAULT_REGULATION_QUARTERS)
            .clamp(1, 8);
        let scoring_rule = env::var("SCORING_RULE")
            .ok()
            .and_then(|val| parse_scoring_rule(&val))
            .unwrap_or(ScoringRule::HomeOnly);
        let tick_interval = Duration::from_millis(
            env::var("TICK_MILLIS")
                .ok()
                .and_then(|val| val.trim().parse::<u64>().ok())
                .unwrap_or(1000)
                .max(10),
        );
        Self {
            quarter_secs,
            regulation_quarters,
            scoring_rule,
            tick_interval,
        }
    }
}

pub fn parse_scoring_rule(raw: &str) -> Option<ScoringRule> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "home" | "home_only" => Some(ScoringRule::HomeOnly),
        "team" | "team_aware" => Some(ScoringRule::TeamAware),
        _ => None,
    }
}

pub fn roster_path_from_env() -> Option<PathBuf> {
    opt_env("ROSTER_PATH").map(PathBuf::from)
}

pub fn sim_feed_enabled() -> bool {
    matches!(
        opt_env("SIM_FEED").as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}
