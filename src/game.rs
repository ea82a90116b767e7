use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::{PlayerGameStats, PlayerId, StatType};

pub const DEFAULT_QUARTER_SECS: u32 = 12 * 60;
pub const DEFAULT_REGULATION_QUARTERS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Setup,
    Running,
    Paused,
    QuarterBreak,
    Completed,
}

impl GamePhase {
    pub fn label(self) -> &'static str {
        match self {
            GamePhase::Setup => "setup",
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::QuarterBreak => "quarter break",
            GamePhase::Completed => "completed",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: String,
    pub name: String,
}

impl TeamRef {
    /// Builds a team reference whose id is a slug of the display name.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim().to_string();
        Self {
            id: team_slug(&name),
            name,
        }
    }
}

/// Lowercase ASCII alphanumeric words joined by `-` ("LA Lakers" -> "la-lakers").
pub fn team_slug(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScore {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    pub home: TeamRef,
    pub away: TeamRef,
    pub home_score: u32,
    pub away_score: u32,
    pub quarter: u8,
    pub time_remaining: u32,
    pub is_live: bool,
    pub is_completed: bool,
    /// Running score at the end of each regulation quarter; `None` until it ends.
    pub quarter_scores: Vec<Option<QuarterScore>>,
    pub player_stats: HashMap<PlayerId, PlayerGameStats>,
    #[serde(default)]
    pub timeouts: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn new(home: TeamRef, away: TeamRef, quarter_secs: u32, quarters: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            home,
            away,
            home_score: 0,
            away_score: 0,
            quarter: 1,
            time_remaining: quarter_secs,
            is_live: false,
            is_completed: false,
            quarter_scores: vec![None; usize::from(quarters)],
            player_stats: HashMap::new(),
            timeouts: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.home_score,
            Side::Away => self.away_score,
        }
    }

    pub fn team(&self, side: Side) -> &TeamRef {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Adds `delta` to one side's score. Returns `None`, leaving the score as it
    /// was, when the result would leave the `u32` range.
    pub(crate) fn add_score(&mut self, side: Side, delta: i32) -> Option<u32> {
        let score = match side {
            Side::Home => &mut self.home_score,
            Side::Away => &mut self.away_score,
        };
        *score = score.checked_add_signed(delta)?;
        Some(*score)
    }

    pub fn side_of_team(&self, team_id: &str) -> Option<Side> {
        if self.home.id == team_id {
            Some(Side::Home)
        } else if self.away.id == team_id {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn winner(&self) -> Option<Side> {
        if !self.is_completed {
            return None;
        }
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(Side::Home),
            std::cmp::Ordering::Less => Some(Side::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// "mm:ss" of the time remaining in the current quarter.
    pub fn clock_label(&self) -> String {
        format!("{:02}:{:02}", self.time_remaining / 60, self.time_remaining % 60)
    }

    pub fn stats_for(&self, player_id: PlayerId) -> Option<&PlayerGameStats> {
        self.player_stats.get(&player_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatAction {
    pub player_id: PlayerId,
    pub stat: StatType,
    pub value: i32,
    pub timestamp: DateTime<Utc>,
    pub quarter: u8,
    /// Team whose score was credited when the action was recorded.
    pub credited: Side,
    /// Whether recording this action created the player's stat line.
    #[serde(default)]
    pub created_line: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub game: Game,
    pub phase: GamePhase,
    pub history_len: usize,
    pub can_undo: bool,
}
