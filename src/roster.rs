use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::stats::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
}

impl Position {
    pub fn label(self) -> &'static str {
        match self {
            Position::PointGuard => "Point Guard",
            Position::ShootingGuard => "Shooting Guard",
            Position::SmallForward => "Small Forward",
            Position::PowerForward => "Power Forward",
            Position::Center => "Center",
        }
    }

    pub fn abbr(self) -> &'static str {
        match self {
            Position::PointGuard => "PG",
            Position::ShootingGuard => "SG",
            Position::SmallForward => "SF",
            Position::PowerForward => "PF",
            Position::Center => "C",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: PlayerId,
    pub name: String,
    pub jersey_number: u8,
    pub position: Position,
    pub team_id: String,
}

/// Source of players selectable for stat entry.
pub trait RosterProvider {
    fn player(&self, id: PlayerId) -> Option<&RosterPlayer>;
    fn players_for_team(&self, team_id: &str) -> Vec<&RosterPlayer>;

    fn team_of(&self, id: PlayerId) -> Option<&str> {
        self.player(id).map(|p| p.team_id.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<RosterPlayer>,
    by_id: HashMap<PlayerId, usize>,
}

impl Roster {
    pub fn new(players: Vec<RosterPlayer>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(players.len());
        for (idx, player) in players.iter().enumerate() {
            if by_id.insert(player.id, idx).is_some() {
                return Err(anyhow!("duplicate player id {} in roster", player.id));
            }
        }
        Ok(Self { players, by_id })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let players: Vec<RosterPlayer> =
            serde_json::from_str(raw).context("parse roster json")?;
        Self::new(players)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read roster {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn players(&self) -> &[RosterPlayer] {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Finds a player of `team_id` by jersey number, as typed at the scorer's table.
    pub fn by_jersey(&self, team_id: &str, number: u8) -> Option<&RosterPlayer> {
        self.players
            .iter()
            .find(|p| p.team_id == team_id && p.jersey_number == number)
    }
}

impl RosterProvider for Roster {
    fn player(&self, id: PlayerId) -> Option<&RosterPlayer> {
        self.by_id.get(&id).and_then(|idx| self.players.get(*idx))
    }

    fn players_for_team(&self, team_id: &str) -> Vec<&RosterPlayer> {
        let mut out: Vec<&RosterPlayer> = self
            .players
            .iter()
            .filter(|p| p.team_id == team_id)
            .collect();
        out.sort_by_key(|p| p.jersey_number);
        out
    }
}
