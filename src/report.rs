use serde::Serialize;

use crate::game::{Game, GameSnapshot};
use crate::roster::{Roster, RosterProvider};
use crate::stats::{PlayerGameStats, PlayerId};

#[derive(Debug, Clone, Serialize)]
pub struct BoxScoreRow {
    pub player_id: PlayerId,
    pub name: Option<String>,
    pub team_id: Option<String>,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub fouls: u32,
    pub fg: String,
    pub three_pt: String,
    pub ft: String,
    pub fg_pct: f64,
    pub three_pt_pct: f64,
    pub ft_pct: f64,
    pub efficiency: u32,
}

impl BoxScoreRow {
    pub fn from_stats(stats: &PlayerGameStats, roster: Option<&Roster>) -> Self {
        let player = roster.and_then(|r| r.player(stats.player_id));
        Self {
            player_id: stats.player_id,
            name: player.map(|p| p.name.clone()),
            team_id: player.map(|p| p.team_id.clone()),
            points: stats.points(),
            rebounds: stats.total_rebounds(),
            assists: stats.assists,
            steals: stats.steals,
            blocks: stats.blocks,
            turnovers: stats.turnovers,
            fouls: stats.personal_fouls,
            fg: format!("{}-{}", stats.field_goals_made, stats.field_goals_attempted),
            three_pt: format!(
                "{}-{}",
                stats.three_pointers_made, stats.three_pointers_attempted
            ),
            ft: format!("{}-{}", stats.free_throws_made, stats.free_throws_attempted),
            fg_pct: round1(stats.field_goal_percentage()),
            three_pt_pct: round1(stats.three_point_percentage()),
            ft_pct: round1(stats.free_throw_percentage()),
            efficiency: stats.efficiency(),
        }
    }
}

/// Box score rows, highest scorer first.
pub fn box_score(game: &Game, roster: Option<&Roster>) -> Vec<BoxScoreRow> {
    let mut rows: Vec<BoxScoreRow> = game
        .player_stats
        .values()
        .map(|stats| BoxScoreRow::from_stats(stats, roster))
        .collect();
    rows.sort_by(|a, b| b.points.cmp(&a.points).then(a.player_id.cmp(&b.player_id)));
    rows
}

pub fn scoreboard_line(snapshot: &GameSnapshot) -> String {
    let game = &snapshot.game;
    format!(
        "{} {} - {} {} | Q{} {} | {} | undo:{}",
        game.home.name,
        game.home_score,
        game.away_score,
        game.away.name,
        game.quarter,
        game.clock_label(),
        snapshot.phase,
        snapshot.history_len
    )
}

pub fn box_score_lines(game: &Game, roster: Option<&Roster>) -> Vec<String> {
    let mut out = vec![format!(
        "{:<22} {:>4} {:>4} {:>4} {:>6} {:>6} {:>6} {:>4}",
        "PLAYER", "PTS", "REB", "AST", "FG", "3PT", "FT", "EFF"
    )];
    for row in box_score(game, roster) {
        let name = row
            .name
            .clone()
            .unwrap_or_else(|| format!("player {}", row.player_id));
        out.push(format!(
            "{:<22} {:>4} {:>4} {:>4} {:>6} {:>6} {:>6} {:>4}",
            truncate(&name, 22),
            row.points,
            row.rebounds,
            row.assists,
            row.fg,
            row.three_pt,
            row.ft,
            row.efficiency
        ));
    }
    out
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn truncate(raw: &str, max: usize) -> String {
    raw.chars().take(max).collect()
}
