use std::collections::HashMap;

use serde::Serialize;

use crate::game::{Game, Side};
use crate::roster::RosterProvider;
use crate::stats::{PlayerGameStats, PlayerId, percentage};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamSeasonStats {
    pub team_id: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub average_points: f64,
    pub average_points_allowed: f64,
    pub field_goal_percentage: f64,
    pub three_point_percentage: f64,
    pub free_throw_percentage: f64,
    pub rebounds_per_game: f64,
    pub assists_per_game: f64,
    pub turnovers_per_game: f64,
}

impl TeamSeasonStats {
    pub fn win_percentage(&self) -> f64 {
        percentage(self.wins, self.games_played)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeasonLine {
    pub player_id: PlayerId,
    pub games: u32,
    pub totals: PlayerGameStats,
}

impl PlayerSeasonLine {
    pub fn points_per_game(&self) -> f64 {
        per_game(self.totals.points(), self.games)
    }

    pub fn rebounds_per_game(&self) -> f64 {
        per_game(self.totals.total_rebounds(), self.games)
    }

    pub fn assists_per_game(&self) -> f64 {
        per_game(self.totals.assists, self.games)
    }

    pub fn efficiency_per_game(&self) -> f64 {
        per_game(self.totals.efficiency(), self.games)
    }
}

/// Season summary for one team over completed games.
///
/// Box-score columns (shooting, rebounds, assists, turnovers) only count players the
/// roster places on the team; without a roster they stay at zero.
pub fn team_season_stats(
    games: &[Game],
    team_id: &str,
    roster: Option<&dyn RosterProvider>,
) -> TeamSeasonStats {
    let mut out = TeamSeasonStats {
        team_id: team_id.to_string(),
        ..TeamSeasonStats::default()
    };
    let mut points_for = 0u64;
    let mut points_against = 0u64;
    let mut totals = PlayerGameStats::new(0);

    for game in games.iter().filter(|g| g.is_completed) {
        let Some(side) = game.side_of_team(team_id) else {
            continue;
        };
        let other = match side {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        };
        out.games_played += 1;
        match game.winner() {
            Some(winner) if winner == side => out.wins += 1,
            Some(_) => out.losses += 1,
            None => {}
        }
        points_for += u64::from(game.score(side));
        points_against += u64::from(game.score(other));

        if let Some(roster) = roster {
            for line in game.player_stats.values() {
                if roster.team_of(line.player_id) == Some(team_id) {
                    totals.accumulate(line);
                }
            }
        }
    }

    if out.games_played == 0 {
        return out;
    }
    let gp = f64::from(out.games_played);
    out.average_points = points_for as f64 / gp;
    out.average_points_allowed = points_against as f64 / gp;
    out.field_goal_percentage = totals.field_goal_percentage();
    out.three_point_percentage = totals.three_point_percentage();
    out.free_throw_percentage = totals.free_throw_percentage();
    out.rebounds_per_game = f64::from(totals.total_rebounds()) / gp;
    out.assists_per_game = f64::from(totals.assists) / gp;
    out.turnovers_per_game = f64::from(totals.turnovers) / gp;
    out
}

/// Per-player totals across completed games, highest scoring first.
pub fn player_season_lines(games: &[Game]) -> Vec<PlayerSeasonLine> {
    let mut lines: HashMap<PlayerId, PlayerSeasonLine> = HashMap::new();
    for game in games.iter().filter(|g| g.is_completed) {
        for stats in game.player_stats.values() {
            let entry = lines
                .entry(stats.player_id)
                .or_insert_with(|| PlayerSeasonLine {
                    player_id: stats.player_id,
                    games: 0,
                    totals: PlayerGameStats::new(stats.player_id),
                });
            entry.games += 1;
            entry.totals.accumulate(stats);
        }
    }
    let mut out: Vec<PlayerSeasonLine> = lines.into_values().collect();
    out.sort_by(|a, b| {
        b.totals
            .points()
            .cmp(&a.totals.points())
            .then(a.player_id.cmp(&b.player_id))
    });
    out
}

fn per_game(total: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        f64::from(total) / f64::from(games)
    }
}
