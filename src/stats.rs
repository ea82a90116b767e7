use serde::{Deserialize, Serialize};

pub type PlayerId = u32;

/// Largest magnitude a single stat event may carry.
pub const MAX_MAGNITUDE: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    FieldGoalMade,
    FieldGoalMissed,
    ThreePointerMade,
    ThreePointerMissed,
    FreeThrowMade,
    FreeThrowMissed,
    /// Credited as a defensive rebound.
    Rebound,
    OffensiveRebound,
    Assist,
    Steal,
    Block,
    Turnover,
    Foul,
}

impl StatType {
    pub const ALL: [StatType; 13] = [
        StatType::FieldGoalMade,
        StatType::FieldGoalMissed,
        StatType::ThreePointerMade,
        StatType::ThreePointerMissed,
        StatType::FreeThrowMade,
        StatType::FreeThrowMissed,
        StatType::Rebound,
        StatType::OffensiveRebound,
        StatType::Assist,
        StatType::Steal,
        StatType::Block,
        StatType::Turnover,
        StatType::Foul,
    ];

    /// Score change for the credited team when this stat is applied with `delta`.
    ///
    /// A made three is credited as a made field goal (2) plus one extra point, so the
    /// two parts are summed rather than using a flat 3. `None` on overflow.
    pub fn score_delta(self, delta: i32) -> Option<i32> {
        match self {
            StatType::FieldGoalMade => delta.checked_mul(2),
            StatType::ThreePointerMade => delta.checked_mul(2)?.checked_add(delta),
            StatType::FreeThrowMade => Some(delta),
            _ => Some(0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatType::FieldGoalMade => "FG made",
            StatType::FieldGoalMissed => "FG missed",
            StatType::ThreePointerMade => "3PT made",
            StatType::ThreePointerMissed => "3PT missed",
            StatType::FreeThrowMade => "FT made",
            StatType::FreeThrowMissed => "FT missed",
            StatType::Rebound => "Rebound",
            StatType::OffensiveRebound => "Off. rebound",
            StatType::Assist => "Assist",
            StatType::Steal => "Steal",
            StatType::Block => "Block",
            StatType::Turnover => "Turnover",
            StatType::Foul => "Foul",
        }
    }

    /// Short console alias, e.g. `fg`, `3pm`, `ftx`.
    pub fn parse_alias(raw: &str) -> Option<Self> {
        let kind = match raw.trim().to_ascii_lowercase().as_str() {
            "fg" | "fgm" | "2" => StatType::FieldGoalMade,
            "fgx" | "fga" | "2x" => StatType::FieldGoalMissed,
            "3pm" | "3" | "three" => StatType::ThreePointerMade,
            "3px" | "3x" => StatType::ThreePointerMissed,
            "ft" | "ftm" | "1" => StatType::FreeThrowMade,
            "ftx" | "1x" => StatType::FreeThrowMissed,
            "reb" | "dreb" | "rebound" => StatType::Rebound,
            "oreb" => StatType::OffensiveRebound,
            "ast" | "assist" => StatType::Assist,
            "stl" | "steal" => StatType::Steal,
            "blk" | "block" => StatType::Block,
            "to" | "tov" | "turnover" => StatType::Turnover,
            "pf" | "foul" => StatType::Foul,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGameStats {
    pub player_id: PlayerId,
    pub minutes_played: u32,

    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub three_pointers_made: u32,
    pub three_pointers_attempted: u32,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,

    pub offensive_rebounds: u32,
    pub defensive_rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub personal_fouls: u32,
}

impl PlayerGameStats {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            ..Self::default()
        }
    }

    /// Applies the counter changes for one stat event. Undo calls this with the
    /// negated delta.
    pub fn apply(&mut self, stat: StatType, delta: i32) {
        for counter in self.counters_mut(stat) {
            *counter = counter.saturating_add_signed(delta);
        }
    }

    /// The line after applying `delta`, or `None` when a counter would leave the
    /// `u32` range. Leaves `self` untouched.
    pub fn checked_apply(&self, stat: StatType, delta: i32) -> Option<Self> {
        let mut next = self.clone();
        for counter in next.counters_mut(stat) {
            *counter = counter.checked_add_signed(delta)?;
        }
        Some(next)
    }

    fn counters_mut(&mut self, stat: StatType) -> Vec<&mut u32> {
        match stat {
            StatType::FieldGoalMade => {
                vec![&mut self.field_goals_made, &mut self.field_goals_attempted]
            }
            StatType::FieldGoalMissed => vec![&mut self.field_goals_attempted],
            StatType::ThreePointerMade => vec![
                &mut self.three_pointers_made,
                &mut self.three_pointers_attempted,
                &mut self.field_goals_made,
                &mut self.field_goals_attempted,
            ],
            StatType::ThreePointerMissed => vec![
                &mut self.three_pointers_attempted,
                &mut self.field_goals_attempted,
            ],
            StatType::FreeThrowMade => {
                vec![&mut self.free_throws_made, &mut self.free_throws_attempted]
            }
            StatType::FreeThrowMissed => vec![&mut self.free_throws_attempted],
            StatType::Rebound => vec![&mut self.defensive_rebounds],
            StatType::OffensiveRebound => vec![&mut self.offensive_rebounds],
            StatType::Assist => vec![&mut self.assists],
            StatType::Steal => vec![&mut self.steals],
            StatType::Block => vec![&mut self.blocks],
            StatType::Turnover => vec![&mut self.turnovers],
            StatType::Foul => vec![&mut self.personal_fouls],
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::new(self.player_id)
    }

    pub fn total_rebounds(&self) -> u32 {
        self.offensive_rebounds + self.defensive_rebounds
    }

    pub fn points(&self) -> u32 {
        let twos = self.field_goals_made.saturating_sub(self.three_pointers_made);
        twos.saturating_mul(2)
            .saturating_add(self.three_pointers_made.saturating_mul(3))
            .saturating_add(self.free_throws_made)
    }

    pub fn field_goal_percentage(&self) -> f64 {
        percentage(self.field_goals_made, self.field_goals_attempted)
    }

    pub fn three_point_percentage(&self) -> f64 {
        percentage(self.three_pointers_made, self.three_pointers_attempted)
    }

    pub fn free_throw_percentage(&self) -> f64 {
        percentage(self.free_throws_made, self.free_throws_attempted)
    }

    pub fn missed_field_goals(&self) -> u32 {
        self.field_goals_attempted
            .saturating_sub(self.field_goals_made)
    }

    pub fn missed_free_throws(&self) -> u32 {
        self.free_throws_attempted
            .saturating_sub(self.free_throws_made)
    }

    /// Simple efficiency: positive box-score contributions minus misses and
    /// turnovers, never below zero.
    pub fn efficiency(&self) -> u32 {
        let plus = i64::from(self.points())
            + i64::from(self.total_rebounds())
            + i64::from(self.assists)
            + i64::from(self.steals)
            + i64::from(self.blocks);
        let minus = i64::from(self.missed_field_goals())
            + i64::from(self.missed_free_throws())
            + i64::from(self.turnovers);
        u32::try_from((plus - minus).max(0)).unwrap_or(u32::MAX)
    }

    pub fn shooting_is_consistent(&self) -> bool {
        self.field_goals_attempted >= self.field_goals_made
            && self.three_pointers_attempted >= self.three_pointers_made
            && self.free_throws_attempted >= self.free_throws_made
            && self.field_goals_made >= self.three_pointers_made
            && self.field_goals_attempted >= self.three_pointers_attempted
    }

    /// Adds another game's counters into this record (season totals).
    pub fn accumulate(&mut self, other: &PlayerGameStats) {
        self.minutes_played += other.minutes_played;
        self.field_goals_made += other.field_goals_made;
        self.field_goals_attempted += other.field_goals_attempted;
        self.three_pointers_made += other.three_pointers_made;
        self.three_pointers_attempted += other.three_pointers_attempted;
        self.free_throws_made += other.free_throws_made;
        self.free_throws_attempted += other.free_throws_attempted;
        self.offensive_rebounds += other.offensive_rebounds;
        self.defensive_rebounds += other.defensive_rebounds;
        self.assists += other.assists;
        self.steals += other.steals;
        self.blocks += other.blocks;
        self.turnovers += other.turnovers;
        self.personal_fouls += other.personal_fouls;
    }
}

pub fn percentage(made: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        f64::from(made) / f64::from(attempted) * 100.0
    }
}
