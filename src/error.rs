use thiserror::Error;

use crate::game::GamePhase;
use crate::stats::{PlayerId, StatType};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("{op} rejected: {reason}")]
    InvalidTransition { op: &'static str, reason: String },

    #[error("nothing to undo")]
    EmptyHistory,

    #[error("stat magnitude must be between 1 and {max}, got {0}", max = crate::stats::MAX_MAGNITUDE)]
    InvalidMagnitude(i32),

    #[error("{stat:?} x{value} for player {player_id} would overflow the box score")]
    CounterOverflow {
        player_id: PlayerId,
        stat: StatType,
        value: i32,
    },
}

impl TrackerError {
    pub(crate) fn phase(op: &'static str, phase: GamePhase) -> Self {
        Self::InvalidTransition {
            op,
            reason: format!("game is {}", phase.label()),
        }
    }

    pub(crate) fn unconfigured(op: &'static str) -> Self {
        Self::InvalidTransition {
            op,
            reason: "no teams configured".to_string(),
        }
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
