use std::collections::VecDeque;
use std::sync::mpsc::Sender;

use chrono::Utc;

use crate::clock::GameClock;
use crate::config::{ScoringRule, TrackerConfig};
use crate::error::{TrackerError, TrackerResult};
use crate::game::{Game, GamePhase, GameSnapshot, QuarterScore, Side, StatAction, TeamRef};
use crate::roster::{Roster, RosterProvider};
use crate::stats::{MAX_MAGNITUDE, PlayerGameStats, PlayerId, StatType};

const MAX_LOGS: usize = 200;

/// Everything that can change the tracker, whether typed by the scorekeeper or
/// produced by the running clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCommand {
    Configure { home: String, away: String },
    ToggleClock,
    ResetClock,
    AdvanceQuarter,
    Timeout,
    EndGame,
    ResetGame,
    RecordStat {
        player_id: PlayerId,
        stat: StatType,
        value: i32,
    },
    Undo,
    Tick { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock not running, or the tick came from a cancelled clock.
    Ignored,
    Counted,
    QuarterEnded,
    GameEnded,
}

pub struct LiveGameTracker {
    config: TrackerConfig,
    game: Game,
    phase: GamePhase,
    configured: bool,
    history: Vec<StatAction>,
    roster: Option<Roster>,
    completed: Vec<Game>,
    logs: VecDeque<String>,
    clock: Option<GameClock>,
    clock_generation: u64,
    tick_tx: Option<Sender<TrackerCommand>>,
}

impl Default for LiveGameTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl LiveGameTracker {
    /// A tracker without a background clock; time only moves through `tick()`.
    pub fn new(config: TrackerConfig) -> Self {
        let game = Game::new(
            TeamRef {
                id: String::new(),
                name: String::new(),
            },
            TeamRef {
                id: String::new(),
                name: String::new(),
            },
            config.quarter_secs,
            config.regulation_quarters,
        );
        Self {
            config,
            game,
            phase: GamePhase::Setup,
            configured: false,
            history: Vec::new(),
            roster: None,
            completed: Vec::new(),
            logs: VecDeque::with_capacity(MAX_LOGS),
            clock: None,
            clock_generation: 0,
            tick_tx: None,
        }
    }

    /// A tracker whose clock sends `TrackerCommand::Tick` into `tx` while live.
    pub fn with_clock_sink(config: TrackerConfig, tx: Sender<TrackerCommand>) -> Self {
        let mut tracker = Self::new(config);
        tracker.tick_tx = Some(tx);
        tracker
    }

    pub fn set_roster(&mut self, roster: Roster) {
        self.roster = Some(roster);
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn history(&self) -> &[StatAction] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty() && self.phase != GamePhase::Completed
    }

    /// Whether `record_stat` would currently be accepted (given a valid magnitude).
    pub fn accepts_stats(&self) -> bool {
        self.ensure_active("record_stat").is_ok()
    }

    pub fn logs(&self) -> &VecDeque<String> {
        &self.logs
    }

    /// Games finished and then replaced through `reset_game`, oldest first.
    pub fn completed_games(&self) -> &[Game] {
        &self.completed
    }

    pub fn clock_generation(&self) -> u64 {
        self.clock_generation
    }

    pub fn clock_running(&self) -> bool {
        self.clock.as_ref().is_some_and(GameClock::is_running)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game: self.game.clone(),
            phase: self.phase,
            history_len: self.history.len(),
            can_undo: self.can_undo(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn configure(&mut self, home_name: &str, away_name: &str) -> TrackerResult<()> {
        self.configure_teams(TeamRef::from_name(home_name), TeamRef::from_name(away_name))
    }

    /// Like `configure`, with explicit team ids (used to match roster team ids).
    pub fn configure_teams(&mut self, home: TeamRef, away: TeamRef) -> TrackerResult<()> {
        if self.phase != GamePhase::Setup {
            return Err(TrackerError::phase("configure", self.phase));
        }
        if home.name.trim().is_empty() || away.name.trim().is_empty() {
            return Err(TrackerError::InvalidTransition {
                op: "configure",
                reason: "team names must not be empty".to_string(),
            });
        }
        if home.id.is_empty() || away.id.is_empty() || home.id == away.id {
            return Err(TrackerError::InvalidTransition {
                op: "configure",
                reason: format!("team ids must be distinct ({} / {})", home.id, away.id),
            });
        }

        self.stop_clock();
        self.game = Game::new(
            home,
            away,
            self.config.quarter_secs,
            self.config.regulation_quarters,
        );
        self.history.clear();
        self.configured = true;
        tracing::info!(
            game_id = %self.game.id,
            home = %self.game.home.name,
            away = %self.game.away.name,
            "game configured"
        );
        self.push_log(format!(
            "[INFO] New game: {} vs {}",
            self.game.home.name, self.game.away.name
        ));
        Ok(())
    }

    /// Starts or stops the clock. Returns whether the clock is live afterwards.
    pub fn toggle_clock(&mut self) -> TrackerResult<bool> {
        self.ensure_active("toggle_clock")?;
        if self.game.is_live {
            self.stop_clock();
            self.phase = GamePhase::Paused;
            self.push_log(format!("[INFO] Clock stopped at {}", self.game.clock_label()));
        } else {
            self.start_clock();
            self.push_log(format!(
                "[INFO] Clock running, Q{} {}",
                self.game.quarter,
                self.game.clock_label()
            ));
        }
        Ok(self.game.is_live)
    }

    /// Advances the game clock by one second while it is live.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.game.is_live || self.phase != GamePhase::Running {
            return TickOutcome::Ignored;
        }
        self.game.time_remaining = self.game.time_remaining.saturating_sub(1);
        if self.game.time_remaining > 0 {
            return TickOutcome::Counted;
        }

        self.stop_clock();
        self.push_log(format!("[INFO] End of Q{}", self.game.quarter));
        if let Err(err) = self.advance_quarter() {
            tracing::warn!(%err, "automatic quarter advance rejected");
        }
        if self.phase == GamePhase::Completed {
            TickOutcome::GameEnded
        } else {
            TickOutcome::QuarterEnded
        }
    }

    /// Applies a tick from the background clock, dropping ticks from cancelled clocks.
    pub fn on_clock_tick(&mut self, generation: u64) -> TickOutcome {
        if self.clock.is_none() || generation != self.clock_generation {
            tracing::trace!(generation, current = self.clock_generation, "stale tick");
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    pub fn advance_quarter(&mut self) -> TrackerResult<()> {
        self.ensure_active("advance_quarter")?;
        self.stop_clock();

        let quarter = self.game.quarter;
        let snapshot = QuarterScore {
            home: self.game.home_score,
            away: self.game.away_score,
        };
        match usize::from(quarter)
            .checked_sub(1)
            .and_then(|idx| self.game.quarter_scores.get_mut(idx))
        {
            Some(slot) => *slot = Some(snapshot),
            None => {
                tracing::warn!(quarter, "quarter outside tracked range, score not recorded");
                self.push_log(format!("[WARN] Q{quarter} score not recorded"));
            }
        }

        if quarter < self.config.regulation_quarters {
            self.game.quarter = quarter + 1;
            self.game.time_remaining = self.config.quarter_secs;
            self.phase = GamePhase::QuarterBreak;
            tracing::info!(quarter = self.game.quarter, "quarter advanced");
            self.push_log(format!(
                "[INFO] Q{} ready ({}-{})",
                self.game.quarter, self.game.home_score, self.game.away_score
            ));
        } else {
            self.finish_game();
        }
        Ok(())
    }

    /// Stops a running clock for a called timeout. No effect when the clock is stopped.
    pub fn timeout(&mut self) -> TrackerResult<()> {
        self.ensure_active("timeout")?;
        if !self.game.is_live {
            return Ok(());
        }
        self.stop_clock();
        self.phase = GamePhase::Paused;
        self.game.timeouts += 1;
        self.push_log(format!(
            "[INFO] Timeout, Q{} {}",
            self.game.quarter,
            self.game.clock_label()
        ));
        Ok(())
    }

    pub fn reset_clock(&mut self) -> TrackerResult<()> {
        self.ensure_active("reset_clock")?;
        self.stop_clock();
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
        }
        self.game.time_remaining = self.config.quarter_secs;
        self.push_log(format!("[INFO] Clock reset to {}", self.game.clock_label()));
        Ok(())
    }

    /// Ends the game. Calling it on a completed game changes nothing.
    pub fn end_game(&mut self) -> TrackerResult<()> {
        if !self.configured {
            return Err(TrackerError::unconfigured("end_game"));
        }
        if self.phase == GamePhase::Completed {
            return Ok(());
        }
        self.finish_game();
        Ok(())
    }

    /// Starts a new contest between the same teams.
    pub fn reset_game(&mut self) -> TrackerResult<()> {
        if !self.configured {
            return Err(TrackerError::unconfigured("reset_game"));
        }
        self.stop_clock();
        let fresh = Game::new(
            self.game.home.clone(),
            self.game.away.clone(),
            self.config.quarter_secs,
            self.config.regulation_quarters,
        );
        let previous = std::mem::replace(&mut self.game, fresh);
        if previous.is_completed {
            self.completed.push(previous);
        }
        self.history.clear();
        self.phase = GamePhase::Setup;
        tracing::info!(game_id = %self.game.id, "game reset");
        self.push_log("[INFO] Game reset");
        Ok(())
    }

    pub fn record_stat(
        &mut self,
        player_id: PlayerId,
        stat: StatType,
        value: i32,
    ) -> TrackerResult<()> {
        self.ensure_active("record_stat")?;
        if !(1..=MAX_MAGNITUDE).contains(&value) {
            return Err(TrackerError::InvalidMagnitude(value));
        }

        let overflow = TrackerError::CounterOverflow {
            player_id,
            stat,
            value,
        };
        let created_line = !self.game.player_stats.contains_key(&player_id);
        let next_line = self
            .game
            .player_stats
            .get(&player_id)
            .cloned()
            .unwrap_or_else(|| PlayerGameStats::new(player_id))
            .checked_apply(stat, value)
            .ok_or_else(|| overflow.clone())?;
        let score_delta = stat.score_delta(value).ok_or_else(|| overflow.clone())?;

        let credited = self.scoring_side(player_id);
        // Only the score can still fail; nothing else has changed yet.
        self.game
            .add_score(credited, score_delta)
            .ok_or(overflow)?;
        self.game.player_stats.insert(player_id, next_line);
        self.history.push(StatAction {
            player_id,
            stat,
            value,
            timestamp: Utc::now(),
            quarter: self.game.quarter,
            credited,
            created_line,
        });

        tracing::debug!(player_id, ?stat, value, ?credited, "stat recorded");
        let line = format!(
            "[INFO] Q{} {} {} {}{}",
            self.game.quarter,
            self.game.clock_label(),
            self.player_label(player_id),
            stat.label(),
            if value > 1 { format!(" x{value}") } else { String::new() }
        );
        self.push_log(line);
        Ok(())
    }

    /// Reverts the most recent stat event and returns it.
    pub fn undo_last_action(&mut self) -> TrackerResult<StatAction> {
        self.ensure_active("undo_last_action")?;
        let action = self.history.pop().ok_or(TrackerError::EmptyHistory)?;

        if let Some(line) = self.game.player_stats.get_mut(&action.player_id) {
            line.apply(action.stat, -action.value);
            if action.created_line && line.is_empty() {
                self.game.player_stats.remove(&action.player_id);
            }
        }
        // Recorded events passed the same checks, so the reverse always fits.
        let restored = action
            .stat
            .score_delta(-action.value)
            .and_then(|delta| self.game.add_score(action.credited, delta));
        if restored.is_none() {
            tracing::warn!(player_id = action.player_id, stat = ?action.stat, "score not reverted");
        }

        tracing::debug!(player_id = action.player_id, stat = ?action.stat, "stat undone");
        let line = format!(
            "[INFO] Undo {} {}",
            self.player_label(action.player_id),
            action.stat.label()
        );
        self.push_log(line);
        Ok(action)
    }

    fn ensure_active(&self, op: &'static str) -> TrackerResult<()> {
        if !self.configured {
            return Err(TrackerError::unconfigured(op));
        }
        if self.phase == GamePhase::Completed {
            return Err(TrackerError::phase(op, self.phase));
        }
        Ok(())
    }

    fn scoring_side(&mut self, player_id: PlayerId) -> Side {
        if self.config.scoring_rule == ScoringRule::HomeOnly {
            return Side::Home;
        }
        let side = self
            .roster
            .as_ref()
            .and_then(|roster| roster.team_of(player_id))
            .and_then(|team_id| self.game.side_of_team(team_id));
        match side {
            Some(side) => side,
            None => {
                tracing::warn!(player_id, "player not on either roster, crediting home");
                self.push_log(format!(
                    "[WARN] Player {player_id} not on either roster, crediting home"
                ));
                Side::Home
            }
        }
    }

    fn player_label(&self, player_id: PlayerId) -> String {
        match self.roster.as_ref().and_then(|r| r.player(player_id)) {
            Some(p) => format!("#{} {}", p.jersey_number, p.name),
            None => format!("player {player_id}"),
        }
    }

    fn start_clock(&mut self) {
        self.game.is_live = true;
        self.phase = GamePhase::Running;
        if let Some(tx) = &self.tick_tx {
            self.clock_generation += 1;
            self.clock = Some(GameClock::start(
                self.config.tick_interval,
                self.clock_generation,
                tx.clone(),
            ));
            tracing::debug!(generation = self.clock_generation, "clock started");
        }
    }

    fn stop_clock(&mut self) {
        self.game.is_live = false;
        if let Some(mut clock) = self.clock.take() {
            clock.stop();
            tracing::debug!(generation = clock.generation(), "clock stopped");
        }
        // Anything still queued from the old clock is now stale.
        self.clock_generation += 1;
    }

    fn finish_game(&mut self) {
        self.stop_clock();
        self.game.is_completed = true;
        self.game.completed_at = Some(Utc::now());
        self.phase = GamePhase::Completed;
        self.finalize_player_stats();
        tracing::info!(
            game_id = %self.game.id,
            home = self.game.home_score,
            away = self.game.away_score,
            "game completed"
        );
        self.push_log(format!(
            "[INFO] Final: {} {} - {} {}",
            self.game.home.name, self.game.home_score, self.game.away_score, self.game.away.name
        ));
    }

    // Reserved for end-of-game aggregates; stat lines are left as recorded.
    fn finalize_player_stats(&mut self) {
        let leader = self
            .game
            .player_stats
            .values()
            .max_by_key(|line| (line.points(), std::cmp::Reverse(line.player_id)))
            .filter(|line| line.points() > 0)
            .map(|line| (line.player_id, line.points()));
        if let Some((player_id, points)) = leader {
            let label = self.player_label(player_id);
            self.push_log(format!("[INFO] Top scorer: {label} ({points} pts)"));
        }
    }
}

/// Applies one command to the tracker. Rejections are also written to the tracker log.
pub fn apply_command(tracker: &mut LiveGameTracker, cmd: TrackerCommand) -> TrackerResult<()> {
    let result = match cmd {
        TrackerCommand::Configure { home, away } => tracker.configure(&home, &away),
        TrackerCommand::ToggleClock => tracker.toggle_clock().map(|_| ()),
        TrackerCommand::ResetClock => tracker.reset_clock(),
        TrackerCommand::AdvanceQuarter => tracker.advance_quarter(),
        TrackerCommand::Timeout => tracker.timeout(),
        TrackerCommand::EndGame => tracker.end_game(),
        TrackerCommand::ResetGame => tracker.reset_game(),
        TrackerCommand::RecordStat {
            player_id,
            stat,
            value,
        } => tracker.record_stat(player_id, stat, value),
        TrackerCommand::Undo => tracker.undo_last_action().map(|_| ()),
        TrackerCommand::Tick { generation } => {
            tracker.on_clock_tick(generation);
            Ok(())
        }
    };
    if let Err(err) = &result {
        tracing::warn!(%err, "command rejected");
        tracker.push_log(format!("[WARN] {err}"));
    }
    result
}
