use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;

use courtside::config::{self, TrackerConfig};
use courtside::game::{Game, GamePhase};
use courtside::persist;
use courtside::report;
use courtside::roster::{Roster, RosterProvider};
use courtside::season;
use courtside::sim_feed::SimFeed;
use courtside::stats::{PlayerId, StatType};
use courtside::tracker::{LiveGameTracker, TrackerCommand, apply_command};

const HELP: &str = "\
commands:
  new <home> vs <away>     configure teams (before tip-off)
  clock | c                start/stop the clock
  timeout                  stop a running clock for a timeout
  reset-clock              put the quarter clock back to full
  next                     end the current quarter
  end                      end the game
  reset                    new game, same teams
  <stat> <player> [n]      record a stat, e.g. `fg h23`, `3pm a7`, `reb 12 2`
                           stats: fg fgx 3pm 3px ft ftx reb oreb ast stl blk to pf
                           player: h<jersey>, a<jersey> (roster) or a player id
  undo | u                 undo the last stat
  box | log | season       show box score, scorer log, season summary
  quit | q";

enum ConsoleAction {
    Tracker(TrackerCommand),
    Box,
    Log,
    Season,
    Help,
    Quit,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(io::stderr)
        .init();

    let config = TrackerConfig::from_env();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let mut tracker = LiveGameTracker::with_clock_sink(config, cmd_tx.clone());

    if let Some(path) = config::roster_path_from_env() {
        match Roster::load(&path) {
            Ok(roster) => {
                tracing::info!(players = roster.players().len(), "roster loaded");
                tracker.set_roster(roster);
            }
            Err(err) => tracing::warn!("roster not loaded: {err:#}"),
        }
    }

    let mut sim = if config::sim_feed_enabled() {
        let ids: Vec<PlayerId> = tracker
            .roster()
            .map(|r| r.players().iter().map(|p| p.id).collect())
            .unwrap_or_default();
        if ids.is_empty() {
            tracing::warn!("SIM_FEED needs a roster, feed disabled");
            None
        } else {
            Some(SimFeed::spawn(ids, Duration::from_secs(3), cmd_tx.clone()))
        }
    } else {
        None
    };
    drop(cmd_tx);

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("{HELP}");
    let res = run_console(&mut tracker, sim.as_ref(), &cmd_rx, &line_rx);

    if let Some(feed) = sim.as_mut() {
        feed.stop();
    }
    save_completed(&tracker);
    res
}

fn run_console(
    tracker: &mut LiveGameTracker,
    sim: Option<&SimFeed>,
    cmd_rx: &mpsc::Receiver<TrackerCommand>,
    line_rx: &mpsc::Receiver<String>,
) -> Result<()> {
    let poll = Duration::from_millis(50);
    loop {
        if let Some(feed) = sim {
            feed.set_accepting(tracker.accepts_stats());
        }
        let before = (tracker.phase(), tracker.game().quarter);
        while let Ok(cmd) = cmd_rx.try_recv() {
            let _ = apply_command(tracker, cmd);
        }
        if (tracker.phase(), tracker.game().quarter) != before {
            println!("{}", report::scoreboard_line(&tracker.snapshot()));
        }

        let line = match line_rx.recv_timeout(poll) {
            Ok(line) => line,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
        };
        let Some(action) = parse_line(&line, tracker) else {
            if !line.trim().is_empty() {
                println!("unrecognised: {}", line.trim());
            }
            continue;
        };

        match action {
            ConsoleAction::Quit => return Ok(()),
            ConsoleAction::Help => println!("{HELP}"),
            ConsoleAction::Box => {
                for row in report::box_score_lines(tracker.game(), tracker.roster()) {
                    println!("{row}");
                }
            }
            ConsoleAction::Log => {
                for entry in tracker.logs().iter().rev().take(15).rev() {
                    println!("{entry}");
                }
            }
            ConsoleAction::Season => print_season(tracker),
            ConsoleAction::Tracker(cmd) => {
                if let Err(err) = apply_command(tracker, cmd) {
                    println!("! {err}");
                }
                println!("{}", report::scoreboard_line(&tracker.snapshot()));
            }
        }
    }
}

fn parse_line(line: &str, tracker: &LiveGameTracker) -> Option<ConsoleAction> {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix("new ") {
        let (home, away) = rest.split_once(" vs ")?;
        return Some(ConsoleAction::Tracker(TrackerCommand::Configure {
            home: home.trim().to_string(),
            away: away.trim().to_string(),
        }));
    }

    let mut parts = trimmed.split_whitespace();
    let head = parts.next()?.to_ascii_lowercase();
    let cmd = match head.as_str() {
        "q" | "quit" | "exit" => return Some(ConsoleAction::Quit),
        "help" | "?" => return Some(ConsoleAction::Help),
        "box" => return Some(ConsoleAction::Box),
        "log" => return Some(ConsoleAction::Log),
        "season" => return Some(ConsoleAction::Season),
        "c" | "clock" => TrackerCommand::ToggleClock,
        "timeout" => TrackerCommand::Timeout,
        "reset-clock" => TrackerCommand::ResetClock,
        "next" => TrackerCommand::AdvanceQuarter,
        "end" => TrackerCommand::EndGame,
        "reset" => TrackerCommand::ResetGame,
        "u" | "undo" => TrackerCommand::Undo,
        other => {
            let stat = StatType::parse_alias(other)?;
            let player_id = parse_player(parts.next()?, tracker)?;
            let value = match parts.next() {
                Some(raw) => raw.parse::<i32>().ok()?,
                None => 1,
            };
            TrackerCommand::RecordStat {
                player_id,
                stat,
                value,
            }
        }
    };
    Some(ConsoleAction::Tracker(cmd))
}

fn parse_player(token: &str, tracker: &LiveGameTracker) -> Option<PlayerId> {
    let lower = token.to_ascii_lowercase();
    let (team_id, jersey) = if let Some(num) = lower.strip_prefix('h') {
        (tracker.game().home.id.as_str(), num)
    } else if let Some(num) = lower.strip_prefix('a') {
        (tracker.game().away.id.as_str(), num)
    } else {
        return lower.parse::<PlayerId>().ok();
    };
    let jersey = jersey.parse::<u8>().ok()?;
    tracker
        .roster()?
        .by_jersey(team_id, jersey)
        .map(|p| p.id)
}

fn season_games(tracker: &LiveGameTracker) -> Vec<Game> {
    let mut games = persist::archive_path()
        .map(|path| persist::load_archive(&path))
        .unwrap_or_default();
    for game in tracker.completed_games() {
        if !games.iter().any(|g| g.id == game.id) {
            games.push(game.clone());
        }
    }
    if tracker.phase() == GamePhase::Completed && !games.iter().any(|g| g.id == tracker.game().id)
    {
        games.push(tracker.game().clone());
    }
    games
}

fn print_season(tracker: &LiveGameTracker) {
    let games = season_games(tracker);
    if games.is_empty() {
        println!("no completed games yet");
        return;
    }
    let roster = tracker.roster().map(|r| r as &dyn RosterProvider);
    for team in [&tracker.game().home, &tracker.game().away] {
        let stats = season::team_season_stats(&games, &team.id, roster);
        println!(
            "{:<16} GP {:>2}  W {:>2}  L {:>2}  W% {:>5.1}  PPG {:>5.1}  OPP {:>5.1}",
            team.name,
            stats.games_played,
            stats.wins,
            stats.losses,
            stats.win_percentage(),
            stats.average_points,
            stats.average_points_allowed
        );
    }
    for line in season::player_season_lines(&games).iter().take(10) {
        let name = tracker
            .roster()
            .and_then(|r| r.player(line.player_id))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("player {}", line.player_id));
        println!(
            "  {:<22} GP {:>2}  PPG {:>5.1}  RPG {:>5.1}  APG {:>5.1}",
            name,
            line.games,
            line.points_per_game(),
            line.rebounds_per_game(),
            line.assists_per_game()
        );
    }
}

fn save_completed(tracker: &LiveGameTracker) {
    let Some(path) = persist::archive_path() else {
        return;
    };
    let mut games = tracker.completed_games().to_vec();
    if tracker.phase() == GamePhase::Completed {
        games.push(tracker.game().clone());
    }
    match persist::append_to_archive(&path, &games) {
        Ok(0) => {}
        Ok(added) => tracing::info!(added, path = %path.display(), "games archived"),
        Err(err) => tracing::warn!("archive save failed: {err:#}"),
    }
}
