//! Text protocol front end, modelled on the Go Text Protocol (GTP v2).
//!
//! Commands are read one per line, optionally prefixed by a numeric id.
//! Responses start with `=` on success or `?` on failure, followed by the id
//! and the payload, and end with a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `boardsize <size>` - only the compiled-in size is accepted
//! - `clear_board` - start a new game
//! - `play <color> <vertex>` - place a stone, e.g. `play black H8`
//! - `genmove <color>` - search, play and print the engine's move
//! - `undo` - take back the last stone
//! - `showboard` - print the board
//! - `winrate` - root win-rate of the last search
//! - `quit`
//!
//! ## Example
//!
//! ```ignore
//! use gomoku_mcts::gtp::GtpEngine;
//! let mut engine = GtpEngine::new(player);
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use log::{debug, info};

use crate::board::Side;
use crate::constants::{N, RESIGN_THRES};
use crate::evaluator::LeafEvaluator;
use crate::game::{Game, Outcome, parse_coord, str_coord};
use crate::player::{MctsPlayer, Player};
use crate::policy::ExpansionPolicy;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "undo",
    "version",
    "winrate",
];

/// Protocol engine state.
pub struct GtpEngine<P, E> {
    /// Current game
    game: Game,
    /// Searches a fresh tree for each `genmove`
    player: MctsPlayer<P, E>,
}

fn parse_side(s: &str) -> Option<Side> {
    match s.to_lowercase().as_str() {
        "b" | "black" => Some(Side::Black),
        "w" | "white" => Some(Side::White),
        _ => None,
    }
}

impl<P, E> GtpEngine<P, E>
where
    P: ExpansionPolicy + Clone,
    E: LeafEvaluator + Clone,
{
    pub fn new(player: MctsPlayer<P, E>) -> Self {
        Self {
            game: Game::new(),
            player,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            debug!("gtp: {command} {args:?}");
            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>() {
                    Ok(size) if size == N => (true, String::new()),
                    Ok(size) => (
                        false,
                        format!("unacceptable size, only {N} is supported (got {size})"),
                    ),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.game = Game::new();
                (true, String::new())
            }

            "play" => {
                let [color, vertex, ..] = args else {
                    return (false, "missing arguments".to_string());
                };
                let Some(side) = parse_side(color) else {
                    return (false, format!("invalid color {color}"));
                };
                let Some(pt) = parse_coord(vertex) else {
                    return (false, format!("invalid vertex {vertex}"));
                };
                match self.game.play(pt, side) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, format!("illegal move: {e}")),
                }
            }

            "genmove" => {
                let Some(side) = args.first().and_then(|c| parse_side(c)) else {
                    return (false, "missing or invalid color".to_string());
                };
                self.genmove(side)
            }

            "undo" => {
                let n = self.game.history().len();
                if n == 0 {
                    return (false, "cannot undo".to_string());
                }
                match self.game.replay_prefix(n - 1) {
                    Ok(game) => {
                        self.game = game;
                        (true, String::new())
                    }
                    Err(e) => (false, format!("cannot undo: {e}")),
                }
            }

            "showboard" => (true, format!("\n{}", self.game.board())),

            "winrate" => match self.player.last_winrate() {
                Some(w) => (true, format!("{:.1}", w * 100.0)),
                None => (false, "no search yet".to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }

    fn genmove(&mut self, side: Side) -> (bool, String) {
        if self.game.is_over() {
            return (false, "game is over".to_string());
        }

        let mut scratch = self.game.clone();
        let pt = match self.player.play(&mut scratch, side) {
            Ok(pt) => pt,
            Err(e) => return (false, e.to_string()),
        };

        // Give up rather than play out a lost position.
        if self
            .player
            .last_winrate()
            .is_some_and(|w| w < RESIGN_THRES)
        {
            info!("{side} resigns");
            return (true, "resign".to_string());
        }

        self.game = scratch;
        if let Some(outcome) = self.game.outcome() {
            match outcome {
                Outcome::Winner(winner) => info!("{winner} wins"),
                Outcome::Draw => info!("draw"),
            }
        }
        (true, str_coord(pt))
    }
}
