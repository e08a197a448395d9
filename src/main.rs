//! gomoku-mcts: five-in-a-row Monte Carlo Tree Search engine.
//!
//! ## Usage
//!
//! - `gomoku-mcts` - Show a demo
//! - `gomoku-mcts gtp` - Start the text protocol server
//! - `gomoku-mcts demo` - Search a few moves and print the board
//! - `gomoku-mcts selfplay --games 4` - Engine vs engine (or vs random)

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use flexi_logger::Logger;
use log::info;

use gomoku_mcts::board::Side;
use gomoku_mcts::constants::{
    DEFAULT_SEED, LOCALITY_DISTANCE, MAX_DEPTH, N, N_PLAYOUTS, NOISE_LEVEL,
};
use gomoku_mcts::error::Result as SearchResult;
use gomoku_mcts::evaluator::{LeafEvaluator, NoisyNeutral};
use gomoku_mcts::game::{Game, Outcome, str_coord};
use gomoku_mcts::gtp::GtpEngine;
use gomoku_mcts::mcts::{SearchConfig, SearchTree};
use gomoku_mcts::patterns::LinePatternScorer;
use gomoku_mcts::player::{MctsPlayer, Player, RandomPlayer, play_game};
use gomoku_mcts::playout::RandomRollout;
use gomoku_mcts::policy::{ExpansionPolicy, LearnedSoftmax, LocalityUniform, Priors};

/// gomoku-mcts: five-in-a-row MCTS engine
#[derive(Parser)]
#[command(name = "gomoku-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol server
    Gtp(EngineArgs),
    /// Search a few moves from the empty board and print the result
    Demo(EngineArgs),
    /// Play engine games and report the results
    Selfplay {
        #[command(flatten)]
        engine: EngineArgs,
        /// Number of games
        #[arg(long, default_value_t = 2)]
        games: usize,
        /// Let the engine play White against a random Black
        #[arg(long)]
        vs_random: bool,
    },
}

#[derive(Args, Clone)]
struct EngineArgs {
    /// Playouts per move
    #[arg(long, default_value_t = N_PLAYOUTS)]
    playouts: usize,
    /// Plies before the leaf evaluator takes over
    #[arg(long, default_value_t = MAX_DEPTH)]
    depth: usize,
    /// Random seed
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Standard deviation of the neutral evaluator's noise
    #[arg(long, default_value_t = NOISE_LEVEL)]
    noise: f64,
    /// Candidate distance of the locality policy
    #[arg(long, default_value_t = LOCALITY_DISTANCE)]
    distance: usize,
    /// Expansion policy
    #[arg(long, value_enum, default_value_t = PolicyKind::Locality)]
    policy: PolicyKind,
    /// Random rollouts per leaf instead of the neutral evaluator (0 = off)
    #[arg(long, default_value_t = 0)]
    rollouts: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyKind {
    /// Uniform over cells near existing stones
    Locality,
    /// Softmax over line-pattern scores
    Patterns,
}

/// Expansion policy chosen on the command line.
#[derive(Clone)]
enum Policy {
    Locality(LocalityUniform),
    Patterns(LearnedSoftmax<LinePatternScorer>),
}

impl ExpansionPolicy for Policy {
    fn expand(&self, game: &Game, side: Side) -> SearchResult<Priors> {
        match self {
            Policy::Locality(p) => p.expand(game, side),
            Policy::Patterns(p) => p.expand(game, side),
        }
    }
}

/// Leaf evaluator chosen on the command line.
#[derive(Clone)]
enum Evaluator {
    Noisy(NoisyNeutral),
    Rollout(RandomRollout),
}

impl LeafEvaluator for Evaluator {
    fn evaluate(&mut self, game: &Game, to_move: Side, searcher: Side) -> f64 {
        match self {
            Evaluator::Noisy(e) => e.evaluate(game, to_move, searcher),
            Evaluator::Rollout(e) => e.evaluate(game, to_move, searcher),
        }
    }
}

impl EngineArgs {
    fn policy(&self) -> Policy {
        match self.policy {
            PolicyKind::Locality => Policy::Locality(LocalityUniform::new(self.distance)),
            PolicyKind::Patterns => Policy::Patterns(LearnedSoftmax::new(LinePatternScorer::new())),
        }
    }

    fn evaluator(&self, seed: u64) -> Result<Evaluator> {
        Ok(if self.rollouts > 0 {
            Evaluator::Rollout(RandomRollout::new(self.rollouts, seed))
        } else {
            Evaluator::Noisy(NoisyNeutral::new(self.noise, seed)?)
        })
    }

    fn config(&self, seed: u64) -> SearchConfig {
        SearchConfig::default()
            .with_max_depth(self.depth)
            .with_seed(seed)
    }

    fn player(&self, seed: u64) -> Result<MctsPlayer<Policy, Evaluator>> {
        let config = self.config(seed);
        config.validate()?;
        Ok(MctsPlayer::new(
            self.playouts,
            config,
            self.policy(),
            self.evaluator(seed)?,
        ))
    }
}

fn main() -> Result<()> {
    Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Gtp(args)) => {
            let mut engine = GtpEngine::new(args.player(args.seed)?);
            engine.run()?;
        }
        Some(Commands::Demo(args)) => run_demo(&args)?,
        None => {
            let args = EngineArgs {
                playouts: 200,
                depth: MAX_DEPTH,
                seed: DEFAULT_SEED,
                noise: NOISE_LEVEL,
                distance: LOCALITY_DISTANCE,
                policy: PolicyKind::Locality,
                rollouts: 0,
            };
            run_demo(&args)?;
        }
        Some(Commands::Selfplay {
            engine,
            games,
            vs_random,
        }) => run_selfplay(&engine, games, vs_random)?,
    }
    Ok(())
}

/// Search six plies with one re-rooted tree and print the board.
fn run_demo(args: &EngineArgs) -> Result<()> {
    println!("gomoku-mcts: {N}x{N} five-in-a-row MCTS engine\n");

    let mut tree = SearchTree::new(
        &Game::new(),
        Side::Black,
        args.config(args.seed),
        args.policy(),
        args.evaluator(args.seed)?,
    )?;

    for _ in 0..6 {
        if tree.game().is_over() {
            break;
        }
        tree.playout(args.playouts)?;
        let mv = tree.final_move()?;
        let stats = tree.stats();
        println!(
            "{} plays {} (winrate {:.1}%, {} nodes, depth {})",
            tree.side(),
            str_coord(mv),
            tree.root_value() * 100.0,
            stats.total_nodes,
            stats.max_depth
        );
        tree.advance(mv)?;
    }
    println!("\n{}", tree.game().board());
    Ok(())
}

fn run_selfplay(args: &EngineArgs, games: usize, vs_random: bool) -> Result<()> {
    let mut wins = [0usize; 2];
    let mut draws = 0;
    let mut samples = 0;

    for g in 0..games {
        let seed = args.seed.wrapping_add(2 * g as u64);
        let mut white = args.player(seed.wrapping_add(1))?.recording(true);
        let mut black: Box<dyn Player> = if vs_random {
            Box::new(RandomPlayer::new(seed))
        } else {
            Box::new(args.player(seed)?)
        };

        let mut game = Game::new();
        play_game(black.as_mut(), &mut white, &mut game)?;
        samples += white.samples().len();

        match game.outcome() {
            Some(Outcome::Winner(side)) => {
                wins[side.index()] += 1;
                info!("game {}: {side} wins in {} moves", g + 1, game.history().len());
            }
            _ => {
                draws += 1;
                info!("game {}: draw", g + 1);
            }
        }
        println!("{}", game.board());
    }

    println!(
        "black {} / white {} / draws {draws}; {samples} white training samples",
        wins[Side::Black.index()],
        wins[Side::White.index()]
    );
    Ok(())
}
