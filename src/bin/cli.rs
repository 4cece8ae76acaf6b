//! Console front end: play in the terminal or run batches of AI games.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use line_em_up::game::NoHuman;
use line_em_up::trace::{JsonLinesSink, NullSink};
use line_em_up::{
    Algorithm, Board, Game, GameConfig, GameSummary, HumanInput, MoveError, MoveTrace, Player,
    Pos, Scoreboard, SearchConfig, Seat, TraceSink,
};

#[derive(Parser)]
#[command(name = "line-em-up-cli")]
#[command(version, about = "Line 'em up in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game; human seats read moves from stdin
    Play(Box<GameArgs>),
    /// Play a series of AI games and print the scoreboard
    Batch(Box<BatchArgs>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Controller {
    Human,
    Ai,
}

#[derive(Args, Debug)]
struct GameArgs {
    /// Board side
    #[arg(short = 'n', long, default_value_t = 3)]
    size: usize,

    /// Run length needed to win
    #[arg(short = 's', long = "run", default_value_t = 3)]
    run_length: usize,

    /// Number of randomly placed blocked cells
    #[arg(short = 'b', long, default_value_t = 0, conflicts_with = "block")]
    blocks: usize,

    /// Explicit blocked cell as `x,y` (repeatable)
    #[arg(long, value_name = "X,Y")]
    block: Vec<Pos>,

    /// Who plays ◦
    #[arg(long, value_enum, default_value_t = Controller::Human)]
    player_a: Controller,

    /// Who plays •
    #[arg(long, value_enum, default_value_t = Controller::Ai)]
    player_b: Controller,

    /// Search algorithm for ◦
    #[arg(long, default_value = "alphabeta")]
    algo_a: Algorithm,

    /// Search algorithm for •
    #[arg(long, default_value = "alphabeta")]
    algo_b: Algorithm,

    /// Depth limit for ◦, or `full`
    #[arg(long, default_value = "4", value_parser = parse_depth)]
    depth_a: Depth,

    /// Depth limit for •, or `full`
    #[arg(long, default_value = "4", value_parser = parse_depth)]
    depth_b: Depth,

    /// Seconds allowed per AI move
    #[arg(short = 't', long, default_value = "5", value_parser = parse_seconds)]
    time: Duration,

    /// Suggest a move before each human turn
    #[arg(long)]
    recommend: bool,

    /// Random seed for blocks and timeout fallbacks
    #[arg(long)]
    seed: Option<u64>,

    /// Write JSON-lines trace records to this file
    #[arg(long)]
    trace: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    #[command(flatten)]
    game: GameArgs,

    /// Number of games
    #[arg(short = 'g', long, default_value_t = 10)]
    games: usize,

    /// Swap the seat configurations every other game
    #[arg(long)]
    swap: bool,
}

/// `None` searches to the end of the game
type Depth = Option<u32>;

fn parse_depth(input: &str) -> Result<Depth, String> {
    if input.eq_ignore_ascii_case("full") {
        return Ok(None);
    }
    match input.parse::<u32>() {
        Ok(0) => Err("depth must be at least 1".to_string()),
        Ok(depth) => Ok(Some(depth)),
        Err(_) => Err(format!("invalid depth '{input}', expected a number or `full`")),
    }
}

fn parse_seconds(input: &str) -> Result<Duration, String> {
    let secs: f64 = input
        .parse()
        .map_err(|_| format!("invalid number of seconds '{input}'"))?;
    Duration::try_from_secs_f64(secs).map_err(|err| format!("invalid time budget: {err}"))
}

impl GameArgs {
    fn seat(&self, controller: Controller, algorithm: Algorithm, depth: Depth) -> Seat {
        match controller {
            Controller::Human => Seat::Human,
            Controller::Ai => Seat::Ai(self.search(algorithm, depth)),
        }
    }

    fn search(&self, algorithm: Algorithm, depth: Depth) -> SearchConfig {
        let search = SearchConfig::new(algorithm).with_time_budget(self.time);
        match depth {
            Some(depth) => search.with_depth(depth),
            None => search.exhaustive(),
        }
    }

    fn to_config(&self) -> GameConfig {
        let mut config = GameConfig::new(self.size, self.run_length)
            .with_seat(
                Player::A,
                self.seat(self.player_a, self.algo_a, self.depth_a),
            )
            .with_seat(
                Player::B,
                self.seat(self.player_b, self.algo_b, self.depth_b),
            )
            .with_recommend(self.recommend)
            .with_advisor(self.search(self.algo_a, self.depth_a));
        config = if self.block.is_empty() {
            config.with_random_blocks(self.blocks)
        } else {
            config.with_blocks(self.block.clone())
        };
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }

    fn has_human(&self) -> bool {
        self.player_a == Controller::Human || self.player_b == Controller::Human
    }
}

/// Human moves typed as `x,y`; `q` or end of input abandons the game
struct ConsoleInput {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl ConsoleInput {
    fn new() -> Self {
        Self {
            lines: io::stdin().lines(),
        }
    }
}

impl HumanInput for ConsoleInput {
    fn choose_move(
        &mut self,
        _board: &Board,
        player: Player,
        recommendation: Option<Pos>,
    ) -> Option<Pos> {
        if let Some(pos) = recommendation {
            println!("Recommended move: x = {}, y = {}", pos.x, pos.y);
        }
        loop {
            print!("Player {player}, enter your move as x,y: ");
            io::stdout().flush().ok()?;
            let line = self.lines.next()?.ok()?;
            let line = line.trim();
            match line {
                "" => continue,
                "q" | "quit" => return None,
                _ => match line.parse::<Pos>() {
                    Ok(pos) => return Some(pos),
                    Err(err) => println!("{err}"),
                },
            }
        }
    }

    fn reject(&mut self, _error: &MoveError) {
        println!("The move is not valid! Try again.");
    }
}

/// Prints each move on a mirror of the game board, then forwards it
struct ConsoleReport<'a> {
    board: Board,
    inner: &'a mut dyn TraceSink,
}

impl TraceSink for ConsoleReport<'_> {
    fn record_move(&mut self, trace: &MoveTrace) -> line_em_up::Result<()> {
        if !trace.human {
            println!("Evaluation time: {:.7}s", trace.elapsed_secs);
            if trace.timed_out {
                println!("Time is up, playing a random move");
            }
            println!(
                "Player {} under AI control plays: x = {}, y = {}",
                trace.player, trace.pos.x, trace.pos.y
            );
        }
        self.board.place(trace.pos, trace.player);
        println!();
        print!("{}", self.board);
        self.inner.record_move(trace)
    }

    fn record_game(&mut self, summary: &GameSummary) -> line_em_up::Result<()> {
        if summary.is_finished() {
            println!("{}", summary.outcome);
        } else {
            println!("Game abandoned after {} moves", summary.plies);
        }
        self.inner.record_game(summary)
    }
}

fn open_trace(path: &Path) -> Result<JsonLinesSink<BufWriter<File>>> {
    let file = File::create(path)
        .with_context(|| format!("failed to create trace file {}", path.display()))?;
    Ok(JsonLinesSink::new(BufWriter::new(file)))
}

fn trace_sink(path: Option<&Path>) -> Result<Box<dyn TraceSink>> {
    Ok(match path {
        Some(path) => Box::new(open_trace(path)?),
        None => Box::new(NullSink),
    })
}

fn play(args: &GameArgs) -> Result<()> {
    let mut game = Game::new(args.to_config()).context("invalid game configuration")?;
    let mut sink = trace_sink(args.trace.as_deref())?;

    println!(
        "n = {}, s = {}, blocked cells: {:?}",
        args.size,
        args.run_length,
        game.board().blocked_cells()
    );
    print!("{}", game.board());

    let mut report = ConsoleReport {
        board: game.board().clone(),
        inner: sink.as_mut(),
    };
    let summary = game.play(&mut ConsoleInput::new(), &mut report)?;
    log::debug!("game took {:.3}s", summary.elapsed_secs);
    Ok(())
}

fn batch(args: &BatchArgs) -> Result<()> {
    if args.game.has_human() {
        bail!("batch games need two AI seats (use --player-a ai --player-b ai)");
    }
    let mut sink = trace_sink(args.game.trace.as_deref())?;
    let mut scoreboard = Scoreboard::new();

    for round in 0..args.games {
        let mut config = args.game.to_config();
        if args.swap && round % 2 == 1 {
            config.seats.swap(0, 1);
        }
        if let Some(seed) = config.seed {
            config.seed = Some(seed.wrapping_add(round as u64));
        }
        let mut game = Game::new(config).context("invalid game configuration")?;
        let summary = game
            .play(&mut NoHuman, sink.as_mut())
            .with_context(|| format!("game {} failed", round + 1))?;

        println!(
            "game {}: {} in {} moves",
            round + 1,
            summary.outcome,
            summary.plies
        );
        scoreboard.record(&summary);
    }

    println!();
    print!("{scoreboard}");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play(args) => play(&args),
        Commands::Batch(args) => batch(&args),
    }
}
