//! Play a game in the terminal by naming the squares you would click on

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use backend::{load_config, new_game, ClickOutcome, Controller};
use board::{BoardSquare, GameConfig, Preset};
use clap::Parser;
use env_logger::Env;
use log::error;
use rand::{rngs::SmallRng, SeedableRng};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Read the game configuration from this TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Start from a preset instead (standard, double-move, bureaucrat, bureaucrat-double-move)
    #[arg(short, long, conflicts_with = "config")]
    preset: Option<Preset>,
    /// Start from this position
    #[arg(long)]
    fen: Option<String>,
    /// Number of files, 0 to keep the starting position's
    #[arg(long)]
    width: Option<usize>,
    /// Number of ranks, 0 to keep the starting position's
    #[arg(long)]
    height: Option<usize>,
    /// Put pieces on the files added when widening the board
    #[arg(long)]
    fill: bool,
    /// Shuffle the back ranks
    #[arg(long)]
    randomize: bool,
    /// Seed for the shuffle
    #[arg(long)]
    seed: Option<u64>,
    /// Play with bureaucrats
    #[arg(long)]
    bureaucrat: bool,
    #[arg(long)]
    white_moves: Option<u32>,
    #[arg(long)]
    black_moves: Option<u32>,
}

impl Args {
    /// The config file or preset, with any flags given on the command line on top
    fn game_config(&self) -> backend::Result<GameConfig> {
        let mut config = match (&self.config, self.preset) {
            (Some(path), _) => load_config(path)?,
            (None, Some(preset)) => preset.config(),
            (None, None) => GameConfig::default(),
        };
        if self.fen.is_some() {
            config.fen = self.fen.clone();
        }
        if let Some(width) = self.width {
            config.board_width = width;
        }
        if let Some(height) = self.height {
            config.board_height = height;
        }
        if let Some(moves) = self.white_moves {
            config.white_moves_per_turn = moves;
        }
        if let Some(moves) = self.black_moves {
            config.black_moves_per_turn = moves;
        }
        config.fill_expanded_files |= self.fill;
        config.randomize_back_rank |= self.randomize;
        config.bureaucrat |= self.bureaucrat;
        Ok(config.normalized())
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().filter_or("CHESS_LOG", "info")).init();
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let controller = args
        .game_config()
        .and_then(|config| new_game(&config, &mut rng));
    match controller {
        Ok(controller) => play(controller),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    }
}

/// Read squares from stdin until the game ends or the input does
fn play(mut controller: Controller) {
    println!("{}", controller.board());
    println!("Enter a square to click on (like `e2` or `4,6`), `fen`, or `quit`");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if let Err(err) = prompt(&mut io::stdout(), &controller) {
            error!("cannot write to the terminal: {err}");
            break;
        }
        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "quit" => break,
            "fen" => {
                println!("{}", controller.board().to_fen());
                continue;
            }
            _ => {}
        }
        let square = match parse_square(&controller, input) {
            Ok(square) => square,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        match controller.handle_click(square) {
            ClickOutcome::Noop => println!("Nothing to select there"),
            ClickOutcome::Selection { targets, .. } => {
                let names: Vec<String> = targets
                    .iter()
                    .map(|&target| controller.board().notation(target))
                    .collect();
                println!("Can move to: {}", names.join(" "));
            }
            ClickOutcome::MoveRejected { reason } => println!("Rejected: {reason}"),
            ClickOutcome::MoveApplied { terminal, .. } => {
                println!("{}", controller.board());
                if let Some(last) = controller.view_state().history.last() {
                    println!("Played {last}");
                }
                if let Some(outcome) = terminal {
                    match outcome.winner() {
                        Some(winner) => println!("Checkmate, {winner} wins"),
                        None => println!("Game over: {outcome}"),
                    }
                    break;
                }
            }
        }
    }
}

/// Show whose click it is, flushed so it appears before the input
fn prompt(out: &mut impl Write, controller: &Controller) -> io::Result<()> {
    write!(out, "{} > ", controller.board().active())?;
    out.flush()
}

/// A square given either by name or as `file,row` counted from the top left
fn parse_square(controller: &Controller, input: &str) -> backend::Result<BoardSquare> {
    if input.contains(',') {
        Ok(input.parse()?)
    } else {
        Ok(controller.board().square(input)?)
    }
}
