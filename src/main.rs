use std::io;
use std::num::ParseIntError;

use anyhow::Result;
use clap::Parser;
use rand::Rng;
use tracing_subscriber::EnvFilter;

use minesweeper_ai::config::GameConfig;
use minesweeper_ai::game::{Minesweeper, Reveal};
use minesweeper_ai::mine_map;
use minesweeper_ai::play::{self, flag_known_mines, next_move, Outcome};
use minesweeper_ai::{Agent, Cell};

/// Minesweeper played by a knowledge-based agent
#[derive(Parser, Debug)]
#[command(name = "minesweeper")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: GameConfig,

    /// Number of games for the agent to play on its own
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Play yourself, with the agent recommending moves
    #[arg(long)]
    interactive: bool,
}

fn main() -> Result<()> {
    // RUST_LOG=debug shows every deduction
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    cli.config.validate()?;
    let mut rng = cli.config.rng();

    if cli.interactive {
        minesweeper_repl(&cli.config, &mut rng)
    } else {
        autoplay(&cli.config, cli.games, &mut rng)
    }
}

fn autoplay<R: Rng>(config: &GameConfig, games: usize, rng: &mut R) -> Result<()> {
    let mut wins = 0;
    for game_idx in 0..games {
        let mut game = Minesweeper::new(config, rng)?;
        let mut agent = Agent::new(config.height, config.width);
        let outcome = play::play(&mut game, &mut agent, rng)?;
        tracing::info!(game = game_idx, outcome = ?outcome, "game finished");
        if games == 1 {
            println!("{}", game.to_string());
            println!("{}", mine_map::to_string(game.mine_map()));
        }
        if let Outcome::Won { .. } = outcome {
            wins += 1;
        }
    }
    println!("Won {wins} of {games} games");
    Ok(())
}

fn minesweeper_repl<R: Rng>(config: &GameConfig, rng: &mut R) -> Result<()> {
    let mut game = Minesweeper::new(config, rng)?;
    let mut agent = Agent::new(config.height, config.width);
    println!("Let's play minesweeper");
    println!("{}", game.to_string());

    loop {
        if flag_known_mines(&mut game, &agent)? {
            println!("{}", game.to_string());
            println!("No more moves needed - you win!");
            return Ok(());
        }
        let Some((best_move, kind)) = next_move(&agent, rng) else {
            println!("No more moves available");
            return Ok(());
        };
        println!("The computer recommends: {:?} ({:?})", best_move, kind);

        let mut mark_str = String::new();
        println!("Enter a move as: row,col (or enter to take the computer's recommendation)");
        if io::stdin().read_line(&mut mark_str)? == 0 {
            return Ok(());
        }

        let cell: Cell = if mark_str.trim().is_empty() {
            best_move
        } else {
            match parse_mark(&mark_str) {
                None => {
                    println!("Could not parse input as coordinates row,col: {}", mark_str.trim());
                    continue;
                }
                Some(m) => m,
            }
        };
        if agent.moves_made().contains(&cell) {
            println!("{:?} has already been revealed", cell);
            continue;
        }

        match game.reveal(cell) {
            Ok(Reveal::Mine) => {
                println!("Hit a mine! at {:?}: {}", cell, mine_map::to_string(game.mine_map()));
                return Ok(());
            }
            Ok(Reveal::Count(count)) => agent.add_knowledge(cell, count)?,
            Err(e) => {
                println!("{e}");
                continue;
            }
        }
        println!("{}", game.to_string());
    }
}

fn parse_mark(mark_str: &str) -> Option<(usize, usize)> {
    let maybe_mark: Vec<Result<usize, ParseIntError>> = mark_str
        .splitn(2, ',')
        .map(|coord_str| coord_str.trim().parse::<usize>())
        .collect();

    if maybe_mark.len() != 2 {
        return None;
    }
    let row = maybe_mark[0].as_ref().ok()?;
    let col = maybe_mark[1].as_ref().ok()?;
    Some((*row, *col))
}
