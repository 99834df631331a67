//! Game settings, parsed from the command line with clap

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{Result, SolverError};

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Number of rows on the board
    #[arg(long, default_value_t = 8)]
    pub height: usize,

    /// Number of columns on the board
    #[arg(long, default_value_t = 8)]
    pub width: usize,

    /// Number of mines to place
    #[arg(long, default_value_t = 8)]
    pub mines: usize,

    /// Seed for mine placement and random moves; a fresh one is drawn when omitted
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { height: 8, width: 8, mines: 8, seed: None }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(SolverError::EmptyBoard { nrows: self.height, ncols: self.width });
        }
        if self.mines > self.height * self.width {
            return Err(SolverError::TooManyMines {
                nrows: self.height,
                ncols: self.width,
                nmines: self.mines,
            });
        }
        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
