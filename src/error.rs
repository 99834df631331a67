//! Error types for the solver and the board it plays on.

use crate::grid::Cell;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolverError {
    /// A sentence was built with a count outside `0..=cells`.
    #[error("invalid sentence: {count} mines among {ncells} cells")]
    Validation { ncells: usize, count: i64 },

    /// The knowledge base contradicts itself. Indicates a bug or a lying board, never bad input.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("cell {cell:?} is outside a {nrows}x{ncols} board")]
    InvalidCell { cell: Cell, nrows: usize, ncols: usize },

    #[error("too many mines - a {nrows}x{ncols} board cannot hold {nmines} mines")]
    TooManyMines { nrows: usize, ncols: usize, nmines: usize },

    #[error("board must have at least one row and one column, got {nrows}x{ncols}")]
    EmptyBoard { nrows: usize, ncols: usize },

    #[error("cell {0:?} has already been revealed")]
    AlreadyRevealed(Cell),
}

pub type Result<T> = std::result::Result<T, SolverError>;
