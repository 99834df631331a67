//! Common grid functions

use crate::error::{Result, SolverError};

/// A (row, col) coordinate on the board.
pub type Cell = (usize, usize);

pub fn get<T>(grid: &Vec<Vec<T>>, i: usize, j: usize) -> &T {
    &grid[i][j]
}

pub fn get_mut<T>(grid: &mut Vec<Vec<T>>, i: usize, j: usize) -> &mut T {
    &mut grid[i][j]
}

pub fn get_num_rows<T>(grid: &Vec<Vec<T>>) -> usize {
    grid.len()
}

pub fn get_num_cols<T>(grid: &Vec<Vec<T>>) -> usize {
    grid.first().map_or(0, |row| row.len())
}

pub fn get_neighbors<T>(grid: &Vec<Vec<T>>, i: usize, j: usize) -> Vec<Cell> {
    BoardDims::new(get_num_rows(grid), get_num_cols(grid)).neighbors((i, j))
}

/// Column header used when pretty printing a grid.
pub fn get_row_col_str<T>(grid: &Vec<Vec<T>>) -> String {
    let mut str = String::from("   ");
    for j in 0..get_num_cols(grid) {
        str.push_str(&format!("{} ", j % 10));
    }
    str.push('\n');
    str
}

/// Height and width of a board. Everything the agent knows about the board's shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardDims {
    pub nrows: usize,
    pub ncols: usize,
}

impl BoardDims {
    pub fn new(nrows: usize, ncols: usize) -> BoardDims {
        BoardDims { nrows, ncols }
    }

    pub fn num_cells(&self) -> usize {
        self.nrows * self.ncols
    }

    pub fn contains(&self, cell: Cell) -> bool {
        let (i, j) = cell;
        i < self.nrows && j < self.ncols
    }

    pub fn check(&self, cell: Cell) -> Result<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(SolverError::InvalidCell { cell, nrows: self.nrows, ncols: self.ncols })
        }
    }

    /// The in-bounds cells at most one row and one column away from `cell`, excluding `cell`.
    /// Returned in row-major order.
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        let (i, j) = cell;
        let mut neighbors = Vec::with_capacity(8);
        for ni in i.saturating_sub(1)..=i + 1 {
            for nj in j.saturating_sub(1)..=j + 1 {
                if (ni, nj) != cell && self.contains((ni, nj)) {
                    neighbors.push((ni, nj));
                }
            }
        }
        neighbors
    }

    /// Every cell on the board in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.nrows).flat_map(move |i| (0..self.ncols).map(move |j| (i, j)))
    }
}
