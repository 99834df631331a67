use std::collections::BTreeSet;

use rand::Rng;

use crate::config::GameConfig;
use crate::error::{Result, SolverError};
use crate::grid::*;
use crate::mine_map::{self, get_neighbor_mine_count, MineMap};

const UNKNOWN_CELL_COUNT: i32 = -1;

// Board shown to the player, kept independently from the mine map itself.
#[derive(Debug, Clone)]
pub struct CountCell {
    pub neighbor_mine_count: i32,
}

impl CountCell {
    pub fn is_revealed(&self) -> bool {
        self.neighbor_mine_count != UNKNOWN_CELL_COUNT
    }
}

pub type CountGrid = Vec<Vec<CountCell>>;

/// What revealing a cell turned up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Mine,
    Count(usize),
}

///
/// A game of minesweeper: where the mines are, what the player has revealed so far, and which
/// cells the player has flagged.
///
#[derive(Debug, Clone)]
pub struct Minesweeper {
    mine_map: MineMap,
    count_grid: CountGrid,
    flagged: BTreeSet<Cell>,
    dims: BoardDims,
}

impl Minesweeper {
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Result<Minesweeper> {
        config.validate()?;
        let mine_map = mine_map::generate_new_mine_map(config.height, config.width, config.mines, rng)?;
        Minesweeper::from_mine_map(mine_map)
    }

    pub fn from_mine_map(mine_map: MineMap) -> Result<Minesweeper> {
        let nrows = get_num_rows(&mine_map);
        let ncols = get_num_cols(&mine_map);
        if nrows == 0 || ncols == 0 {
            return Err(SolverError::EmptyBoard { nrows, ncols });
        }
        let count_grid =
            vec![vec![CountCell { neighbor_mine_count: UNKNOWN_CELL_COUNT }; ncols]; nrows];
        Ok(Minesweeper {
            mine_map,
            count_grid,
            flagged: BTreeSet::new(),
            dims: BoardDims::new(nrows, ncols),
        })
    }

    pub fn height(&self) -> usize {
        self.dims.nrows
    }

    pub fn width(&self) -> usize {
        self.dims.ncols
    }

    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    pub fn is_mine(&self, cell: Cell) -> Result<bool> {
        self.dims.check(cell)?;
        Ok(*get(&self.mine_map, cell.0, cell.1))
    }

    pub fn nearby_mines(&self, cell: Cell) -> Result<usize> {
        self.dims.check(cell)?;
        Ok(get_neighbor_mine_count(&self.mine_map, cell.0, cell.1))
    }

    pub fn is_revealed(&self, cell: Cell) -> bool {
        self.dims.contains(cell) && get(&self.count_grid, cell.0, cell.1).is_revealed()
    }

    /// Reveal a single cell. Revealing a mine loses the game; the caller decides what to do next.
    pub fn reveal(&mut self, cell: Cell) -> Result<Reveal> {
        if self.is_mine(cell)? {
            return Ok(Reveal::Mine);
        }
        let (i, j) = cell;
        let count = get_neighbor_mine_count(&self.mine_map, i, j);
        let cur_cell = get_mut(&mut self.count_grid, i, j);
        if cur_cell.is_revealed() {
            return Err(SolverError::AlreadyRevealed(cell));
        }
        cur_cell.neighbor_mine_count = count as i32;
        Ok(Reveal::Count(count))
    }

    /// Flag a cell as a mine. Returns whether the flag is new.
    pub fn flag(&mut self, cell: Cell) -> Result<bool> {
        self.dims.check(cell)?;
        Ok(self.flagged.insert(cell))
    }

    pub fn mines_found(&self) -> &BTreeSet<Cell> {
        &self.flagged
    }

    pub fn mines(&self) -> BTreeSet<Cell> {
        self.dims
            .cells()
            .filter(|(i, j)| *get(&self.mine_map, *i, *j))
            .collect()
    }

    /// The game is won once exactly the mines have been flagged.
    pub fn won(&self) -> bool {
        self.flagged == self.mines()
    }

    /// Every cell that isn't a mine has been revealed.
    pub fn cleared(&self) -> bool {
        self.dims.cells().all(|(i, j)| {
            *get(&self.mine_map, i, j) || get(&self.count_grid, i, j).is_revealed()
        })
    }

    pub fn mine_map(&self) -> &MineMap {
        &self.mine_map
    }

    pub fn flatten_cells(&self) -> Vec<Vec<i32>> {
        self.count_grid
            .iter()
            .map(|row| row.iter().map(|cell| cell.neighbor_mine_count).collect())
            .collect()
    }

    /// Revealed counts, `F` for flags, `-` for everything else.
    pub fn to_string(&self) -> String {
        let mut str = get_row_col_str(&self.count_grid);
        for (i, row) in self.count_grid.iter().enumerate() {
            str.push_str(&format!("{:>2} ", i));
            for (j, cell) in row.iter().enumerate() {
                if cell.is_revealed() {
                    str.push_str(&format!("{} ", cell.neighbor_mine_count));
                } else if self.flagged.contains(&(i, j)) {
                    str.push_str("F ");
                } else {
                    str.push_str("- ");
                }
            }
            str.push('\n');
        }
        str
    }
}
