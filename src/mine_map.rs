use rand::Rng;

use crate::error::{Result, SolverError};
use crate::grid::{get, get_neighbors, get_num_cols, get_num_rows, Cell};

/// Ground-truth representation of a game (i.e. where the mines are)
pub type MineMap = Vec<Vec<bool>>;

///
/// Generates a new nrows x ncols mine map with nmines mines
/// distributed across the map uniformly at random.
///
pub fn generate_new_mine_map<R: Rng + ?Sized>(
    nrows: usize,
    ncols: usize,
    nmines: usize,
    rng: &mut R,
) -> Result<MineMap> {
    let ncells = nrows * ncols;
    if nmines > ncells {
        return Err(SolverError::TooManyMines { nrows, ncols, nmines });
    }
    // Selection sampling: walking the cells in row-major order, pick the current cell with
    // probability n_left_to_pick / n_left_to_pick_from.
    let mut mine_map: MineMap = Vec::with_capacity(nrows);
    let mut n_picked: usize = 0;
    for row in 0..nrows {
        let mut cur_row: Vec<bool> = Vec::with_capacity(ncols);
        for col in 0..ncols {
            let n_left_to_pick = (nmines - n_picked) as f64;
            let n_left_to_pick_from = (ncells - (row * ncols + col)) as f64;
            let is_mine = rng.gen_bool(n_left_to_pick / n_left_to_pick_from);
            if is_mine {
                n_picked += 1;
            }
            cur_row.push(is_mine);
        }
        mine_map.push(cur_row);
    }
    Ok(mine_map)
}

/// Build a mine map from the given mine cells.
pub fn from_mines(nrows: usize, ncols: usize, mines: &[Cell]) -> Result<MineMap> {
    let mut mine_map: MineMap = vec![vec![false; ncols]; nrows];
    for &(i, j) in mines {
        if i >= nrows || j >= ncols {
            return Err(SolverError::InvalidCell { cell: (i, j), nrows, ncols });
        }
        mine_map[i][j] = true;
    }
    Ok(mine_map)
}

/// Number of mines within one row and one column of `cell`, not counting the cell itself.
pub fn get_neighbor_mine_count(mine_map: &MineMap, i: usize, j: usize) -> usize {
    get_neighbors(mine_map, i, j)
        .into_iter()
        .filter(|(ni, nj)| *get(mine_map, *ni, *nj))
        .count()
}

pub fn count_mines(mine_map: &MineMap) -> usize {
    mine_map.iter().map(|row| row.iter().filter(|cell| **cell).count()).sum()
}

pub fn to_string(mine_map: &MineMap) -> String {
    let mut str = format!(
        "nrow: {}, ncols: {}\n",
        get_num_rows(mine_map),
        get_num_cols(mine_map)
    );
    for row in mine_map {
        for cell in row {
            str.push_str(if *cell { "x " } else { "- " });
        }
        str.push('\n');
    }
    str
}
