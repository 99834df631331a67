use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Result, SolverError};
use crate::grid::Cell;

///
/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Cells are kept in a `BTreeSet`, so two sentences built from the same cells in a different
/// order compare and hash equal.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Result<Sentence> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(SolverError::Validation { ncells: cells.len(), count: count as i64 });
        }
        Ok(Sentence { cells, count })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A sentence with no cells says nothing.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// All cells are mines when there are as many mines as cells.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count > 0 && self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// All cells are safe when the count is zero.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Whether removing `cell` as a mine would push the count below zero.
    pub(crate) fn rejects_mine(&self, cell: &Cell) -> bool {
        self.contains(cell) && self.count == 0
    }

    /// Whether removing `cell` as safe would leave more mines than cells.
    pub(crate) fn rejects_safe(&self, cell: &Cell) -> bool {
        self.contains(cell) && self.count == self.cells.len()
    }

    /// Drop a cell known to be a mine, accounting for it in the count.
    /// Returns whether the sentence changed.
    pub fn mark_mine(&mut self, cell: &Cell) -> Result<bool> {
        if !self.contains(cell) {
            return Ok(false);
        }
        if self.rejects_mine(cell) {
            return Err(SolverError::InvariantViolation(format!(
                "marking {cell:?} as a mine drives the count of {self} below zero"
            )));
        }
        self.cells.remove(cell);
        self.count -= 1;
        Ok(true)
    }

    /// Drop a cell known to be safe. The count is unchanged.
    /// Returns whether the sentence changed.
    pub fn mark_safe(&mut self, cell: &Cell) -> Result<bool> {
        if !self.contains(cell) {
            return Ok(false);
        }
        if self.rejects_safe(cell) {
            return Err(SolverError::InvariantViolation(format!(
                "marking {cell:?} as safe leaves more mines than cells in {self}"
            )));
        }
        self.cells.remove(cell);
        Ok(true)
    }

    pub fn is_subset(&self, other: &Sentence) -> bool {
        self.cells.is_subset(&other.cells)
    }

    ///
    /// Subset rule: if our cells are a subset of `superset`'s, then the cells only `superset` has
    /// hold exactly the mines `superset` has beyond ours.
    ///
    /// Returns `None` when the result would be empty or impossible (a negative count, or more
    /// mines than cells).
    ///
    pub fn subtract_from(&self, superset: &Sentence) -> Option<Sentence> {
        if !self.is_subset(superset) {
            return None;
        }
        let count = superset.count.checked_sub(self.count)?;
        let cells: BTreeSet<Cell> = superset.cells.difference(&self.cells).copied().collect();
        if cells.is_empty() || count > cells.len() {
            return None;
        }
        Some(Sentence { cells, count })
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, (i, j)) in self.cells.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({i}, {j})")?;
        }
        write!(f, "}} = {}", self.count)
    }
}
