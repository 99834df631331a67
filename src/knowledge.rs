use std::collections::{BTreeSet, HashSet};

use crate::error::{Result, SolverError};
use crate::grid::Cell;
use crate::sentence::Sentence;

///
/// Terms:
/// known cell: a cell proven to be a mine or proven to be safe
/// trivial deduction: reading all-mines or all-safe straight off one sentence
/// subset rule: if A's cells are a subset of B's, then B - A holds B.count - A.count mines
/// The goal is to turn as many unknown cells into known cells as the sentences allow.
///
/// Invariants held between public calls:
/// - `mines` and `safes` are disjoint and only ever grow
/// - no sentence mentions a known cell
/// - no two sentences are equal
///
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    sentences: Vec<Sentence>,
    mines: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
}

/// What a run of [`KnowledgeBase::infer`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceStats {
    pub passes: usize,
    pub marked: usize,
    pub derived: usize,
}

impl KnowledgeBase {
    pub fn new() -> KnowledgeBase {
        KnowledgeBase::default()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn is_known(&self, cell: &Cell) -> bool {
        self.mines.contains(cell) || self.safes.contains(cell)
    }

    ///
    /// Record that `cell` is a mine and remove it from every sentence that mentions it.
    /// Returns whether the cell was new information.
    ///
    /// Nothing is changed if the cell is already known safe, or if some sentence says it
    /// cannot hold another mine.
    ///
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool> {
        if self.safes.contains(&cell) {
            return Err(contradiction(format!("{cell:?} is known safe, cannot mark it a mine")));
        }
        if self.mines.contains(&cell) {
            return Ok(false);
        }
        if let Some(sentence) = self.sentences.iter().find(|s| s.rejects_mine(&cell)) {
            return Err(contradiction(format!(
                "{cell:?} cannot be a mine: {sentence} has no mines left"
            )));
        }
        self.mines.insert(cell);
        for sentence in self.sentences.iter_mut() {
            sentence.mark_mine(&cell)?;
        }
        tracing::debug!(cell = ?cell, "marked mine");
        Ok(true)
    }

    /// Record that `cell` is safe and remove it from every sentence that mentions it.
    /// Returns whether the cell was new information.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<bool> {
        if self.mines.contains(&cell) {
            return Err(contradiction(format!("{cell:?} is a known mine, cannot mark it safe")));
        }
        if self.safes.contains(&cell) {
            return Ok(false);
        }
        if let Some(sentence) = self.sentences.iter().find(|s| s.rejects_safe(&cell)) {
            return Err(contradiction(format!(
                "{cell:?} cannot be safe: every cell of {sentence} is a mine"
            )));
        }
        self.safes.insert(cell);
        for sentence in self.sentences.iter_mut() {
            sentence.mark_safe(&cell)?;
        }
        tracing::debug!(cell = ?cell, "marked safe");
        Ok(true)
    }

    ///
    /// Build the sentence for a revealed cell's neighbourhood, leaving out cells that are already
    /// known. Each known mine left out accounts for one of the `count` mines.
    ///
    /// Does not modify the knowledge base.
    ///
    pub fn neighborhood_sentence(
        &self,
        neighbors: impl IntoIterator<Item = Cell>,
        count: usize,
    ) -> Result<Sentence> {
        let mut unknown: Vec<Cell> = Vec::with_capacity(8);
        let mut n_known_mines: usize = 0;
        for cell in neighbors {
            if self.mines.contains(&cell) {
                n_known_mines += 1;
            } else if !self.safes.contains(&cell) {
                unknown.push(cell);
            }
        }
        let remaining = count.checked_sub(n_known_mines).ok_or(SolverError::Validation {
            ncells: unknown.len(),
            count: count as i64 - n_known_mines as i64,
        })?;
        Sentence::new(unknown, remaining)
    }

    /// Add a sentence unless it is vacuous or already present. Returns whether it was added.
    pub fn add_sentence(&mut self, sentence: Sentence) -> bool {
        if sentence.is_empty() || self.sentences.contains(&sentence) {
            return false;
        }
        tracing::debug!(sentence = %sentence, "added sentence");
        self.sentences.push(sentence);
        true
    }

    ///
    /// Run inference passes until one marks no new cell and derives no new sentence.
    ///
    /// Each pass:
    /// 1. marks every cell some sentence proves to be a mine or safe
    /// 2. drops empty and duplicate sentences
    /// 3. applies the subset rule to every ordered pair of sentences
    ///
    /// Terminates because every mark shrinks a finite set of unknown cells and every derived
    /// sentence is new and drawn from a finite set of (cells, count) pairs.
    ///
    pub fn infer(&mut self) -> Result<InferenceStats> {
        let mut stats = InferenceStats::default();
        loop {
            stats.passes += 1;
            let marked = self.deduce_trivial()?;
            self.cleanup();
            let derived = self.derive_from_subsets();
            stats.marked += marked;
            stats.derived += derived;
            tracing::trace!(
                pass = stats.passes,
                marked,
                derived,
                sentences = self.sentences.len(),
                "inference pass"
            );
            if marked == 0 && derived == 0 {
                break;
            }
        }
        if cfg!(debug_assertions) {
            self.check_invariants()?;
        }
        Ok(stats)
    }

    /// Mark every cell a single sentence proves. Returns the number of newly known cells.
    fn deduce_trivial(&mut self) -> Result<usize> {
        // Marking mutates the live sentences, so read deductions off a snapshot.
        let snapshot = self.sentences.clone();
        let mut marked = 0;
        for sentence in &snapshot {
            for cell in sentence.known_mines() {
                if self.mark_mine(cell)? {
                    marked += 1;
                }
            }
            for cell in sentence.known_safes() {
                if self.mark_safe(cell)? {
                    marked += 1;
                }
            }
        }
        Ok(marked)
    }

    fn cleanup(&mut self) {
        let mut seen: HashSet<Sentence> = HashSet::with_capacity(self.sentences.len());
        self.sentences.retain(|s| !s.is_empty() && seen.insert(s.clone()));
    }

    /// Apply the subset rule to every ordered pair. Returns the number of new sentences.
    fn derive_from_subsets(&mut self) -> usize {
        let snapshot = self.sentences.clone();
        let mut derived = 0;
        for subset in &snapshot {
            for superset in &snapshot {
                if subset == superset {
                    continue;
                }
                if let Some(inferred) = subset.subtract_from(superset) {
                    if self.add_sentence(inferred) {
                        derived += 1;
                    }
                }
            }
        }
        derived
    }

    /// Verify the knowledge base invariants, reporting the first one found broken.
    pub fn check_invariants(&self) -> Result<()> {
        if let Some(cell) = self.mines.intersection(&self.safes).next() {
            return Err(contradiction(format!("{cell:?} is both a mine and safe")));
        }
        let mut seen: HashSet<&Sentence> = HashSet::with_capacity(self.sentences.len());
        for sentence in &self.sentences {
            if sentence.count() > sentence.len() {
                return Err(contradiction(format!("{sentence} has more mines than cells")));
            }
            if let Some(cell) = sentence.cells().iter().find(|c| self.is_known(c)) {
                return Err(contradiction(format!("{sentence} still mentions known cell {cell:?}")));
            }
            if !seen.insert(sentence) {
                return Err(contradiction(format!("{sentence} is stored twice")));
            }
        }
        Ok(())
    }
}

fn contradiction(message: String) -> SolverError {
    tracing::error!(reason = %message, "knowledge base contradiction");
    SolverError::InvariantViolation(message)
}
