use std::collections::{BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, SolverError};
use crate::grid::{BoardDims, Cell};
use crate::knowledge::KnowledgeBase;

///
/// Minesweeper player. Learns from the counts the board reports and only ever claims a cell is
/// safe or a mine when its knowledge proves it.
///
#[derive(Debug, Clone)]
pub struct Agent {
    dims: BoardDims,
    moves_made: HashSet<Cell>,
    knowledge: KnowledgeBase,
}

impl Agent {
    pub fn new(nrows: usize, ncols: usize) -> Agent {
        Agent {
            dims: BoardDims::new(nrows, ncols),
            moves_made: HashSet::with_capacity(nrows * ncols),
            knowledge: KnowledgeBase::new(),
        }
    }

    pub fn dims(&self) -> BoardDims {
        self.dims
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        self.knowledge.mines()
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        self.knowledge.safes()
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    ///
    /// Called when the board reports that the revealed, safe `cell` has `count` mines among
    /// its neighbours.
    ///
    /// Records the move, marks the cell safe, adds a sentence over the neighbours that are not
    /// yet known, and then infers until nothing more can be concluded.
    ///
    /// Input is validated before anything changes: an out of bounds cell, a cell already known to
    /// be a mine, or a count the neighbourhood cannot hold leave the agent untouched.
    ///
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<()> {
        self.dims.check(cell)?;
        if self.knowledge.mines().contains(&cell) {
            return Err(SolverError::InvariantViolation(format!(
                "revealed cell {cell:?} is a known mine"
            )));
        }
        let sentence = self
            .knowledge
            .neighborhood_sentence(self.dims.neighbors(cell), count)?;

        self.moves_made.insert(cell);
        self.knowledge.mark_safe(cell)?;
        self.knowledge.add_sentence(sentence);
        let stats = self.knowledge.infer()?;

        tracing::debug!(
            cell = ?cell,
            count,
            passes = stats.passes,
            marked = stats.marked,
            derived = stats.derived,
            "added knowledge"
        );
        tracing::debug!(mines = ?self.knowledge.mines(), "known mines");
        tracing::debug!(safe_moves = ?self.remaining_safes().collect::<Vec<_>>(), "safe moves left");
        Ok(())
    }

    /// Mark `cell` as a mine from an outside hint, then infer from it.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<()> {
        self.dims.check(cell)?;
        if self.knowledge.mark_mine(cell)? {
            self.knowledge.infer()?;
        }
        Ok(())
    }

    /// Mark `cell` as safe from an outside hint, then infer from it.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<()> {
        self.dims.check(cell)?;
        if self.knowledge.mark_safe(cell)? {
            self.knowledge.infer()?;
        }
        Ok(())
    }

    fn remaining_safes(&self) -> impl Iterator<Item = Cell> + '_ {
        self.knowledge
            .safes()
            .iter()
            .copied()
            .filter(|cell| !self.moves_made.contains(cell))
    }

    ///
    /// A cell known to be safe that hasn't been played yet, smallest (row, col) first.
    /// `None` means nothing is proven safe; the caller has to guess.
    ///
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.remaining_safes().next()
    }

    ///
    /// A uniformly random cell among those not played yet and not known to be mines.
    /// `None` when no such cell is left.
    ///
    pub fn make_random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let choices: Vec<Cell> = self
            .dims
            .cells()
            .filter(|cell| !self.moves_made.contains(cell) && !self.knowledge.mines().contains(cell))
            .collect();
        choices.choose(rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentence::Sentence;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn set(cells: &[Cell]) -> BTreeSet<Cell> {
        cells.iter().copied().collect()
    }

    #[test]
    fn test_zero_count_marks_neighbors_safe() {
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge((0, 0), 0).unwrap();
        assert!(set(&[(0, 1), (1, 0), (1, 1)]).is_subset(agent.safes()));
        assert!(agent.safes().contains(&(0, 0)));
        assert!(agent.mines().is_empty());
        assert!(agent.moves_made().contains(&(0, 0)));
        assert!(agent.knowledge().sentences().is_empty());
        assert_eq!(Some((0, 1)), agent.make_safe_move());
    }

    #[test]
    fn test_no_certainty_without_subsets() {
        // - - - - -
        // - 1 2 1 -
        // No sentence is a subset of another, so nothing beyond the reveals is proven.
        let mut agent = Agent::new(2, 5);
        agent.add_knowledge((1, 1), 1).unwrap();
        agent.add_knowledge((1, 2), 2).unwrap();
        agent.add_knowledge((1, 3), 1).unwrap();
        for s in agent.knowledge().sentences() {
            println!("{s}");
        }
        assert!(agent.mines().is_empty());
        assert_eq!(set(&[(1, 1), (1, 2), (1, 3)]), *agent.safes());
        let sentences: BTreeSet<Sentence> = agent.knowledge().sentences().iter().cloned().collect();
        let expected: BTreeSet<Sentence> = [
            Sentence::new(vec![(0, 0), (0, 1), (0, 2), (1, 0)], 1).unwrap(),
            Sentence::new(vec![(0, 1), (0, 2), (0, 3)], 2).unwrap(),
            Sentence::new(vec![(0, 2), (0, 3), (0, 4), (1, 4)], 1).unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(expected, sentences);
    }

    #[test]
    fn test_subset_rule_marks_mine() {
        // x - x
        // 1 2 -
        // (1,0) sees {(0,0),(0,1)} = 1 once (1,1) is revealed, (1,1) sees {(0,0),(0,1),(0,2)} = 2,
        // so (0,2) must be a mine.
        let mut agent = Agent::new(2, 3);
        agent.mark_safe((1, 2)).unwrap();
        agent.add_knowledge((1, 0), 1).unwrap();
        agent.add_knowledge((1, 1), 2).unwrap();
        assert_eq!(set(&[(0, 2)]), *agent.mines());
        assert!(!agent.safes().contains(&(0, 2)));
    }

    #[test]
    fn test_known_neighbors_are_filtered_from_new_sentences() {
        let mut agent = Agent::new(3, 3);
        agent.mark_mine((0, 0)).unwrap();
        agent.add_knowledge((1, 1), 1).unwrap();
        // The only mine around (1, 1) is already known, so everything else is safe.
        assert_eq!(
            set(&[(0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1), (2, 2)]),
            *agent.safes()
        );
        assert_eq!(set(&[(0, 0)]), *agent.mines());
    }

    #[test]
    fn test_add_knowledge_rejects_out_of_bounds() {
        let mut agent = Agent::new(3, 3);
        assert!(matches!(agent.add_knowledge((3, 0), 0), Err(SolverError::InvalidCell { .. })));
        assert!(agent.moves_made().is_empty());
        assert!(agent.safes().is_empty());
    }

    #[test]
    fn test_add_knowledge_rejects_impossible_count() {
        let mut agent = Agent::new(3, 3);
        assert!(matches!(agent.add_knowledge((0, 0), 4), Err(SolverError::Validation { .. })));
        assert!(agent.moves_made().is_empty());
        assert!(agent.safes().is_empty());
    }

    #[test]
    fn test_add_knowledge_on_known_mine_is_rejected() {
        let mut agent = Agent::new(3, 3);
        agent.mark_mine((1, 1)).unwrap();
        assert!(matches!(
            agent.add_knowledge((1, 1), 0),
            Err(SolverError::InvariantViolation(_))
        ));
        assert!(!agent.safes().contains(&(1, 1)));
        assert!(!agent.moves_made().contains(&(1, 1)));
    }

    #[test]
    fn test_hints_do_not_overlap() {
        let mut agent = Agent::new(3, 3);
        agent.mark_mine((2, 2)).unwrap();
        assert!(agent.mark_safe((2, 2)).is_err());
        agent.mark_safe((0, 0)).unwrap();
        assert!(agent.mark_mine((0, 0)).is_err());
        assert_eq!(set(&[(2, 2)]), *agent.mines());
        assert_eq!(set(&[(0, 0)]), *agent.safes());
        // Repeating a consistent hint is a no-op.
        agent.mark_mine((2, 2)).unwrap();
        assert_eq!(1, agent.mines().len());
    }

    #[test]
    fn test_hint_triggers_inference() {
        let mut agent = Agent::new(1, 3);
        agent.add_knowledge((0, 1), 1).unwrap();
        assert!(agent.mines().is_empty());
        agent.mark_safe((0, 0)).unwrap();
        assert_eq!(set(&[(0, 2)]), *agent.mines());
    }

    #[test]
    fn test_make_safe_move_skips_moves_made() {
        let mut agent = Agent::new(2, 2);
        assert_eq!(None, agent.make_safe_move());
        agent.add_knowledge((0, 0), 0).unwrap();
        assert_eq!(Some((0, 1)), agent.make_safe_move());
        agent.add_knowledge((0, 1), 0).unwrap();
        agent.add_knowledge((1, 0), 0).unwrap();
        assert_eq!(Some((1, 1)), agent.make_safe_move());
        agent.add_knowledge((1, 1), 0).unwrap();
        assert_eq!(None, agent.make_safe_move());
        assert_eq!(None, agent.make_random_move(&mut StdRng::seed_from_u64(0)));
    }

    #[test]
    fn test_make_safe_move_does_not_mutate() {
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge((0, 0), 0).unwrap();
        let before = agent.safes().clone();
        assert_eq!(agent.make_safe_move(), agent.make_safe_move());
        assert_eq!(before, *agent.safes());
        assert_eq!(1, agent.moves_made().len());
    }

    #[test]
    fn test_make_random_move_avoids_moves_and_mines() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut agent = Agent::new(2, 2);
        agent.mark_mine((0, 0)).unwrap();
        agent.add_knowledge((1, 1), 1).unwrap();
        for _ in 0..50 {
            let cell = agent.make_random_move(&mut rng).unwrap();
            assert!(cell == (0, 1) || cell == (1, 0), "unexpected move {cell:?}");
        }
    }

    #[test]
    fn test_make_random_move_covers_all_choices() {
        let mut rng = StdRng::seed_from_u64(42);
        let agent = Agent::new(2, 2);
        let mut seen = BTreeSet::new();
        for _ in 0..200 {
            seen.insert(agent.make_random_move(&mut rng).unwrap());
        }
        assert_eq!(set(&[(0, 0), (0, 1), (1, 0), (1, 1)]), seen);
    }

    #[test]
    fn test_sets_only_grow() {
        let mut agent = Agent::new(4, 4);
        let mut prev = (0, 0, 0);
        for (cell, count) in [((0, 0), 1), ((0, 1), 1), ((3, 3), 0), ((2, 3), 1)] {
            agent.add_knowledge(cell, count).unwrap();
            let cur = (agent.moves_made().len(), agent.mines().len(), agent.safes().len());
            assert!(cur.0 >= prev.0 && cur.1 >= prev.1 && cur.2 >= prev.2);
            prev = cur;
        }
    }
}
