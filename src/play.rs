use rand::Rng;

use crate::agent::Agent;
use crate::error::Result;
use crate::game::{Minesweeper, Reveal};
use crate::grid::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every mine flagged, or every safe cell revealed.
    Won { moves: usize },
    /// Revealed a mine.
    Lost { cell: Cell, moves: usize },
    /// The agent has nothing left to play but the game isn't over.
    Stuck { moves: usize },
}

/// How the agent picked a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Safe,
    Random,
}

/// The agent's next move: a proven safe cell if there is one, otherwise a guess.
pub fn next_move<R: Rng + ?Sized>(agent: &Agent, rng: &mut R) -> Option<(Cell, MoveKind)> {
    if let Some(cell) = agent.make_safe_move() {
        return Some((cell, MoveKind::Safe));
    }
    agent.make_random_move(rng).map(|cell| (cell, MoveKind::Random))
}

/// Flag every mine the agent has proven. Returns whether the game is now over.
pub fn flag_known_mines(game: &mut Minesweeper, agent: &Agent) -> Result<bool> {
    for &mine in agent.mines() {
        if game.flag(mine)? {
            tracing::debug!(cell = ?mine, "flagged mine");
        }
    }
    Ok(game.won() || game.cleared())
}

///
/// Let the agent play `game` until it wins, hits a mine, or runs out of moves.
///
/// Every reveal is reported back to the agent, and every mine it proves is flagged on the board.
///
pub fn play<R: Rng + ?Sized>(
    game: &mut Minesweeper,
    agent: &mut Agent,
    rng: &mut R,
) -> Result<Outcome> {
    let mut moves = 0;
    loop {
        if flag_known_mines(game, agent)? {
            tracing::info!(moves, "won");
            return Ok(Outcome::Won { moves });
        }
        let Some((cell, kind)) = next_move(agent, rng) else {
            tracing::info!(moves, "no moves left");
            return Ok(Outcome::Stuck { moves });
        };
        moves += 1;
        match game.reveal(cell)? {
            Reveal::Mine => {
                tracing::info!(cell = ?cell, kind = ?kind, moves, "hit a mine");
                return Ok(Outcome::Lost { cell, moves });
            }
            Reveal::Count(count) => {
                tracing::debug!(cell = ?cell, kind = ?kind, count, "revealed");
                agent.add_knowledge(cell, count)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::mine_map;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    #[test]
    fn test_play_with_hint_wins_without_guessing() {
        // x - -
        let map = mine_map::from_mines(1, 3, &[(0, 0)]).unwrap();
        let mut game = Minesweeper::from_mine_map(map).unwrap();
        let mut agent = Agent::new(1, 3);
        agent.mark_safe((0, 2)).unwrap();
        let outcome = play(&mut game, &mut agent, &mut StdRng::seed_from_u64(0)).unwrap();
        println!("{}", game.to_string());
        assert_eq!(Outcome::Won { moves: 2 }, outcome);
        assert!(game.won());
    }

    #[test]
    fn test_next_move_prefers_safe_cells() {
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge((0, 0), 0).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(Some(((0, 1), MoveKind::Safe)), next_move(&agent, &mut rng));

        let agent = Agent::new(3, 3);
        assert!(matches!(next_move(&agent, &mut rng), Some((_, MoveKind::Random))));
    }

    #[test]
    fn test_agent_is_sound_over_many_games() {
        let mut rng = StdRng::seed_from_u64(2024);
        let config = GameConfig { height: 8, width: 8, mines: 10, seed: None };
        let mut wins = 0;
        for _ in 0..50 {
            let mut game = Minesweeper::new(&config, &mut rng).unwrap();
            let mut agent = Agent::new(config.height, config.width);
            let outcome = play(&mut game, &mut agent, &mut rng).unwrap();

            let mines = game.mines();
            assert!(agent.mines().is_subset(&mines), "false mine in {:?}", agent.mines());
            assert!(agent.safes().is_disjoint(&mines), "false safe in {:?}", agent.safes());
            agent.knowledge().check_invariants().unwrap();
            match outcome {
                Outcome::Won { .. } => wins += 1,
                // Only guesses may hit mines.
                Outcome::Lost { cell, .. } => assert!(!agent.safes().contains(&cell)),
                Outcome::Stuck { .. } => panic!("agent stuck:\n{}", game.to_string()),
            }
        }
        println!("won {wins} of 50");
    }

    #[test]
    fn test_cleared_board_counts_as_won() {
        // x x -
        // (0,0) has no revealed neighbour, so it is never proven a mine, but once every safe cell
        // is revealed the game is over.
        let map = mine_map::from_mines(1, 3, &[(0, 0), (0, 1)]).unwrap();
        let mut game = Minesweeper::from_mine_map(map).unwrap();
        let mut agent = Agent::new(1, 3);
        agent.mark_safe((0, 2)).unwrap();
        let outcome = play(&mut game, &mut agent, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(Outcome::Won { moves: 1 }, outcome);
        assert!(!game.won());
        assert!(game.cleared());
        let flagged: BTreeSet<Cell> = [(0, 1)].into_iter().collect();
        assert_eq!(&flagged, game.mines_found());
    }

    #[test]
    fn test_mine_free_board_is_won_immediately() {
        let map = mine_map::from_mines(2, 2, &[]).unwrap();
        let mut game = Minesweeper::from_mine_map(map).unwrap();
        let mut agent = Agent::new(2, 2);
        let outcome = play(&mut game, &mut agent, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(Outcome::Won { moves: 0 }, outcome);
    }
}
