pub mod agent;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod knowledge;
pub mod mine_map;
pub mod play;
pub mod sentence;

pub use agent::Agent;
pub use error::{Result, SolverError};
pub use grid::Cell;
pub use knowledge::KnowledgeBase;
pub use sentence::Sentence;

