//! Crossword filling as a constraint-satisfaction problem.
//!
//! A [`Crossword`] describes the slots of a grid, how they cross, and the dictionary of candidate
//! words. The [`Solver`] enforces node consistency, runs AC-3 over the crossing constraints, and
//! then backtracks over the remaining candidates until every slot holds a distinct word that agrees
//! with all of its crossings, or until it has proven that no such fill exists.

pub mod arc;
pub mod assignment;
pub mod crossword;
pub mod domains;
pub mod render;
pub mod search;
pub mod structure;

pub use arc::{ArcConsistencyFailure, ArcConsistencyResult, ArcConsistencySuccess};
pub use assignment::{validate, Assignment, Violation};
pub use crossword::{Crossing, Crossword, DefinitionError, Overlap, Variable, Word};
pub use domains::Domains;
pub use search::{
    find_fill, FailureReason, FillFailure, FillSuccess, Solver, SolverConfig, Statistics,
};
pub use structure::{Structure, StructureError};

/// The expected maximum length for a single slot. Longer slots still work; they just spill out of
/// the inline storage of the small vectors sized by this constant.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a given variable, based on its index in the Crossword's `variables` field.
pub type VariableId = usize;

/// An identifier for a given word, based on its index in the Crossword's sorted `words` field.
pub type WordId = usize;

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Across,
    Down,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}
