//! Pure Sudoku board model.
//!
//! `Board` is an immutable 81-cell grid that enforces the row/column/box
//! uniqueness invariant on every construction; `Solver` classifies a board
//! as solved, dead end, or branchable and enumerates its successor states.
//! No I/O lives here.

mod board;
mod solver;

pub use board::{Board, InvalidBoard, UnitKind, CELL_COUNT, UNIT_SIZE};
pub use solver::{Examination, Solver};
