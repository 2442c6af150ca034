use crate::Board;

/// Outcome of examining one board.
///
/// `solved = false` with empty `next` is a dead end (a blank cell with no
/// legal digit), which is distinct from a solution.
#[derive(Debug, Clone)]
pub struct Examination {
    /// Whether the board is complete (and therefore a valid solution)
    pub solved: bool,
    /// Successor boards for the first blank cell; empty if solved or dead
    pub next: Vec<Board>,
}

/// Unit struct solver — stateless, all state is per-call.
pub struct Solver;

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self
    }

    /// Classify `board` and enumerate its successor states.
    ///
    /// Completeness alone implies correctness because every `Board` already
    /// satisfies the uniqueness invariant.
    pub fn examine(&self, board: &Board) -> Examination {
        if board.is_complete() {
            return Examination {
                solved: true,
                next: Vec::new(),
            };
        }
        Examination {
            solved: false,
            next: board.next_states(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examine_complete_board() {
        let solved =
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179";
        let board = Board::from_string(solved).unwrap();
        let exam = Solver::new().examine(&board);
        assert!(exam.solved);
        assert!(exam.next.is_empty());
    }

    #[test]
    fn test_examine_open_board_branches() {
        let puzzle =
            "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";
        let board = Board::from_string(puzzle).unwrap();
        let exam = Solver::new().examine(&board);
        assert!(!exam.solved);
        assert!(!exam.next.is_empty());
    }

    #[test]
    fn test_examine_dead_end() {
        // (0,0) is blank but every digit conflicts: 1,2 via the row,
        // 3..8 via the top-left box, 9 via the column.
        let raw = concat!(
            " 12      ",
            "345      ",
            "678      ",
            "9        ",
            "         ",
            "         ",
            "         ",
            "         ",
            "         ",
        );
        let board = Board::from_string(raw).unwrap();
        assert_eq!(board.first_blank(), Some((0, 0)));
        assert!(board.legal_moves(0, 0).is_empty());
        let exam = Solver::new().examine(&board);
        assert!(!exam.solved);
        assert!(exam.next.is_empty());
    }
}
