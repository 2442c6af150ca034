use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Cells per row, column, or box
pub const UNIT_SIZE: usize = 9;
/// Total cells in a board
pub const CELL_COUNT: usize = 81;

/// Which kind of unit a duplicate was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Row,
    Column,
    Box,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Row => write!(f, "row"),
            UnitKind::Column => write!(f, "column"),
            UnitKind::Box => write!(f, "box"),
        }
    }
}

/// Why a board failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidBoard {
    /// Input did not contain exactly 81 legal cell characters
    WrongLength(usize),
    /// A digit appears more than once in a row, column, or box
    Duplicate {
        unit: UnitKind,
        index: usize,
        digit: u8,
    },
}

impl fmt::Display for InvalidBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidBoard::WrongLength(n) => {
                write!(f, "expected {} cells, got {}", CELL_COUNT, n)
            }
            InvalidBoard::Duplicate { unit, index, digit } => {
                write!(f, "duplicate {} in {} {}", digit, unit, index)
            }
        }
    }
}

impl std::error::Error for InvalidBoard {}

/// An immutable 81-cell Sudoku grid.
///
/// Every `Board` in existence satisfies the uniqueness invariant: no digit
/// appears twice in any row, column, or 3x3 box. Construction re-validates
/// all 27 units; moves produce new boards rather than mutating in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<u8>; CELL_COUNT],
}

impl Board {
    /// Parse a board from its string form.
    ///
    /// Characters `1`-`9` are digits; space, `.` and `0` are blanks; every
    /// other character (newlines, grid decoration) is filtered out before
    /// the length check, so stray input surfaces as `WrongLength`.
    pub fn from_string(raw: &str) -> Result<Board, InvalidBoard> {
        let filtered: Vec<Option<u8>> = raw
            .chars()
            .filter_map(|c| match c {
                '1'..='9' => Some(Some(c as u8 - b'0')),
                ' ' | '.' | '0' => Some(None),
                _ => None,
            })
            .collect();

        if filtered.len() != CELL_COUNT {
            return Err(InvalidBoard::WrongLength(filtered.len()));
        }

        let mut cells = [None; CELL_COUNT];
        cells.copy_from_slice(&filtered);

        let board = Board { cells };
        board.validate()?;
        Ok(board)
    }

    /// Re-check the uniqueness invariant across all rows, columns, and boxes.
    fn validate(&self) -> Result<(), InvalidBoard> {
        for i in 0..UNIT_SIZE {
            Self::check_unit(&self.row(i), UnitKind::Row, i)?;
            Self::check_unit(&self.column(i), UnitKind::Column, i)?;
            Self::check_unit(&self.box_of(3 * (i / 3), 3 * (i % 3)), UnitKind::Box, i)?;
        }
        Ok(())
    }

    fn check_unit(
        unit: &[Option<u8>; UNIT_SIZE],
        kind: UnitKind,
        index: usize,
    ) -> Result<(), InvalidBoard> {
        let mut seen = [false; 10];
        for cell in unit.iter().flatten() {
            let digit = *cell as usize;
            if seen[digit] {
                return Err(InvalidBoard::Duplicate {
                    unit: kind,
                    index,
                    digit: *cell,
                });
            }
            seen[digit] = true;
        }
        Ok(())
    }

    /// The cell at `(row, col)`, zero-indexed.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells[row * UNIT_SIZE + col]
    }

    /// The 9 cells of row `i`, zero-indexed.
    pub fn row(&self, i: usize) -> [Option<u8>; UNIT_SIZE] {
        let mut unit = [None; UNIT_SIZE];
        for (col, slot) in unit.iter_mut().enumerate() {
            *slot = self.cells[i * UNIT_SIZE + col];
        }
        unit
    }

    /// The 9 cells of column `i`, zero-indexed.
    pub fn column(&self, i: usize) -> [Option<u8>; UNIT_SIZE] {
        let mut unit = [None; UNIT_SIZE];
        for (row, slot) in unit.iter_mut().enumerate() {
            *slot = self.cells[row * UNIT_SIZE + i];
        }
        unit
    }

    /// The 9 cells of the 3x3 box containing `(row, col)`.
    pub fn box_of(&self, row: usize, col: usize) -> [Option<u8>; UNIT_SIZE] {
        let base_row = (row / 3) * 3;
        let base_col = (col / 3) * 3;
        let mut unit = [None; UNIT_SIZE];
        for (k, slot) in unit.iter_mut().enumerate() {
            *slot = self.cells[(base_row + k / 3) * UNIT_SIZE + base_col + k % 3];
        }
        unit
    }

    /// Digits that can legally be placed at `(row, col)`: 1-9 minus the
    /// digits already present in the cell's row, column, and box. Ascending.
    pub fn legal_moves(&self, row: usize, col: usize) -> Vec<u8> {
        let mut used = [false; 10];
        for cell in self
            .row(row)
            .iter()
            .chain(self.column(col).iter())
            .chain(self.box_of(row, col).iter())
            .flatten()
        {
            used[*cell as usize] = true;
        }
        (1..=9).filter(|d| !used[*d as usize]).collect()
    }

    /// The first blank cell in row-major order, if any.
    pub fn first_blank(&self) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(Option::is_none)
            .map(|idx| (idx / UNIT_SIZE, idx % UNIT_SIZE))
    }

    /// Whether every cell is filled. A complete board is a solution because
    /// the uniqueness invariant already holds by construction.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// One child board per legal digit at the first blank cell.
    ///
    /// Empty when the board is complete, and also when the first blank cell
    /// admits no digit (a dead end); callers tell the two apart with
    /// [`Board::is_complete`]. Cell selection is a fixed row-major scan.
    pub fn next_states(&self) -> Vec<Board> {
        let Some((row, col)) = self.first_blank() else {
            return Vec::new();
        };
        self.legal_moves(row, col)
            .into_iter()
            .map(|digit| self.with_value(row, col, digit))
            .collect()
    }

    /// Copy with one cell set. Only called with digits from `legal_moves`,
    /// which keeps the invariant intact without re-validating.
    fn with_value(&self, row: usize, col: usize, digit: u8) -> Board {
        let mut cells = self.cells;
        cells[row * UNIT_SIZE + col] = Some(digit);
        let child = Board { cells };
        debug_assert!(child.validate().is_ok());
        child
    }
}

impl fmt::Display for Board {
    /// 81 characters, row-major, blanks as spaces — the wire encoding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            match cell {
                Some(d) => write!(f, "{}", d)?,
                None => write!(f, " ")?,
            }
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

struct BoardVisitor;

impl Visitor<'_> for BoardVisitor {
    type Value = Board;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an 81-character board string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Board, E> {
        Board::from_string(value).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Board, D::Error> {
        deserializer.deserialize_str(BoardVisitor)
    }
}
