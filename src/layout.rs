use std::error::Error;
use std::fmt;

use crate::types::Position;

/// Ground-truth contents of one maze cell. Distinct from the agent's
/// belief vocabulary: the maze itself has no notion of a barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Obstacle,
    Start,
    Gold,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A layout must contain exactly one cell of the given kind.
    MalformedMaze { cell: Cell, count: usize },
    /// The generator gave up before producing a feasible layout.
    GenerationFailed { attempts: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutError::MalformedMaze { cell, count } => {
                write!(
                    formatter,
                    "maze layout contains {} {:?} cells, expected exactly one",
                    count, cell
                )
            }
            LayoutError::GenerationFailed { attempts } => {
                write!(formatter, "no feasible maze generated after {} attempts", attempts)
            }
        }
    }
}

impl Error for LayoutError {}

/// The true maze: a fixed-size grid of cells, owned by the environment.
#[derive(Debug, Clone)]
pub struct Layout {
    pub rows: i32,
    pub cols: i32,
    cells: Vec<Cell>,
}

impl Layout {
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; (rows * cols) as usize],
        }
    }

    /// Build a layout from rectangular row data; handy for fixed scenarios.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let row_count = rows.len() as i32;
        let col_count = rows.first().map_or(0, |row| row.len()) as i32;
        let mut layout = Layout::new(row_count, col_count);
        for (row, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                layout.set(Position::new(row as i32, col as i32), *cell);
            }
        }
        layout
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        pos.row >= 0 && pos.row < self.rows && pos.col >= 0 && pos.col < self.cols
    }

    pub fn get(&self, pos: &Position) -> Option<Cell> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.cells[(pos.row * self.cols + pos.col) as usize])
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[(pos.row * self.cols + pos.col) as usize] = cell;
    }

    /// A cell the agent may stand on.
    pub fn is_movable(&self, pos: &Position) -> bool {
        matches!(self.get(pos), Some(Cell::Empty | Cell::Start | Cell::Gold))
    }

    pub fn positions_of(&self, kinds: &[Cell]) -> Vec<Position> {
        let mut positions = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                if let Some(cell) = self.get(&pos)
                    && kinds.contains(&cell)
                {
                    positions.push(pos);
                }
            }
        }
        positions
    }

    /// The position of the single cell of the given kind, or
    /// `MalformedMaze` when the layout has none or several.
    pub fn unique_cell(&self, kind: Cell) -> Result<Position, LayoutError> {
        let positions = self.positions_of(&[kind]);
        match positions.as_slice() {
            [position] => Ok(*position),
            _ => Err(LayoutError::MalformedMaze {
                cell: kind,
                count: positions.len(),
            }),
        }
    }
}
