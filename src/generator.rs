use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::layout::{Cell, Layout, LayoutError};
use crate::types::Position;

/// Wall density of randomly generated mazes when the caller has no
/// opinion. Roughly one cell in four becomes an obstacle.
pub const DEFAULT_WALL_CHANCE: f64 = 0.25;

/// How many random layouts to try before giving up on the requested
/// size/density combination.
const MAX_ATTEMPTS: usize = 10_000;

/// An open maze: start in the top-left corner, gold in the opposite one.
pub fn generate_empty(rows: i32, cols: i32) -> Layout {
    let mut layout = Layout::new(rows, cols);
    layout.set(Position::new(0, 0), Cell::Start);
    layout.set(Position::new(rows - 1, cols - 1), Cell::Gold);
    layout
}

/// A random maze with start and gold in opposing corners. May not be
/// feasible; callers are expected to check.
pub fn generate_random(rng: &mut impl Rng, rows: i32, cols: i32, wall_chance: f64) -> Layout {
    let mut layout = Layout::new(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            if rng.random_bool(wall_chance) {
                layout.set(Position::new(row, col), Cell::Obstacle);
            }
        }
    }
    layout.set(Position::new(0, 0), Cell::Start);
    layout.set(Position::new(rows - 1, cols - 1), Cell::Gold);
    layout
}

/// Whether a path exists between the start and the gold, by flooding the
/// movable cells from the start.
pub fn is_feasible(layout: &Layout) -> Result<bool, LayoutError> {
    let start = layout.unique_cell(Cell::Start)?;
    let gold = layout.unique_cell(Cell::Gold)?;

    let mut movable: HashSet<Position> =
        layout.positions_of(&[Cell::Empty, Cell::Gold]).into_iter().collect();
    let mut wave = vec![start];
    while let Some(expanding) = wave.pop() {
        if expanding == gold {
            return Ok(true);
        }
        for neighbor in expanding.neighbors() {
            if movable.remove(&neighbor) {
                wave.push(neighbor);
            }
        }
    }
    Ok(false)
}

/// Keep rolling random layouts until one is feasible. Fails with
/// `GenerationFailed` instead of spinning forever on a hopeless
/// size/density combination.
pub fn generate(
    rng: &mut impl Rng,
    rows: i32,
    cols: i32,
    wall_chance: f64,
) -> Result<Layout, LayoutError> {
    for attempt in 1..=MAX_ATTEMPTS {
        let layout = generate_random(rng, rows, cols, wall_chance);
        if is_feasible(&layout)? {
            debug!(attempt, "feasible maze generated");
            return Ok(layout);
        }
    }
    Err(LayoutError::GenerationFailed {
        attempts: MAX_ATTEMPTS,
    })
}
