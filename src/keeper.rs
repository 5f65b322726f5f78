use tracing::debug;

use crate::layout::{Cell, Layout, LayoutError};
use crate::observation::{Observation, Vision};
use crate::types::{Direction, Position};

/// The environment: owns the true maze, tracks the agent's real position,
/// and answers each move with a fresh observation.
pub struct MazeKeeper {
    layout: Layout,
    start: Position,
    gold: Position,
    agent_position: Position,
    has_gold: bool,
    finished: bool,
}

impl MazeKeeper {
    pub fn new(layout: Layout) -> Result<Self, LayoutError> {
        let start = layout.unique_cell(Cell::Start)?;
        let gold = layout.unique_cell(Cell::Gold)?;
        Ok(Self {
            layout,
            start,
            gold,
            agent_position: start,
            has_gold: false,
            finished: false,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn start_position(&self) -> Position {
        self.start
    }

    pub fn gold_position(&self) -> Position {
        self.gold
    }

    pub fn agent_position(&self) -> Position {
        self.agent_position
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Traversable cells before the first obstacle or the maze edge, per
    /// direction, not counting the cell the agent stands on.
    fn vision(&self) -> Vision {
        Vision::from_fn(|direction| {
            let mut range = 0;
            let mut cell = self.agent_position.step(direction);
            while self.layout.is_movable(&cell) {
                range += 1;
                cell = cell.step(direction);
            }
            range
        })
    }

    /// The agent's current view. Refreshes the episode flags: picking up
    /// the gold happens by standing on it, finishing by standing on the
    /// start afterwards.
    pub fn observation(&mut self) -> Observation {
        if self.agent_position == self.gold {
            self.has_gold = true;
        }
        if self.has_gold && self.agent_position == self.start {
            self.finished = true;
        }
        Observation::new(self.agent_position, self.vision())
    }

    /// Execute one move. Walking into an obstacle or the maze edge leaves
    /// the agent where it is.
    pub fn apply(&mut self, direction: Direction) -> Observation {
        let target = self.agent_position.step(direction);
        if self.layout.is_movable(&target) {
            self.agent_position = target;
        } else {
            debug!(
                "move {:?} into ({}, {}) rejected",
                direction, target.row, target.col
            );
        }
        self.observation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_layout() -> Layout {
        use Cell::{Empty as E, Gold as G, Obstacle as O, Start as S};
        Layout::from_rows(vec![
            vec![E, O, E, E, E],
            vec![E, O, E, O, E],
            vec![S, O, E, O, G],
            vec![E, O, E, O, E],
            vec![E, E, E, E, E],
        ])
    }

    #[test]
    fn test_vision_counts_from_start() {
        let mut keeper = MazeKeeper::new(sample_layout()).unwrap();
        let observation = keeper.observation();
        assert_eq!(observation.position, Position::new(2, 0));
        assert_eq!(observation.vision.get(Direction::North), 2);
        assert_eq!(observation.vision.get(Direction::South), 2);
        assert_eq!(observation.vision.get(Direction::West), 0);
        assert_eq!(observation.vision.get(Direction::East), 0);
    }

    #[test]
    fn test_illegal_move_keeps_position() {
        let mut keeper = MazeKeeper::new(sample_layout()).unwrap();
        let observation = keeper.apply(Direction::East);
        assert_eq!(observation.position, Position::new(2, 0));
        let observation = keeper.apply(Direction::North);
        assert_eq!(observation.position, Position::new(1, 0));
    }

    #[test]
    fn test_finishes_only_with_gold_in_hand() {
        let mut layout = Layout::new(1, 3);
        layout.set(Position::new(0, 0), Cell::Start);
        layout.set(Position::new(0, 2), Cell::Gold);
        let mut keeper = MazeKeeper::new(layout).unwrap();

        keeper.observation();
        keeper.apply(Direction::East);
        assert!(!keeper.finished());
        keeper.apply(Direction::East); // on the gold
        keeper.apply(Direction::West);
        assert!(!keeper.finished());
        keeper.apply(Direction::West); // back on the start
        assert!(keeper.finished());
    }

    #[test]
    fn test_rejects_layout_without_unique_gold() {
        let mut layout = Layout::new(2, 2);
        layout.set(Position::new(0, 0), Cell::Start);
        assert!(matches!(
            MazeKeeper::new(layout),
            Err(LayoutError::MalformedMaze { .. })
        ));
    }
}
