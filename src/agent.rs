use tracing::{debug, info};

use crate::belief::{BeliefMap, Tile};
use crate::error::AgentError;
use crate::observation::Observation;
use crate::search::PathSearch;
use crate::types::{Direction, Position};

/// Cells the agent has physically stood on. Only used to seed dead-end
/// detection; separate from any per-search visited set.
#[derive(Debug, Clone)]
pub struct VisitedGrid {
    rows: i32,
    cols: i32,
    cells: Vec<bool>,
}

impl VisitedGrid {
    fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; (rows * cols) as usize],
        }
    }

    fn mark(&mut self, pos: Position) {
        self.cells[(pos.row * self.cols + pos.col) as usize] = true;
    }

    pub fn contains(&self, pos: &Position) -> bool {
        if pos.row < 0 || pos.row >= self.rows || pos.col < 0 || pos.col >= self.cols {
            return false;
        }
        self.cells[(pos.row * self.cols + pos.col) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Exploring,
    Returning,
}

/// The return route committed when the agent turns around, replayed one
/// move per turn. The cursor may never pass the end of the route.
#[derive(Debug, Clone)]
struct ReturnRoute {
    steps: Vec<Direction>,
    cursor: usize,
}

impl ReturnRoute {
    fn advance(&mut self) -> Result<Direction, AgentError> {
        let step = self
            .steps
            .get(self.cursor)
            .copied()
            .ok_or(AgentError::RouteOverrun)?;
        self.cursor += 1;
        Ok(step)
    }
}

/// The agent's decision maker: accumulates a belief map from observations,
/// walks toward the gold while pruning exhausted dead ends, then replays a
/// single committed shortest route back to the start.
pub struct Agent {
    pub step_limit: i32,
    gold: Position,
    belief: BeliefMap,
    visited: VisitedGrid,
    phase: Phase,
    route: Option<ReturnRoute>,
}

impl Agent {
    pub fn new(rows: i32, cols: i32, step_limit: i32, start: Position, gold: Position) -> Self {
        Self {
            step_limit,
            gold,
            belief: BeliefMap::new(rows, cols, start, gold),
            visited: VisitedGrid::new(rows, cols),
            phase: Phase::Exploring,
            route: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn belief(&self) -> &BeliefMap {
        &self.belief
    }

    /// The committed return route, once the agent has turned around.
    pub fn return_route(&self) -> Option<&[Direction]> {
        self.route.as_ref().map(|route| route.steps.as_slice())
    }

    /// Decide the next move for one turn. The phase flips the turn the
    /// environment reports the agent standing on the gold cell.
    pub fn select_action(&mut self, observation: &Observation) -> Result<Direction, AgentError> {
        if self.phase == Phase::Exploring && observation.position == self.gold {
            info!(
                "gold reached at ({}, {}), heading back to start",
                self.gold.row, self.gold.col
            );
            self.phase = Phase::Returning;
        }

        match self.phase {
            Phase::Exploring => self.explore(observation),
            Phase::Returning => self.return_home(observation),
        }
    }

    fn explore(&mut self, observation: &Observation) -> Result<Direction, AgentError> {
        self.belief.integrate(observation)?;
        self.visited.mark(observation.position);

        let direction =
            PathSearch::next_step(&mut self.belief, observation.position, Tile::Gold)?;

        // Stepping back into a cell we already stood on means the branch
        // beyond the current cell is exhausted; prune the current cell
        // from future searches.
        let target = observation.position.step(direction);
        if self.visited.contains(&target) {
            debug!(
                "revisiting ({}, {}), pruning current cell",
                target.row, target.col
            );
            self.belief.place_barrier(observation.position);
        }
        Ok(direction)
    }

    fn return_home(&mut self, observation: &Observation) -> Result<Direction, AgentError> {
        self.visited.mark(observation.position);

        if self.route.is_none() {
            // Commit the way home only through territory confirmed
            // traversable: drop the dead-end overlay, then wall off
            // everything still unexplored.
            self.belief.remove_barriers();
            self.belief.seal_unknown();
            let steps =
                PathSearch::full_route(&self.belief, observation.position, Tile::Start)?;
            debug!(moves = steps.len(), "return route committed");
            self.route = Some(ReturnRoute { steps, cursor: 0 });
        }

        let Some(route) = self.route.as_mut() else {
            return Err(AgentError::RouteOverrun);
        };
        route.advance()
    }
}
