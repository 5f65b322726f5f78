use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::belief::{BeliefMap, Tile};
use crate::error::AgentError;
use crate::types::{Direction, Position};

/// One element of the transient search tree. Nodes live in an arena
/// addressed by index; the root carries no step.
struct Node {
    pos: Position,
    parent: usize,
    step: Option<Direction>,
}

pub struct PathSearch;

impl PathSearch {
    /// Exploration mode: the first move of a shortest path from `from` to
    /// the nearest `target` tile, recomputed every turn against the live
    /// belief map. If the barrier overlay has disconnected the target, the
    /// overlay is cleared and the search retried exactly once.
    #[tracing::instrument(level = "trace", skip(map), fields(row = from.row, col = from.col))]
    pub fn next_step(
        map: &mut BeliefMap,
        from: Position,
        target: Tile,
    ) -> Result<Direction, AgentError> {
        if let Some(route) = search(map, from, target) {
            return Ok(route[0]);
        }
        debug!("frontier exhausted, clearing barriers and retrying once");
        map.remove_barriers();
        match search(map, from, target) {
            Some(route) => Ok(route[0]),
            None => Err(AgentError::NoPath),
        }
    }

    /// Return mode: the complete move sequence from `from` to the nearest
    /// `target` tile, computed once and replayed by the caller.
    #[tracing::instrument(level = "trace", skip(map), fields(row = from.row, col = from.col))]
    pub fn full_route(
        map: &BeliefMap,
        from: Position,
        target: Tile,
    ) -> Result<Vec<Direction>, AgentError> {
        search(map, from, target).ok_or(AgentError::NoPath)
    }
}

/// Level-synchronous BFS. `Unknown` cells are traversable (the agent has
/// not ruled out a path through them); `Wall` and `Barrier` are not.
/// Children are generated in `Direction::ALL` order and the target test
/// runs on generation, so among equal-length paths the first move always
/// follows the declared direction order.
fn search(map: &BeliefMap, from: Position, target: Tile) -> Option<Vec<Direction>> {
    let mut arena = vec![Node {
        pos: from,
        parent: 0,
        step: None,
    }];
    let mut queue: VecDeque<usize> = VecDeque::from([0]);
    let mut seen: HashSet<Position> = HashSet::from([from]);

    while let Some(index) = queue.pop_front() {
        let pos = arena[index].pos;
        for direction in Direction::ALL {
            let next = pos.step(direction);
            if seen.contains(&next) || !map.is_walkable(&next) {
                continue;
            }
            arena.push(Node {
                pos: next,
                parent: index,
                step: Some(direction),
            });
            if map.get(&next) == Some(target) {
                trace!(nodes = arena.len(), "target reached");
                return Some(trace_route(&arena, arena.len() - 1));
            }
            seen.insert(next);
            queue.push_back(arena.len() - 1);
        }
    }

    trace!(nodes = arena.len(), "frontier exhausted");
    None
}

fn trace_route(arena: &[Node], mut index: usize) -> Vec<Direction> {
    let mut route = Vec::new();
    while let Some(step) = arena[index].step {
        route.push(step);
        index = arena[index].parent;
    }
    route.reverse();
    route
}
