use std::error::Error;
use std::fmt;

use crate::types::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentError {
    /// Position arithmetic would land outside the declared maze bounds.
    OutOfBounds { position: Position },
    /// Search exhausted its frontier even after the barrier overlay was
    /// cleared; no further progress is possible from current knowledge.
    NoPath,
    /// The return-phase cursor was asked for a move past the cached route.
    RouteOverrun,
}

impl fmt::Display for AgentError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AgentError::OutOfBounds { position } => {
                write!(
                    formatter,
                    "position ({}, {}) is outside the maze bounds",
                    position.row, position.col
                )
            }
            AgentError::NoPath => {
                write!(formatter, "no path to the target; no further progress possible")
            }
            AgentError::RouteOverrun => {
                write!(formatter, "return route exhausted but another move was requested")
            }
        }
    }
}

impl Error for AgentError {}
