pub mod agent;
pub mod belief;
pub mod error;
pub mod generator;
pub mod keeper;
pub mod layout;
pub mod observation;
pub mod observer;
pub mod render;
pub mod replay;
pub mod search;
pub mod simulation;
pub mod types;

// Re-export commonly used types for convenience
pub use agent::{Agent, Phase};
pub use belief::{BeliefMap, Tile};
pub use error::AgentError;
pub use keeper::MazeKeeper;
pub use layout::{Cell, Layout, LayoutError};
pub use observation::{Observation, Vision};
pub use simulation::{EpisodeReport, Simulation};
pub use types::{Direction, Position};
