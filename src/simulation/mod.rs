pub mod engine;
pub mod grid;
pub mod history;
pub mod neighbors;
pub mod patterns;
pub mod queue;
pub mod rules;

pub use engine::{step, Simulation, StepReport};
pub use grid::{wrap, Coord, ToroidalGrid};
pub use history::QueueHistory;
pub use neighbors::{live_neighbor_count, neighbors, MOORE_OFFSETS};
pub use patterns::Pattern;
pub use queue::{dedupe, UpdateQueue};
pub use rules::RuleTable;
