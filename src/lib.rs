//! Game of Life with event-driven updates on a torus.
//!
//! Instead of recomputing the whole grid each generation, only cells in an
//! update queue are re-evaluated, and a cell that changes state schedules its
//! neighbors for the next step. See [`simulation::engine`].

pub mod config;
pub mod error;
pub mod simulation;

pub use config::SimConfig;
pub use error::ConfigError;
pub use simulation::{Coord, RuleTable, Simulation, StepReport, ToroidalGrid, UpdateQueue};
