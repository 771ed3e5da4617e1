//! Simulation core
//!
//! The step engine that advances and presents one generation, the pure
//! reference of the next-state rule, and the drift-corrected scheduler that
//! paces the whole thing.

pub mod engine;
pub mod rule;
pub mod scheduler;

pub use engine::Simulation;
pub use scheduler::{Scheduler, GENERATIONS_PER_SECOND};
