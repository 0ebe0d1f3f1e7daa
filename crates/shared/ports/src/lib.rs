//! Desim Ports
//!
//! Port definitions (traits) for the simulator core.
//! These define the boundary between agent logic and the collaborators the
//! core does not own (the random-number source, in particular).

mod random;

pub use random::{RandomSource, ScriptedRandom};
