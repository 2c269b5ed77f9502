//! Multi-agent simulation.
//!
//! [`Simulation`] is the process-wide registry of active models, cached
//! policy handles, and per-agent state, owned explicitly by the serving
//! layer (which also serializes calls; there is no internal locking).
//! Each [`Simulation::step`] advances every active agent plus the
//! majority-vote ensemble by one synchronous tick.

pub mod agent;
pub mod registry;
pub mod snapshot;
mod step;


pub use agent::AgentState;
pub use registry::Simulation;
pub use snapshot::{GridSnapshot, StateSnapshot};
