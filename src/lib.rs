//! gridrover - Grid-world policy simulation and inference core.
//!
//! Backs an interactive visualization in which pre-trained policy agents
//! (plus a majority-vote ensemble) walk a 2-D grid seeded from real-world
//! coordinate data, collecting rewards for passing over named resources.
//!
//! The crate covers deterministic grid construction from raw coordinates,
//! greedy action selection over externally supplied model weights, and the
//! synchronous multi-agent step protocol. Transport, routing, and the
//! visualization front end are external collaborators.

pub mod config;
pub mod error;
pub mod layout;
pub mod policy;
pub mod sim;

pub use config::SimConfig;
pub use error::ConfigError;
pub use layout::{Cell, GridLayout, ResourcePoint};
pub use policy::{Action, Policy, PolicyHandle, PolicyProvider};
pub use sim::{AgentState, Simulation};

/// Reserved agent name for the majority-vote ensemble.
pub const ENSEMBLE: &str = "ensemble";
