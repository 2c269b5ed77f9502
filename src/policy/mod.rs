//! Policy inference.
//!
//! A policy maps a flat grid state index to one of two discrete actions.
//! Trained weights arrive through a [`PolicyProvider`], which resolves a
//! model name into a shareable [`PolicyHandle`]; weight parsing failures
//! are recovered with a randomly initialized network so activation never
//! fails on a locatable model.

pub mod action;
pub mod handle;
pub mod loader;
pub mod network;
pub mod provider;
pub mod scripted;

pub use action::{Action, VoteTally};
pub use handle::{Policy, PolicyHandle};
pub use loader::{Checkpoint, LoadError, Weights};
pub use network::QNetwork;
pub use provider::{DirectoryProvider, PolicyProvider, StaticProvider};
pub use scripted::{ConstantPolicy, RandomPolicy};
