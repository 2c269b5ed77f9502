//! Grid layout construction.
//!
//! Converts a mapping of named points with fractional coordinates into a
//! bounded integer grid, resolving coincident cells deterministically. The
//! resulting [`GridLayout`] is built once at startup and never recomputed.

pub mod builder;
pub mod cell;
pub mod source;

pub use builder::GridLayout;
pub use cell::Cell;
pub use source::{load_resource_points, parse_resource_points, ResourcePoint};
