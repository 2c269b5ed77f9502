//! Serde views handed to snapshot consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::layout::{Cell, GridLayout};

use super::agent::AgentState;

/// Static grid description, valid for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub grid_size_x: i32,
    pub grid_size_y: i32,
    /// Final cell per resource, as `[x, y]` pairs.
    pub resources: Vec<Cell>,
    /// `"x,y"` cell key to resource name.
    pub resource_map: BTreeMap<String, String>,
}

impl GridSnapshot {
    /// Builds the snapshot from a layout.
    pub fn from_layout(layout: &GridLayout) -> Self {
        Self {
            grid_size_x: layout.width(),
            grid_size_y: layout.height(),
            resources: layout.cells().to_vec(),
            resource_map: layout
                .cell_to_name()
                .iter()
                .map(|(cell, name)| (cell.key(), name.clone()))
                .collect(),
        }
    }
}

/// Dynamic registry view returned by every activation, step, and reset.
///
/// Agents are keyed by model name (plus the reserved ensemble entry) in a
/// sorted map so the serialized form is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub active_models: Vec<String>,
    #[serde(rename = "states")]
    pub agents: BTreeMap<String, AgentState>,
}
