//! Per-agent mutable state.

use serde::{Deserialize, Serialize};

use crate::layout::Cell;

/// State of one simulated agent: one per active model, plus the ensemble.
///
/// Field names on the wire match what the visualization client expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Current cell, always within the grid bounds.
    #[serde(rename = "agent_pos")]
    pub position: Cell,
    /// Every cell visited so far, in order. Append-only; a cell already in
    /// the path is never re-appended.
    pub path: Vec<Cell>,
    /// Target cell, fixed for the agent's lifetime.
    #[serde(rename = "goal_pos")]
    pub goal: Cell,
    /// Accumulated resource reward.
    pub reward: u64,
}

impl AgentState {
    /// Lifecycle defaults: origin position, single-entry path, zero reward.
    pub fn at_origin(goal: Cell) -> Self {
        Self::seeded(Cell::origin(), goal)
    }

    /// State seeded at an arbitrary position (used when the ensemble is
    /// created mid-episode from the first active model's position).
    pub fn seeded(position: Cell, goal: Cell) -> Self {
        Self {
            position,
            path: vec![position],
            goal,
            reward: 0,
        }
    }

    /// Whether the agent sits on its goal cell.
    pub fn at_goal(&self) -> bool {
        self.position == self.goal
    }

    /// Appends `cell` to the path unless it was already visited.
    /// Returns true when the cell was newly recorded.
    pub fn visit(&mut self, cell: Cell) -> bool {
        if self.path.contains(&cell) {
            false
        } else {
            self.path.push(cell);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_defaults() {
        let agent = AgentState::at_origin(Cell::new(9, 9));
        assert_eq!(agent.position, Cell::origin());
        assert_eq!(agent.path, vec![Cell::origin()]);
        assert_eq!(agent.goal, Cell::new(9, 9));
        assert_eq!(agent.reward, 0);
    }

    #[test]
    fn visit_appends_only_new_cells() {
        let mut agent = AgentState::at_origin(Cell::new(3, 3));
        assert!(agent.visit(Cell::new(0, 1)));
        assert!(!agent.visit(Cell::new(0, 1)));
        assert!(!agent.visit(Cell::origin()));
        assert_eq!(agent.path.len(), 2);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let agent = AgentState::at_origin(Cell::new(2, 2));
        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["agent_pos"], serde_json::json!([0, 0]));
        assert_eq!(json["goal_pos"], serde_json::json!([2, 2]));
        assert_eq!(json["path"], serde_json::json!([[0, 0]]));
        assert_eq!(json["reward"], serde_json::json!(0));
    }
}
