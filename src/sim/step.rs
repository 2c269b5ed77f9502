//! The step engine.
//!
//! One call to [`Simulation::step`] advances the registry by exactly one
//! tick: a per-model pass queries each policy, tallies its vote, and
//! applies movement and reward; an ensemble pass then advances the
//! majority-vote agent under the same movement rules.

use crate::layout::{Cell, ResourcePoint};
use crate::policy::{Action, VoteTally};
use crate::ENSEMBLE;

use super::agent::AgentState;
use super::registry::Simulation;
use super::snapshot::StateSnapshot;

/// Which clamp the coordinate-derived reward component uses: the per-model
/// rule caps it at 10, the ensemble rule floors it at 10. The divergence is
/// long-standing and accumulated totals depend on it; do not unify.
#[derive(Debug, Clone, Copy)]
enum RewardRule {
    PerModel,
    Ensemble,
}

impl Simulation {
    /// Advances every active agent and the ensemble by one tick, returning
    /// the updated registry snapshot.
    ///
    /// Synchronous and total: the tick is O(active models), never blocks,
    /// and cannot fail. Agents whose policy or state record is missing are
    /// skipped. An agent already on its goal stops moving and accruing
    /// reward, but its policy is still queried and its vote still counts.
    pub fn step(&mut self) -> StateSnapshot {
        let (width, height) = self.layout_dims();

        // The ensemble record is created lazily at the top of the tick,
        // seeded from the first active model's pre-move position.
        if !self.has_agent(ENSEMBLE) {
            if let Some(first) = self.active_models().first().cloned() {
                if let Some(seed) = self.agent(&first) {
                    let agent = AgentState::seeded(seed.position, seed.goal);
                    self.insert_agent(ENSEMBLE, agent);
                }
            }
        }

        let mut tally = VoteTally::new();
        let names: Vec<String> = self.active_models().to_vec();
        for name in &names {
            let Some(policy) = self.policy(name) else {
                continue;
            };
            let Some(agent) = self.agent(name) else {
                continue;
            };
            let action = policy.act(agent.position.state_index(width));
            tally.record(action);
            self.advance_agent(name, action, width, height, RewardRule::PerModel);
        }

        if !names.is_empty() && self.has_agent(ENSEMBLE) {
            let ensemble_at_goal = self
                .agent(ENSEMBLE)
                .map(AgentState::at_goal)
                .unwrap_or(true);
            if !ensemble_at_goal {
                let action = tally.winner();
                self.advance_agent(ENSEMBLE, action, width, height, RewardRule::Ensemble);
            }
        }

        self.state()
    }

    /// Applies movement, path accounting, and reward to one agent.
    fn advance_agent(
        &mut self,
        name: &str,
        action: Action,
        width: i32,
        height: i32,
        rule: RewardRule,
    ) {
        let new_cell = {
            let Some(agent) = self.agent(name) else {
                return;
            };
            if agent.at_goal() {
                agent.position
            } else {
                apply_action(agent.position, action, width, height)
            }
        };

        let newly_visited = {
            let Some(agent) = self.agent_mut(name) else {
                return;
            };
            agent.position = new_cell;
            agent.visit(new_cell)
        };

        if newly_visited && self.layout().is_resource_cell(new_cell) {
            let value = resource_reward(self.points(), new_cell, width, height, rule);
            if let Some(agent) = self.agent_mut(name) {
                agent.reward += value;
            }
        }
    }
}

/// Applies one action with edge clamping: a move that would leave the grid
/// is a no-op for the tick.
fn apply_action(position: Cell, action: Action, width: i32, height: i32) -> Cell {
    match action {
        Action::Up if position.y < height - 1 => Cell::new(position.x, position.y + 1),
        Action::Right if position.x < width - 1 => Cell::new(position.x + 1, position.y),
        _ => position,
    }
}

/// Looks up the reward for landing on a resource cell.
///
/// Matching recomputes each resource's grid position from its raw
/// fractional coordinates scaled by the live grid dimensions, not from the
/// collision-adjusted layout cells, so agreement with the cell actually
/// occupied is coincidental. Preserved as-is; accumulated totals depend on
/// it. A cell no resource matches earns the flat default of 10.
fn resource_reward(
    points: &[ResourcePoint],
    cell: Cell,
    width: i32,
    height: i32,
    rule: RewardRule,
) -> u64 {
    for p in points {
        let gx = (p.x * width as f64) as i32;
        let gy = (p.y * height as f64) as i32;
        if cell.x == gx && cell.y == gy {
            let value = ((p.x + p.y) * 50.0) as i64;
            let clamped = match rule {
                RewardRule::PerModel => value.min(10),
                RewardRule::Ensemble => value.max(10),
            };
            return clamped as u64;
        }
    }
    10
}
