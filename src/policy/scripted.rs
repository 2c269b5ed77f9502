//! Baseline policies for demos and sanity checks.

use rand::Rng;

use super::action::Action;
use super::handle::Policy;

/// Always selects the same action, regardless of state.
///
/// Useful as a deterministic baseline: an always-`Up` agent walks straight
/// to the top edge and stays there.
pub struct ConstantPolicy {
    action: Action,
    name: String,
}

impl ConstantPolicy {
    /// Creates a policy fixed to `action`.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            name: format!("constant-{action}"),
        }
    }
}

impl Policy for ConstantPolicy {
    fn act(&self, _state_index: usize) -> Action {
        self.action
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Uniformly random action selection, as a lower-bound baseline.
///
/// Not deterministic, so it does not satisfy the greedy contract trained
/// networks do; keep it out of anything that relies on replayability.
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn act(&self, _state_index: usize) -> Action {
        if rand::thread_rng().gen_bool(0.5) {
            Action::Up
        } else {
            Action::Right
        }
    }

    fn name(&self) -> &str {
        "random"
    }
}
