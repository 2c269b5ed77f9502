//! Policy trait.

use std::sync::Arc;

use super::action::Action;

/// A deterministic action-selection capability.
///
/// Implementations perform greedy selection (arg-max, no exploration
/// noise): the same state index always yields the same action for fixed
/// weights. The simulation core never inspects how the decision is made.
pub trait Policy: Send + Sync {
    /// Selects the action for a flat grid state index `y * width + x`.
    fn act(&self, state_index: usize) -> Action;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}

/// Shareable policy handle, cached by the registry across activations.
pub type PolicyHandle = Arc<dyn Policy>;
