//! Simulation configuration.

/// Configuration for grid construction and policy inference.
///
/// The defaults reproduce the constants the original deployment was tuned
/// with; changing them changes grid geometry and therefore the state space
/// any loaded weights were trained against.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Multiplier applied to raw fractional coordinates before truncation.
    pub scale: i32,
    /// Extra cells added past the maximal occupied cell on each axis.
    pub padding: i32,
    /// Hidden layer width of the inference Q-network.
    pub hidden_dim: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scale: 200,
            padding: 8,
            hidden_dim: 128,
        }
    }
}
