//! The simulation registry.

use std::collections::{BTreeMap, HashMap};

use crate::config::SimConfig;
use crate::layout::{GridLayout, ResourcePoint};
use crate::policy::{PolicyHandle, PolicyProvider};
use crate::ENSEMBLE;

use super::agent::AgentState;
use super::snapshot::{GridSnapshot, StateSnapshot};

/// Process-wide simulation state: the grid, the active model order, cached
/// policy handles, and per-agent state.
///
/// This is an explicit context object: the serving layer owns it, passes
/// it by reference into each operation, and serializes calls. Every
/// operation runs to completion within one call; there is no partial-tick
/// visibility.
pub struct Simulation {
    layout: GridLayout,
    /// Raw fractional points, kept because reward matching recomputes grid
    /// positions from them at lookup time.
    points: Vec<ResourcePoint>,
    active_models: Vec<String>,
    policies: HashMap<String, PolicyHandle>,
    agents: HashMap<String, AgentState>,
}

impl Simulation {
    /// Builds the grid from the resource points and starts with no active
    /// models.
    pub fn new(points: Vec<ResourcePoint>, config: &SimConfig) -> Self {
        let layout = GridLayout::build(&points, config.scale, config.padding);
        Self {
            layout,
            points,
            active_models: Vec::new(),
            policies: HashMap::new(),
            agents: HashMap::new(),
        }
    }

    /// The immutable grid layout.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Raw resource points, in name order.
    pub fn points(&self) -> &[ResourcePoint] {
        &self.points
    }

    /// Names of the currently active models, in activation order.
    pub fn active_models(&self) -> &[String] {
        &self.active_models
    }

    /// Read access to an agent's state, the ensemble included.
    pub fn agent(&self, name: &str) -> Option<&AgentState> {
        self.agents.get(name)
    }

    /// Static grid snapshot.
    pub fn grid(&self) -> GridSnapshot {
        GridSnapshot::from_layout(&self.layout)
    }

    /// Dynamic registry snapshot.
    pub fn state(&self) -> StateSnapshot {
        StateSnapshot {
            active_models: self.active_models.clone(),
            agents: self
                .agents
                .iter()
                .map(|(name, agent)| (name.clone(), agent.clone()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    /// Replaces the active model set.
    ///
    /// Names the provider cannot locate are silently dropped; the caller
    /// only ever observes a smaller-than-requested list. Duplicate names
    /// are kept once. Policy handles load once and are cached across
    /// activations; every retained model's agent state is reset to the
    /// lifecycle defaults. Agent records outside the new active set (the
    /// ensemble included) are destroyed.
    pub fn activate(&mut self, names: &[String], provider: &dyn PolicyProvider) -> StateSnapshot {
        self.active_models.clear();
        let goal = self.layout.goal();

        for name in names {
            if self.active_models.iter().any(|n| n == name) {
                continue;
            }
            if !provider.contains(name) {
                continue;
            }
            if !self.policies.contains_key(name) {
                let Some(handle) = provider.resolve(name) else {
                    continue;
                };
                self.policies.insert(name.clone(), handle);
            }
            self.agents.insert(name.clone(), AgentState::at_origin(goal));
            self.active_models.push(name.clone());
        }

        let active = &self.active_models;
        self.agents.retain(|name, _| active.iter().any(|n| n == name));

        self.state()
    }

    /// Rewinds every active model's agent (and the ensemble, if present)
    /// to the lifecycle defaults. Active models and cached policies are
    /// untouched.
    pub fn reset(&mut self) -> StateSnapshot {
        let goal = self.layout.goal();
        for name in &self.active_models {
            if let Some(agent) = self.agents.get_mut(name) {
                *agent = AgentState::at_origin(goal);
            }
        }
        if let Some(agent) = self.agents.get_mut(ENSEMBLE) {
            *agent = AgentState::at_origin(goal);
        }
        self.state()
    }

    pub(super) fn layout_dims(&self) -> (i32, i32) {
        (self.layout.width(), self.layout.height())
    }

    pub(super) fn policy(&self, name: &str) -> Option<PolicyHandle> {
        self.policies.get(name).cloned()
    }

    pub(super) fn agent_mut(&mut self, name: &str) -> Option<&mut AgentState> {
        self.agents.get_mut(name)
    }

    pub(super) fn insert_agent(&mut self, name: &str, agent: AgentState) {
        self.agents.insert(name.to_string(), agent);
    }

    pub(super) fn has_agent(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::policy::{Action, ConstantPolicy, StaticProvider};

    use super::*;

    fn points() -> Vec<ResourcePoint> {
        vec![
            ResourcePoint {
                name: "Alpha".into(),
                x: 0.1,
                y: 0.1,
            },
            ResourcePoint {
                name: "Beta".into(),
                x: 0.4,
                y: 0.3,
            },
        ]
    }

    fn sim() -> Simulation {
        let config = SimConfig {
            scale: 10,
            padding: 2,
            hidden_dim: 8,
        };
        Simulation::new(points(), &config)
    }

    fn provider() -> StaticProvider {
        let mut provider = StaticProvider::new();
        provider.insert("up", Arc::new(ConstantPolicy::new(Action::Up)));
        provider.insert("right", Arc::new(ConstantPolicy::new(Action::Right)));
        provider
    }

    #[test]
    fn activate_sets_models_and_resets_agents() {
        let mut sim = sim();
        let provider = provider();
        let snap = sim.activate(&["up".into(), "right".into()], &provider);
        assert_eq!(snap.active_models, vec!["up", "right"]);
        let agent = &snap.agents["up"];
        assert_eq!(agent.position, crate::layout::Cell::origin());
        assert_eq!(agent.goal, sim.layout().goal());
    }

    #[test]
    fn unknown_model_is_silently_dropped() {
        let mut sim = sim();
        let provider = provider();
        let snap = sim.activate(&["up".into(), "ghost".into()], &provider);
        assert_eq!(snap.active_models, vec!["up"]);
        assert!(!snap.agents.contains_key("ghost"));
    }

    #[test]
    fn duplicate_names_are_kept_once() {
        let mut sim = sim();
        let provider = provider();
        let snap = sim.activate(&["up".into(), "up".into()], &provider);
        assert_eq!(snap.active_models, vec!["up"]);
    }

    #[test]
    fn reactivation_destroys_stale_agents() {
        let mut sim = sim();
        let provider = provider();
        sim.activate(&["up".into(), "right".into()], &provider);
        sim.step();
        let snap = sim.activate(&["up".into()], &provider);
        assert!(!snap.agents.contains_key("right"));
        assert!(!snap.agents.contains_key(crate::ENSEMBLE));
    }

    #[test]
    fn reset_rewinds_agents_but_keeps_models() {
        let mut sim = sim();
        let provider = provider();
        sim.activate(&["up".into()], &provider);
        sim.step();
        sim.step();
        let snap = sim.reset();
        assert_eq!(snap.active_models, vec!["up"]);
        assert_eq!(snap.agents["up"].position, crate::layout::Cell::origin());
        assert_eq!(snap.agents["up"].path.len(), 1);
        assert_eq!(snap.agents["up"].reward, 0);
        // Ensemble existed after the steps; reset rewinds it too.
        assert_eq!(
            snap.agents[crate::ENSEMBLE].position,
            crate::layout::Cell::origin()
        );
    }

    #[test]
    fn empty_activation_clears_everything() {
        let mut sim = sim();
        let provider = provider();
        sim.activate(&["up".into()], &provider);
        let snap = sim.activate(&[], &provider);
        assert!(snap.active_models.is_empty());
        assert!(snap.agents.is_empty());
    }
}
