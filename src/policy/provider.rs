//! Policy providers.
//!
//! A provider turns a model identifier into a shareable [`PolicyHandle`].
//! Resolution distinguishes two failure modes: a model whose backing
//! weights cannot be *located* resolves to `None` (the registry silently
//! drops the name), while weights that are located but cannot be parsed or
//! normalized are recovered with a randomly initialized [`QNetwork`] and an
//! operator-facing warning. Activation never fails on a locatable model.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::warn;
use rand::thread_rng;

use super::handle::PolicyHandle;
use super::loader::Checkpoint;
use super::network::QNetwork;

/// Capability contract the simulation registry requires at activation.
pub trait PolicyProvider {
    /// Whether backing weights for `name` can be located at all.
    fn contains(&self, name: &str) -> bool;

    /// Resolves a model name into a policy handle.
    ///
    /// `None` means the model cannot be located. Implementations must not
    /// fail on parse errors; they substitute a usable fallback instead.
    fn resolve(&self, name: &str) -> Option<PolicyHandle>;
}

/// Resolves model names against checkpoint files under a root directory.
///
/// Supported extensions: `.json` (flat or wrapped state dicts) and `.bin`
/// (bincode weight archives). The model name is the file name.
pub struct DirectoryProvider {
    root: PathBuf,
    state_size: usize,
    hidden_dim: usize,
}

impl DirectoryProvider {
    /// Creates a provider rooted at `root` for networks sized to the grid.
    pub fn new(root: impl Into<PathBuf>, state_size: usize, hidden_dim: usize) -> Self {
        Self {
            root: root.into(),
            state_size,
            hidden_dim,
        }
    }

    /// Lists the checkpoint files available under the root directory.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.root)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let lower = name.to_ascii_lowercase();
                (lower.ends_with(".json") || lower.ends_with(".bin")).then_some(name)
            })
            .collect();
        names.sort();
        names
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl PolicyProvider for DirectoryProvider {
    fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    fn resolve(&self, name: &str) -> Option<PolicyHandle> {
        let path = self.path_for(name);
        if !path.is_file() {
            return None;
        }
        Some(load_or_fallback(
            &path,
            name,
            self.state_size,
            self.hidden_dim,
        ))
    }
}

/// Reads and assembles a checkpoint, falling back to random initialization
/// on any load failure. The fallback is reported on the log channel only;
/// callers always receive a usable handle.
fn load_or_fallback(
    path: &Path,
    name: &str,
    state_size: usize,
    hidden_dim: usize,
) -> PolicyHandle {
    let loaded = Checkpoint::read(path)
        .and_then(|ckpt| QNetwork::from_weights(&ckpt.into_weights(), state_size, hidden_dim));
    match loaded {
        Ok(network) => Arc::new(network),
        Err(err) => {
            warn!("using randomly initialized weights for '{name}': {err}");
            Arc::new(QNetwork::random(state_size, hidden_dim, &mut thread_rng()))
        }
    }
}

/// In-memory provider for demos and tests.
#[derive(Default)]
pub struct StaticProvider {
    handles: HashMap<String, PolicyHandle>,
}

impl StaticProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handle under a model name, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, handle: PolicyHandle) -> &mut Self {
        self.handles.insert(name.into(), handle);
        self
    }
}

impl PolicyProvider for StaticProvider {
    fn contains(&self, name: &str) -> bool {
        self.handles.contains_key(name)
    }

    fn resolve(&self, name: &str) -> Option<PolicyHandle> {
        self.handles.get(name).cloned()
    }
}
