//! Checkpoint loading.
//!
//! Trained weights arrive in one of three storage formats, resolved once at
//! activation into a uniform parameter table:
//!
//! - a flat JSON state dict (`parameter name -> nested array`),
//! - a wrapped JSON checkpoint carrying the dict under `"state_dict"`,
//! - a bincode parameter archive (flat data plus explicit shapes).
//!
//! Parameter names are normalized before use: a uniform `module.` prefix is
//! stripped, and the `layers.N.*` / `linearN.*` naming schemes seen in
//! checkpoints from other training scripts are remapped onto `fc1.*` /
//! `fc2.*`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading or interpreting a checkpoint.
///
/// These never reach callers of the simulation core: the policy provider
/// recovers by substituting a randomly initialized network and logging a
/// warning.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read checkpoint: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON checkpoint: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed weight archive: {0}")]
    Archive(#[from] bincode::Error),

    #[error("unsupported checkpoint extension '{0}'")]
    UnsupportedFormat(String),

    #[error("checkpoint is missing parameter '{0}'")]
    MissingParameter(String),

    #[error("parameter '{parameter}' has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        parameter: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

/// A single parameter: either a bias vector or a weight matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tensor {
    Vector(Vec<f32>),
    Matrix(Vec<Vec<f32>>),
}

impl Tensor {
    fn shape(&self) -> Vec<usize> {
        match self {
            Tensor::Vector(v) => vec![v.len()],
            Tensor::Matrix(m) => vec![m.len(), m.first().map_or(0, Vec::len)],
        }
    }
}

/// Bincode-friendly weight archive: parameter name, shape, flat data.
///
/// Only 1-D and 2-D shapes are meaningful here; anything else fails shape
/// checking when the network is assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightArchive {
    pub entries: Vec<(String, Vec<usize>, Vec<f32>)>,
}

/// A checkpoint in one of the supported storage formats.
#[derive(Debug)]
pub enum Checkpoint {
    /// Flat JSON map of parameter name to nested array.
    StateDict(HashMap<String, Tensor>),
    /// JSON object with the state dict under a `"state_dict"` key.
    Wrapped(HashMap<String, Tensor>),
    /// Bincode parameter archive.
    Archive(WeightArchive),
}

#[derive(Deserialize)]
struct WrappedDoc {
    state_dict: HashMap<String, Tensor>,
}

impl Checkpoint {
    /// Reads a checkpoint from disk, dispatching on the file extension:
    /// `.json` for the JSON formats, `.bin` for the archive.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Self::from_json(&fs::read_to_string(path)?),
            "bin" => Ok(Checkpoint::Archive(bincode::deserialize(&fs::read(
                path,
            )?)?)),
            other => Err(LoadError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Parses a JSON checkpoint, detecting the wrapped form by the
    /// presence of a `"state_dict"` object.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("state_dict").is_some_and(|v| v.is_object()) {
            let doc: WrappedDoc = serde_json::from_value(value)?;
            Ok(Checkpoint::Wrapped(doc.state_dict))
        } else {
            Ok(Checkpoint::StateDict(serde_json::from_value(value)?))
        }
    }

    /// Normalizes parameter names and produces the uniform weight table.
    pub fn into_weights(self) -> Weights {
        let params = match self {
            Checkpoint::StateDict(map) | Checkpoint::Wrapped(map) => map,
            Checkpoint::Archive(archive) => archive
                .entries
                .into_iter()
                .map(|(name, shape, data)| {
                    // Anything that is not two-dimensional is treated as a
                    // vector; shape checking happens when the network is
                    // assembled.
                    let tensor = match shape.as_slice() {
                        [_, cols] => Tensor::Matrix(
                            data.chunks((*cols).max(1)).map(<[f32]>::to_vec).collect(),
                        ),
                        _ => Tensor::Vector(data),
                    };
                    (name, tensor)
                })
                .collect(),
        };
        Weights::from_params(params)
    }
}

/// Normalized parameter table keyed by canonical `fc1.*` / `fc2.*` names.
#[derive(Debug, Clone)]
pub struct Weights {
    params: HashMap<String, Tensor>,
}

impl Weights {
    /// Builds the table from raw parameters, normalizing names first.
    pub fn from_params(params: HashMap<String, Tensor>) -> Self {
        let stripped = strip_uniform_prefix(params, "module.");
        let params = stripped
            .into_iter()
            .map(|(k, v)| (remap_key(&k), v))
            .collect();
        Self { params }
    }

    /// Fetches a matrix parameter with the expected shape.
    pub fn matrix(&self, key: &str, rows: usize, cols: usize) -> Result<&[Vec<f32>], LoadError> {
        match self.params.get(key) {
            Some(Tensor::Matrix(m)) if m.len() == rows && m.iter().all(|r| r.len() == cols) => {
                Ok(m)
            }
            Some(t) => Err(LoadError::ShapeMismatch {
                parameter: key.to_string(),
                expected: vec![rows, cols],
                found: t.shape(),
            }),
            None => Err(LoadError::MissingParameter(key.to_string())),
        }
    }

    /// Fetches a vector parameter with the expected length.
    pub fn vector(&self, key: &str, len: usize) -> Result<&[f32], LoadError> {
        match self.params.get(key) {
            Some(Tensor::Vector(v)) if v.len() == len => Ok(v),
            Some(t) => Err(LoadError::ShapeMismatch {
                parameter: key.to_string(),
                expected: vec![len],
                found: t.shape(),
            }),
            None => Err(LoadError::MissingParameter(key.to_string())),
        }
    }

    /// Canonical parameter names present in the table.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }
}

/// Strips `prefix` from every key, but only when every key carries it
/// (e.g. the `module.` prefix a DataParallel-style wrapper adds).
fn strip_uniform_prefix(
    params: HashMap<String, Tensor>,
    prefix: &str,
) -> HashMap<String, Tensor> {
    if !params.is_empty() && params.keys().all(|k| k.starts_with(prefix)) {
        params
            .into_iter()
            .map(|(k, v)| (k[prefix.len()..].to_string(), v))
            .collect()
    } else {
        params
    }
}

/// Maps alternate layer naming schemes onto the canonical `fc1` / `fc2`
/// names. Unknown keys pass through unchanged.
fn remap_key(key: &str) -> String {
    match key {
        "layers.0.weight" | "linear1.weight" => "fc1.weight",
        "layers.0.bias" | "linear1.bias" => "fc1.bias",
        "layers.2.weight" | "linear2.weight" => "fc2.weight",
        "layers.2.bias" | "linear2.bias" => "fc2.bias",
        other => other,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_params() -> HashMap<String, Tensor> {
        let mut params = HashMap::new();
        params.insert(
            "fc1.weight".to_string(),
            Tensor::Matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]),
        );
        params.insert("fc1.bias".to_string(), Tensor::Vector(vec![0.1, 0.2]));
        params
    }

    #[test]
    fn flat_state_dict_parses() {
        let json = r#"{"fc1.weight": [[1.0, 2.0]], "fc1.bias": [0.5]}"#;
        let ckpt = Checkpoint::from_json(json).unwrap();
        assert!(matches!(ckpt, Checkpoint::StateDict(_)));
        let weights = ckpt.into_weights();
        assert_eq!(weights.matrix("fc1.weight", 1, 2).unwrap()[0], &[1.0, 2.0]);
    }

    #[test]
    fn wrapped_checkpoint_parses() {
        let json = r#"{"state_dict": {"fc2.bias": [0.0, 1.0]}}"#;
        let ckpt = Checkpoint::from_json(json).unwrap();
        assert!(matches!(ckpt, Checkpoint::Wrapped(_)));
        let weights = ckpt.into_weights();
        assert_eq!(weights.vector("fc2.bias", 2).unwrap(), &[0.0, 1.0]);
    }

    #[test]
    fn module_prefix_is_stripped_when_uniform() {
        let mut params = HashMap::new();
        params.insert("module.fc1.bias".to_string(), Tensor::Vector(vec![1.0]));
        params.insert("module.fc2.bias".to_string(), Tensor::Vector(vec![2.0]));
        let weights = Weights::from_params(params);
        assert!(weights.vector("fc1.bias", 1).is_ok());
        assert!(weights.vector("fc2.bias", 1).is_ok());
    }

    #[test]
    fn module_prefix_kept_when_partial() {
        let mut params = HashMap::new();
        params.insert("module.fc1.bias".to_string(), Tensor::Vector(vec![1.0]));
        params.insert("fc2.bias".to_string(), Tensor::Vector(vec![2.0]));
        let weights = Weights::from_params(params);
        assert!(matches!(
            weights.vector("fc1.bias", 1),
            Err(LoadError::MissingParameter(_))
        ));
    }

    #[test]
    fn alternate_layer_names_are_remapped() {
        let mut params = HashMap::new();
        params.insert("layers.0.weight".to_string(), Tensor::Matrix(vec![vec![1.0]]));
        params.insert("linear2.bias".to_string(), Tensor::Vector(vec![0.0]));
        let weights = Weights::from_params(params);
        assert!(weights.matrix("fc1.weight", 1, 1).is_ok());
        assert!(weights.vector("fc2.bias", 1).is_ok());
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let weights = Weights::from_params(tiny_params());
        let err = weights.matrix("fc1.weight", 3, 2).unwrap_err();
        assert!(matches!(err, LoadError::ShapeMismatch { .. }));
    }

    #[test]
    fn missing_parameter_is_reported() {
        let weights = Weights::from_params(tiny_params());
        assert!(matches!(
            weights.vector("fc2.bias", 2),
            Err(LoadError::MissingParameter(_))
        ));
    }

    #[test]
    fn archive_round_trips_through_bincode() {
        let archive = WeightArchive {
            entries: vec![
                ("fc1.weight".to_string(), vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]),
                ("fc1.bias".to_string(), vec![2], vec![0.1, 0.2]),
            ],
        };
        let bytes = bincode::serialize(&archive).unwrap();
        let decoded: WeightArchive = bincode::deserialize(&bytes).unwrap();
        let weights = Checkpoint::Archive(decoded).into_weights();
        let m = weights.matrix("fc1.weight", 2, 2).unwrap();
        assert_eq!(m[1], &[3.0, 4.0]);
        assert_eq!(weights.vector("fc1.bias", 2).unwrap(), &[0.1, 0.2]);
    }
}
