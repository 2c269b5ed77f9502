//! Resource data source.
//!
//! Resources arrive as a JSON document mapping each name to fractional
//! `x_coordinate` / `y_coordinate` fields. The document is read once at
//! process start; a missing or malformed file is fatal.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// A named point of interest with raw fractional coordinates.
///
/// Coordinates are non-negative fractions of the source image; they are
/// never mutated after loading. The step engine keeps the raw values
/// around because reward matching recomputes grid positions from them.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

/// The data file stores coordinates either as JSON numbers or as numeric
/// strings, depending on which extraction pass produced it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self) -> Option<f64> {
        match self {
            Coordinate::Number(v) => Some(*v),
            Coordinate::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    x_coordinate: Coordinate,
    y_coordinate: Coordinate,
}

/// Parses resource points from a JSON document.
///
/// Returns the points ordered by name (the map's key order). Fails on the
/// first non-numeric, non-finite, or negative coordinate.
pub fn parse_resource_points(json: &str) -> Result<Vec<ResourcePoint>, ConfigError> {
    let raw: BTreeMap<String, RawPoint> = serde_json::from_str(json)?;
    let mut points = Vec::with_capacity(raw.len());
    for (name, entry) in raw {
        let (x, y) = match (entry.x_coordinate.value(), entry.y_coordinate.value()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(ConfigError::InvalidCoordinate { name }),
        };
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return Err(ConfigError::InvalidCoordinate { name });
        }
        points.push(ResourcePoint { name, x, y });
    }
    if points.is_empty() {
        return Err(ConfigError::EmptyResourceSet);
    }
    Ok(points)
}

/// Loads resource points from a JSON file on disk.
pub fn load_resource_points(path: impl AsRef<Path>) -> Result<Vec<ResourcePoint>, ConfigError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| ConfigError::DataUnreadable {
        path: path.display().to_string(),
        source,
    })?;
    parse_resource_points(&json)
}
