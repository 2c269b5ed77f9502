//! Integer grid coordinates.

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// One integer coordinate in the simulation plane.
///
/// Cells occupied by the simulation proper always satisfy
/// `0 <= x < width` and `0 <= y < height`; the type is signed because
/// collision resolution can (deliberately, see [`super::GridLayout::build`])
/// leave a resource on a negative-y cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Creates a new cell.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Origin cell (0, 0).
    pub fn origin() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Flat state index `y * width + x` used by policy inference.
    pub fn state_index(&self, width: i32) -> usize {
        (self.y * width + self.x) as usize
    }

    /// String key `"x,y"` used by the inverse resource map.
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// Cells travel over the wire as `[x, y]` pairs.
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.x, self.y).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (x, y) = <(i32, i32)>::deserialize(deserializer)?;
        Ok(Self { x, y })
    }
}
