//! Deterministic grid construction with collision resolution.

use std::collections::{HashMap, HashSet};

use super::cell::Cell;
use super::source::ResourcePoint;

/// A group of resources whose scaled coordinates landed on the same cell.
#[derive(Debug)]
struct Arena {
    base: Cell,
    /// Indices into the input point slice, in encounter order.
    members: Vec<usize>,
}

/// The bounded integer grid derived from the resource points.
///
/// Immutable after construction. Holds one final cell per input resource,
/// the inverse cell-to-name map, and the padded grid dimensions.
#[derive(Debug, Clone)]
pub struct GridLayout {
    width: i32,
    height: i32,
    /// Final cell per resource, in arena encounter order.
    cells: Vec<Cell>,
    occupied: HashSet<Cell>,
    cell_to_name: HashMap<Cell, String>,
}

impl GridLayout {
    /// Builds the layout from raw resource points.
    ///
    /// 1. Scale each coordinate by `scale`, truncating toward zero.
    /// 2. Translate so the per-axis minima become 0.
    /// 3. Group coincident cells into arenas (first-encounter order). Each
    ///    arena is sorted by y ascending (stable, so encounter order breaks
    ///    ties); the first member keeps the base cell, and member `i`
    ///    (counting from 1) is offset from the base: odd `i` to
    ///    `(x+1, y-1)`, even `i` to `(x, y+1)`.
    /// 4. `width = max_x + 1 + padding`, `height = max_y + 1 + padding`.
    ///
    /// Known limitation, kept on purpose: offsets from distinct arenas can
    /// collide with each other, and an odd offset at `y == 0` lands on
    /// `y == -1`, outside the declared bounds. No detection or retry is
    /// attempted; the out-of-range cell is stored as-is.
    ///
    /// # Panics
    ///
    /// Panics if `points` is empty; the data source guarantees at least one
    /// resource before construction begins.
    pub fn build(points: &[ResourcePoint], scale: i32, padding: i32) -> Self {
        assert!(!points.is_empty(), "grid needs at least one resource point");

        let scaled: Vec<(i32, i32)> = points
            .iter()
            .map(|p| ((p.x * scale as f64) as i32, (p.y * scale as f64) as i32))
            .collect();
        let min_x = scaled.iter().map(|&(x, _)| x).min().unwrap_or(0);
        let min_y = scaled.iter().map(|&(_, y)| y).min().unwrap_or(0);

        // Arena grouping preserves the order in which each base cell was
        // first seen, so the final cell sequence is deterministic.
        let mut arena_index: HashMap<Cell, usize> = HashMap::new();
        let mut arenas: Vec<Arena> = Vec::new();
        for (idx, &(sx, sy)) in scaled.iter().enumerate() {
            let base = Cell::new(sx - min_x, sy - min_y);
            let slot = *arena_index.entry(base).or_insert_with(|| {
                arenas.push(Arena {
                    base,
                    members: Vec::new(),
                });
                arenas.len() - 1
            });
            arenas[slot].members.push(idx);
        }

        let mut cells = Vec::with_capacity(points.len());
        let mut cell_to_name = HashMap::with_capacity(points.len());
        for arena in &mut arenas {
            // Members of one arena share a y coordinate by construction;
            // the stable sort keeps encounter order.
            arena.members.sort_by_key(|&i| scaled[i].1);
            for (offset_idx, &member) in arena.members.iter().enumerate() {
                let cell = Self::offset_cell(arena.base, offset_idx);
                cells.push(cell);
                cell_to_name.insert(cell, points[member].name.clone());
            }
        }

        let width = cells.iter().map(|c| c.x).max().unwrap_or(0) + 1 + padding;
        let height = cells.iter().map(|c| c.y).max().unwrap_or(0) + 1 + padding;
        let occupied = cells.iter().copied().collect();

        Self {
            width,
            height,
            cells,
            occupied,
            cell_to_name,
        }
    }

    /// Final cell for the `offset_idx`-th member of an arena. Every offset
    /// is relative to the base cell, not cumulative across members.
    fn offset_cell(base: Cell, offset_idx: usize) -> Cell {
        match offset_idx {
            0 => base,
            i if i % 2 == 1 => Cell::new(base.x + 1, base.y - 1),
            _ => Cell::new(base.x, base.y + 1),
        }
    }

    /// Grid width in cells, including padding.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in cells, including padding.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of distinct grid states, for policy input sizing.
    pub fn state_size(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// The goal cell shared by every agent: the far corner.
    pub fn goal(&self) -> Cell {
        Cell::new(self.width - 1, self.height - 1)
    }

    /// Final cell per resource, one entry per input point.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Whether a cell is occupied by a resource.
    pub fn is_resource_cell(&self, cell: Cell) -> bool {
        self.occupied.contains(&cell)
    }

    /// Name of the resource assigned to a cell, if any.
    pub fn name_at(&self, cell: Cell) -> Option<&str> {
        self.cell_to_name.get(&cell).map(String::as_str)
    }

    /// Inverse cell-to-name assignment.
    pub fn cell_to_name(&self) -> &HashMap<Cell, String> {
        &self.cell_to_name
    }
}
