//! Broad-phase spatial index.
//!
//! The index answers rectangle queries with every object whose bounding
//! circle's box overlaps the rectangle. That over-approximates true circle
//! intersection; exact filtering happens in [`crate::proximity`].

use std::collections::HashMap;

use glam::Vec2;
use hecs::Entity;

/// Range-query service over object bounding circles.
///
/// The registry keeps implementations current on every transform change,
/// so a query always reflects the positions written earlier in the tick.
pub trait SpatialIndex {
    /// Start tracking an object.
    fn insert(&mut self, id: Entity, center: Vec2, radius: f32);

    /// Move or resize a tracked object.
    fn update(&mut self, id: Entity, center: Vec2, radius: f32) {
        self.remove(id);
        self.insert(id, center, radius);
    }

    /// Stop tracking an object. Unknown ids are ignored.
    fn remove(&mut self, id: Entity);

    /// Objects whose bounding box overlaps `[min, max]` (inclusive), in
    /// ascending id order with no duplicates.
    fn query_area(&self, min: Vec2, max: Vec2) -> Vec<Entity>;

    /// Number of tracked objects.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    fn of_circle(center: Vec2, radius: f32) -> Self {
        // NaN radii collapse to a point; infinite radii stay unbounded.
        let radius = if radius.is_nan() { 0.0 } else { radius.max(0.0) };
        let r = Vec2::splat(radius);
        Self {
            min: center - r,
            max: center + r,
        }
    }

    fn overlaps(&self, min: Vec2, max: Vec2) -> bool {
        self.min.x <= max.x && self.max.x >= min.x && self.min.y <= max.y && self.max.y >= min.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellRange {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl CellRange {
    fn cell_count(&self) -> u64 {
        let w = (self.x1 as i64 - self.x0 as i64 + 1).max(0) as u64;
        let h = (self.y1 as i64 - self.y0 as i64 + 1).max(0) as u64;
        w.saturating_mul(h)
    }

    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.y0..=self.y1).flat_map(move |y| (self.x0..=self.x1).map(move |x| (x, y)))
    }
}

/// Objects whose box spans more cells than this are kept off the grid.
const MAX_CELLS_PER_OBJECT: u64 = 1_024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Cells(CellRange),
    Oversized,
}

/// Uniform hash grid. Each object is filed under every cell its bounding box
/// touches, except oversized objects, which live in a side list that every
/// query scans.
#[derive(Debug, Clone)]
pub struct GridIndex {
    inv_cell_size: f32,
    cells: HashMap<(i32, i32), Vec<Entity>>,
    oversized: Vec<Entity>,
    bounds: HashMap<Entity, (Bounds, Placement)>,
}

impl GridIndex {
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            starwatch_core::constants::GRID_CELL_SIZE
        };
        Self {
            inv_cell_size: 1.0 / cell_size,
            cells: HashMap::new(),
            oversized: Vec::new(),
            bounds: HashMap::new(),
        }
    }

    fn cell_of(&self, p: Vec2) -> (i32, i32) {
        // `as` saturates for out-of-range floats
        (
            (p.x * self.inv_cell_size).floor() as i32,
            (p.y * self.inv_cell_size).floor() as i32,
        )
    }

    fn cell_range(&self, min: Vec2, max: Vec2) -> CellRange {
        let (x0, y0) = self.cell_of(min);
        let (x1, y1) = self.cell_of(max);
        CellRange { x0, y0, x1, y1 }
    }

    fn placement(&self, bounds: &Bounds) -> Placement {
        let range = self.cell_range(bounds.min, bounds.max);
        let finite = bounds.min.is_finite() && bounds.max.is_finite();
        if finite && range.cell_count() <= MAX_CELLS_PER_OBJECT {
            Placement::Cells(range)
        } else {
            Placement::Oversized
        }
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}

impl Default for GridIndex {
    fn default() -> Self {
        Self::new(starwatch_core::constants::GRID_CELL_SIZE)
    }
}

impl SpatialIndex for GridIndex {
    fn insert(&mut self, id: Entity, center: Vec2, radius: f32) {
        if self.bounds.contains_key(&id) {
            self.remove(id);
        }
        let bounds = Bounds::of_circle(center, radius);
        let placement = self.placement(&bounds);
        match placement {
            Placement::Cells(range) => {
                for cell in range.cells() {
                    self.cells.entry(cell).or_default().push(id);
                }
            }
            Placement::Oversized => self.oversized.push(id),
        }
        self.bounds.insert(id, (bounds, placement));
    }

    fn update(&mut self, id: Entity, center: Vec2, radius: f32) {
        let bounds = Bounds::of_circle(center, radius);
        let placement = self.placement(&bounds);
        if let Some(entry) = self.bounds.get_mut(&id) {
            // Same placement: only the stored box moves.
            if entry.1 == placement {
                entry.0 = bounds;
                return;
            }
        }
        self.insert(id, center, radius);
    }

    fn remove(&mut self, id: Entity) {
        let Some((_, placement)) = self.bounds.remove(&id) else {
            return;
        };
        let range = match placement {
            Placement::Cells(range) => range,
            Placement::Oversized => {
                self.oversized.retain(|&other| other != id);
                return;
            }
        };
        for cell in range.cells() {
            if let Some(list) = self.cells.get_mut(&cell) {
                list.retain(|&other| other != id);
                if list.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    fn query_area(&self, min: Vec2, max: Vec2) -> Vec<Entity> {
        if !(min.x <= max.x && min.y <= max.y) {
            return Vec::new();
        }
        let range = self.cell_range(min, max);
        let mut hits: Vec<Entity> = Vec::new();

        let mut collect = |list: &Vec<Entity>| {
            for &id in list {
                if let Some((bounds, _)) = self.bounds.get(&id) {
                    if bounds.overlaps(min, max) {
                        hits.push(id);
                    }
                }
            }
        };

        // Huge query rectangles walk the occupied cells instead of the range.
        if range.cell_count() > self.cells.len() as u64 {
            for (cell, list) in &self.cells {
                if (range.x0..=range.x1).contains(&cell.0) && (range.y0..=range.y1).contains(&cell.1)
                {
                    collect(list);
                }
            }
        } else {
            for cell in range.cells() {
                if let Some(list) = self.cells.get(&cell) {
                    collect(list);
                }
            }
        }
        collect(&self.oversized);

        hits.sort_unstable_by_key(|id| id.to_bits());
        hits.dedup();
        hits
    }

    fn len(&self) -> usize {
        self.bounds.len()
    }
}
