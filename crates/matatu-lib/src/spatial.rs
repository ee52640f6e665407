//! Fixed-resolution spatial bucket index for nearest-node lookups.
//!
//! The grid partitions a configured bounding box into [`GRID_DIM`] ×
//! [`GRID_DIM`] cells and buckets node ids by position at insertion time.
//! Nodes outside the box stay in the network's position map but are not
//! indexed; [`SpatialGrid::nearest`] covers them with an exhaustive fallback
//! scan, so snapping stays exact everywhere and merely fast inside the box.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::network::{NodeId, Position};

/// Number of grid cells along each axis.
pub const GRID_DIM: usize = 10;

/// Kilometres per degree of great-circle arc, rounded down so any distance
/// bound derived from it stays a lower bound.
const KM_PER_DEGREE: f64 = 111.19;

/// Geographic bounding box covered by the spatial grid.
///
/// The default box covers the greater Kampala area the bundled datasets were
/// collected in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            min_lat: 0.3,
            min_lon: 32.5,
            max_lat: 0.8,
            max_lon: 33.0,
        }
    }
}

impl GridBounds {
    /// Grid cell containing `position`, or `None` when it lies outside the box.
    fn cell(&self, position: Position) -> Option<(usize, usize)> {
        let lat_span = self.max_lat - self.min_lat;
        let lon_span = self.max_lon - self.min_lon;
        if lat_span <= 0.0 || lon_span <= 0.0 {
            return None;
        }

        let x = ((position.lat - self.min_lat) / lat_span * GRID_DIM as f64).floor();
        let y = ((position.lon - self.min_lon) / lon_span * GRID_DIM as f64).floor();
        if x < 0.0 || y < 0.0 || x >= GRID_DIM as f64 || y >= GRID_DIM as f64 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Smallest extent of a single cell in kilometres, across both axes.
    ///
    /// Longitude degrees shrink with latitude, so the east-west extent is
    /// scaled by the cosine at the box's most extreme latitude. Crossing any
    /// one cell therefore covers at least this distance.
    fn min_cell_extent_km(&self) -> f64 {
        let lat_cell = (self.max_lat - self.min_lat) / GRID_DIM as f64 * KM_PER_DEGREE;
        let extreme_lat = self.min_lat.abs().max(self.max_lat.abs());
        let lon_cell = (self.max_lon - self.min_lon) / GRID_DIM as f64
            * KM_PER_DEGREE
            * extreme_lat.to_radians().cos();
        lat_cell.min(lon_cell)
    }
}

/// Bucketed node index over a [`GridBounds`] box.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    bounds: GridBounds,
    cells: Vec<Vec<NodeId>>,
}

impl SpatialGrid {
    pub fn new(bounds: GridBounds) -> Self {
        Self {
            bounds,
            cells: vec![Vec::new(); GRID_DIM * GRID_DIM],
        }
    }

    /// Index `id` at `position`. Positions outside the bounds are silently
    /// skipped; re-inserting an id into the same cell is a no-op.
    pub(crate) fn insert(&mut self, id: NodeId, position: Position) {
        if let Some((x, y)) = self.bounds.cell(position) {
            let bucket = &mut self.cells[y * GRID_DIM + x];
            if !bucket.contains(&id) {
                bucket.push(id);
            }
        }
    }

    /// Closest indexed node to `target`, by exact haversine distance.
    ///
    /// Searches outward in rings of cells from the cell containing `target`.
    /// The first hit is not necessarily the closest node (a hit on a ring's
    /// diagonal can be farther than a node several rings out along an axis),
    /// so the search keeps expanding until no unscanned ring can hold a
    /// closer node: every node in ring `r` lies at least `r - 1` cell widths
    /// from the query. Queries outside the bounds, or grids with no indexed
    /// node, fall back to scanning `positions`.
    pub(crate) fn nearest(
        &self,
        target: Position,
        positions: &HashMap<NodeId, Position>,
    ) -> Option<NodeId> {
        if let Some((cx, cy)) = self.bounds.cell(target) {
            let min_cell_km = self.bounds.min_cell_extent_km();
            let mut best: Option<(NodeId, f64)> = None;

            for ring in 0..GRID_DIM {
                if let Some((_, best_distance)) = best {
                    let ring_floor_km = ring.saturating_sub(1) as f64 * min_cell_km;
                    if min_cell_km > 0.0 && ring_floor_km > best_distance {
                        break;
                    }
                }
                for (x, y) in ring_cells(cx, cy, ring) {
                    for &id in &self.cells[y * GRID_DIM + x] {
                        let Some(position) = positions.get(&id) else {
                            continue;
                        };
                        let distance = target.distance_km(position);
                        let better = match best {
                            None => true,
                            Some((best_id, best_distance)) => {
                                distance < best_distance
                                    || (distance == best_distance && id < best_id)
                            }
                        };
                        if better {
                            best = Some((id, distance));
                        }
                    }
                }
            }

            if let Some((id, _)) = best {
                return Some(id);
            }
        }

        nearest_by_scan(target, positions)
    }
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(GridBounds::default())
    }
}

/// Cells at Chebyshev distance `ring` from `(cx, cy)`, clipped to the grid.
fn ring_cells(cx: usize, cy: usize, ring: usize) -> Vec<(usize, usize)> {
    let min_x = cx.saturating_sub(ring);
    let max_x = (cx + ring).min(GRID_DIM - 1);
    let min_y = cy.saturating_sub(ring);
    let max_y = (cy + ring).min(GRID_DIM - 1);

    let mut cells = Vec::new();
    for x in min_x..=max_x {
        for y in min_y..=max_y {
            if x.abs_diff(cx).max(y.abs_diff(cy)) == ring {
                cells.push((x, y));
            }
        }
    }
    cells
}

fn nearest_by_scan(target: Position, positions: &HashMap<NodeId, Position>) -> Option<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for (&id, position) in positions {
        let distance = target.distance_km(position);
        let better = match best {
            None => true,
            Some((best_id, best_distance)) => {
                distance < best_distance || (distance == best_distance && id < best_id)
            }
        };
        if better {
            best = Some((id, distance));
        }
    }
    best.map(|(id, _)| id)
}
