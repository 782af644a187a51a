/*
 * Spatial Grid Module
 *
 * This module defines the SpatialGrid struct for efficient neighbor lookups.
 * It buckets boids by quantized cell coordinate, so a radius query only
 * touches the cells overlapping the query square instead of scanning the
 * whole population.
 *
 * A grid is built once per snapshot, from that snapshot's boids, and never
 * mutated afterwards. Each bucket entry carries the boid's slot index and
 * position; the position copy lets the narrow-phase distance check run
 * without chasing back into the snapshot.
 */

use ahash::AHashMap;
use glam::DVec2;

use crate::geometry::{cell_of, CellCoord};

// Expected bucket occupancy; buckets grow past this as needed.
const BUCKET_CAPACITY: usize = 10;

#[derive(Debug, Default)]
pub struct SpatialGrid {
    buckets: AHashMap<CellCoord, Vec<(usize, DVec2)>>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    // Build a grid over a full generation of positions, keyed by slot index.
    pub fn build(positions: impl IntoIterator<Item = DVec2>) -> Self {
        let mut grid = Self::new();
        for (slot, position) in positions.into_iter().enumerate() {
            grid.insert(slot, position);
        }
        grid
    }

    // Insert one boid into the bucket covering its position.
    pub fn insert(&mut self, slot: usize, position: DVec2) {
        self.buckets
            .entry(cell_of(position))
            .or_insert_with(|| Vec::with_capacity(BUCKET_CAPACITY))
            .push((slot, position));
    }

    // Visit every boid within `radius` of `position`, except the boid at
    // `origin` itself. Broad phase: every cell overlapping the axis-aligned
    // square position +/- radius (inclusive). Narrow phase: exact Euclidean
    // distance, so corner-cell boids outside the circle are excluded. The
    // visitor receives the neighbor's slot index and its exact distance.
    // No ordering is guaranteed among visited neighbors.
    pub fn neighbors_within<F>(&self, origin: usize, position: DVec2, radius: f64, mut visit: F)
    where
        F: FnMut(usize, f64),
    {
        let span = DVec2::splat(radius);
        let from = cell_of(position - span);
        let to = cell_of(position + span);

        for x in from.x..=to.x {
            for y in from.y..=to.y {
                let Some(bucket) = self.buckets.get(&CellCoord { x, y }) else {
                    continue;
                };
                for &(slot, neighbor_position) in bucket {
                    if slot == origin {
                        continue;
                    }
                    let distance = position.distance(neighbor_position);
                    if distance <= radius {
                        visit(slot, distance);
                    }
                }
            }
        }
    }

    // Number of occupied cells, for diagnostics.
    pub fn occupied_cells(&self) -> usize {
        self.buckets.len()
    }
}
