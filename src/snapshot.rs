/*
 * Snapshot Module
 *
 * One fully-computed generation of the simulation: the ordered boid
 * sequence, the spatial index built over exactly those boids, and the
 * attractor position captured when the generation was built (carried
 * along for the renderer). Immutable once assembled; the next generation
 * reads it, the renderer reads it, and it is dropped when superseded.
 */

use glam::DVec2;

use crate::boid::Boid;
use crate::spatial_grid::SpatialGrid;

#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    boids: Vec<Boid>,
    index: SpatialGrid,
    attractor_position: DVec2,
}

impl Snapshot {
    // Build the spatial index over the collected boids and seal the
    // generation. The index covers exactly `boids`, no more, no fewer.
    pub fn assemble(generation: u64, boids: Vec<Boid>, attractor_position: DVec2) -> Self {
        let index = SpatialGrid::build(boids.iter().map(|boid| boid.position));
        Self {
            generation,
            boids,
            index,
            attractor_position,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    pub fn attractor_position(&self) -> DVec2 {
        self.attractor_position
    }

    // Visit every boid within `radius` of the boid at `slot`, excluding that
    // boid itself. The visitor receives the neighbor and its exact distance.
    pub fn for_neighbors_of<F>(&self, slot: usize, radius: f64, mut visit: F)
    where
        F: FnMut(&Boid, f64),
    {
        let origin = &self.boids[slot];
        self.index
            .neighbors_within(slot, origin.position, radius, |neighbor_slot, distance| {
                visit(&self.boids[neighbor_slot], distance);
            });
    }
}
