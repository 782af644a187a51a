/*
 * Swarm - Concurrent Boid Flocking Engine
 *
 * This library computes a flocking simulation as a sequence of immutable
 * world snapshots. Each boid follows three local rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the heading of neighbors
 * 3. Cohesion: Steer towards the position of neighbors
 * plus attraction or repulsion toward an externally controlled point.
 *
 * Windowing, input, and rendering live outside this crate. They feed
 * world parameter changes in through SharedWorld and pull finished
 * snapshots out of the Simulation handoff channel.
 */

// Re-export key components for easier access
pub use boid::Boid;
pub use glam::DVec2;
pub use error::EngineError;
pub use geometry::{Area, CellCoord};
pub use params::{SharedWorld, WorldParams};
pub use pipeline::{next_generation, Simulation};
pub use snapshot::Snapshot;
pub use spatial_grid::SpatialGrid;

// Define modules
pub mod boid;
pub mod error;
pub mod geometry;
pub mod params;
pub mod pipeline;
pub mod snapshot;
pub mod spatial_grid;

// World dimensions. New boids spawn inside the +/- HALF_WORLD_SIZE square.
pub const WORLD_SIZE: f64 = 200.0;
pub const HALF_WORLD_SIZE: f64 = WORLD_SIZE / 2.0;

// Physics limits
pub const ACCELERATION_LIMIT: f64 = 10.0;
pub const SPEED_LIMIT: f64 = 20.0;

// Flocking rule thresholds and strengths
pub const SEPARATION_DISTANCE: f64 = 5.0;
pub const SEPARATION_FACTOR: f64 = 30.0;
pub const ALIGNMENT_DISTANCE: f64 = 6.0;
pub const ALIGNMENT_FACTOR: f64 = 20.0;
pub const COHESION_DISTANCE: f64 = 12.0;
pub const COHESION_FACTOR: f64 = 10.0;

// Edge length of one spatial grid cell, in world units
pub const CELL_SIZE: f64 = 10.0;

// Population defaults and bounds for the input collaborator
pub const INITIAL_POPULATION: usize = 1000;
pub const MIN_POPULATION: usize = 100;
pub const MAX_POPULATION: usize = 20_000;

// Attractor defaults and factor bounds
pub const DEFAULT_ATTRACTION_DISTANCE: f64 = 60.0;
pub const DEFAULT_ATTRACTION_FACTOR: f64 = 80_000.0;
pub const MIN_ATTRACTION_FACTOR: f64 = 100.0;
pub const MAX_ATTRACTION_FACTOR: f64 = 100_000.0;

// RGB palette indexed by Boid::color_index; the renderer scales each entry
// by the boid's color_factor.
pub const BOID_COLORS: [[f32; 3]; 6] = [
    [233.0 / 255.0, 109.0 / 255.0, 99.0 / 255.0],
    [127.0 / 255.0, 202.0 / 255.0, 159.0 / 255.0],
    [244.0 / 255.0, 186.0 / 255.0, 112.0 / 255.0],
    [133.0 / 255.0, 193.0 / 255.0, 245.0 / 255.0],
    [74.0 / 255.0, 120.0 / 255.0, 156.0 / 255.0],
    [252.0 / 255.0, 254.0 / 255.0, 253.0 / 255.0],
];
