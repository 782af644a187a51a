/*
 * World Parameters Module
 * 
 * This module defines the WorldParams struct that contains the externally
 * adjustable knobs of the simulation (population target, attractor state,
 * visible-area bounds) and SharedWorld, the handle the input collaborator
 * mutates while the pipeline reads.
 * 
 * The pipeline never reads fields piecemeal: it captures one consistent
 * WorldParams copy at the start of each generation and hands that copy to
 * every per-boid task, so a mid-generation write can never produce a torn
 * combination of attractor fields.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use glam::DVec2;

use crate::geometry::Area;
use crate::{
    DEFAULT_ATTRACTION_DISTANCE, DEFAULT_ATTRACTION_FACTOR, INITIAL_POPULATION,
    MAX_ATTRACTION_FACTOR, MAX_POPULATION, MIN_ATTRACTION_FACTOR, MIN_POPULATION,
};

// One consistent view of the world knobs, captured per generation.
#[derive(Clone, Copy, Debug)]
pub struct WorldParams {
    pub population_target: usize,
    pub attractor_position: DVec2,
    pub attractor_polarity: f64,
    pub attraction_distance: f64,
    pub attraction_factor: f64,
    pub visible_area: Area,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            population_target: INITIAL_POPULATION,
            attractor_position: DVec2::ZERO,
            attractor_polarity: 1.0,
            attraction_distance: DEFAULT_ATTRACTION_DISTANCE,
            attraction_factor: DEFAULT_ATTRACTION_FACTOR,
            visible_area: Area::default(),
        }
    }
}

// Single-writer (input collaborator) / many-reader (pipeline) parameter
// store, plus the cooperative shutdown flag checked at loop boundaries.
#[derive(Debug)]
pub struct SharedWorld {
    params: Mutex<WorldParams>,
    running: AtomicBool,
}

impl SharedWorld {
    pub fn new(params: WorldParams) -> Self {
        Self {
            params: Mutex::new(params),
            running: AtomicBool::new(true),
        }
    }

    // Capture one consistent copy of all parameters.
    pub fn capture(&self) -> WorldParams {
        *self.params.lock().expect("world params lock poisoned")
    }

    fn update<F: FnOnce(&mut WorldParams)>(&self, apply: F) {
        apply(&mut self.params.lock().expect("world params lock poisoned"));
    }

    // Grow or shrink the population target, clamped to sane bounds. A lower
    // target simply drops the excess slots next generation; a higher one
    // spawns fresh boids into the added slots.
    pub fn adjust_population(&self, delta: i64) {
        self.update(|params| {
            let target = params.population_target as i64 + delta;
            params.population_target =
                target.clamp(MIN_POPULATION as i64, MAX_POPULATION as i64) as usize;
        });
    }

    pub fn set_attractor_position(&self, position: DVec2) {
        self.update(|params| params.attractor_position = position);
    }

    // Flip between attraction and repulsion.
    pub fn toggle_attractor_polarity(&self) {
        self.update(|params| params.attractor_polarity = -params.attractor_polarity);
    }

    pub fn weaken_attraction(&self) {
        self.update(|params| {
            params.attraction_factor =
                (params.attraction_factor / 10.0).max(MIN_ATTRACTION_FACTOR);
        });
    }

    pub fn strengthen_attraction(&self) {
        self.update(|params| {
            params.attraction_factor =
                (params.attraction_factor * 10.0).min(MAX_ATTRACTION_FACTOR);
        });
    }

    pub fn set_visible_area(&self, area: Area) {
        self.update(|params| params.visible_area = area);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    // Request cooperative shutdown; in-flight generations finish normally.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Default for SharedWorld {
    fn default() -> Self {
        Self::new(WorldParams::default())
    }
}
