/*
 * Boid Module
 * 
 * This module defines the Boid struct and its behavior.
 * Each boid follows three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the heading of neighbors
 * 3. Cohesion: Steer towards the position of neighbors
 * plus attraction toward (or repulsion from) the world's attractor point.
 * 
 * A boid is never mutated after it lands in a published snapshot. Each
 * generation derives a fresh value from the previous one (copy-on-update),
 * which is what makes lock-free concurrent reads of the previous snapshot
 * safe. Identity across generations is the slot index, nothing more.
 */

use std::time::Instant;

use glam::DVec2;
use rand::Rng;

use crate::geometry::{clamp_magnitude, heading, wrap_into};
use crate::params::WorldParams;
use crate::snapshot::Snapshot;
use crate::{
    ACCELERATION_LIMIT, ALIGNMENT_DISTANCE, ALIGNMENT_FACTOR, BOID_COLORS, COHESION_DISTANCE,
    COHESION_FACTOR, HALF_WORLD_SIZE, SEPARATION_DISTANCE, SEPARATION_FACTOR, SPEED_LIMIT,
};

// Floor for the attractor normalization so a boid sitting exactly on the
// attractor does not divide by zero.
const MIN_NORMALIZE_DISTANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug)]
pub struct Boid {
    pub position: DVec2,
    pub velocity: DVec2,
    pub last_updated: Instant,
    pub color_index: usize,
    pub color_factor: f32,
}

impl Boid {
    // Create a boid at a uniformly random position inside the initial world
    // bounds, with a random palette color and intensity in [0.5, 1.5).
    pub fn spawn<R: Rng>(rng: &mut R, now: Instant) -> Self {
        Self {
            position: DVec2::new(
                rng.gen_range(-HALF_WORLD_SIZE..HALF_WORLD_SIZE),
                rng.gen_range(-HALF_WORLD_SIZE..HALF_WORLD_SIZE),
            ),
            velocity: DVec2::ZERO,
            last_updated: now,
            color_index: rng.gen_range(0..BOID_COLORS.len()),
            color_factor: rng.gen_range(0.5..1.5),
        }
    }

    // Advance this boid by one generation: flock with neighbors from the
    // previous snapshot, integrate, and wrap. Pure and deterministic given
    // fixed inputs; `slot` is this boid's index in `previous`, used to skip
    // itself during the neighbor query.
    pub fn stepped(
        &self,
        slot: usize,
        previous: &Snapshot,
        params: &WorldParams,
        now: Instant,
    ) -> Self {
        let elapsed_seconds = now.duration_since(self.last_updated).as_secs_f64();

        // Everything is mildly attracted to the attractor point.
        let mut acceleration = attraction(self.position, params);

        // Find nearby boids, and flock with them. Note: the cohesion-factor
        // rule is gated on ALIGNMENT_DISTANCE; COHESION_DISTANCE only widens
        // the query radius.
        let max_relevant_distance = COHESION_DISTANCE
            .max(SEPARATION_DISTANCE)
            .max(ALIGNMENT_DISTANCE);
        previous.for_neighbors_of(slot, max_relevant_distance, |neighbor, distance| {
            let delta = neighbor.position - self.position;

            if distance < SEPARATION_DISTANCE {
                acceleration += delta * -SEPARATION_FACTOR;
            }

            if distance < ALIGNMENT_DISTANCE {
                acceleration += delta * COHESION_FACTOR;
            }

            if distance < ALIGNMENT_DISTANCE {
                acceleration += neighbor.velocity * ALIGNMENT_FACTOR;
            }
        });

        // Apply acceleration limit
        let acceleration = clamp_magnitude(acceleration, ACCELERATION_LIMIT);

        // Apply acceleration to velocity, then the speed limit
        let velocity = clamp_magnitude(
            self.velocity + acceleration * elapsed_seconds,
            SPEED_LIMIT,
        );

        // Apply velocity, then wrap around the visible area
        let position = wrap_into(
            self.position + velocity * elapsed_seconds,
            &params.visible_area,
        );

        Self {
            position,
            velocity,
            last_updated: now,
            ..*self
        }
    }

    // Direction of travel in radians, for the renderer.
    pub fn heading(&self) -> f64 {
        heading(self.velocity)
    }
}

// Attraction term seeding the acceleration: inside the attraction radius,
// a unit vector toward the attractor scaled by factor and polarity
// (negative polarity repels). Zero outside the radius.
fn attraction(position: DVec2, params: &WorldParams) -> DVec2 {
    let distance = params.attractor_position.distance(position);
    if distance >= params.attraction_distance {
        return DVec2::ZERO;
    }

    let normalizer = distance.max(MIN_NORMALIZE_DISTANCE);
    (params.attractor_position - position) / normalizer
        * (params.attraction_factor * params.attractor_polarity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_boid(position: DVec2, velocity: DVec2, now: Instant) -> Boid {
        Boid {
            position,
            velocity,
            last_updated: now - Duration::from_secs(1),
            color_index: 2,
            color_factor: 1.0,
        }
    }

    fn far_attractor_params() -> WorldParams {
        WorldParams {
            attractor_position: DVec2::new(1e6, 1e6),
            ..WorldParams::default()
        }
    }

    #[test]
    fn separation_contribution_matches_rule() {
        // Two boids at (0,0) and (3,0): the separation rule pushes the
        // first by (3,0) * -30 = (-90, 0) before clamping.
        let now = Instant::now();
        let a = test_boid(DVec2::ZERO, DVec2::ZERO, now);
        let b = test_boid(DVec2::new(3.0, 0.0), DVec2::ZERO, now);
        let snapshot = Snapshot::assemble(0, vec![a, b], DVec2::new(1e6, 1e6));

        let mut acceleration = DVec2::ZERO;
        snapshot.for_neighbors_of(0, SEPARATION_DISTANCE, |neighbor, distance| {
            let delta = neighbor.position - a.position;
            if distance < SEPARATION_DISTANCE {
                acceleration += delta * -SEPARATION_FACTOR;
            }
        });
        assert_eq!(acceleration, DVec2::new(-90.0, 0.0));
    }

    #[test]
    fn attraction_only_inside_radius() {
        let params = WorldParams {
            attractor_position: DVec2::new(80.0, 0.0),
            ..WorldParams::default()
        };
        // Distance 80 with attraction_distance 60: no contribution
        assert_eq!(attraction(DVec2::ZERO, &params), DVec2::ZERO);

        // Distance 10: nonzero, pointing toward the attractor
        let pull = attraction(DVec2::new(70.0, 0.0), &params);
        assert!(pull.x > 0.0);
        assert_eq!(pull.y, 0.0);
    }

    #[test]
    fn repulsion_points_away_when_polarity_negative() {
        let params = WorldParams {
            attractor_position: DVec2::new(10.0, 0.0),
            attractor_polarity: -1.0,
            ..WorldParams::default()
        };
        let push = attraction(DVec2::ZERO, &params);
        assert!(push.x < 0.0);
    }

    #[test]
    fn coincident_attractor_does_not_blow_up() {
        let params = WorldParams {
            attractor_position: DVec2::new(5.0, 5.0),
            ..WorldParams::default()
        };
        let pull = attraction(DVec2::new(5.0, 5.0), &params);
        assert!(pull.x.is_finite() && pull.y.is_finite());
    }

    #[test]
    fn speed_never_exceeds_limit() {
        let now = Instant::now();
        let boid = test_boid(DVec2::ZERO, DVec2::new(500.0, -500.0), now);
        let snapshot = Snapshot::assemble(0, vec![boid], DVec2::new(1e6, 1e6));
        let params = far_attractor_params();

        let next = boid.stepped(0, &snapshot, &params, now);
        assert!(next.velocity.length() <= SPEED_LIMIT + 1e-9);
    }

    #[test]
    fn position_stays_inside_visible_area() {
        let now = Instant::now();
        let params = far_attractor_params();
        let boid = test_boid(DVec2::new(99.0, 99.0), DVec2::new(20.0, 20.0), now);
        let snapshot = Snapshot::assemble(0, vec![boid], DVec2::new(1e6, 1e6));

        let next = boid.stepped(0, &snapshot, &params, now);
        assert!(params.visible_area.contains(next.position));
    }

    #[test]
    fn update_is_deterministic() {
        let now = Instant::now();
        let a = test_boid(DVec2::new(1.0, 2.0), DVec2::new(3.0, -1.0), now);
        let b = test_boid(DVec2::new(4.0, 2.0), DVec2::new(-2.0, 5.0), now);
        let snapshot = Snapshot::assemble(0, vec![a, b], DVec2::ZERO);
        let params = WorldParams::default();

        let first = a.stepped(0, &snapshot, &params, now);
        let second = a.stepped(0, &snapshot, &params, now);
        assert_eq!(first.position, second.position);
        assert_eq!(first.velocity, second.velocity);
    }

    #[test]
    fn color_carries_over_unchanged() {
        let now = Instant::now();
        let boid = test_boid(DVec2::ZERO, DVec2::ZERO, now);
        let snapshot = Snapshot::assemble(0, vec![boid], DVec2::new(1e6, 1e6));

        let next = boid.stepped(0, &snapshot, &far_attractor_params(), now);
        assert_eq!(next.color_index, boid.color_index);
        assert_eq!(next.color_factor, boid.color_factor);
        assert_eq!(next.last_updated, now);
    }

    #[test]
    fn spawn_lands_inside_initial_bounds() {
        let mut rng = rand::thread_rng();
        let now = Instant::now();
        for _ in 0..100 {
            let boid = Boid::spawn(&mut rng, now);
            assert!(boid.position.x.abs() <= HALF_WORLD_SIZE);
            assert!(boid.position.y.abs() <= HALF_WORLD_SIZE);
            assert!(boid.color_index < BOID_COLORS.len());
            assert!((0.5..1.5).contains(&boid.color_factor));
            assert_eq!(boid.velocity, DVec2::ZERO);
        }
    }
}
