/*
 * Frame Pipeline Module
 *
 * This module orchestrates one full generation per iteration:
 * - capture the world parameters once, so every task sees the same values
 * - fan out one task per boid slot on the rayon worker pool (update an
 *   existing boid from the previous snapshot, or create a new one)
 * - collect all results at the fan-in barrier, in slot order
 * - build the new snapshot's spatial index and publish it downstream
 *
 * Publication goes through a capacity-one channel, so the pipeline blocks
 * until the consumer has taken the previous snapshot. That handoff is the
 * sole backpressure mechanism; the simulation cannot outrun its consumer.
 */

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::boid::Boid;
use crate::error::EngineError;
use crate::params::{SharedWorld, WorldParams};
use crate::snapshot::Snapshot;

// Compute one generation from the previous snapshot and a captured set of
// world parameters. The population target is read once from `params`, so it
// is stable for the whole fan-out even if the live value changes meanwhile.
//
// Each slot with a predecessor in `previous` is advanced by the flocking
// step; slots beyond the previous population are filled with freshly spawned
// boids. The parallel collect doubles as the fan-in barrier and places every
// result at its original slot index, which preserves positional continuity
// for the next generation's update-or-create decision.
pub fn next_generation(
    previous: Option<&Snapshot>,
    params: &WorldParams,
    now: Instant,
) -> Snapshot {
    let generation = previous.map_or(0, |snapshot| snapshot.generation() + 1);
    let target = params.population_target;

    let boids: Vec<Boid> = (0..target)
        .into_par_iter()
        .map(|slot| match previous {
            Some(snapshot) if slot < snapshot.len() => {
                snapshot.boids()[slot].stepped(slot, snapshot, params, now)
            }
            _ => Boid::spawn(&mut rand::thread_rng(), now),
        })
        .collect();

    Snapshot::assemble(generation, boids, params.attractor_position)
}

// A running simulation pipeline: a background thread producing snapshots,
// and the receiving end of the capacity-one handoff channel.
pub struct Simulation {
    shared: Arc<SharedWorld>,
    // Taken (and dropped) at shutdown so a pipeline parked on the handoff
    // wakes up and exits.
    receiver: Option<Receiver<Arc<Snapshot>>>,
    handle: Option<JoinHandle<()>>,
}

impl Simulation {
    // Start the pipeline loop on its own thread. It runs until the shared
    // running flag is cleared or the Simulation handle is dropped.
    pub fn spawn(shared: Arc<SharedWorld>) -> Self {
        let (sender, receiver) = mpsc::sync_channel(1);
        let world = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("swarm-pipeline".into())
            .spawn(move || run_pipeline(&world, &sender))
            .expect("failed to spawn pipeline thread");

        Self {
            shared,
            receiver: Some(receiver),
            handle: Some(handle),
        }
    }

    pub fn shared(&self) -> &Arc<SharedWorld> {
        &self.shared
    }

    // Block until the next snapshot is published. Returns Stopped once the
    // pipeline has shut down and no further snapshot will arrive.
    pub fn recv(&self) -> Result<Arc<Snapshot>, EngineError> {
        let receiver = self.receiver.as_ref().ok_or(EngineError::Stopped)?;
        receiver.recv().map_err(|_| EngineError::Stopped)
    }

    // Non-blocking variant: None when no snapshot is pending yet.
    pub fn try_recv(&self) -> Result<Option<Arc<Snapshot>>, EngineError> {
        let receiver = self.receiver.as_ref().ok_or(EngineError::Stopped)?;
        match receiver.try_recv() {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(EngineError::Stopped),
        }
    }

    // Signal shutdown and wait for the pipeline thread to finish. The flag
    // is checked at generation boundaries, so an in-flight generation
    // completes; dropping the receiver unblocks a pipeline parked on the
    // handoff.
    pub fn shutdown(self) {
        // All the work happens in Drop
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.shared.stop();
        drop(self.receiver.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_pipeline(world: &SharedWorld, sender: &SyncSender<Arc<Snapshot>>) {
    info!("simulation pipeline started");
    let mut previous: Option<Arc<Snapshot>> = None;

    while world.is_running() {
        let params = world.capture();
        let snapshot = Arc::new(next_generation(previous.as_deref(), &params, Instant::now()));
        debug!(
            generation = snapshot.generation(),
            population = snapshot.len(),
            "generation built"
        );

        // Blocks until the consumer takes the previous snapshot; a closed
        // channel means the consumer is gone and the pipeline is done.
        if sender.send(Arc::clone(&snapshot)).is_err() {
            break;
        }
        previous = Some(snapshot);
    }

    info!("simulation pipeline stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::INITIAL_POPULATION;

    #[test]
    fn first_generation_spawns_the_full_target() {
        let params = WorldParams::default();
        let snapshot = next_generation(None, &params, Instant::now());
        assert_eq!(snapshot.generation(), 0);
        assert_eq!(snapshot.len(), INITIAL_POPULATION);
    }

    #[test]
    fn population_matches_the_captured_target() {
        let params = WorldParams {
            population_target: 250,
            ..WorldParams::default()
        };
        let snapshot = next_generation(None, &params, Instant::now());
        assert_eq!(snapshot.len(), 250);
    }

    #[test]
    fn shrinking_keeps_the_surviving_prefix_of_slots() {
        let now = Instant::now();
        let first = next_generation(
            None,
            &WorldParams {
                population_target: 50,
                ..WorldParams::default()
            },
            now,
        );

        let shrunk = next_generation(
            Some(&first),
            &WorldParams {
                population_target: 30,
                ..WorldParams::default()
            },
            now,
        );

        assert_eq!(shrunk.len(), 30);
        // Color fields are fixed at spawn time, so a slot-for-slot match
        // shows each survivor derives from the same slot of the previous
        // generation.
        for (next, prev) in shrunk.boids().iter().zip(first.boids()) {
            assert_eq!(next.color_index, prev.color_index);
            assert_eq!(next.color_factor, prev.color_factor);
        }
    }

    #[test]
    fn growing_updates_old_slots_and_spawns_the_rest() {
        let now = Instant::now();
        let first = next_generation(
            None,
            &WorldParams {
                population_target: 20,
                ..WorldParams::default()
            },
            now,
        );

        let grown = next_generation(
            Some(&first),
            &WorldParams {
                population_target: 35,
                ..WorldParams::default()
            },
            now,
        );

        assert_eq!(grown.len(), 35);
        assert_eq!(grown.generation(), 1);
        for (next, prev) in grown.boids().iter().take(20).zip(first.boids()) {
            assert_eq!(next.color_index, prev.color_index);
            assert_eq!(next.color_factor, prev.color_factor);
        }
    }

    #[test]
    fn snapshot_captures_the_attractor_position() {
        let params = WorldParams {
            population_target: 100,
            attractor_position: glam::DVec2::new(12.0, -34.0),
            ..WorldParams::default()
        };
        let snapshot = next_generation(None, &params, Instant::now());
        assert_eq!(snapshot.attractor_position(), params.attractor_position);
    }
}
