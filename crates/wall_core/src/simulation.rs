//! The fixed-step tick orchestrator.
//!
//! One tick runs five phases in strict order:
//!
//! 1. `recognize`: poll the device and rebuild the gesture snapshot
//! 2. `spawn_forces`: burst of force particles from the gesture
//! 3. `resolve_collisions`: lattice vs force, then compaction
//! 4. `advance_forces`: integrate force particles and expire old ones
//! 5. `update_lattice`: neighbor pass and relaxation of the wall
//!
//! A phase must finish before the next starts. The phases are public so the
//! Bevy plugin can schedule each as its own system; `tick` runs them back to
//! back for callers that drive the loop themselves.

use bevy::log::debug;
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::calibration::{calibrate, Calibration};
use crate::collision::resolve_collisions;
use crate::config::WallConfig;
use crate::device::JointSource;
use crate::error::DeviceResult;
use crate::force::{spawn_burst, GestureSnapshot};
use crate::lattice::Lattice;
use crate::particle::Particle;

/// Counts gathered over one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Zero-based index of the tick this report describes.
    pub tick: u64,
    /// Whether the device delivered a frame this tick.
    pub frame_ok: bool,
    pub spawned: usize,
    pub collisions: usize,
    pub expired: usize,
    /// Force particles alive at the end of the tick.
    pub live_forces: usize,
}

/// Running totals since the simulation was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationStats {
    pub ticks: u64,
    pub dropped_frames: u64,
    pub total_spawned: u64,
    pub total_collisions: u64,
    pub total_expired: u64,
}

/// A wall lattice, its force particles and the calibration that feeds them.
#[derive(Resource)]
pub struct WallSimulation {
    config: WallConfig,
    lattice: Lattice,
    forces: Vec<Particle>,
    calibration: Calibration,
    snapshot: GestureSnapshot,
    rng: StdRng,
    report: TickReport,
    stats: SimulationStats,
}

impl WallSimulation {
    pub fn new(config: WallConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic jitter, for tests and replays.
    pub fn with_seed(config: WallConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: WallConfig, rng: StdRng) -> Self {
        Self {
            lattice: Lattice::new(&config),
            forces: Vec::new(),
            calibration: Calibration::default(),
            snapshot: GestureSnapshot::default(),
            rng,
            report: TickReport::default(),
            stats: SimulationStats::default(),
            config,
        }
    }

    /// Derive the calibration chain from the device. Call once before ticking.
    pub fn calibrate(&mut self, device: &mut dyn JointSource) -> DeviceResult<()> {
        self.calibration = calibrate(device, &self.config)?;
        Ok(())
    }

    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn config(&self) -> &WallConfig {
        &self.config
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn lattice_mut(&mut self) -> &mut Lattice {
        &mut self.lattice
    }

    pub fn forces(&self) -> &[Particle] {
        &self.forces
    }

    pub fn forces_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.forces
    }

    pub fn snapshot(&self) -> &GestureSnapshot {
        &self.snapshot
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// Ticks completed so far.
    pub fn tick_count(&self) -> u64 {
        self.stats.ticks
    }

    /// True once `max_ticks` ticks have completed.
    pub fn is_finished(&self) -> bool {
        self.config
            .max_ticks
            .is_some_and(|max| self.stats.ticks >= max)
    }

    /// Phase 1. Without a fresh frame the gesture is cleared and the
    /// gesture-dependent phases do nothing this tick.
    pub fn recognize(&mut self, device: &mut dyn JointSource) -> bool {
        let frame_ok = device.poll_joints();
        if frame_ok {
            self.snapshot = GestureSnapshot::read(device);
        } else {
            self.snapshot.clear_gesture();
            debug!("No skeleton frame on tick {}", self.stats.ticks);
        }
        self.report.frame_ok = frame_ok;
        frame_ok
    }

    /// Phase 2.
    pub fn spawn_forces(&mut self, now_ms: u64) -> usize {
        if !self.report.frame_ok {
            return 0;
        }
        let spawned = spawn_burst(
            &self.snapshot,
            &self.calibration,
            &self.config,
            now_ms,
            &mut self.rng,
            &mut self.forces,
        );
        self.report.spawned += spawned;
        spawned
    }

    /// Phase 3.
    pub fn resolve_collisions(&mut self) -> usize {
        let contacts = resolve_collisions(
            self.lattice.particles_mut(),
            &mut self.forces,
            &self.config,
        );
        self.report.collisions += contacts;
        contacts
    }

    /// Phase 4. A force particle survives while `now_ms - created_at_ms <= force_lifetime_ms`.
    pub fn advance_forces(&mut self, now_ms: u64) -> usize {
        for force in &mut self.forces {
            force.advance();
        }

        let lifetime = self.config.force_lifetime_ms;
        let before = self.forces.len();
        self.forces.retain(|force| force.age_ms(now_ms) <= lifetime);

        let expired = before - self.forces.len();
        self.report.expired += expired;
        expired
    }

    /// Phase 5.
    pub fn update_lattice(&mut self) -> usize {
        self.lattice.update(&self.config)
    }

    /// Close the current tick: fold its counts into the totals and start a fresh report.
    pub fn finish_tick(&mut self) -> TickReport {
        let mut report = std::mem::take(&mut self.report);
        report.tick = self.stats.ticks;
        report.live_forces = self.forces.len();

        self.stats.ticks += 1;
        if !report.frame_ok {
            self.stats.dropped_frames += 1;
        }
        self.stats.total_spawned += report.spawned as u64;
        self.stats.total_collisions += report.collisions as u64;
        self.stats.total_expired += report.expired as u64;

        report
    }

    /// Run all five phases for the tick stamped `now_ms`.
    pub fn tick(&mut self, device: &mut dyn JointSource, now_ms: u64) -> TickReport {
        self.recognize(device);
        self.spawn_forces(now_ms);
        self.resolve_collisions();
        self.advance_forces(now_ms);
        self.update_lattice();
        self.finish_tick()
    }
}
