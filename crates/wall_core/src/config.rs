//! Tunables for the wall simulation.
//!
//! There are no configuration files. Every value lives here with its default,
//! and the binary inserts a `WallConfig` resource built from `Default`.

use std::time::Duration;

use bevy::prelude::Resource;

use crate::calibration::CalibrationOffset;
use crate::lattice::ModuleRule;
use crate::vector::Vector3;

/// Simulation configuration.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WallConfig {
    /// Collision radius of lattice particles; also half the lattice spacing.
    pub ball_radius: f64,

    /// Collision radius of force particles.
    pub force_radius: f64,

    /// Half-width `d` of the square neighbor window (window side is `2d + 1`).
    pub neighborhood_half_width: usize,

    /// Lattice rows.
    pub lattice_rows: usize,

    /// Lattice columns.
    pub lattice_cols: usize,

    /// Multiplier applied to the raw gesture vector before mapping it to scene space.
    pub force_power_rate: f64,

    /// Force particles spawned per tick while the hand is open.
    pub spawn_count_per_tick: usize,

    /// Force particles older than this are expired (inclusive bound survives).
    pub force_lifetime_ms: u64,

    /// Nominal tick period.
    pub tick_period_ms: u64,

    /// Hookean pull toward the anchor applied by `gravity_restore`.
    pub restore_rate: f64,

    /// Per-axis spawn jitter factor, multiplied by the spine-to-left-hand distance.
    pub jitter_rate: f64,

    /// Mass of a lattice particle in the collision exchange.
    pub lattice_mass: f64,

    /// Mass of a force particle in the collision exchange.
    pub force_mass: f64,

    /// Final axis scale of the calibration chain (flips Y and Z into scene space).
    pub scene_scale: Vector3,

    /// Which spine-mid Y the calibration translation cancels.
    pub calibration_offset: CalibrationOffset,

    /// Neighbor accumulation rule for the lattice pass.
    pub module_rule: ModuleRule,

    /// Device polls attempted before calibration gives up.
    pub calibration_attempts: u32,

    /// Ticks between diagnostic reports.
    pub report_interval_ticks: u64,

    /// Stop after this many ticks. `None` runs until the process is killed.
    pub max_ticks: Option<u64>,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            ball_radius: 5.0,
            force_radius: 1.0,
            neighborhood_half_width: 2,
            lattice_rows: 20,
            lattice_cols: 40,
            force_power_rate: 0.4,
            spawn_count_per_tick: 50,
            force_lifetime_ms: 5000,
            tick_period_ms: 33,
            restore_rate: 0.0005,
            jitter_rate: 0.05,
            lattice_mass: 1.0,
            force_mass: 1.0,
            scene_scale: Vector3::new(100.0, -100.0, -100.0),
            calibration_offset: CalibrationOffset::Rotated,
            module_rule: ModuleRule::Diffuse,
            calibration_attempts: 30,
            report_interval_ticks: 30,
            max_ticks: Some(300),
        }
    }
}

impl WallConfig {
    /// `(ball_radius + force_radius)^2`, compared against squared distances.
    pub fn collision_distance_squared(&self) -> f64 {
        let reach = self.ball_radius + self.force_radius;
        reach * reach
    }

    /// `1 / (4 d (d + 1))`; 1/24 for the default half-width of 2.
    pub fn module_gravity_factor(&self) -> f64 {
        let d = self.neighborhood_half_width as f64;
        1.0 / (4.0 * d * (d + 1.0))
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn lattice_len(&self) -> usize {
        self.lattice_rows * self.lattice_cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = WallConfig::default();
        assert_eq!(config.ball_radius, 5.0);
        assert_eq!(config.force_radius, 1.0);
        assert_eq!(config.neighborhood_half_width, 2);
        assert_eq!(config.lattice_rows, 20);
        assert_eq!(config.lattice_cols, 40);
        assert_eq!(config.force_power_rate, 0.4);
        assert_eq!(config.spawn_count_per_tick, 50);
        assert_eq!(config.force_lifetime_ms, 5000);
        assert_eq!(config.tick_period_ms, 33);
    }

    #[test]
    fn test_derived_values() {
        let config = WallConfig::default();
        assert_eq!(config.collision_distance_squared(), 36.0);
        assert!((config.module_gravity_factor() - 1.0 / 24.0).abs() < 1e-15);
        assert_eq!(config.tick_period(), Duration::from_millis(33));
        assert_eq!(config.lattice_len(), 800);
    }
}
