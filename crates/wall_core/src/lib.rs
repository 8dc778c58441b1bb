//! Core simulation for the gesture wall.
//!
//! This crate provides:
//! - Vector helpers and the sensor-to-scene calibration chain
//! - The particle model shared by lattice and force particles
//! - The anchored lattice and its neighbor smoothing pass
//! - Force spawning from the tracked right-hand gesture
//! - Lattice vs force collision resolution
//! - The tick orchestrator tying the phases together
//! - The tracking device boundary and a scripted stand-in
//!
//! Nothing in here schedules work; `wall_physics` wraps the simulation in a
//! Bevy plugin.

pub mod calibration;
pub mod collision;
pub mod config;
pub mod device;
pub mod error;
pub mod force;
pub mod lattice;
pub mod particle;
pub mod simulation;
pub mod vector;

pub use calibration::{calibrate, AffineTransform, Calibration, CalibrationOffset};
pub use collision::{exchange_velocity, overlaps, resolve_collisions};
pub use config::WallConfig;
pub use device::{
    HandState, JointId, JointReading, JointSource, ScriptedDevice, SkeletonFrame, TrackingState,
};
pub use error::{DeviceError, DeviceResult};
pub use force::{spawn_burst, GestureSnapshot};
pub use lattice::{Lattice, ModuleRule};
pub use particle::Particle;
pub use simulation::{SimulationStats, TickReport, WallSimulation};
pub use vector::{Vector3, Vector3Ext};
