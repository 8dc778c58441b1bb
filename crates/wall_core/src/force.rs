//! Gesture recognition and force particle spawning.
//!
//! The gesture vector runs from the right shoulder to the right hand and is
//! only live while the right hand is open. Every tick with a live gesture
//! spawns a burst of short-lived force particles around the right hand, all
//! sharing the gesture-derived velocity.

use rand::Rng;

use crate::calibration::Calibration;
use crate::config::WallConfig;
use crate::device::{HandState, JointId, JointSource};
use crate::particle::Particle;
use crate::vector::{Vector3, Vector3Ext};

/// Sensor-space joints read at the top of a tick, plus the derived gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSnapshot {
    pub right_hand: Vector3,
    pub left_hand: Vector3,
    pub spine_shoulder: Vector3,
    pub spine_base: Vector3,
    pub shoulder_right: Vector3,
    pub hand_state: HandState,
    /// `right_hand - shoulder_right` while the hand is open, zero otherwise.
    pub gesture: Vector3,
}

impl GestureSnapshot {
    /// Read the latest joints from `device` (which must already have been polled).
    pub fn read(device: &dyn JointSource) -> Self {
        let mut snapshot = Self {
            right_hand: device.joint(JointId::HandRight).position,
            left_hand: device.joint(JointId::HandLeft).position,
            spine_shoulder: device.joint(JointId::SpineShoulder).position,
            spine_base: device.joint(JointId::SpineBase).position,
            shoulder_right: device.joint(JointId::ShoulderRight).position,
            hand_state: device.right_hand_state(),
            gesture: Vector3::ZERO,
        };
        if snapshot.hand_state.is_open() {
            snapshot
                .gesture
                .set_difference(snapshot.right_hand, snapshot.shoulder_right);
        }
        snapshot
    }

    pub fn clear_gesture(&mut self) {
        self.gesture.reset();
    }
}

/// Spawn one burst of force particles into `forces`.
///
/// The scaled gesture is mapped through the full calibration chain and used
/// as the initial velocity of every particle in the burst. Nothing is spawned
/// if any mapped velocity component is exactly zero. Each particle sits at the
/// scene-space right hand scaled per axis by an independent jitter of
/// `d * (rand - 0.5) * jitter_rate`, where `d` is the scene distance from the
/// spine base to the left hand.
///
/// Returns the number of particles spawned.
pub fn spawn_burst<R: Rng>(
    snapshot: &GestureSnapshot,
    calibration: &Calibration,
    config: &WallConfig,
    now_ms: u64,
    rng: &mut R,
    forces: &mut Vec<Particle>,
) -> usize {
    let right_hand = calibration.to_scene(snapshot.right_hand);
    let left_hand = calibration.to_scene(snapshot.left_hand);
    let spine_base = calibration.to_scene(snapshot.spine_base);

    let mut power = snapshot.gesture;
    power.scale_by(config.force_power_rate);
    let velocity = calibration.to_scene(power);

    if velocity.x == 0.0 || velocity.y == 0.0 || velocity.z == 0.0 {
        return 0;
    }

    let d = spine_base.distance(left_hand);
    let amplitude = d * config.jitter_rate;

    forces.reserve(config.spawn_count_per_tick);
    for _ in 0..config.spawn_count_per_tick {
        let spread = Vector3::new(
            amplitude * (rng.gen::<f64>() - 0.5),
            amplitude * (rng.gen::<f64>() - 0.5),
            amplitude * (rng.gen::<f64>() - 0.5),
        );
        let mut force = Particle::new(right_hand * spread, config.force_radius, now_ms);
        force.add_velocity(velocity);
        forces.push(force);
    }

    config.spawn_count_per_tick
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{ScriptedDevice, SkeletonFrame};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn frame(hand: HandState) -> SkeletonFrame {
        SkeletonFrame::new()
            .with_joint(JointId::SpineBase, Vector3::new(0.0, -0.3, 2.0))
            .with_joint(JointId::SpineMid, Vector3::new(0.0, 0.1, 2.0))
            .with_joint(JointId::SpineShoulder, Vector3::new(0.0, 0.4, 2.0))
            .with_joint(JointId::ShoulderRight, Vector3::new(0.2, 0.3, 2.0))
            .with_joint(JointId::HandRight, Vector3::new(0.5, 0.6, 1.6))
            .with_joint(JointId::HandLeft, Vector3::new(-0.3, 0.0, 1.9))
            .with_right_hand(hand)
    }

    fn snapshot_of(frame: SkeletonFrame) -> GestureSnapshot {
        let mut device = ScriptedDevice::repeating(frame);
        assert!(device.poll_joints());
        GestureSnapshot::read(&device)
    }

    fn level_calibration(config: &WallConfig) -> Calibration {
        Calibration::from_spine(Vector3::new(0.0, -0.3, 2.0), Vector3::new(0.0, 0.1, 2.0), config)
    }

    #[test]
    fn test_open_hand_yields_gesture() {
        let snapshot = snapshot_of(frame(HandState::Open));
        assert!((snapshot.gesture - Vector3::new(0.3, 0.3, -0.4)).length() < 1e-12);
    }

    #[test]
    fn test_closed_hand_has_no_gesture() {
        let snapshot = snapshot_of(frame(HandState::Closed));
        assert_eq!(snapshot.gesture, Vector3::ZERO);
        assert_eq!(snapshot.right_hand, Vector3::new(0.5, 0.6, 1.6));
    }

    #[test]
    fn test_open_hand_spawns_full_burst() {
        let config = WallConfig::default();
        let calibration = level_calibration(&config);
        let snapshot = snapshot_of(frame(HandState::Open));
        let mut rng = StdRng::seed_from_u64(7);
        let mut forces = Vec::new();

        let spawned = spawn_burst(&snapshot, &calibration, &config, 1234, &mut rng, &mut forces);

        assert_eq!(spawned, 50);
        assert_eq!(forces.len(), 50);

        let expected_velocity = calibration.to_scene(snapshot.gesture * config.force_power_rate);
        let right_hand = calibration.to_scene(snapshot.right_hand);
        let d = calibration
            .to_scene(snapshot.spine_base)
            .distance(calibration.to_scene(snapshot.left_hand));
        let bound = d * 0.5 * config.jitter_rate;

        for force in &forces {
            assert_eq!(force.velocity, expected_velocity);
            assert_eq!(force.radius, config.force_radius);
            assert_eq!(force.created_at_ms, 1234);
            assert!(!force.marked_for_removal);
            assert!(force.current.x.abs() <= right_hand.x.abs() * bound + 1e-9);
            assert!(force.current.y.abs() <= right_hand.y.abs() * bound + 1e-9);
            assert!(force.current.z.abs() <= right_hand.z.abs() * bound + 1e-9);
        }

        // Independent draws per particle
        assert_ne!(forces[0].current, forces[1].current);
    }

    #[test]
    fn test_closed_hand_spawns_nothing() {
        let config = WallConfig::default();
        let calibration = level_calibration(&config);
        let snapshot = snapshot_of(frame(HandState::Closed));
        let mut rng = StdRng::seed_from_u64(7);
        let mut forces = Vec::new();

        assert_eq!(spawn_burst(&snapshot, &calibration, &config, 0, &mut rng, &mut forces), 0);
        assert!(forces.is_empty());
    }

    #[test]
    fn test_zero_mapped_component_spawns_nothing() {
        let config = WallConfig::default();
        let calibration = level_calibration(&config);
        // Hand directly in front of the shoulder: gesture.x == 0
        let hand = frame(HandState::Open).with_joint(JointId::HandRight, Vector3::new(0.2, 0.6, 1.6));
        let snapshot = snapshot_of(hand);
        assert_eq!(snapshot.gesture.x, 0.0);

        let mut rng = StdRng::seed_from_u64(7);
        let mut forces = Vec::new();
        assert_eq!(spawn_burst(&snapshot, &calibration, &config, 0, &mut rng, &mut forces), 0);
        assert!(forces.is_empty());
    }

    #[test]
    fn test_left_hand_on_spine_collapses_burst() {
        let config = WallConfig::default();
        let calibration = level_calibration(&config);
        let hand = frame(HandState::Open).with_joint(JointId::HandLeft, Vector3::new(0.0, -0.3, 2.0));
        let snapshot = snapshot_of(hand);
        let mut rng = StdRng::seed_from_u64(3);
        let mut forces = Vec::new();

        spawn_burst(&snapshot, &calibration, &config, 0, &mut rng, &mut forces);

        assert_eq!(forces.len(), 50);
        for force in &forces {
            assert_eq!(force.current.length(), 0.0);
        }
    }
}
