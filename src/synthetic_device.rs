//! Stand-in skeleton tracker for running without sensor hardware.
//!
//! Produces a person standing two metres from a level sensor, swinging the
//! right arm side to side. The hand is open for the first half of every swing
//! and closed for the second, so bursts arrive in waves.

use std::f64::consts::TAU;

use wall_core::{
    DeviceError, DeviceResult, HandState, JointId, JointReading, JointSource, SkeletonFrame,
    Vector3,
};

pub struct SyntheticDevice {
    period_ticks: u32,
    polls: u32,
    frame: SkeletonFrame,
}

impl SyntheticDevice {
    pub fn open(period_ticks: u32) -> DeviceResult<Self> {
        if period_ticks == 0 {
            return Err(DeviceError::NotConnected(
                "synthetic swing period must be at least one tick".into(),
            ));
        }
        Ok(Self {
            period_ticks,
            polls: 0,
            frame: SkeletonFrame::default(),
        })
    }

    fn frame_at(&self, step: u32) -> SkeletonFrame {
        let phase = (step % self.period_ticks) as f64 / self.period_ticks as f64;
        let swing = (phase * TAU).sin();
        let hand = if phase < 0.5 {
            HandState::Open
        } else {
            HandState::Closed
        };

        SkeletonFrame::new()
            .with_joint(JointId::SpineBase, Vector3::new(0.0, -0.35, 2.0))
            .with_joint(JointId::SpineMid, Vector3::new(0.0, -0.05, 2.0))
            .with_joint(JointId::SpineShoulder, Vector3::new(0.0, 0.3, 2.0))
            .with_joint(JointId::ShoulderRight, Vector3::new(0.18, 0.25, 2.0))
            .with_joint(JointId::HandLeft, Vector3::new(-0.25, -0.2, 1.9))
            .with_joint(
                JointId::HandRight,
                Vector3::new(0.3 + 0.25 * swing, 0.35 + 0.1 * swing.abs(), 1.55),
            )
            .with_right_hand(hand)
    }
}

impl JointSource for SyntheticDevice {
    fn poll_joints(&mut self) -> bool {
        self.frame = self.frame_at(self.polls);
        self.polls = self.polls.wrapping_add(1);
        true
    }

    fn joint(&self, joint: JointId) -> JointReading {
        self.frame.joint(joint)
    }

    fn right_hand_state(&self) -> HandState {
        self.frame.right_hand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(
            SyntheticDevice::open(0),
            Err(DeviceError::NotConnected(_))
        ));
    }

    #[test]
    fn test_hand_opens_and_closes_each_swing() {
        let mut device = SyntheticDevice::open(4).unwrap();
        let mut states = Vec::new();
        for _ in 0..8 {
            assert!(device.poll_joints());
            states.push(device.right_hand_state());
        }
        assert_eq!(
            states,
            vec![
                HandState::Open,
                HandState::Open,
                HandState::Closed,
                HandState::Closed,
                HandState::Open,
                HandState::Open,
                HandState::Closed,
                HandState::Closed,
            ]
        );
    }

    #[test]
    fn test_right_hand_swings() {
        let mut device = SyntheticDevice::open(4).unwrap();
        device.poll_joints();
        let rest = device.joint(JointId::HandRight).position;
        device.poll_joints();
        let peak = device.joint(JointId::HandRight).position;
        assert!((peak.x - rest.x - 0.25).abs() < 1e-12);
        assert_eq!(device.joint(JointId::SpineBase).position.z, 2.0);
    }
}
