//! Tracking device boundary.
//!
//! The simulation never talks to sensor hardware directly. It consumes a
//! `JointSource`, which yields one skeleton frame per poll. Coordinates are in
//! sensor space (metres, Z pointing away from the sensor) and only become
//! scene coordinates after passing through the calibration chain.
//!
//! `ScriptedDevice` is a deterministic source that replays a fixed list of
//! frames, used by tests and anything else that needs a repeatable stream.

use crate::vector::Vector3;

/// Joints the simulation reads.
///
/// `sensor_index` maps each joint onto the Kinect v2 skeleton layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointId {
    SpineBase,
    SpineMid,
    SpineShoulder,
    ShoulderRight,
    HandRight,
    HandLeft,
}

impl JointId {
    pub const COUNT: usize = 6;

    /// Index of this joint in a full 25-joint sensor skeleton.
    pub fn sensor_index(self) -> usize {
        match self {
            JointId::SpineBase => 0,
            JointId::SpineMid => 1,
            JointId::HandLeft => 7,
            JointId::ShoulderRight => 8,
            JointId::HandRight => 11,
            JointId::SpineShoulder => 20,
        }
    }

    fn slot(self) -> usize {
        match self {
            JointId::SpineBase => 0,
            JointId::SpineMid => 1,
            JointId::SpineShoulder => 2,
            JointId::ShoulderRight => 3,
            JointId::HandRight => 4,
            JointId::HandLeft => 5,
        }
    }
}

/// How confidently the sensor located a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingState {
    #[default]
    NotTracked,
    Inferred,
    Tracked,
}

impl TrackingState {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => TrackingState::Inferred,
            2 => TrackingState::Tracked,
            _ => TrackingState::NotTracked,
        }
    }
}

/// Hand pose reported for the right hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandState {
    #[default]
    Unknown,
    NotTracked,
    Open,
    Closed,
    Lasso,
}

impl HandState {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => HandState::NotTracked,
            2 => HandState::Open,
            3 => HandState::Closed,
            4 => HandState::Lasso,
            _ => HandState::Unknown,
        }
    }

    pub fn is_open(self) -> bool {
        self == HandState::Open
    }
}

/// One joint sample in sensor space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointReading {
    pub position: Vector3,
    pub tracking: TrackingState,
}

impl JointReading {
    pub fn tracked(position: Vector3) -> Self {
        Self {
            position,
            tracking: TrackingState::Tracked,
        }
    }
}

/// A full skeleton sample: every joint the simulation reads plus the right hand state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkeletonFrame {
    joints: [JointReading; JointId::COUNT],
    pub right_hand: HandState,
}

impl SkeletonFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter marking the joint as tracked at `position`.
    pub fn with_joint(mut self, joint: JointId, position: Vector3) -> Self {
        self.set_joint(joint, JointReading::tracked(position));
        self
    }

    pub fn with_right_hand(mut self, state: HandState) -> Self {
        self.right_hand = state;
        self
    }

    pub fn set_joint(&mut self, joint: JointId, reading: JointReading) {
        self.joints[joint.slot()] = reading;
    }

    pub fn joint(&self, joint: JointId) -> JointReading {
        self.joints[joint.slot()]
    }
}

/// Capability exposed by a skeleton tracker.
///
/// `poll_joints` is called once at the top of every tick. When it returns
/// `false` no fresh frame was obtained and the readings keep whatever the
/// last successful poll produced.
pub trait JointSource: Send + Sync {
    /// Fetch the next frame. Returns `true` if a valid frame was obtained.
    fn poll_joints(&mut self) -> bool;

    /// Latest reading for `joint`.
    fn joint(&self, joint: JointId) -> JointReading;

    /// Latest right hand state.
    fn right_hand_state(&self) -> HandState;
}

/// Replays a fixed script of frames, one per poll.
///
/// `None` entries simulate a dropped frame. After the script runs out the
/// final entry repeats forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDevice {
    script: Vec<Option<SkeletonFrame>>,
    cursor: usize,
    current: SkeletonFrame,
}

impl ScriptedDevice {
    pub fn new(script: Vec<Option<SkeletonFrame>>) -> Self {
        Self {
            script,
            cursor: 0,
            current: SkeletonFrame::default(),
        }
    }

    /// A device that reports the same frame on every poll.
    pub fn repeating(frame: SkeletonFrame) -> Self {
        Self::new(vec![Some(frame)])
    }

    /// A device that never produces a frame.
    pub fn disconnected() -> Self {
        Self::new(Vec::new())
    }

    /// Number of polls served so far.
    pub fn polls(&self) -> usize {
        self.cursor
    }
}

impl JointSource for ScriptedDevice {
    fn poll_joints(&mut self) -> bool {
        let entry = match self.script.get(self.cursor) {
            Some(entry) => *entry,
            None => self.script.last().copied().flatten(),
        };
        self.cursor += 1;

        match entry {
            Some(frame) => {
                self.current = frame;
                true
            }
            None => false,
        }
    }

    fn joint(&self, joint: JointId) -> JointReading {
        self.current.joint(joint)
    }

    fn right_hand_state(&self) -> HandState {
        self.current.right_hand
    }
}
