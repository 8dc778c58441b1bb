//! Sensor-to-scene coordinate mapping.
//!
//! The mapping is three affine maps applied in a fixed order:
//!
//! 1. `rotate`: undo the sensor tilt about its X axis
//! 2. `translate`: cancel the spine-mid height so the torso sits at Y = 0
//! 3. `scale`: metres to scene units, flipping Y and Z
//!
//! The tilt angle is estimated from the depth of the spine base:
//! `theta = acos(clamp(spine_base.z / 2))`. This is a calibration-accuracy
//! assumption, not a physically exact derivation, which is why the source of
//! the translation offset is configurable (`CalibrationOffset`).

use bevy::log::info;
use bevy::math::DAffine3;

use crate::config::WallConfig;
use crate::device::{JointId, JointSource};
use crate::error::{DeviceError, DeviceResult};
use crate::vector::Vector3;

/// 3x4 affine map `p' = M p + t`.
pub type AffineTransform = DAffine3;

/// Rotation by `theta` radians about the sensor's X axis.
pub fn rotate_x(theta: f64) -> AffineTransform {
    DAffine3::from_rotation_x(theta)
}

/// Axis-aligned scale.
pub fn scale(sx: f64, sy: f64, sz: f64) -> AffineTransform {
    DAffine3::from_scale(Vector3::new(sx, sy, sz))
}

/// Pure translation.
pub fn translate(tx: f64, ty: f64, tz: f64) -> AffineTransform {
    DAffine3::from_translation(Vector3::new(tx, ty, tz))
}

/// Applies the full affine map to `(x, y, z)`.
pub fn transform(affine: &AffineTransform, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let p = affine.transform_point3(Vector3::new(x, y, z));
    (p.x, p.y, p.z)
}

/// Which spine-mid Y coordinate the translation step cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationOffset {
    /// Y after the tilt rotation. Puts the rotated spine-mid exactly at Y = 0.
    #[default]
    Rotated,
    /// Y as reported by the sensor.
    Raw,
}

/// The rotate/translate/scale chain derived once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub rotate: AffineTransform,
    pub translate: AffineTransform,
    pub scale: AffineTransform,
    /// Estimated sensor tilt in radians.
    pub theta: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            rotate: AffineTransform::IDENTITY,
            translate: AffineTransform::IDENTITY,
            scale: AffineTransform::IDENTITY,
            theta: 0.0,
        }
    }
}

impl Calibration {
    /// Derive the chain from one spine-base and one spine-mid reading.
    pub fn from_spine(spine_base: Vector3, spine_mid: Vector3, config: &WallConfig) -> Self {
        let theta = (spine_base.z / 2.0).clamp(-1.0, 1.0).acos();
        let rotate = rotate_x(theta);

        let offset_y = match config.calibration_offset {
            CalibrationOffset::Rotated => rotate.transform_point3(spine_mid).y,
            CalibrationOffset::Raw => spine_mid.y,
        };

        let s = config.scene_scale;
        Self {
            rotate,
            translate: translate(0.0, -offset_y, 0.0),
            scale: scale(s.x, s.y, s.z),
            theta,
        }
    }

    /// Map a sensor-space point into scene space: rotate, then translate, then scale.
    pub fn to_scene(&self, point: Vector3) -> Vector3 {
        let rotated = self.rotate.transform_point3(point);
        let translated = self.translate.transform_point3(rotated);
        self.scale.transform_point3(translated)
    }

    /// The whole chain as a single affine map.
    pub fn composed(&self) -> AffineTransform {
        self.scale * self.translate * self.rotate
    }

    pub fn theta_degrees(&self) -> f64 {
        self.theta.to_degrees()
    }
}

/// Poll `device` until a frame arrives and derive the calibration from it.
///
/// Gives up after `config.calibration_attempts` polls.
pub fn calibrate(device: &mut dyn JointSource, config: &WallConfig) -> DeviceResult<Calibration> {
    let attempts = config.calibration_attempts.max(1);
    for _ in 0..attempts {
        if !device.poll_joints() {
            continue;
        }
        let base = device.joint(JointId::SpineBase).position;
        let mid = device.joint(JointId::SpineMid).position;
        let calibration = Calibration::from_spine(base, mid, config);
        info!("Calibration theta: {:.3} deg", calibration.theta_degrees());
        return Ok(calibration);
    }
    Err(DeviceError::CalibrationUnavailable { attempts })
}
