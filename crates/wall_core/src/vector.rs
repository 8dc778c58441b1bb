//! In-place vector helpers on top of glam's `DVec3`.
//!
//! The simulation mutates its vectors in place every tick (velocity nudges,
//! accumulator resets, copying a joint reading into a cached slot). glam
//! already covers `+=`, `dot`, `length` and friends; this trait adds the
//! remaining operations under the names the physics code uses.

use bevy::math::DVec3;

/// Mutable 3-component vector used for positions, velocities and accumulators.
pub type Vector3 = DVec3;

/// In-place operations missing from `DVec3`.
///
/// All operations are total: none of them can fail, and `normalize_in_place`
/// leaves a zero vector untouched instead of producing NaN.
pub trait Vector3Ext {
    /// Sets `self = target - current`.
    fn set_difference(&mut self, target: Vector3, current: Vector3);

    /// Multiplies every component by `k`.
    fn scale_by(&mut self, k: f64);

    /// Squared euclidean length.
    fn magnitude_squared(&self) -> f64;

    /// Euclidean length, `sqrt(magnitude_squared())`.
    fn magnitude(&self) -> f64;

    /// Divides by the magnitude. No-op when the magnitude is exactly zero.
    fn normalize_in_place(&mut self);

    /// Overwrites all components with those of `other`.
    fn copy_from(&mut self, other: Vector3);

    /// Zeroes all components.
    fn reset(&mut self);
}

impl Vector3Ext for Vector3 {
    fn set_difference(&mut self, target: Vector3, current: Vector3) {
        *self = target - current;
    }

    fn scale_by(&mut self, k: f64) {
        *self *= k;
    }

    fn magnitude_squared(&self) -> f64 {
        self.length_squared()
    }

    fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    fn normalize_in_place(&mut self) {
        let magnitude = self.magnitude();
        if magnitude != 0.0 {
            *self /= magnitude;
        }
    }

    fn copy_from(&mut self, other: Vector3) {
        *self = other;
    }

    fn reset(&mut self) {
        *self = Vector3::ZERO;
    }
}
