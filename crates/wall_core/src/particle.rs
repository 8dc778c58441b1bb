//! The point mass shared by lattice and force particles.
//!
//! Integration is explicit Euler with a unit step: velocity is added to the
//! current position once per tick, no `dt`.

use crate::vector::{Vector3, Vector3Ext};

/// One physical point mass.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Rest position. Lattice particles relax toward it; it never changes after construction.
    pub position: Vector3,
    /// Live coordinates.
    pub current: Vector3,
    pub velocity: Vector3,
    /// Neighbor contributions gathered during the lattice pass, cleared by `advance`.
    pub pending_displacement: Vector3,
    pub radius: f64,
    /// Spawn timestamp in milliseconds.
    pub created_at_ms: u64,
    /// Set by the collision resolver; the particle is dropped at the next compaction.
    pub marked_for_removal: bool,
}

impl Particle {
    pub fn new(at: Vector3, radius: f64, created_at_ms: u64) -> Self {
        Self {
            position: at,
            current: at,
            velocity: Vector3::ZERO,
            pending_displacement: Vector3::ZERO,
            radius,
            created_at_ms,
            marked_for_removal: false,
        }
    }

    /// `current += velocity`, then clear the neighbor accumulator.
    pub fn advance(&mut self) {
        self.current += self.velocity;
        self.pending_displacement.reset();
    }

    /// Pull the particle back toward its anchor.
    ///
    /// Below the floor (`current.z < 0`) the particle snaps back to the anchor
    /// and stops. Otherwise a Hookean nudge of `restore_rate * (anchor - current)`
    /// is added to the velocity.
    pub fn gravity_restore(&mut self, restore_rate: f64) {
        if self.current.z < 0.0 {
            self.current.copy_from(self.position);
            self.velocity.reset();
        } else {
            let mut pull = Vector3::ZERO;
            pull.set_difference(self.position, self.current);
            pull.scale_by(restore_rate);
            self.velocity += pull;
        }
    }

    pub fn accumulate_neighbor(&mut self, v: Vector3) {
        self.pending_displacement += v;
    }

    /// Fold the accumulated neighbor sum into the velocity, scaled by `factor`.
    pub fn apply_module_gravity(&mut self, factor: f64) {
        self.pending_displacement.scale_by(factor);
        self.velocity += self.pending_displacement;
    }

    pub fn add_velocity(&mut self, v: Vector3) {
        self.velocity += v;
    }

    /// Offset from the anchor.
    pub fn displacement(&self) -> Vector3 {
        self.current - self.position
    }

    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_particle_rests_at_anchor() {
        let p = Particle::new(Vector3::new(1.0, 2.0, 3.0), 5.0, 42);
        assert_eq!(p.current, p.position);
        assert_eq!(p.velocity, Vector3::ZERO);
        assert_eq!(p.pending_displacement, Vector3::ZERO);
        assert_eq!(p.created_at_ms, 42);
        assert!(!p.marked_for_removal);
    }

    #[test]
    fn test_advance_integrates_velocity() {
        let mut p = Particle::new(Vector3::ZERO, 1.0, 0);
        p.add_velocity(Vector3::new(1.0, 1.0, 1.0));

        p.advance();
        assert_eq!(p.current, Vector3::new(1.0, 1.0, 1.0));

        p.advance();
        assert_eq!(p.current, Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn test_advance_clears_accumulator() {
        let mut p = Particle::new(Vector3::ZERO, 1.0, 0);
        p.accumulate_neighbor(Vector3::new(3.0, 0.0, 0.0));
        p.accumulate_neighbor(Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(p.pending_displacement, Vector3::new(4.0, 2.0, 0.0));

        p.advance();
        assert_eq!(p.pending_displacement, Vector3::ZERO);
    }

    #[test]
    fn test_gravity_restore_below_floor_snaps_to_anchor() {
        let mut p = Particle::new(Vector3::new(10.0, 10.0, 10.0), 5.0, 0);
        p.current.z = -5.0;
        p.add_velocity(Vector3::new(7.0, -3.0, 2.0));

        p.gravity_restore(0.0005);

        assert_eq!(p.current, Vector3::new(10.0, 10.0, 10.0));
        assert_eq!(p.velocity, Vector3::ZERO);
    }

    #[test]
    fn test_gravity_restore_pulls_toward_anchor() {
        let mut p = Particle::new(Vector3::new(0.0, 0.0, 0.0), 5.0, 0);
        p.current = Vector3::new(100.0, -200.0, 10.0);

        p.gravity_restore(0.0005);

        assert!((p.velocity - Vector3::new(-0.05, 0.1, -0.005)).length() < 1e-12);
        // Position itself is only changed by advance()
        assert_eq!(p.current, Vector3::new(100.0, -200.0, 10.0));
    }

    #[test]
    fn test_module_gravity_scales_accumulator_into_velocity() {
        let mut p = Particle::new(Vector3::ZERO, 5.0, 0);
        p.add_velocity(Vector3::new(1.0, 0.0, 0.0));
        p.accumulate_neighbor(Vector3::new(24.0, 48.0, -24.0));

        p.apply_module_gravity(1.0 / 24.0);

        assert_eq!(p.velocity, Vector3::new(2.0, 2.0, -1.0));
    }

    #[test]
    fn test_age_saturates() {
        let p = Particle::new(Vector3::ZERO, 1.0, 1000);
        assert_eq!(p.age_ms(6000), 5000);
        assert_eq!(p.age_ms(500), 0);
    }
}
