//! Lattice vs force particle collisions.
//!
//! Every lattice particle is tested against every live force particle with a
//! squared-distance check. A hit transfers momentum with the 1-D elastic
//! exchange formula onto the lattice particle and flags the force particle.
//! There is no early exit: one force particle can hit several lattice
//! particles in the same tick. Flagged force particles are dropped in a single
//! compaction after the double loop.

use crate::config::WallConfig;
use crate::particle::Particle;
use crate::vector::{Vector3, Vector3Ext};

/// True if the two particles overlap: `|a - b|^2 < reach_squared`.
pub fn overlaps(a: &Particle, b: &Particle, reach_squared: f64) -> bool {
    a.current.distance_squared(b.current) < reach_squared
}

/// Velocity handed to the lattice particle by one collision.
///
/// `v1 = (v_lattice * (m1 - m2) + v_force * 2 m2) / (m1 + m2)`.
/// With equal masses this is exactly `v_force`.
pub fn exchange_velocity(lattice_velocity: Vector3, force_velocity: Vector3, m1: f64, m2: f64) -> Vector3 {
    let mut v1 = lattice_velocity;
    v1.scale_by(m1 - m2);

    let mut v2 = force_velocity;
    v2.scale_by(2.0 * m2);

    v1 += v2;
    v1.scale_by(1.0 / (m1 + m2));
    v1
}

/// Run the full collision pass and compact `forces`.
///
/// Returns the number of lattice/force contacts resolved.
pub fn resolve_collisions(lattice: &mut [Particle], forces: &mut Vec<Particle>, config: &WallConfig) -> usize {
    let reach_squared = config.collision_distance_squared();
    let mut contacts = 0;

    for ball in lattice.iter_mut() {
        for force in forces.iter_mut() {
            if !overlaps(ball, force, reach_squared) {
                continue;
            }
            let impulse = exchange_velocity(
                ball.velocity,
                force.velocity,
                config.lattice_mass,
                config.force_mass,
            );
            ball.add_velocity(impulse);
            force.marked_for_removal = true;
            contacts += 1;
        }
    }

    forces.retain(|force| !force.marked_for_removal);
    contacts
}
