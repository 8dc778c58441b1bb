//! The anchored wall of lattice particles.
//!
//! A dense `rows x cols` grid flattened row-major (`index = row * cols + col`).
//! Particles are placed once at construction on a square grid spaced
//! `2 * ball_radius` apart and are never added or removed afterwards.
//!
//! Each tick runs the "module gravity" pass: every interior cell (at least
//! `d` cells away from every edge) visits the `(2d + 1)^2` window around it and
//! accumulates contributions, then every particle relaxes toward its anchor
//! and integrates. Cells only ever write their own accumulator, so the pass is
//! plain index arithmetic over one `Vec`.

use crate::config::WallConfig;
use crate::particle::Particle;
use crate::vector::Vector3;

/// What a window visit accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleRule {
    /// The window centre accumulates each neighbor's displacement relative to
    /// its own: `(n.current - n.position) - (c.current - c.position)`.
    /// Margin cells never accumulate and a lattice at rest accumulates zero.
    #[default]
    Diffuse,
    /// Each in-window neighbor accumulates its own current position into its
    /// own accumulator, once per window it falls in.
    SelfPosition,
}

#[derive(Debug, Clone)]
pub struct Lattice {
    rows: usize,
    cols: usize,
    particles: Vec<Particle>,
}

impl Lattice {
    /// Rows cover `y in [-rows, -1]`, columns `x in [-cols/2, cols/2)`, both in
    /// units of `2 * ball_radius`, all at `z = 0`.
    pub fn new(config: &WallConfig) -> Self {
        let rows = config.lattice_rows;
        let cols = config.lattice_cols;
        let spacing = config.ball_radius * 2.0;

        let mut particles = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            let y = row as f64 - rows as f64;
            for col in 0..cols {
                let x = col as f64 - (cols / 2) as f64;
                let anchor = Vector3::new(x * spacing, y * spacing, 0.0);
                particles.push(Particle::new(anchor, config.ball_radius, 0));
            }
        }

        Self {
            rows,
            cols,
            particles,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Particle> {
        if row < self.rows && col < self.cols {
            self.particles.get(self.index(row, col))
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Particle> {
        if row < self.rows && col < self.cols {
            let index = self.index(row, col);
            self.particles.get_mut(index)
        } else {
            None
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// True if `(row, col)` is at least `d` cells from every edge.
    pub fn is_interior(&self, row: usize, col: usize, d: usize) -> bool {
        row >= d && col >= d && row + d < self.rows && col + d < self.cols
    }

    /// Windowed accumulation over every interior cell.
    ///
    /// Returns the number of in-bounds window offsets visited.
    pub fn accumulate_neighbors(&mut self, d: usize, rule: ModuleRule) -> usize {
        if self.rows <= 2 * d || self.cols <= 2 * d {
            return 0;
        }

        let reach = d as isize;
        let mut visits = 0;

        for row in d..self.rows - d {
            for col in d..self.cols - d {
                let center = self.index(row, col);
                for j in -reach..=reach {
                    for i in -reach..=reach {
                        let r = row as isize + j;
                        let c = col as isize + i;
                        if r < 0 || c < 0 || r >= self.rows as isize || c >= self.cols as isize {
                            continue;
                        }
                        let neighbor = self.index(r as usize, c as usize);
                        visits += 1;

                        match rule {
                            ModuleRule::Diffuse => {
                                let relative = self.particles[neighbor].displacement()
                                    - self.particles[center].displacement();
                                self.particles[center].accumulate_neighbor(relative);
                            }
                            ModuleRule::SelfPosition => {
                                let own = self.particles[neighbor].current;
                                self.particles[neighbor].accumulate_neighbor(own);
                            }
                        }
                    }
                }
            }
        }

        visits
    }

    /// Restore, fold in neighbor contributions, integrate. Runs on every cell.
    pub fn relax(&mut self, restore_rate: f64, module_factor: f64) {
        for particle in &mut self.particles {
            particle.gravity_restore(restore_rate);
            particle.apply_module_gravity(module_factor);
            particle.advance();
        }
    }

    /// One full lattice pass: accumulation over the whole grid, then relaxation.
    pub fn update(&mut self, config: &WallConfig) -> usize {
        let visits = self.accumulate_neighbors(config.neighborhood_half_width, config.module_rule);
        self.relax(config.restore_rate, config.module_gravity_factor());
        visits
    }
}
