// Particle store and physics step for the background network animation.
// Pure simulation state, no DOM types, so the whole file tests natively.

use rand::Rng;
use vecmath::{self, Vector2};

use crate::particle::Particle;

// One line between two nearby particles. Strength runs from 1.0 for
// coincident particles down to 0.0 at the connection threshold; the
// renderer multiplies it by the theme's base alpha.
pub struct Connection {
    pub from: [f64; 2],
    pub to: [f64; 2],
    pub strength: f64,
}

pub struct ParticleField {
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    mouse: Option<[f64; 2]>,
}

impl ParticleField {
    // Viewport width below which the sparse particle count is used.
    pub const NARROW_BREAKPOINT: f64 = 768.0;
    pub const SPARSE_COUNT: u32 = 30;
    pub const DENSE_COUNT: u32 = 60;
    // Distance within which the pointer displaces nearby particles.
    pub const REPULSION_RADIUS: f64 = 200.0;
    pub const REPULSION_GAIN: f64 = 2.0;
    // Distance under which two particles are joined by a line.
    pub const CONNECTION_THRESHOLD: f64 = 150.0;

    pub fn new(width: f64, height: f64, count: u32) -> ParticleField {
        let mut field = ParticleField {
            width,
            height,
            particles: Vec::new(),
            mouse: None,
        };
        field.populate(count);
        field
    }

    pub fn count_for_viewport(viewport_width: f64) -> u32 {
        if viewport_width < Self::NARROW_BREAKPOINT {
            Self::SPARSE_COUNT
        } else {
            Self::DENSE_COUNT
        }
    }

    // Discards the whole store and refills it at the new bounds. Motion
    // state does not carry across a rebuild.
    pub fn reinitialize(&mut self, width: f64, height: f64, count: u32) {
        self.width = width;
        self.height = height;
        self.particles.clear();
        self.populate(count);
    }

    fn populate(&mut self, count: u32) {
        self.particles.reserve(count as usize);
        let mut rng = rand::thread_rng();
        for _ in 0..count {
            self.particles
                .push(Particle::spawn(&mut rng, self.width, self.height));
        }
    }

    pub fn set_mouse(&mut self, x: f64, y: f64) {
        self.mouse = Some([x, y]);
    }

    pub fn clear_mouse(&mut self) {
        self.mouse = None;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.pos = vecmath::vec2_add(particle.pos, particle.vel);
            // Bounce is a velocity sign flip only. The position is left
            // where integration put it, so a fast particle can sit just
            // outside the bounds for one frame.
            if particle.pos[0] < 0.0 || particle.pos[0] > self.width {
                particle.vel[0] *= -1.0;
            }
            if particle.pos[1] < 0.0 || particle.pos[1] > self.height {
                particle.vel[1] *= -1.0;
            }

            if let Some(mouse) = self.mouse {
                let to_mouse: Vector2<f64> = vecmath::vec2_sub(mouse, particle.pos);
                let distance = vecmath::vec2_len(to_mouse);
                // A particle exactly under the pointer has no direction
                // to be pushed in; skip it instead of dividing by zero.
                if distance > 0.0 && distance < Self::REPULSION_RADIUS {
                    let force = (Self::REPULSION_RADIUS - distance) / Self::REPULSION_RADIUS;
                    let push = vecmath::vec2_scale(
                        vecmath::vec2_normalized(to_mouse),
                        force * Self::REPULSION_GAIN,
                    );
                    // Displaces the position directly, away from the
                    // pointer. Not an impulse folded into velocity.
                    particle.pos = vecmath::vec2_sub(particle.pos, push);
                }
            }
        }
    }

    // Pairwise proximity pass over unordered pairs, self-pairs skipped.
    // O(n^2), which the fixed 30/60 counts keep cheap per frame.
    pub fn connections(&self) -> Vec<Connection> {
        let mut connections = Vec::new();
        for i in 0..self.particles.len() {
            for j in (i + 1)..self.particles.len() {
                let a = &self.particles[i];
                let b = &self.particles[j];
                let distance = vecmath::vec2_len(vecmath::vec2_sub(b.pos, a.pos));
                if distance < Self::CONNECTION_THRESHOLD {
                    connections.push(Connection {
                        from: a.pos,
                        to: b.pos,
                        strength: 1.0 - distance / Self::CONNECTION_THRESHOLD,
                    });
                }
            }
        }
        connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn still(x: f64, y: f64) -> Particle {
        Particle::new([x, y], [0.0, 0.0], 2.0)
    }

    fn field_with(width: f64, height: f64, particles: Vec<Particle>) -> ParticleField {
        ParticleField {
            width,
            height,
            particles,
            mouse: None,
        }
    }

    #[test]
    fn count_tracks_viewport_breakpoint() {
        assert_eq!(ParticleField::count_for_viewport(400.0), 30);
        assert_eq!(ParticleField::count_for_viewport(767.9), 30);
        assert_eq!(ParticleField::count_for_viewport(768.0), 60);
        assert_eq!(ParticleField::count_for_viewport(1024.0), 60);
    }

    #[test]
    fn initialization_fills_the_bounds() {
        let field = ParticleField::new(200.0, 100.0, 60);
        assert_eq!(field.particles().len(), 60);
        for p in field.particles() {
            assert!(p.pos[0] >= 0.0 && p.pos[0] < 200.0);
            assert!(p.pos[1] >= 0.0 && p.pos[1] < 100.0);
        }
    }

    #[test]
    fn reinitialize_replaces_the_store() {
        let mut field = ParticleField::new(200.0, 100.0, 60);
        field.reinitialize(50.0, 40.0, 30);
        assert_eq!(field.particles().len(), 30);
        assert_eq!(field.width(), 50.0);
        assert_eq!(field.height(), 40.0);
        for p in field.particles() {
            assert!(p.pos[0] >= 0.0 && p.pos[0] < 50.0);
            assert!(p.pos[1] >= 0.0 && p.pos[1] < 40.0);
        }
    }

    #[test]
    fn integration_adds_velocity_once_per_frame() {
        let mut field = field_with(100.0, 100.0, vec![Particle::new([10.0, 20.0], [0.25, -0.5], 1.5)]);
        field.update();
        let p = &field.particles()[0];
        assert!((p.pos[0] - 10.25).abs() < EPS);
        assert!((p.pos[1] - 19.5).abs() < EPS);
    }

    // Crossing a wall flips the velocity sign but does not clamp the
    // position, so the particle sits outside the bound for one frame.
    // That excursion is the documented behavior, not a bug.
    #[test]
    fn reflection_flips_velocity_without_clamping() {
        let mut field = field_with(100.0, 100.0, vec![Particle::new([99.9, 50.0], [0.5, 0.0], 1.0)]);
        field.update();
        {
            let p = &field.particles()[0];
            assert!((p.pos[0] - 100.4).abs() < EPS);
            assert!(p.pos[0] > field.width());
            assert!((p.vel[0] - -0.5).abs() < EPS);
        }
        // The flipped velocity brings it back inside on the next frame.
        field.update();
        let p = &field.particles()[0];
        assert!((p.pos[0] - 99.9).abs() < EPS);
        assert!((p.vel[0] - -0.5).abs() < EPS);
    }

    #[test]
    fn reflection_works_at_the_lower_bound() {
        let mut field = field_with(100.0, 100.0, vec![Particle::new([50.0, 0.1], [0.0, -0.4], 1.0)]);
        field.update();
        let p = &field.particles()[0];
        assert!(p.pos[1] < 0.0);
        assert!((p.vel[1] - 0.4).abs() < EPS);
    }

    #[test]
    fn repulsion_displaces_away_from_the_mouse() {
        let mut field = field_with(400.0, 200.0, vec![still(150.0, 100.0)]);
        field.set_mouse(100.0, 100.0);
        field.update();
        let p = &field.particles()[0];
        // distance 50 inside the 200 radius: push = (200 - 50)/200 * 2
        assert!((p.pos[0] - 151.5).abs() < EPS);
        assert!((p.pos[1] - 100.0).abs() < EPS);
        // Positional displacement only, velocity untouched.
        assert!((p.vel[0]).abs() < EPS);
        assert!((p.vel[1]).abs() < EPS);
    }

    #[test]
    fn repulsion_ignores_particles_outside_the_radius() {
        let mut field = field_with(600.0, 200.0, vec![still(350.0, 100.0)]);
        field.set_mouse(100.0, 100.0);
        field.update();
        let p = &field.particles()[0];
        assert!((p.pos[0] - 350.0).abs() < EPS);
    }

    #[test]
    fn repulsion_requires_a_mouse_position() {
        let mut field = field_with(400.0, 200.0, vec![still(150.0, 100.0)]);
        field.update();
        assert!((field.particles()[0].pos[0] - 150.0).abs() < EPS);

        field.set_mouse(100.0, 100.0);
        field.clear_mouse();
        field.update();
        assert!((field.particles()[0].pos[0] - 150.0).abs() < EPS);
    }

    // Zero distance has no direction to push in; the guard must skip
    // the displacement entirely rather than produce NaN.
    #[test]
    fn repulsion_skips_a_particle_under_the_pointer() {
        let mut field = field_with(400.0, 200.0, vec![still(100.0, 100.0)]);
        field.set_mouse(100.0, 100.0);
        field.update();
        let p = &field.particles()[0];
        assert!((p.pos[0] - 100.0).abs() < EPS);
        assert!((p.pos[1] - 100.0).abs() < EPS);
        assert!(p.pos[0].is_finite() && p.pos[1].is_finite());
    }

    #[test]
    fn size_never_changes_across_frames() {
        let mut field = ParticleField::new(300.0, 200.0, 30);
        let sizes: Vec<f64> = field.particles().iter().map(|p| p.size()).collect();
        field.set_mouse(150.0, 100.0);
        for _ in 0..300 {
            field.update();
        }
        for (p, size) in field.particles().iter().zip(&sizes) {
            assert_eq!(p.size(), *size);
            assert!(p.pos[0].is_finite() && p.pos[1].is_finite());
        }
    }

    #[test]
    fn connections_join_exactly_the_close_pairs() {
        let field = field_with(
            600.0,
            100.0,
            vec![still(0.0, 0.0), still(100.0, 0.0), still(300.0, 0.0)],
        );
        let connections = field.connections();
        // Only the (0, 1) pair is under the threshold; 150 apart or
        // more draws nothing.
        assert_eq!(connections.len(), 1);
        assert!((connections[0].strength - 1.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn connection_strength_fades_to_zero_at_the_threshold() {
        let at = |d: f64| {
            let field = field_with(600.0, 100.0, vec![still(0.0, 0.0), still(d, 0.0)]);
            field.connections()
        };
        let near = at(50.0);
        let far = at(100.0);
        assert!(near[0].strength > far[0].strength);
        assert!((near[0].strength - 2.0 / 3.0).abs() < EPS);

        // Just under the threshold the strength approaches zero.
        let edge = at(149.999);
        assert!(edge[0].strength > 0.0);
        assert!(edge[0].strength < 1e-4);

        // At the threshold exactly, no line at all.
        assert!(at(150.0).is_empty());
    }
}
