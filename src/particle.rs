// Simple particle struct to keep track of individual position, velocity, and size

use rand::Rng;

#[derive(Copy, Clone)]
pub struct Particle {
    pub pos: [f64; 2],
    pub vel: [f64; 2],
    size: f64,
}

impl Particle {
    pub const MIN_SIZE: f64 = 1.0;
    pub const MAX_SIZE: f64 = 3.0;

    pub fn new(pos: [f64; 2], vel: [f64; 2], size: f64) -> Particle {
        Particle { pos, vel, size }
    }

    // Uniform random position inside the bounds, drift velocity in
    // [-0.5, 0.5) per axis, size in [MIN_SIZE, MAX_SIZE).
    pub fn spawn(rng: &mut impl Rng, width: f64, height: f64) -> Particle {
        Particle {
            pos: [rng.gen::<f64>() * width, rng.gen::<f64>() * height],
            vel: [rng.gen::<f64>() - 0.5, rng.gen::<f64>() - 0.5],
            size: Self::MIN_SIZE + rng.gen::<f64>() * (Self::MAX_SIZE - Self::MIN_SIZE),
        }
    }

    // Size is fixed at creation, so no setter.
    pub fn size(&self) -> f64 {
        self.size
    }
}
