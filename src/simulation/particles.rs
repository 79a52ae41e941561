use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{
    ENOL_COLOR, ETA_COLOR, INITIAL_ETA, MAX_PARTICLES, PARTICLE_MAX_SPEED, PARTICLE_POOL_SIZE,
    PROD_COLOR, RESAMPLE_PERIOD,
};
use crate::simulation::kinetics::Concentrations;

/// Which species a particle stands in for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Species {
    Eta,
    Enol,
    Prod,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Eta, Species::Enol, Species::Prod];

    /// sRGB display colour
    pub fn color(self) -> [f32; 3] {
        match self {
            Species::Eta => ETA_COLOR,
            Species::Enol => ENOL_COLOR,
            Species::Prod => PROD_COLOR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Species::Eta => "ethyl acetate",
            Species::Enol => "enolate",
            Species::Prod => "ethyl acetoacetate",
        }
    }

    fn concentration(self, c: &Concentrations) -> f64 {
        match self {
            Species::Eta => c.eta,
            Species::Enol => c.enol,
            Species::Prod => c.prod,
        }
    }
}

/// Purely illustrative marker; not a simulated molecule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub species: Species,
}

/// Particle count for one species, proportional to its concentration
pub fn species_count(concentration: f64, initial_eta: f64, pool_size: usize) -> usize {
    // Saturating float-to-int cast: NaN and negatives give 0
    (pool_size as f64 * (concentration / initial_eta)).round() as usize
}

/// Counts for (EtA, Enol, Prod)
pub fn resample_counts(c: &Concentrations, initial_eta: f64, pool_size: usize) -> [usize; 3] {
    Species::ALL.map(|s| species_count(s.concentration(c), initial_eta, pool_size))
}

/// Scale counts down proportionally so their sum stays within `limit`
pub fn cap_counts(counts: [usize; 3], limit: usize) -> [usize; 3] {
    let total: f64 = counts.iter().map(|&n| n as f64).sum();
    if total <= limit as f64 {
        return counts;
    }
    let scale = limit as f64 / total;
    counts.map(|n| (n as f64 * scale).floor() as usize)
}

/// Whether the pool is regenerated on a tick at `clock`
pub fn should_resample(clock: f64) -> bool {
    (clock.floor() as i64).rem_euclid(RESAMPLE_PERIOD) == 0
}

/// Cosmetic particle pool.
///
/// Reads a concentration snapshot each tick and never writes back into the
/// kinetics. Between resamples particles keep moving with reflective walls.
pub struct ParticleAnimator {
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    rng: StdRng,
}

impl ParticleAnimator {
    /// Create an empty pool over a `width` x `height` canvas.
    /// `seed` fixes the spawn sequence; `None` draws one from the OS.
    pub fn new(width: f64, height: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            particles: Vec::with_capacity(PARTICLE_POOL_SIZE),
            width,
            height,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[allow(dead_code)]
    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Follow the canvas size. Existing particles are left where they are
    /// and find their way back through reflection.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Per-tick update: resample if due, then move every particle
    pub fn advance(&mut self, clock: f64, c: &Concentrations) {
        if self.particles.is_empty() || should_resample(clock) {
            self.resample(c);
        }
        self.step_motion();
    }

    /// Regenerate the pool from concentrations
    pub fn resample(&mut self, c: &Concentrations) {
        let wanted = resample_counts(c, INITIAL_ETA, PARTICLE_POOL_SIZE);
        let counts = cap_counts(wanted, MAX_PARTICLES);
        if counts != wanted {
            log::debug!("Particle counts {:?} capped to {:?}", wanted, counts);
        }
        self.particles.clear();
        for (species, count) in Species::ALL.into_iter().zip(counts) {
            for _ in 0..count {
                let particle = self.spawn(species);
                self.particles.push(particle);
            }
        }
        log::debug!(
            "Resampled particles: EtA {} / Enol {} / Prod {}",
            counts[0],
            counts[1],
            counts[2]
        );
    }

    fn spawn(&mut self, species: Species) -> Particle {
        let x = self.rng.gen::<f64>() * self.width;
        let y = self.rng.gen::<f64>() * self.height;
        let vx = (self.rng.gen::<f64>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED;
        let vy = (self.rng.gen::<f64>() - 0.5) * 2.0 * PARTICLE_MAX_SPEED;
        Particle {
            position: [x, y],
            velocity: [vx, vy],
            species,
        }
    }

    /// Move by velocity; flip a velocity component when its coordinate
    /// leaves the canvas
    fn step_motion(&mut self) {
        let (width, height) = (self.width, self.height);
        for p in &mut self.particles {
            p.position[0] += p.velocity[0];
            p.position[1] += p.velocity[1];
            if p.position[0] < 0.0 || p.position[0] > width {
                p.velocity[0] = -p.velocity[0];
            }
            if p.position[1] < 0.0 || p.position[1] > height {
                p.velocity[1] = -p.velocity[1];
            }
        }
    }
}
