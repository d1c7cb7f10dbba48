//! Sampling helpers shared by genome construction and the lifecycle step.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f32::consts::TAU;

/// Draws from `N(mean, std_dev)`; a non-positive deviation yields `mean`.
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f32, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return mean;
    }
    match Normal::new(mean, std_dev) {
        Ok(normal) => normal.sample(rng),
        Err(_) => mean,
    }
}

/// Uniform heading in `[0, 2π)`.
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..TAU)
}
