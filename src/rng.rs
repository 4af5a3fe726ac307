//! The random source used for synthetic data, training metrics and prediction noise.
//!
//! Every function which needs randomness takes a `&mut R where R: Rng`, so callers (and tests) can
//! supply a seeded generator. A [`Session`](crate::session::Session) owns a [`ChaCha8Rng`], which
//! gives identical output on every platform for the same seed.
use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand::distributions::Standard;
use rand_chacha::ChaCha8Rng;

/// Create the session random number generator.
///
/// With no seed, the generator is seeded from OS entropy and runs are not reproducible.
pub fn new_rng(seed: Option<u64>) -> ChaCha8Rng {
    if let Some(seed) = seed {
        debug!("Using random seed {seed}");
        ChaCha8Rng::seed_from_u64(seed)
    } else {
        ChaCha8Rng::from_entropy()
    }
}

/// Draw a value uniformly from `[0, 1)`
pub fn draw_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(Standard)
}

/// Draw a value uniformly from `[low, high)`
pub fn draw_between<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + draw_unit(rng) * (high - low)
}
