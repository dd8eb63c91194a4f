//! Seeded grain for the panel backdrops.
//!
//! Each backdrop draws its noise from its own PCG32 stream, keyed by a base
//! seed and the backdrop name. The same panel therefore encodes to the same
//! bytes on every run and every thread.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// PCG32 stream for one backdrop.
#[derive(Clone)]
pub struct DeterministicRng {
    inner: Pcg32,
}

impl DeterministicRng {
    /// Stream for a raw 32-bit seed, repeated into both halves of the PCG state.
    pub fn new(seed: u32) -> Self {
        let seed64 = u64::from(seed) | (u64::from(seed) << 32);
        Self {
            inner: Pcg32::seed_from_u64(seed64),
        }
    }

    /// Stream for a named backdrop.
    pub fn for_variant(base_seed: u32, variant: &str) -> Self {
        Self::new(Self::derive_variant_seed(base_seed, variant))
    }

    /// First four bytes of BLAKE3(base_seed LE ++ variant).
    pub fn derive_variant_seed(base_seed: u32, variant: &str) -> u32 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&base_seed.to_le_bytes());
        hasher.update(variant.as_bytes());
        let b = hasher.finalize();
        let b = b.as_bytes();
        u32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Uniform offset in `[-amplitude, amplitude]`; zero for a non-positive amplitude.
    pub fn jitter(&mut self, amplitude: f64) -> f64 {
        if !(amplitude > 0.0 && amplitude.is_finite()) {
            return 0.0;
        }
        self.inner.gen_range(-amplitude..=amplitude)
    }
}
