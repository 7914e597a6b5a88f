//! Randomness source for nonces, blindings and blinding vectors.

use rand_core::{CryptoRng, OsRng, RngCore};

use super::Group;

/// Cryptographically secure random number generator.
///
/// Wraps `OsRng`, so every draw goes back to the operating system; no
/// generator state survives between proof runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecureRng(OsRng);

impl SecureRng {
    /// Creates a new cryptographically secure random number generator.
    pub fn new() -> Self {
        Self(OsRng)
    }

    /// Samples one uniform scalar of `G`.
    pub fn scalar<G: Group>(&mut self) -> G::Scalar {
        G::random_scalar(self)
    }

    /// Samples a vector of `len` independent uniform scalars.
    pub fn scalars<G: Group>(&mut self, len: usize) -> Vec<G::Scalar> {
        (0..len).map(|_| G::random_scalar(self)).collect()
    }
}

impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.0.try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ristretto255;

    #[test]
    fn scalars_have_requested_length() {
        let mut rng = SecureRng::new();
        let v = rng.scalars::<Ristretto255>(5);
        assert_eq!(v.len(), 5);
        assert_ne!(v[0], v[1]);
    }

    #[test]
    fn consecutive_draws_differ() {
        let mut rng = SecureRng::new();
        let a = rng.scalar::<Ristretto255>();
        let b = rng.scalar::<Ristretto255>();
        assert_ne!(a, b);
    }
}
