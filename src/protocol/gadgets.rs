//! Protocol gadgets shared by the range and linear-relation proofs.
//!
//! This module contains the public generator set with the Pedersen
//! commitment scheme over it, the prover's secret witness, and the public
//! statement of commitments.

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{vectors, Transcript};
use crate::{Error, Group, Result};

/// Prefix of every generator label passed to hash-to-group.
const GENERATOR_LABEL_PREFIX: &str = "budget-zkp/generator";

/// Largest supported bit width (values are `u64`).
pub const MAX_BIT_WIDTH: usize = 64;

fn generator(label: &str) -> Vec<u8> {
    format!("{GENERATOR_LABEL_PREFIX}/{label}").into_bytes()
}

/// Public parameters: singleton generators `g`, `h`, `u` and the vector
/// generators `G`, `H` of length `n·N`.
///
/// All generators are derived with [`Group::hash_to_element`] from distinct
/// labels, so nobody knows a discrete log relation between any two of them.
#[derive(Clone, Debug)]
pub struct Parameters<G: Group> {
    g: G::Element,
    h: G::Element,
    u: G::Element,
    g_vec: Vec<G::Element>,
    h_vec: Vec<G::Element>,
    secret_count: usize,
    bit_width: usize,
}

impl<G: Group> Parameters<G> {
    /// Derives parameters for `secret_count` values of `bit_width` bits each.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if `secret_count` is zero, if
    /// `bit_width` is outside `1..=64`, or if a derived generator is the
    /// identity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use budget_zkp::{Parameters, Ristretto255};
    ///
    /// let params = Parameters::<Ristretto255>::new(4, 16).unwrap();
    /// assert_eq!(params.capacity(), 64);
    /// ```
    pub fn new(secret_count: usize, bit_width: usize) -> Result<Self> {
        if secret_count == 0 {
            return Err(Error::InvalidParams(
                "At least one secret is required".to_string(),
            ));
        }
        if bit_width == 0 || bit_width > MAX_BIT_WIDTH {
            return Err(Error::InvalidParams(format!(
                "Bit width must be in 1..={MAX_BIT_WIDTH}, got {bit_width}"
            )));
        }

        let capacity = secret_count
            .checked_mul(bit_width)
            .ok_or_else(|| Error::InvalidParams("Generator count overflows".to_string()))?;

        let g = G::hash_to_element(&generator("g"));
        let h = G::hash_to_element(&generator("h"));
        let u = G::hash_to_element(&generator("u"));
        let g_vec: Vec<_> = (0..capacity)
            .map(|i| G::hash_to_element(&generator(&format!("G/{i}"))))
            .collect();
        let h_vec: Vec<_> = (0..capacity)
            .map(|i| G::hash_to_element(&generator(&format!("H/{i}"))))
            .collect();

        for element in [&g, &h, &u].into_iter().chain(&g_vec).chain(&h_vec) {
            G::validate_element(element)?;
            if G::is_identity(element) {
                return Err(Error::InvalidParams(
                    "Derived generator is the identity".to_string(),
                ));
            }
        }

        Ok(Self {
            g,
            h,
            u,
            g_vec,
            h_vec,
            secret_count,
            bit_width,
        })
    }

    /// Returns the value generator `g`.
    pub fn g(&self) -> &G::Element {
        &self.g
    }

    /// Returns the blinding generator `h`.
    pub fn h(&self) -> &G::Element {
        &self.h
    }

    /// Returns the inner-product generator `u`.
    pub fn u(&self) -> &G::Element {
        &self.u
    }

    /// Returns the vector generators `G`.
    pub fn g_vec(&self) -> &[G::Element] {
        &self.g_vec
    }

    /// Returns the vector generators `H`.
    pub fn h_vec(&self) -> &[G::Element] {
        &self.h_vec
    }

    /// Number of committed secrets `n`.
    pub fn secret_count(&self) -> usize {
        self.secret_count
    }

    /// Bit width `N` of the range `[0, 2^N)`.
    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    /// Length `n·N` of the vector generators.
    pub fn capacity(&self) -> usize {
        self.g_vec.len()
    }

    /// Pedersen commitment `g^value · h^blinding`.
    pub fn commit(&self, value: &G::Scalar, blinding: &G::Scalar) -> G::Element {
        G::multiscalar_mul(
            &[value.clone(), blinding.clone()],
            &[self.g.clone(), self.h.clone()],
        )
    }

    /// Bilateral vector commitment `h^blinding · Π G_i^{a_i} · Π H_i^{b_i}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] unless both vectors have length
    /// [`Parameters::capacity`].
    pub fn vector_commit(
        &self,
        blinding: &G::Scalar,
        a: &[G::Scalar],
        b: &[G::Scalar],
    ) -> Result<G::Element> {
        if a.len() != self.capacity() {
            return Err(Error::dimension("vector commitment", self.capacity(), a.len()));
        }
        if b.len() != self.capacity() {
            return Err(Error::dimension("vector commitment", self.capacity(), b.len()));
        }

        let scalars: Vec<_> = core::iter::once(blinding.clone())
            .chain(a.iter().cloned())
            .chain(b.iter().cloned())
            .collect();
        let elements: Vec<_> = core::iter::once(self.h.clone())
            .chain(self.g_vec.iter().cloned())
            .chain(self.h_vec.iter().cloned())
            .collect();
        vectors::multiexp::<G>(&scalars, &elements)
    }

    /// Binds the group, the dimensions and the singleton generators.
    ///
    /// The vector generators follow deterministically from the dimensions.
    pub(crate) fn append_to_transcript(&self, transcript: &mut Transcript) {
        transcript.append_group_name(G::name());
        transcript.append_u64(b"n", self.secret_count as u64);
        transcript.append_u64(b"N", self.bit_width as u64);
        transcript.append_element::<G>(b"g", &self.g);
        transcript.append_element::<G>(b"h", &self.h);
        transcript.append_element::<G>(b"u", &self.u);
    }
}

/// Secret witness: the committed values and their blindings.
///
/// # Security
///
/// - The witness is automatically zeroized when dropped
/// - It never appears in any proof encoding
/// - Blindings must be fresh and uniform; use [`Witness::random`]
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct Witness<G: Group> {
    values: Vec<u64>,
    blindings: Vec<G::Scalar>,
}

impl<G: Group> Witness<G> {
    /// Creates a witness from values and matching blindings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the lengths differ.
    pub fn new(values: Vec<u64>, blindings: Vec<G::Scalar>) -> Result<Self> {
        if values.len() != blindings.len() {
            return Err(Error::dimension(
                "witness blindings",
                values.len(),
                blindings.len(),
            ));
        }
        Ok(Self { values, blindings })
    }

    /// Creates a witness with fresh uniform blindings.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use budget_zkp::{Ristretto255, SecureRng, Witness};
    ///
    /// let mut rng = SecureRng::new();
    /// let witness = Witness::<Ristretto255>::random(vec![10, 20, 30, 40], &mut rng);
    /// assert_eq!(witness.len(), 4);
    /// ```
    pub fn random<R: CryptoRngCore>(values: Vec<u64>, rng: &mut R) -> Self {
        let blindings = values.iter().map(|_| G::random_scalar(rng)).collect();
        Self { values, blindings }
    }

    /// Number of committed values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the witness holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn values(&self) -> &[u64] {
        &self.values
    }

    pub(crate) fn blindings(&self) -> &[G::Scalar] {
        &self.blindings
    }

    pub(crate) fn value_scalars(&self) -> Vec<G::Scalar> {
        self.values.iter().map(|&v| G::scalar_from_u64(v)).collect()
    }
}

/// Public statement: one Pedersen commitment `c_i = g^{x_i} · h^{r_i}` per secret.
#[derive(Clone, Debug)]
pub struct Statement<G: Group> {
    commitments: Vec<G::Element>,
}

impl<G: Group> Statement<G> {
    /// Creates a statement from published commitments.
    pub fn new(commitments: Vec<G::Element>) -> Self {
        Self { commitments }
    }

    /// Commits to every value of the witness.
    pub fn from_witness(params: &Parameters<G>, witness: &Witness<G>) -> Self {
        let commitments = witness
            .value_scalars()
            .iter()
            .zip(witness.blindings())
            .map(|(x, r)| params.commit(x, r))
            .collect();
        Self { commitments }
    }

    /// Returns the commitments.
    pub fn commitments(&self) -> &[G::Element] {
        &self.commitments
    }

    /// Number of commitments.
    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    /// Returns `true` if there are no commitments.
    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty()
    }

    /// Validates that every commitment is in the correct subgroup.
    pub fn validate(&self) -> Result<()> {
        for c in &self.commitments {
            G::validate_element(c)?;
        }
        Ok(())
    }

    pub(crate) fn append_to_transcript(&self, transcript: &mut Transcript) {
        transcript.append_elements::<G>(b"commitments", &self.commitments);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ristretto255, SecureRng, P256};

    #[test]
    fn parameters_reject_bad_dimensions() {
        assert!(Parameters::<Ristretto255>::new(0, 16).is_err());
        assert!(Parameters::<Ristretto255>::new(4, 0).is_err());
        assert!(Parameters::<Ristretto255>::new(4, 65).is_err());
    }

    #[test]
    fn generators_are_distinct_and_deterministic() {
        let params = Parameters::<P256>::new(2, 4).unwrap();
        assert_eq!(params.capacity(), 8);
        assert_ne!(params.g(), params.h());
        assert_ne!(params.h(), params.u());
        assert_ne!(params.g_vec()[0], params.h_vec()[0]);
        assert_ne!(params.g_vec()[0], params.g_vec()[1]);

        let again = Parameters::<P256>::new(2, 4).unwrap();
        assert_eq!(params.g_vec(), again.g_vec());
    }

    #[test]
    fn vector_commit_checks_lengths() {
        let params = Parameters::<Ristretto255>::new(1, 4).unwrap();
        let zero = Ristretto255::scalar_zero();
        let short = vec![zero.clone(); 3];
        let full = vec![zero.clone(); 4];
        assert!(params.vector_commit(&zero, &short, &full).is_err());
        assert!(params.vector_commit(&zero, &full, &short).is_err());
        assert!(Ristretto255::is_identity(
            &params.vector_commit(&zero, &full, &full).unwrap()
        ));
    }

    #[test]
    fn witness_rejects_mismatched_blindings() {
        let blindings = vec![Ristretto255::scalar_one()];
        assert!(Witness::<Ristretto255>::new(vec![1, 2], blindings).is_err());
    }

    #[test]
    fn statement_matches_commitments() {
        let mut rng = SecureRng::new();
        let params = Parameters::<Ristretto255>::new(2, 8).unwrap();
        let witness = Witness::random(vec![3, 250], &mut rng);
        let statement = Statement::from_witness(&params, &witness);

        assert_eq!(statement.len(), 2);
        let expected = params.commit(
            &Ristretto255::scalar_from_u64(250),
            &witness.blindings()[1],
        );
        assert_eq!(statement.commitments()[1], expected);
        statement.validate().unwrap();
    }
}
