use rand_core::CryptoRngCore;
use tracing::{debug, warn};

use super::{Opening, OpeningMode, RangeProof, RANGE_DOMAIN};
use crate::protocol::{vectors, InnerProductProof, Parameters, Statement, Transcript, Witness};
use crate::{Error, Group, Result};

/// Prover for the aggregated range proof.
///
/// # Security
///
/// - Always use [`SecureRng`](crate::SecureRng) for randomness generation
/// - Every call to [`Prover::prove`] samples fresh blinding vectors
/// - Bind proofs to a session with [`Prover::prove_with_transcript`]
pub struct Prover<G: Group> {
    params: Parameters<G>,
    witness: Witness<G>,
    statement: Statement<G>,
    mode: OpeningMode,
}

impl<G: Group> Prover<G> {
    /// Creates a prover; the statement is computed from the witness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the witness does not hold
    /// exactly [`Parameters::secret_count`] values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use budget_zkp::{Parameters, RangeProver, Ristretto255, SecureRng, Witness};
    ///
    /// let mut rng = SecureRng::new();
    /// let params = Parameters::<Ristretto255>::new(4, 16).unwrap();
    /// let witness = Witness::random(vec![10, 20, 30, 40], &mut rng);
    ///
    /// let prover = RangeProver::new(params, witness).unwrap();
    /// let proof = prover.prove(&mut rng).unwrap();
    /// ```
    pub fn new(params: Parameters<G>, witness: Witness<G>) -> Result<Self> {
        let statement = Statement::from_witness(&params, &witness);
        Self::with_statement(params, witness, statement)
    }

    /// Creates a prover from an existing statement and witness.
    ///
    /// # Security
    ///
    /// The caller must ensure the statement was correctly computed from the
    /// witness; otherwise the proof will not verify.
    pub fn with_statement(
        params: Parameters<G>,
        witness: Witness<G>,
        statement: Statement<G>,
    ) -> Result<Self> {
        let n = params.secret_count();
        if witness.len() != n {
            return Err(Error::dimension("range witness", n, witness.len()));
        }
        if statement.len() != n {
            return Err(Error::dimension("range statement", n, statement.len()));
        }
        Ok(Self {
            params,
            witness,
            statement,
            mode: OpeningMode::default(),
        })
    }

    /// Selects how `l(x)` and `r(x)` are opened.
    pub fn with_opening(mut self, mode: OpeningMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the public statement.
    pub fn statement(&self) -> &Statement<G> {
        &self.statement
    }

    /// Generates a non-interactive range proof using Fiat-Shamir.
    pub fn prove<R: CryptoRngCore>(&self, rng: &mut R) -> Result<RangeProof<G>> {
        let mut transcript = Transcript::new(RANGE_DOMAIN);
        self.prove_with_transcript(rng, &mut transcript)
    }

    /// Generates a proof using a custom transcript.
    ///
    /// The verifier must start from an identically prepared transcript.
    pub fn prove_with_transcript<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        transcript: &mut Transcript,
    ) -> Result<RangeProof<G>> {
        let n = self.params.secret_count();
        let bits = self.params.bit_width();
        let capacity = self.params.capacity();

        if bits < 64 && self.witness.values().iter().any(|&v| v >> bits != 0) {
            warn!(bit_width = bits, "witness value out of range; proof will not verify");
        }

        super::append_statement(transcript, &self.params, &self.statement);

        let one = G::scalar_one();
        let a_l: Vec<_> = self
            .witness
            .values()
            .iter()
            .flat_map(|&v| vectors::bit_decompose::<G>(v, bits))
            .collect();
        let a_r = vectors::offset::<G>(&a_l, &G::scalar_negate(&one));

        let alpha = G::random_scalar(rng);
        let a = self.params.vector_commit(&alpha, &a_l, &a_r)?;

        let s_l: Vec<_> = (0..capacity).map(|_| G::random_scalar(rng)).collect();
        let s_r: Vec<_> = (0..capacity).map(|_| G::random_scalar(rng)).collect();
        let rho = G::random_scalar(rng);
        let s = self.params.vector_commit(&rho, &s_l, &s_r)?;

        let super::BitChallenges { y, z } = super::bit_challenges::<G>(transcript, &a, &s);
        debug!(group = G::name(), n, bits, "derived range challenges y, z");

        // l(X) = l0 + l1·X, r(X) = r0 + r1·X
        let y_pow = vectors::powers::<G>(&y, capacity);
        let l0 = vectors::offset::<G>(&a_l, &G::scalar_negate(&z));
        let l1 = s_l;
        let r0 = vectors::add::<G>(
            &vectors::hadamard::<G>(&y_pow, &vectors::offset::<G>(&a_r, &z))?,
            &super::block_offsets::<G>(&z, n, bits),
        )?;
        let r1 = vectors::hadamard::<G>(&y_pow, &s_r)?;

        let t1 = G::scalar_add(
            &vectors::inner_product::<G>(&l0, &r1)?,
            &vectors::inner_product::<G>(&l1, &r0)?,
        );
        let t2 = vectors::inner_product::<G>(&l1, &r1)?;

        let tau1 = G::random_scalar(rng);
        let tau2 = G::random_scalar(rng);
        let t1_commit = self.params.commit(&t1, &tau1);
        let t2_commit = self.params.commit(&t2, &tau2);

        let x = super::evaluation_challenge::<G>(transcript, &t1_commit, &t2_commit);

        let l = vectors::add::<G>(&l0, &vectors::scale::<G>(&l1, &x))?;
        let r = vectors::add::<G>(&r0, &vectors::scale::<G>(&r1, &x))?;
        let t_hat = vectors::inner_product::<G>(&l, &r)?;

        let x_sq = G::scalar_mul_scalar(&x, &x);
        let blinding_terms = vectors::inner_product::<G>(
            &super::value_weights::<G>(&z, n),
            self.witness.blindings(),
        )?;
        let tau_x = G::scalar_add(
            &G::scalar_add(
                &G::scalar_mul_scalar(&tau2, &x_sq),
                &G::scalar_mul_scalar(&tau1, &x),
            ),
            &blinding_terms,
        );
        let mu = G::scalar_add(&alpha, &G::scalar_mul_scalar(&rho, &x));

        super::append_evaluation::<G>(transcript, &tau_x, &mu, &t_hat);

        let opening = match self.mode {
            OpeningMode::Explicit => Opening::Explicit { l, r },
            OpeningMode::InnerProduct => {
                let w = transcript.challenge_nonzero::<G>(b"w");
                let u = G::scalar_mul(self.params.u(), &w);
                let h_prime = rescaled_h::<G>(self.params.h_vec(), &y)?;
                let ipa = InnerProductProof::prove(
                    transcript,
                    &u,
                    self.params.g_vec().to_vec(),
                    h_prime,
                    l,
                    r,
                )?;
                Opening::InnerProduct(ipa)
            }
        };

        debug!(mode = ?self.mode, "range proof generated");
        Ok(RangeProof::new(
            a, s, t1_commit, t2_commit, tau_x, mu, t_hat, opening,
        ))
    }
}

/// `H'_i = H_i^{y^{-i}}`.
pub(crate) fn rescaled_h<G: Group>(h_vec: &[G::Element], y: &G::Scalar) -> Result<Vec<G::Element>> {
    let y_inv = G::scalar_invert(y)
        .ok_or_else(|| Error::InvalidScalar("Challenge y is not invertible".to_string()))?;
    Ok(vectors::powers::<G>(&y_inv, h_vec.len())
        .iter()
        .zip(h_vec)
        .map(|(e, h)| G::scalar_mul(h, e))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ristretto255, SecureRng};

    #[test]
    fn rejects_wrong_witness_length() {
        let mut rng = SecureRng::new();
        let params = Parameters::<Ristretto255>::new(4, 8).unwrap();
        let witness = Witness::random(vec![1, 2, 3], &mut rng);
        assert!(matches!(
            Prover::new(params, witness),
            Err(Error::DimensionMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn explicit_opening_satisfies_t_hat() {
        let mut rng = SecureRng::new();
        let params = Parameters::<Ristretto255>::new(2, 8).unwrap();
        let witness = Witness::random(vec![7, 200], &mut rng);
        let proof = Prover::new(params, witness)
            .unwrap()
            .with_opening(OpeningMode::Explicit)
            .prove(&mut rng)
            .unwrap();

        match proof.opening() {
            Opening::Explicit { l, r } => {
                assert_eq!(l.len(), 16);
                assert_eq!(
                    &vectors::inner_product::<Ristretto255>(l, r).unwrap(),
                    proof.t_hat()
                );
            }
            Opening::InnerProduct(_) => panic!("expected explicit opening"),
        }
    }

    #[test]
    fn inner_product_opening_has_log_rounds() {
        let mut rng = SecureRng::new();
        let params = Parameters::<Ristretto255>::new(4, 16).unwrap();
        let witness = Witness::random(vec![10, 20, 30, 40], &mut rng);
        let proof = Prover::new(params, witness).unwrap().prove(&mut rng).unwrap();

        match proof.opening() {
            Opening::InnerProduct(ipa) => assert_eq!(ipa.rounds(), 6),
            Opening::Explicit { .. } => panic!("expected inner-product opening"),
        }
    }
}
