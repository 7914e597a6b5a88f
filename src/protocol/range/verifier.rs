use tracing::debug;

use super::prover::rescaled_h;
use super::{Opening, RangeProof, RANGE_DOMAIN};
use crate::protocol::{vectors, Parameters, Statement, Transcript};
use crate::{Error, Group, Result};

/// Verifier for the aggregated range proof.
pub struct Verifier<G: Group> {
    params: Parameters<G>,
    statement: Statement<G>,
}

impl<G: Group> Verifier<G> {
    /// Creates a verifier for `statement` under `params`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the statement does not hold
    /// one commitment per secret.
    pub fn new(params: Parameters<G>, statement: Statement<G>) -> Result<Self> {
        if statement.len() != params.secret_count() {
            return Err(Error::dimension(
                "range statement",
                params.secret_count(),
                statement.len(),
            ));
        }
        Ok(Self { params, statement })
    }

    /// Verifies a non-interactive range proof.
    ///
    /// Returns `Ok(true)` if every committed value lies in `[0, 2^N)`,
    /// `Ok(false)` if any verification equation fails.
    pub fn verify(&self, proof: &RangeProof<G>) -> Result<bool> {
        let mut transcript = Transcript::new(RANGE_DOMAIN);
        self.verify_with_transcript(proof, &mut transcript)
    }

    /// Verifies a proof using a custom transcript.
    ///
    /// The transcript must match the one used during proof generation.
    pub fn verify_with_transcript(
        &self,
        proof: &RangeProof<G>,
        transcript: &mut Transcript,
    ) -> Result<bool> {
        self.statement.validate()?;

        let n = self.params.secret_count();
        let bits = self.params.bit_width();
        let capacity = self.params.capacity();

        super::append_statement(transcript, &self.params, &self.statement);
        let super::BitChallenges { y, z } =
            super::bit_challenges::<G>(transcript, &proof.a, &proof.s);
        let x = super::evaluation_challenge::<G>(transcript, &proof.t1, &proof.t2);
        super::append_evaluation::<G>(transcript, &proof.tau_x, &proof.mu, &proof.t_hat);

        if !self.check_polynomial(proof, &y, &z, &x) {
            debug!(group = G::name(), "range proof polynomial check failed");
            return Ok(false);
        }

        // P = A · S^x · Π G_i^{-z} · Π H_i^{z + d_i·y^{-i}}
        let y_inv = G::scalar_invert(&y)
            .ok_or_else(|| Error::InvalidScalar("Challenge y is not invertible".to_string()))?;
        let y_inv_pow = vectors::powers::<G>(&y_inv, capacity);
        let offsets = super::block_offsets::<G>(&z, n, bits);
        let h_exponents = vectors::offset::<G>(&vectors::hadamard::<G>(&offsets, &y_inv_pow)?, &z);
        let neg_z = G::scalar_negate(&z);

        let scalars: Vec<_> = [G::scalar_one(), x]
            .into_iter()
            .chain(core::iter::repeat(neg_z).take(capacity))
            .chain(h_exponents)
            .collect();
        let elements: Vec<_> = [proof.a.clone(), proof.s.clone()]
            .into_iter()
            .chain(self.params.g_vec().iter().cloned())
            .chain(self.params.h_vec().iter().cloned())
            .collect();
        let p = vectors::multiexp::<G>(&scalars, &elements)?;

        let accepted = match &proof.opening {
            Opening::Explicit { l, r } => {
                if l.len() != capacity || r.len() != capacity {
                    debug!(expected = capacity, "explicit opening has wrong length");
                    return Ok(false);
                }
                let t_matches = vectors::inner_product::<G>(l, r)? == proof.t_hat;

                let r_scaled = vectors::hadamard::<G>(r, &y_inv_pow)?;
                let opened = vectors::multiexp::<G>(
                    &[&[proof.mu.clone()][..], &l[..], &r_scaled[..]].concat(),
                    &[
                        &[self.params.h().clone()][..],
                        self.params.g_vec(),
                        self.params.h_vec(),
                    ]
                    .concat(),
                )?;
                t_matches && opened == p
            }
            Opening::InnerProduct(_) if !capacity.is_power_of_two() => {
                debug!(capacity, "inner-product opening needs a power-of-two length");
                return Ok(false);
            }
            Opening::InnerProduct(ipa) => {
                let w = transcript.challenge_nonzero::<G>(b"w");
                let u = G::scalar_mul(self.params.u(), &w);
                // P · h^{-μ} · u^{t̂}
                let p_ipa = G::multiscalar_mul(
                    &[G::scalar_one(), G::scalar_negate(&proof.mu), proof.t_hat.clone()],
                    &[p, self.params.h().clone(), u.clone()],
                );
                let h_prime = rescaled_h::<G>(self.params.h_vec(), &y)?;
                ipa.verify(transcript, &u, &p_ipa, self.params.g_vec(), &h_prime)?
            }
        };

        if !accepted {
            debug!(
                group = G::name(),
                mode = ?proof.opening.mode(),
                "range proof opening check failed"
            );
        }
        Ok(accepted)
    }

    /// `g^{t̂} · h^{τx} == g^{δ(y,z)} · T1^x · T2^{x²} · Π c_j^{z^{2+j}}`.
    fn check_polynomial(
        &self,
        proof: &RangeProof<G>,
        y: &G::Scalar,
        z: &G::Scalar,
        x: &G::Scalar,
    ) -> bool {
        let n = self.params.secret_count();
        let lhs = self.params.commit(&proof.t_hat, &proof.tau_x);

        let delta = super::delta::<G>(y, z, n, self.params.bit_width());
        let x_sq = G::scalar_mul_scalar(x, x);
        let scalars: Vec<_> = [delta, x.clone(), x_sq]
            .into_iter()
            .chain(super::value_weights::<G>(z, n))
            .collect();
        let elements: Vec<_> = [
            self.params.g().clone(),
            proof.t1.clone(),
            proof.t2.clone(),
        ]
        .into_iter()
        .chain(self.statement.commitments().iter().cloned())
        .collect();

        lhs == G::multiscalar_mul(&scalars, &elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::range::{OpeningMode, Prover};
    use crate::protocol::{InnerProductProof, Witness};
    use crate::{Ristretto255, SecureRng, P256};

    fn round_trip<G: Group>(values: Vec<u64>, bits: usize, mode: OpeningMode) -> bool {
        let mut rng = SecureRng::new();
        let params = Parameters::<G>::new(values.len(), bits).unwrap();
        let witness = Witness::random(values, &mut rng);
        let prover = Prover::new(params.clone(), witness)
            .unwrap()
            .with_opening(mode);
        let proof = prover.prove(&mut rng).unwrap();
        Verifier::new(params, prover.statement().clone())
            .unwrap()
            .verify(&proof)
            .unwrap()
    }

    #[test]
    fn accepts_in_range_values_both_modes() {
        assert!(round_trip::<Ristretto255>(vec![0, 255], 8, OpeningMode::Explicit));
        assert!(round_trip::<Ristretto255>(vec![0, 255], 8, OpeningMode::InnerProduct));
        assert!(round_trip::<P256>(vec![5], 4, OpeningMode::InnerProduct));
    }

    #[test]
    fn rejects_out_of_range_value() {
        assert!(!round_trip::<Ristretto255>(vec![3, 256], 8, OpeningMode::Explicit));
        assert!(!round_trip::<Ristretto255>(vec![3, 256], 8, OpeningMode::InnerProduct));
    }

    #[test]
    fn rejects_swapped_statement() {
        let mut rng = SecureRng::new();
        let params = Parameters::<Ristretto255>::new(2, 8).unwrap();
        let prover = Prover::new(params.clone(), Witness::random(vec![1, 2], &mut rng)).unwrap();
        let proof = prover.prove(&mut rng).unwrap();

        let mut commitments = prover.statement().commitments().to_vec();
        commitments.swap(0, 1);
        let verifier = Verifier::new(params, Statement::new(commitments)).unwrap();
        assert!(!verifier.verify(&proof).unwrap());
    }

    #[test]
    fn inner_product_opening_rejected_for_odd_capacity() {
        let mut rng = SecureRng::new();
        let params = Parameters::<Ristretto255>::new(3, 16).unwrap();
        let prover = Prover::new(params.clone(), Witness::random(vec![1, 2, 3], &mut rng))
            .unwrap()
            .with_opening(OpeningMode::Explicit);
        let mut proof = prover.prove(&mut rng).unwrap();

        let u = Ristretto255::hash_to_element(b"u");
        let g = vec![Ristretto255::hash_to_element(b"g")];
        let h = vec![Ristretto255::hash_to_element(b"h")];
        let one = vec![Ristretto255::scalar_one()];
        let ipa =
            InnerProductProof::prove(&mut Transcript::new(b"ipa"), &u, g, h, one.clone(), one)
                .unwrap();
        proof.opening = Opening::InnerProduct(ipa);

        let bytes = proof.to_bytes();
        let received = RangeProof::<Ristretto255>::from_bytes(&bytes).unwrap();
        let verifier = Verifier::new(params, prover.statement().clone()).unwrap();
        assert!(!verifier.verify(&received).unwrap());
    }

    #[test]
    fn statement_length_is_checked() {
        let params = Parameters::<Ristretto255>::new(2, 8).unwrap();
        let statement = Statement::new(vec![Ristretto255::hash_to_element(b"c")]);
        assert!(Verifier::new(params, statement).is_err());
    }
}
