//! Recursive inner-product argument.
//!
//! Proves that `P = Π G_i^{a_i} · Π H_i^{b_i} · u^{⟨a, b⟩}` using `2·log2(K)`
//! group elements and two scalars. Each round halves the vectors: the prover
//! sends cross terms `L`, `R`, both sides fold generators with the round
//! challenge `x`, and the commitment is updated as `P' = L^{x²} · P · R^{x^{-2}}`.
//! After the last round the verifier checks `P == G_0^a · H_0^b · u^{ab}`.

use tracing::{debug, trace};

use super::codec::{Reader, Writer, MAX_SEQUENCE_LEN};
use super::{vectors, Transcript};
use crate::{Error, Group, Result};

/// Largest number of folding rounds an encoded proof may carry.
const MAX_ROUNDS: usize = 32;

fn round_count(len: usize) -> Result<usize> {
    if len == 0 || !len.is_power_of_two() {
        return Err(Error::InvalidParams(format!(
            "Inner-product length must be a nonzero power of two, got {len}"
        )));
    }
    Ok(len.trailing_zeros() as usize)
}

fn round_challenges<G: Group>(
    transcript: &mut Transcript,
    l: &G::Element,
    r: &G::Element,
) -> Result<(G::Scalar, G::Scalar)> {
    transcript.append_element::<G>(b"L", l);
    transcript.append_element::<G>(b"R", r);
    let x = transcript.challenge_nonzero::<G>(b"x");
    let x_inv = G::scalar_invert(&x)
        .ok_or_else(|| Error::InvalidScalar("Round challenge is not invertible".to_string()))?;
    Ok((x, x_inv))
}

/// Logarithmic-size opening of an inner-product commitment.
#[derive(Clone, Debug)]
pub struct InnerProductProof<G: Group> {
    l_vec: Vec<G::Element>,
    r_vec: Vec<G::Element>,
    a: G::Scalar,
    b: G::Scalar,
}

impl<G: Group> InnerProductProof<G> {
    /// Runs the prover over `(a, b)` with bases `(g_vec, h_vec, u)`.
    ///
    /// The commitment `P` itself is not needed: it is implied by the inputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the four vectors disagree in
    /// length and [`Error::InvalidParams`] if the length is not a power of two.
    pub fn prove(
        transcript: &mut Transcript,
        u: &G::Element,
        mut g_vec: Vec<G::Element>,
        mut h_vec: Vec<G::Element>,
        mut a: Vec<G::Scalar>,
        mut b: Vec<G::Scalar>,
    ) -> Result<Self> {
        let n = g_vec.len();
        for (context, len) in [
            ("inner-product H", h_vec.len()),
            ("inner-product a", a.len()),
            ("inner-product b", b.len()),
        ] {
            if len != n {
                return Err(Error::dimension(context, n, len));
            }
        }
        let rounds = round_count(n)?;
        debug!(len = n, rounds, "proving inner product");

        let mut l_vec = Vec::with_capacity(rounds);
        let mut r_vec = Vec::with_capacity(rounds);

        while a.len() > 1 {
            let half = a.len() / 2;
            let (a_lo, a_hi) = a.split_at(half);
            let (b_lo, b_hi) = b.split_at(half);
            let (g_lo, g_hi) = g_vec.split_at(half);
            let (h_lo, h_hi) = h_vec.split_at(half);

            let c_l = vectors::inner_product::<G>(a_lo, b_hi)?;
            let c_r = vectors::inner_product::<G>(a_hi, b_lo)?;

            let l = G::multiscalar_mul(
                &[&[c_l][..], a_lo, b_hi].concat(),
                &[&[u.clone()][..], g_hi, h_lo].concat(),
            );
            let r = G::multiscalar_mul(
                &[&[c_r][..], a_hi, b_lo].concat(),
                &[&[u.clone()][..], g_lo, h_hi].concat(),
            );

            let (x, x_inv) = round_challenges::<G>(transcript, &l, &r)?;
            trace!(remaining = half, "folding inner-product round");

            let a_next = vectors::fold_scalars::<G>(a_lo, a_hi, &x, &x_inv)?;
            let b_next = vectors::fold_scalars::<G>(b_lo, b_hi, &x_inv, &x)?;
            let g_next = vectors::fold_elements::<G>(g_lo, g_hi, &x_inv, &x)?;
            let h_next = vectors::fold_elements::<G>(h_lo, h_hi, &x, &x_inv)?;

            a = a_next;
            b = b_next;
            g_vec = g_next;
            h_vec = h_next;
            l_vec.push(l);
            r_vec.push(r);
        }

        Ok(Self {
            l_vec,
            r_vec,
            a: a[0].clone(),
            b: b[0].clone(),
        })
    }

    /// Verifies that `p` opens under `(g_vec, h_vec, u)`.
    ///
    /// Returns `Ok(false)` for a proof with the wrong number of rounds or a
    /// failing final equation.
    ///
    /// Neither `p` nor the generators are appended to `transcript`. The
    /// caller must have bound them (or every message they are derived from)
    /// before calling, and the prover must have started from the same
    /// transcript state.
    ///
    /// # Errors
    ///
    /// Returns an error only if the generator vectors are unusable.
    pub fn verify(
        &self,
        transcript: &mut Transcript,
        u: &G::Element,
        p: &G::Element,
        g_vec: &[G::Element],
        h_vec: &[G::Element],
    ) -> Result<bool> {
        if h_vec.len() != g_vec.len() {
            return Err(Error::dimension("inner-product H", g_vec.len(), h_vec.len()));
        }
        let rounds = round_count(g_vec.len())?;
        if self.l_vec.len() != rounds || self.r_vec.len() != rounds {
            debug!(
                expected = rounds,
                actual = self.l_vec.len(),
                "inner-product proof has wrong round count"
            );
            return Ok(false);
        }

        let mut g_vec = g_vec.to_vec();
        let mut h_vec = h_vec.to_vec();
        let mut p = p.clone();

        for (l, r) in self.l_vec.iter().zip(&self.r_vec) {
            let half = g_vec.len() / 2;
            let (x, x_inv) = round_challenges::<G>(transcript, l, r)?;
            trace!(remaining = half, "folding inner-product generators");

            let (g_lo, g_hi) = g_vec.split_at(half);
            let (h_lo, h_hi) = h_vec.split_at(half);
            let g_next = vectors::fold_elements::<G>(g_lo, g_hi, &x_inv, &x)?;
            let h_next = vectors::fold_elements::<G>(h_lo, h_hi, &x, &x_inv)?;
            g_vec = g_next;
            h_vec = h_next;

            let x_sq = G::scalar_mul_scalar(&x, &x);
            let x_inv_sq = G::scalar_mul_scalar(&x_inv, &x_inv);
            p = G::multiscalar_mul(
                &[x_sq, G::scalar_one(), x_inv_sq],
                &[l.clone(), p, r.clone()],
            );
        }

        let ab = G::scalar_mul_scalar(&self.a, &self.b);
        let expected = G::multiscalar_mul(
            &[self.a.clone(), self.b.clone(), ab],
            &[g_vec[0].clone(), h_vec[0].clone(), u.clone()],
        );
        let accepted = p == expected;
        if !accepted {
            debug!("inner-product base case failed");
        }
        Ok(accepted)
    }

    /// Number of folding rounds.
    pub fn rounds(&self) -> usize {
        self.l_vec.len()
    }

    /// Left cross terms, one per round.
    pub fn l_vec(&self) -> &[G::Element] {
        &self.l_vec
    }

    /// Right cross terms, one per round.
    pub fn r_vec(&self) -> &[G::Element] {
        &self.r_vec
    }

    /// Final folded scalars `(a, b)`.
    pub fn final_scalars(&self) -> (&G::Scalar, &G::Scalar) {
        (&self.a, &self.b)
    }

    pub(crate) fn encode(&self, w: &mut Writer) {
        w.put_len(self.l_vec.len());
        for (l, r) in self.l_vec.iter().zip(&self.r_vec) {
            w.put_element::<G>(l);
            w.put_element::<G>(r);
        }
        w.put_scalar::<G>(&self.a);
        w.put_scalar::<G>(&self.b);
    }

    pub(crate) fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let rounds = r.take_len("inner-product rounds", MAX_SEQUENCE_LEN)?;
        if rounds > MAX_ROUNDS {
            return Err(Error::MalformedProof(format!(
                "Too many inner-product rounds: {rounds}"
            )));
        }
        let mut l_vec = Vec::with_capacity(rounds);
        let mut r_vec = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            l_vec.push(r.take_element::<G>("L")?);
            r_vec.push(r.take_element::<G>("R")?);
        }
        let a = r.take_scalar::<G>("final a")?;
        let b = r.take_scalar::<G>("final b")?;
        Ok(Self {
            l_vec,
            r_vec,
            a,
            b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ristretto255, SecureRng, P256};

    struct Instance<G: Group> {
        u: G::Element,
        g_vec: Vec<G::Element>,
        h_vec: Vec<G::Element>,
        a: Vec<G::Scalar>,
        b: Vec<G::Scalar>,
        p: G::Element,
    }

    fn instance<G: Group>(len: usize) -> Instance<G> {
        let mut rng = SecureRng::new();
        let u = G::hash_to_element(b"ipa-u");
        let g_vec: Vec<_> = (0..len)
            .map(|i| G::hash_to_element(format!("ipa-G{i}").as_bytes()))
            .collect();
        let h_vec: Vec<_> = (0..len)
            .map(|i| G::hash_to_element(format!("ipa-H{i}").as_bytes()))
            .collect();
        let a = rng.scalars::<G>(len);
        let b = rng.scalars::<G>(len);
        let c = vectors::inner_product::<G>(&a, &b).unwrap();
        let p = G::multiscalar_mul(
            &[a.clone(), b.clone(), vec![c]].concat(),
            &[g_vec.clone(), h_vec.clone(), vec![u.clone()]].concat(),
        );
        Instance {
            u,
            g_vec,
            h_vec,
            a,
            b,
            p,
        }
    }

    fn prove<G: Group>(inst: &Instance<G>) -> InnerProductProof<G> {
        let mut t = Transcript::new(b"ipa-test");
        InnerProductProof::prove(
            &mut t,
            &inst.u,
            inst.g_vec.clone(),
            inst.h_vec.clone(),
            inst.a.clone(),
            inst.b.clone(),
        )
        .unwrap()
    }

    fn verify<G: Group>(proof: &InnerProductProof<G>, inst: &Instance<G>, p: &G::Element) -> bool {
        let mut t = Transcript::new(b"ipa-test");
        proof
            .verify(&mut t, &inst.u, p, &inst.g_vec, &inst.h_vec)
            .unwrap()
    }

    #[test]
    fn folds_in_log_rounds() {
        for (len, rounds) in [(1, 0), (2, 1), (8, 3), (64, 6)] {
            let inst = instance::<Ristretto255>(len);
            let proof = prove(&inst);
            assert_eq!(proof.rounds(), rounds);
            assert!(verify(&proof, &inst, &inst.p));
        }
    }

    #[test]
    fn works_over_p256() {
        let inst = instance::<P256>(4);
        let proof = prove(&inst);
        assert!(verify(&proof, &inst, &inst.p));
    }

    #[test]
    fn wrong_commitment_rejected() {
        let inst = instance::<Ristretto255>(8);
        let proof = prove(&inst);
        let shifted = Ristretto255::element_mul(&inst.p, &inst.u);
        assert!(!verify(&proof, &inst, &shifted));
    }

    #[test]
    fn verifier_must_replay_prover_transcript() {
        let inst = instance::<Ristretto255>(8);
        let proof = prove(&inst);

        let mut t = Transcript::new(b"ipa-test");
        t.append_element::<Ristretto255>(b"P", &inst.p);
        let accepted = proof
            .verify(&mut t, &inst.u, &inst.p, &inst.g_vec, &inst.h_vec)
            .unwrap();
        assert!(!accepted);
    }

    #[test]
    fn truncated_rounds_rejected() {
        let inst = instance::<Ristretto255>(8);
        let mut proof = prove(&inst);
        proof.l_vec.pop();
        proof.r_vec.pop();
        assert!(!verify(&proof, &inst, &inst.p));
    }

    #[test]
    fn non_power_of_two_is_an_error() {
        let inst = instance::<Ristretto255>(3);
        let mut t = Transcript::new(b"ipa-test");
        let result = InnerProductProof::<Ristretto255>::prove(
            &mut t,
            &inst.u,
            inst.g_vec.clone(),
            inst.h_vec.clone(),
            inst.a.clone(),
            inst.b.clone(),
        );
        assert!(matches!(result, Err(Error::InvalidParams(_))));
    }

    #[test]
    fn mismatched_lengths_are_an_error() {
        let inst = instance::<Ristretto255>(4);
        let mut t = Transcript::new(b"ipa-test");
        let result = InnerProductProof::<Ristretto255>::prove(
            &mut t,
            &inst.u,
            inst.g_vec.clone(),
            inst.h_vec[..2].to_vec(),
            inst.a.clone(),
            inst.b.clone(),
        );
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }
}
