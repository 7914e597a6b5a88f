//! Aggregated range proof over bit decompositions.
//!
//! Proves that each of `n` Pedersen-committed values lies in `[0, 2^N)`.
//! Every value is written as `N` bits `aL` with `aR = aL - 1`; the constraints
//! `aL ∘ aR = 0`, `aL - aR = 1` and `⟨aL_j, 2^N⟩ = x_j` are folded by the
//! challenges `y` and `z` into the single polynomial identity
//! `t(X) = ⟨l(X), r(X)⟩`, which is checked at a random point `x`.
//!
//! The final opening of `l(x)`, `r(x)` is either sent in the clear or
//! compressed by the [inner-product argument](crate::InnerProductProof).

mod proof;
mod prover;
mod verifier;

pub use proof::{Opening, OpeningMode, RangeProof};
pub use prover::Prover;
pub use verifier::Verifier;

use super::{vectors, Parameters, Statement, Transcript};
use crate::Group;

/// Transcript domain for range proofs.
pub const RANGE_DOMAIN: &[u8] = b"range-proof";

/// Challenges drawn after `A` and `S`.
pub(crate) struct BitChallenges<G: Group> {
    pub(crate) y: G::Scalar,
    pub(crate) z: G::Scalar,
}

pub(crate) fn append_statement<G: Group>(
    transcript: &mut Transcript,
    params: &Parameters<G>,
    statement: &Statement<G>,
) {
    params.append_to_transcript(transcript);
    statement.append_to_transcript(transcript);
}

pub(crate) fn bit_challenges<G: Group>(
    transcript: &mut Transcript,
    a: &G::Element,
    s: &G::Element,
) -> BitChallenges<G> {
    transcript.append_element::<G>(b"A", a);
    transcript.append_element::<G>(b"S", s);
    // y - 1 and z - 1 are denominators of delta's closed form.
    let y = transcript.challenge_nonzero_not_one::<G>(b"y");
    let z = transcript.challenge_nonzero_not_one::<G>(b"z");
    BitChallenges { y, z }
}

pub(crate) fn evaluation_challenge<G: Group>(
    transcript: &mut Transcript,
    t1: &G::Element,
    t2: &G::Element,
) -> G::Scalar {
    transcript.append_element::<G>(b"T1", t1);
    transcript.append_element::<G>(b"T2", t2);
    transcript.challenge_nonzero::<G>(b"x")
}

pub(crate) fn append_evaluation<G: Group>(
    transcript: &mut Transcript,
    tau_x: &G::Scalar,
    mu: &G::Scalar,
    t_hat: &G::Scalar,
) {
    transcript.append_scalar::<G>(b"tau_x", tau_x);
    transcript.append_scalar::<G>(b"mu", mu);
    transcript.append_scalar::<G>(b"t_hat", t_hat);
}

/// `z^{2+j}` for each value index `j`.
pub(crate) fn value_weights<G: Group>(z: &G::Scalar, secret_count: usize) -> Vec<G::Scalar> {
    let z_sq = G::scalar_mul_scalar(z, z);
    vectors::scale::<G>(&vectors::powers::<G>(z, secret_count), &z_sq)
}

/// `d_i = z^{2+j} · 2^{i mod N}` where `j = i / N` is the block of bit `i`.
pub(crate) fn block_offsets<G: Group>(
    z: &G::Scalar,
    secret_count: usize,
    bit_width: usize,
) -> Vec<G::Scalar> {
    let two_powers = vectors::powers::<G>(&G::scalar_from_u64(2), bit_width);
    value_weights::<G>(z, secret_count)
        .iter()
        .flat_map(|w| vectors::scale::<G>(&two_powers, w))
        .collect()
}

/// `δ(y, z) = (z - z²)·⟨1, y^K⟩ - Σ_j z^{3+j}·⟨1, 2^N⟩`.
pub(crate) fn delta<G: Group>(
    y: &G::Scalar,
    z: &G::Scalar,
    secret_count: usize,
    bit_width: usize,
) -> G::Scalar {
    let capacity = secret_count * bit_width;
    let z_sq = G::scalar_mul_scalar(z, z);
    let z_cu = G::scalar_mul_scalar(&z_sq, z);

    let sum_y = vectors::geometric_sum::<G>(y, capacity);
    let sum_z = vectors::geometric_sum::<G>(z, secret_count);
    let sum_two = vectors::geometric_sum::<G>(&G::scalar_from_u64(2), bit_width);

    let first = G::scalar_mul_scalar(&G::scalar_sub(z, &z_sq), &sum_y);
    let second = G::scalar_mul_scalar(&G::scalar_mul_scalar(&z_cu, &sum_z), &sum_two);
    G::scalar_sub(&first, &second)
}
