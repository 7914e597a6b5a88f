//! Proof that committed values satisfy a public linear system `A·x = b`.
//!
//! The `m` rows are batched with powers of a challenge `ρ`:
//! `β = Σ_j b_j·ρ^j` and `α_i = Σ_j A_{j,i}·ρ^j`. By the homomorphism of
//! Pedersen commitments, `ℓ = g^β · Π c_i^{-α_i}` equals `h^{-Σ r_i·α_i}`
//! exactly when `Σ α_i·x_i = β`, so a Schnorr proof of knowledge of the
//! discrete log of `ℓ` to base `h` proves the batched relation. A false
//! system survives batching with probability at most `m / |field|`.

use rand_core::CryptoRngCore;
use tracing::{debug, warn};

use super::codec::{self, Reader, Writer};
use super::{vectors, Parameters, SchnorrProof, Statement, Transcript, Witness};
use crate::{Error, Group, Result};

/// Protocol version for serialization compatibility.
const LINEAR_PROOF_VERSION: u8 = 1;

/// Transcript domain for linear-relation proofs.
pub const LINEAR_DOMAIN: &[u8] = b"linear-relation";

/// Public system `A·x = b` over the scalar field.
#[derive(Clone, Debug)]
pub struct LinearSystem<G: Group> {
    matrix: Vec<Vec<G::Scalar>>,
    rhs: Vec<G::Scalar>,
    columns: usize,
}

impl<G: Group> LinearSystem<G> {
    /// Creates a system from its rows and right-hand side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] for an empty system and
    /// [`Error::DimensionMismatch`] if the rows are ragged or `rhs` does not
    /// have one entry per row.
    pub fn new(matrix: Vec<Vec<G::Scalar>>, rhs: Vec<G::Scalar>) -> Result<Self> {
        let columns = matrix.first().map(Vec::len).unwrap_or(0);
        if matrix.is_empty() || columns == 0 {
            return Err(Error::InvalidParams(
                "Linear system needs at least one row and one column".to_string(),
            ));
        }
        if let Some(row) = matrix.iter().find(|row| row.len() != columns) {
            return Err(Error::dimension("linear system row", columns, row.len()));
        }
        if rhs.len() != matrix.len() {
            return Err(Error::dimension("linear system rhs", matrix.len(), rhs.len()));
        }
        Ok(Self {
            matrix,
            rhs,
            columns,
        })
    }

    /// Creates a system from signed integer coefficients.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use budget_zkp::{LinearSystem, Ristretto255};
    ///
    /// let system = LinearSystem::<Ristretto255>::from_integers(
    ///     &[vec![1, 2], vec![3, -4]],
    ///     &[5, -5],
    /// )
    /// .unwrap();
    /// assert_eq!(system.rows(), 2);
    /// ```
    pub fn from_integers(matrix: &[Vec<i64>], rhs: &[i64]) -> Result<Self> {
        let matrix = matrix
            .iter()
            .map(|row| row.iter().map(|&a| vectors::scalar_from_i64::<G>(a)).collect())
            .collect();
        let rhs = rhs.iter().map(|&b| vectors::scalar_from_i64::<G>(b)).collect();
        Self::new(matrix, rhs)
    }

    /// Number of equations `m`.
    pub fn rows(&self) -> usize {
        self.matrix.len()
    }

    /// Number of unknowns `n`.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Collapses the rows with weights `ρ^j` into `(α, β)`.
    pub fn batch(&self, rho: &G::Scalar) -> (Vec<G::Scalar>, G::Scalar) {
        let alpha = (0..self.columns)
            .map(|i| {
                let column: Vec<_> = self.matrix.iter().map(|row| row[i].clone()).collect();
                vectors::evaluate_polynomial::<G>(&column, rho)
            })
            .collect();
        let beta = vectors::evaluate_polynomial::<G>(&self.rhs, rho);
        (alpha, beta)
    }

    /// Checks `A·x = b` directly.
    pub fn is_satisfied_by(&self, x: &[G::Scalar]) -> bool {
        x.len() == self.columns
            && self.matrix.iter().zip(&self.rhs).all(|(row, b)| {
                vectors::inner_product::<G>(row, x)
                    .map(|lhs| &lhs == b)
                    .unwrap_or(false)
            })
    }

    fn append_to_transcript(&self, transcript: &mut Transcript) {
        transcript.append_u64(b"rows", self.rows() as u64);
        transcript.append_u64(b"columns", self.columns as u64);
        for row in &self.matrix {
            for a in row {
                transcript.append_scalar::<G>(b"A", a);
            }
        }
        for b in &self.rhs {
            transcript.append_scalar::<G>(b"b", b);
        }
    }
}

/// `ℓ = g^β · Π c_i^{-α_i}`.
fn batched_commitment<G: Group>(
    params: &Parameters<G>,
    statement: &Statement<G>,
    alpha: &[G::Scalar],
    beta: &G::Scalar,
) -> Result<G::Element> {
    let scalars: Vec<_> = core::iter::once(beta.clone())
        .chain(alpha.iter().map(G::scalar_negate))
        .collect();
    let elements: Vec<_> = core::iter::once(params.g().clone())
        .chain(statement.commitments().iter().cloned())
        .collect();
    vectors::multiexp::<G>(&scalars, &elements)
}

/// Derives `ρ` after binding parameters, commitments and the system.
fn batching_challenge<G: Group>(
    transcript: &mut Transcript,
    params: &Parameters<G>,
    statement: &Statement<G>,
    system: &LinearSystem<G>,
) -> G::Scalar {
    params.append_to_transcript(transcript);
    statement.append_to_transcript(transcript);
    system.append_to_transcript(transcript);
    transcript.challenge_nonzero::<G>(b"rho")
}

fn check_dimensions<G: Group>(statement: &Statement<G>, system: &LinearSystem<G>) -> Result<()> {
    if system.columns() != statement.len() {
        return Err(Error::dimension(
            "linear system columns",
            statement.len(),
            system.columns(),
        ));
    }
    Ok(())
}

/// Linear-relation proof `(ℓ, u, z)`.
#[derive(Clone, Debug)]
pub struct LinearProof<G: Group> {
    version: u8,
    ell: G::Element,
    schnorr: SchnorrProof<G>,
}

impl<G: Group> LinearProof<G> {
    /// Returns the protocol version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Batched commitment `ℓ`.
    pub fn ell(&self) -> &G::Element {
        &self.ell
    }

    /// Schnorr proof for `ℓ = h^wit`.
    pub fn schnorr(&self) -> &SchnorrProof<G> {
        &self.schnorr
    }

    /// Serializes the proof to bytes.
    ///
    /// Format: `[version][ℓ][u][z]`, each field length-prefixed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.version);
        w.put_element::<G>(&self.ell);
        self.schnorr.encode(&mut w);
        w.into_bytes()
    }

    /// Deserializes a proof from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        codec::expect_version(&mut r, LINEAR_PROOF_VERSION)?;
        let ell = r.take_element::<G>("ell")?;
        let schnorr = SchnorrProof::decode(&mut r)?;
        r.finish()?;
        Ok(Self {
            version: LINEAR_PROOF_VERSION,
            ell,
            schnorr,
        })
    }
}

/// Prover for the linear-relation proof.
pub struct LinearProver<G: Group> {
    params: Parameters<G>,
    witness: Witness<G>,
    statement: Statement<G>,
    system: LinearSystem<G>,
}

impl<G: Group> LinearProver<G> {
    /// Creates a prover; the statement is computed from the witness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the system does not have one
    /// column per committed value.
    pub fn new(
        params: Parameters<G>,
        witness: Witness<G>,
        system: LinearSystem<G>,
    ) -> Result<Self> {
        let statement = Statement::from_witness(&params, &witness);
        Self::with_statement(params, witness, statement, system)
    }

    /// Creates a prover from an existing statement.
    pub fn with_statement(
        params: Parameters<G>,
        witness: Witness<G>,
        statement: Statement<G>,
        system: LinearSystem<G>,
    ) -> Result<Self> {
        if witness.len() != statement.len() {
            return Err(Error::dimension("linear witness", statement.len(), witness.len()));
        }
        check_dimensions(&statement, &system)?;
        Ok(Self {
            params,
            witness,
            statement,
            system,
        })
    }

    /// Returns the public statement.
    pub fn statement(&self) -> &Statement<G> {
        &self.statement
    }

    /// Generates a non-interactive proof using Fiat-Shamir.
    pub fn prove<R: CryptoRngCore>(&self, rng: &mut R) -> Result<LinearProof<G>> {
        let mut transcript = Transcript::new(LINEAR_DOMAIN);
        self.prove_with_transcript(rng, &mut transcript)
    }

    /// Generates a proof using a custom transcript.
    pub fn prove_with_transcript<R: CryptoRngCore>(
        &self,
        rng: &mut R,
        transcript: &mut Transcript,
    ) -> Result<LinearProof<G>> {
        if !self.system.is_satisfied_by(&self.witness.value_scalars()) {
            warn!("witness does not satisfy the linear system; proof will not verify");
        }

        let rho = batching_challenge(transcript, &self.params, &self.statement, &self.system);
        let (alpha, beta) = self.system.batch(&rho);
        debug!(rows = self.system.rows(), columns = self.system.columns(), "batched linear system");

        // wit = -Σ r_i·α_i
        let wit = G::scalar_negate(&vectors::inner_product::<G>(
            self.witness.blindings(),
            &alpha,
        )?);
        let ell = batched_commitment(&self.params, &self.statement, &alpha, &beta)?;

        transcript.append_element::<G>(b"ell", &ell);
        let schnorr =
            SchnorrProof::prove_with_transcript(rng, transcript, self.params.h(), &ell, &wit);

        Ok(LinearProof {
            version: LINEAR_PROOF_VERSION,
            ell,
            schnorr,
        })
    }
}

/// Verifier for the linear-relation proof.
pub struct LinearVerifier<G: Group> {
    params: Parameters<G>,
    statement: Statement<G>,
    system: LinearSystem<G>,
}

impl<G: Group> LinearVerifier<G> {
    /// Creates a verifier for `statement` and `system`.
    pub fn new(
        params: Parameters<G>,
        statement: Statement<G>,
        system: LinearSystem<G>,
    ) -> Result<Self> {
        check_dimensions(&statement, &system)?;
        Ok(Self {
            params,
            statement,
            system,
        })
    }

    /// Verifies a non-interactive proof.
    pub fn verify(&self, proof: &LinearProof<G>) -> Result<bool> {
        let mut transcript = Transcript::new(LINEAR_DOMAIN);
        self.verify_with_transcript(proof, &mut transcript)
    }

    /// Verifies a proof using a custom transcript.
    pub fn verify_with_transcript(
        &self,
        proof: &LinearProof<G>,
        transcript: &mut Transcript,
    ) -> Result<bool> {
        self.statement.validate()?;

        let rho = batching_challenge(transcript, &self.params, &self.statement, &self.system);
        let (alpha, beta) = self.system.batch(&rho);
        let ell = batched_commitment(&self.params, &self.statement, &alpha, &beta)?;
        if ell != proof.ell {
            debug!("batched commitment does not match the proof");
            return Ok(false);
        }

        transcript.append_element::<G>(b"ell", &ell);
        Ok(proof
            .schnorr
            .verify_with_transcript(transcript, self.params.h(), &ell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ristretto255, SecureRng};

    type S = <Ristretto255 as Group>::Scalar;

    fn s(v: u64) -> S {
        Ristretto255::scalar_from_u64(v)
    }

    #[test]
    fn system_validation() {
        assert!(LinearSystem::<Ristretto255>::from_integers(&[], &[]).is_err());
        assert!(
            LinearSystem::<Ristretto255>::from_integers(&[vec![1, 2], vec![3]], &[1, 2]).is_err()
        );
        assert!(LinearSystem::<Ristretto255>::from_integers(&[vec![1, 2]], &[1, 2]).is_err());
    }

    #[test]
    fn batching_weights_rows_by_powers() {
        let system =
            LinearSystem::<Ristretto255>::from_integers(&[vec![1, 2], vec![3, 4]], &[5, 6])
                .unwrap();
        let (alpha, beta) = system.batch(&s(10));
        assert_eq!(alpha, vec![s(31), s(42)]);
        assert_eq!(beta, s(65));
    }

    #[test]
    fn satisfaction_check() {
        let system =
            LinearSystem::<Ristretto255>::from_integers(&[vec![1, -1]], &[0]).unwrap();
        assert!(system.is_satisfied_by(&[s(7), s(7)]));
        assert!(!system.is_satisfied_by(&[s(7), s(8)]));
        assert!(!system.is_satisfied_by(&[s(7)]));
    }

    #[test]
    fn proves_and_rejects() {
        let mut rng = SecureRng::new();
        let params = Parameters::<Ristretto255>::new(2, 8).unwrap();
        let system =
            LinearSystem::<Ristretto255>::from_integers(&[vec![1, 1], vec![2, -1]], &[9, 3])
                .unwrap();

        let witness = Witness::random(vec![4, 5], &mut rng);
        let prover = LinearProver::new(params.clone(), witness, system.clone()).unwrap();
        let proof = prover.prove(&mut rng).unwrap();
        let statement = prover.statement().clone();
        let verifier = LinearVerifier::new(params.clone(), statement, system.clone()).unwrap();
        assert!(verifier.verify(&proof).unwrap());

        let witness = Witness::random(vec![4, 6], &mut rng);
        let bad = LinearProver::new(params.clone(), witness, system.clone()).unwrap();
        let bad_proof = bad.prove(&mut rng).unwrap();
        let verifier = LinearVerifier::new(params, bad.statement().clone(), system).unwrap();
        assert!(!verifier.verify(&bad_proof).unwrap());
    }

    #[test]
    fn column_count_is_checked() {
        let mut rng = SecureRng::new();
        let params = Parameters::<Ristretto255>::new(3, 8).unwrap();
        let system = LinearSystem::<Ristretto255>::from_integers(&[vec![1, 1]], &[0]).unwrap();
        let result = LinearProver::new(params, Witness::random(vec![1, 2, 3], &mut rng), system);
        assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
    }
}
