//! Schnorr proof of knowledge of a discrete logarithm.
//!
//! Proves knowledge of `w` with `public = base^w`:
//! the prover sends `u = base^k`, receives `c`, and answers `z = k + c·w`;
//! the verifier accepts iff `base^z == u · public^c`.

use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::codec::{self, Reader, Writer};
use super::Transcript;
use crate::{Error, Group, Result};

/// Protocol version for serialization compatibility.
const SCHNORR_VERSION: u8 = 1;

/// Transcript domain for standalone Schnorr proofs.
pub const SCHNORR_DOMAIN: &[u8] = b"schnorr";

/// Secret nonce used in the commitment phase.
///
/// Automatically zeroized when dropped.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct Nonce<G: Group> {
    k: G::Scalar,
}

impl<G: Group> Nonce<G> {
    /// Returns a reference to the nonce scalar.
    pub fn k(&self) -> &G::Scalar {
        &self.k
    }
}

/// Non-interactive Schnorr proof `(u, z)`.
#[derive(Clone, Debug)]
pub struct SchnorrProof<G: Group> {
    commitment: G::Element,
    response: G::Scalar,
}

impl<G: Group> SchnorrProof<G> {
    /// Assembles a proof from its commitment `u` and response `z`.
    pub fn new(commitment: G::Element, response: G::Scalar) -> Self {
        Self {
            commitment,
            response,
        }
    }

    /// Returns the commitment `u = base^k`.
    pub fn commitment(&self) -> &G::Element {
        &self.commitment
    }

    /// Returns the response `z = k + c·w`.
    pub fn response(&self) -> &G::Scalar {
        &self.response
    }

    /// Proves knowledge of `secret` for `public = base^secret` under a fresh transcript.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use budget_zkp::{Group, Ristretto255, SchnorrProof, SecureRng};
    ///
    /// let mut rng = SecureRng::new();
    /// let base = Ristretto255::hash_to_element(b"base");
    /// let w = Ristretto255::random_scalar(&mut rng);
    /// let public = Ristretto255::scalar_mul(&base, &w);
    ///
    /// let proof = SchnorrProof::<Ristretto255>::prove(&mut rng, &base, &public, &w);
    /// assert!(proof.verify(&base, &public));
    /// ```
    pub fn prove<R: CryptoRngCore>(
        rng: &mut R,
        base: &G::Element,
        public: &G::Element,
        secret: &G::Scalar,
    ) -> Self {
        let mut transcript = Transcript::new(SCHNORR_DOMAIN);
        Self::prove_with_transcript(rng, &mut transcript, base, public, secret)
    }

    /// Proves under a caller-supplied transcript.
    ///
    /// The transcript may already carry context or earlier protocol messages;
    /// the verifier must replay the same prefix.
    pub fn prove_with_transcript<R: CryptoRngCore>(
        rng: &mut R,
        transcript: &mut Transcript,
        base: &G::Element,
        public: &G::Element,
        secret: &G::Scalar,
    ) -> Self {
        let (commitment, nonce) = Self::commit(rng, base);
        let challenge = Self::challenge(transcript, base, public, &commitment);
        let response = Self::respond(&nonce, &challenge, secret);
        Self::new(commitment, response)
    }

    /// Interactive protocol: generates the commitment (first message).
    pub fn commit<R: CryptoRngCore>(rng: &mut R, base: &G::Element) -> (G::Element, Nonce<G>) {
        let k = G::random_scalar(rng);
        (G::scalar_mul(base, &k), Nonce { k })
    }

    /// Interactive protocol: generates the response (third message).
    pub fn respond(nonce: &Nonce<G>, challenge: &G::Scalar, secret: &G::Scalar) -> G::Scalar {
        G::scalar_add(nonce.k(), &G::scalar_mul_scalar(challenge, secret))
    }

    fn challenge(
        transcript: &mut Transcript,
        base: &G::Element,
        public: &G::Element,
        commitment: &G::Element,
    ) -> G::Scalar {
        transcript.append_element::<G>(b"schnorr-base", base);
        transcript.append_element::<G>(b"schnorr-public", public);
        transcript.append_element::<G>(b"schnorr-commitment", commitment);
        transcript.challenge_nonzero::<G>(b"schnorr-challenge")
    }

    /// Verifies under a fresh transcript.
    pub fn verify(&self, base: &G::Element, public: &G::Element) -> bool {
        let mut transcript = Transcript::new(SCHNORR_DOMAIN);
        self.verify_with_transcript(&mut transcript, base, public)
    }

    /// Verifies under a caller-supplied transcript.
    pub fn verify_with_transcript(
        &self,
        transcript: &mut Transcript,
        base: &G::Element,
        public: &G::Element,
    ) -> bool {
        let challenge = Self::challenge(transcript, base, public, &self.commitment);
        self.verify_response(base, public, &challenge)
    }

    /// Interactive protocol: checks `base^z == u · public^c` (fourth message).
    pub fn verify_response(
        &self,
        base: &G::Element,
        public: &G::Element,
        challenge: &G::Scalar,
    ) -> bool {
        let lhs = G::scalar_mul(base, &self.response);
        let rhs = G::element_mul(&self.commitment, &G::scalar_mul(public, challenge));
        let accepted = lhs == rhs;
        if !accepted {
            tracing::debug!(group = G::name(), "Schnorr verification equation failed");
        }
        accepted
    }

    pub(crate) fn encode(&self, w: &mut Writer) {
        w.put_element::<G>(&self.commitment);
        w.put_scalar::<G>(&self.response);
    }

    pub(crate) fn decode(r: &mut Reader<'_>) -> Result<Self> {
        let commitment = r.take_nonidentity::<G>("Schnorr commitment")?;
        let response = r.take_scalar::<G>("Schnorr response")?;
        if G::scalar_is_zero(&response) {
            return Err(Error::MalformedProof("Response scalar is zero".to_string()));
        }
        Ok(Self::new(commitment, response))
    }

    /// Serializes the proof to bytes.
    ///
    /// Format: `[version (1 byte)][u_len (4 bytes)][u][z_len (4 bytes)][z]`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(SCHNORR_VERSION);
        self.encode(&mut w);
        w.into_bytes()
    }

    /// Deserializes a proof from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedProof`] on any encoding violation, including
    /// an identity commitment or a zero response.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        codec::expect_version(&mut r, SCHNORR_VERSION)?;
        let proof = Self::decode(&mut r)?;
        r.finish()?;
        Ok(proof)
    }
}
