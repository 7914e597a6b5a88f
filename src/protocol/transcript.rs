use merlin::Transcript as MerlinTranscript;

use crate::Group;

/// Protocol label for transcript initialization.
const PROTOCOL_LABEL: &[u8] = b"budget-zkp v1";

/// Number of bytes drawn per challenge for wide reduction.
const WIDE_REDUCTION_BYTES: usize = 64;

/// Transcript wrapper for the Fiat-Shamir transformation.
///
/// Every challenge is derived from all messages appended so far, so prover
/// and verifier must append the same values in the same order. Each proof
/// type starts from its own domain label.
pub struct Transcript(MerlinTranscript);

impl Transcript {
    /// Creates a new transcript separated by `domain` (e.g. `b"range-proof"`).
    pub fn new(domain: &'static [u8]) -> Self {
        let mut transcript = MerlinTranscript::new(PROTOCOL_LABEL);
        transcript.append_message(b"dom-sep", domain);
        Self(transcript)
    }

    /// Appends application-specific context to prevent cross-session replay.
    ///
    /// # Security
    ///
    /// Proofs made under one context do not verify under another. Use a
    /// session identifier or purpose string.
    pub fn append_context(&mut self, context: &[u8]) {
        self.0.append_message(b"context", context);
    }

    /// Appends the group name to the transcript.
    pub fn append_group_name(&mut self, name: &str) {
        self.0.append_message(b"group", name.as_bytes());
    }

    /// Appends a length or count.
    pub fn append_u64(&mut self, label: &'static [u8], value: u64) {
        self.0.append_u64(label, value);
    }

    /// Appends the canonical encoding of a group element.
    pub fn append_element<G: Group>(&mut self, label: &'static [u8], element: &G::Element) {
        self.0.append_message(label, &G::element_to_bytes(element));
    }

    /// Appends a sequence of group elements, prefixed with its length.
    pub fn append_elements<G: Group>(&mut self, label: &'static [u8], elements: &[G::Element]) {
        self.0.append_u64(label, elements.len() as u64);
        for element in elements {
            self.append_element::<G>(label, element);
        }
    }

    /// Appends the canonical encoding of a scalar.
    pub fn append_scalar<G: Group>(&mut self, label: &'static [u8], scalar: &G::Scalar) {
        self.0.append_message(label, &G::scalar_to_bytes(scalar));
    }

    /// Derives a uniformly distributed challenge scalar.
    pub fn challenge_scalar<G: Group>(&mut self, label: &'static [u8]) -> G::Scalar {
        let mut buf = [0u8; WIDE_REDUCTION_BYTES];
        self.0.challenge_bytes(label, &mut buf);
        G::scalar_from_uniform_bytes(&buf)
    }

    /// Derives a nonzero challenge, redrawing while the value is zero.
    ///
    /// Each draw advances the transcript state, so the verifier reproduces
    /// the same sequence of redraws.
    pub fn challenge_nonzero<G: Group>(&mut self, label: &'static [u8]) -> G::Scalar {
        loop {
            let c = self.challenge_scalar::<G>(label);
            if !G::scalar_is_zero(&c) {
                return c;
            }
            tracing::debug!(label = ?String::from_utf8_lossy(label), "redrawing zero challenge");
        }
    }

    /// Derives a challenge that is neither zero nor one.
    ///
    /// Used where `c - 1` appears as a denominator.
    pub fn challenge_nonzero_not_one<G: Group>(&mut self, label: &'static [u8]) -> G::Scalar {
        let one = G::scalar_one();
        loop {
            let c = self.challenge_nonzero::<G>(label);
            if c != one {
                return c;
            }
            tracing::debug!(label = ?String::from_utf8_lossy(label), "redrawing unit challenge");
        }
    }
}
