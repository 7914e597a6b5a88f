use serde::{Deserialize, Serialize};

use crate::protocol::codec::{self, Reader, Writer};
use crate::protocol::InnerProductProof;
use crate::{Error, Group, Result};

/// Protocol version for serialization compatibility.
const RANGE_PROOF_VERSION: u8 = 1;

const TAG_EXPLICIT: u8 = 0;
const TAG_INNER_PRODUCT: u8 = 1;

/// How the prover opens `l(x)` and `r(x)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpeningMode {
    /// Send both vectors in full (linear size).
    Explicit,
    /// Compress with the inner-product argument (logarithmic size).
    #[default]
    InnerProduct,
}

/// Final opening of the range proof.
#[derive(Clone, Debug)]
pub enum Opening<G: Group> {
    /// The evaluated vectors `l = l(x)` and `r = r(x)`.
    Explicit {
        /// `l(x)`.
        l: Vec<G::Scalar>,
        /// `r(x)`.
        r: Vec<G::Scalar>,
    },
    /// Inner-product argument for `⟨l, r⟩ = t̂`.
    InnerProduct(InnerProductProof<G>),
}

impl<G: Group> Opening<G> {
    /// The mode this opening was produced in.
    pub fn mode(&self) -> OpeningMode {
        match self {
            Opening::Explicit { .. } => OpeningMode::Explicit,
            Opening::InnerProduct(_) => OpeningMode::InnerProduct,
        }
    }
}

/// Non-interactive range proof for `n` committed values.
///
/// # Serialization
///
/// Proofs can be serialized to bytes using [`RangeProof::to_bytes`] and
/// deserialized using [`RangeProof::from_bytes`]. The format is versioned.
#[derive(Clone, Debug)]
pub struct RangeProof<G: Group> {
    version: u8,
    pub(crate) a: G::Element,
    pub(crate) s: G::Element,
    pub(crate) t1: G::Element,
    pub(crate) t2: G::Element,
    pub(crate) tau_x: G::Scalar,
    pub(crate) mu: G::Scalar,
    pub(crate) t_hat: G::Scalar,
    pub(crate) opening: Opening<G>,
}

impl<G: Group> RangeProof<G> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        a: G::Element,
        s: G::Element,
        t1: G::Element,
        t2: G::Element,
        tau_x: G::Scalar,
        mu: G::Scalar,
        t_hat: G::Scalar,
        opening: Opening<G>,
    ) -> Self {
        Self {
            version: RANGE_PROOF_VERSION,
            a,
            s,
            t1,
            t2,
            tau_x,
            mu,
            t_hat,
            opening,
        }
    }

    /// Returns the protocol version.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Commitment `A` to the bit vectors.
    pub fn a(&self) -> &G::Element {
        &self.a
    }

    /// Commitment `S` to the blinding vectors.
    pub fn s(&self) -> &G::Element {
        &self.s
    }

    /// Commitments `(T1, T2)` to the coefficients of `t(X)`.
    pub fn t_commitments(&self) -> (&G::Element, &G::Element) {
        (&self.t1, &self.t2)
    }

    /// Aggregated blinding `τx` of `t̂`.
    pub fn tau_x(&self) -> &G::Scalar {
        &self.tau_x
    }

    /// Aggregated blinding `μ` of `A · S^x`.
    pub fn mu(&self) -> &G::Scalar {
        &self.mu
    }

    /// Claimed evaluation `t̂ = t(x)`.
    pub fn t_hat(&self) -> &G::Scalar {
        &self.t_hat
    }

    /// The opening of `l(x)`, `r(x)`.
    pub fn opening(&self) -> &Opening<G> {
        &self.opening
    }

    /// Serializes the proof to bytes.
    ///
    /// Format: `[version][A][S][T1][T2][τx][μ][t̂][tag]` followed by either
    /// `l` and `r` (tag 0) or the inner-product proof (tag 1). Every field is
    /// length-prefixed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.put_u8(self.version);
        for element in [&self.a, &self.s, &self.t1, &self.t2] {
            w.put_element::<G>(element);
        }
        for scalar in [&self.tau_x, &self.mu, &self.t_hat] {
            w.put_scalar::<G>(scalar);
        }
        match &self.opening {
            Opening::Explicit { l, r } => {
                w.put_u8(TAG_EXPLICIT);
                w.put_scalars::<G>(l);
                w.put_scalars::<G>(r);
            }
            Opening::InnerProduct(ipa) => {
                w.put_u8(TAG_INNER_PRODUCT);
                ipa.encode(&mut w);
            }
        }
        w.into_bytes()
    }

    /// Deserializes a proof from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedProof`] for an unknown version or opening tag,
    /// truncated or trailing data, undecodable fields, or an identity `A`,
    /// `S`, `T1` or `T2`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = Reader::new(bytes);
        codec::expect_version(&mut r, RANGE_PROOF_VERSION)?;

        let a = r.take_nonidentity::<G>("A")?;
        let s = r.take_nonidentity::<G>("S")?;
        let t1 = r.take_nonidentity::<G>("T1")?;
        let t2 = r.take_nonidentity::<G>("T2")?;
        let tau_x = r.take_scalar::<G>("tau_x")?;
        let mu = r.take_scalar::<G>("mu")?;
        let t_hat = r.take_scalar::<G>("t_hat")?;

        let opening = match r.take_u8("opening tag")? {
            TAG_EXPLICIT => {
                let l = r.take_scalars::<G>("l")?;
                let rv = r.take_scalars::<G>("r")?;
                Opening::Explicit { l, r: rv }
            }
            TAG_INNER_PRODUCT => Opening::InnerProduct(InnerProductProof::decode(&mut r)?),
            tag => {
                return Err(Error::MalformedProof(format!(
                    "Unknown opening tag: {tag}"
                )))
            }
        };
        r.finish()?;

        Ok(Self::new(a, s, t1, t2, tau_x, mu, t_hat, opening))
    }
}
