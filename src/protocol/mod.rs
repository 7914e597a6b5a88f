/// Length-prefixed proof encoding.
mod codec;
/// Generator set, witness and statement.
pub mod gadgets;
/// Recursive inner-product argument.
pub mod ipa;
/// Linear-relation ("budget constraint") proof.
pub mod linear;
/// Aggregated range proof.
pub mod range;
/// Schnorr proof of knowledge of a discrete logarithm.
pub mod schnorr;
/// Merlin transcript wrapper for Fiat-Shamir transformation.
pub mod transcript;
/// Pure vector and polynomial helpers.
pub mod vectors;

pub use gadgets::{Parameters, Statement, Witness};
pub use ipa::InnerProductProof;
pub use linear::{LinearProof, LinearProver, LinearSystem, LinearVerifier};
pub use range::{Opening, OpeningMode, RangeProof};
pub use schnorr::SchnorrProof;
pub use transcript::Transcript;
