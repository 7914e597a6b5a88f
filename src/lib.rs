//! Zero-knowledge proofs over Pedersen-committed integers.
//!
//! Two statements can be proven about values `x_i` committed as
//! `c_i = g^{x_i} · h^{r_i}`:
//!
//! - **Range**: every `x_i` lies in `[0, 2^N)` ([`RangeProver`], [`RangeVerifier`]),
//!   with the opening compressed by a logarithmic [`InnerProductProof`].
//! - **Linear relation**: the values satisfy a public system `A·x = b`
//!   ([`LinearProver`], [`LinearVerifier`]), reduced to a [`SchnorrProof`].
//!
//! All challenges are derived with a Merlin transcript (Fiat-Shamir), so
//! proofs are non-interactive and can be re-verified from their bytes.
//! Protocols are generic over a prime-order [`Group`]; [`Ristretto255`] and
//! [`P256`] are provided.
//!
//! ```rust
//! use budget_zkp::{
//!     LinearProver, LinearSystem, LinearVerifier, Parameters, RangeProver, RangeVerifier,
//!     Ristretto255, SecureRng, Witness,
//! };
//!
//! let mut rng = SecureRng::new();
//! let params = Parameters::<Ristretto255>::new(2, 8).unwrap();
//! let witness = Witness::random(vec![3, 4], &mut rng);
//!
//! let prover = RangeProver::new(params.clone(), witness.clone()).unwrap();
//! let statement = prover.statement().clone();
//! let proof = prover.prove(&mut rng).unwrap();
//! let verifier = RangeVerifier::new(params.clone(), statement.clone()).unwrap();
//! assert!(verifier.verify(&proof).unwrap());
//!
//! let system = LinearSystem::from_integers(&[vec![1, 1]], &[7]).unwrap();
//! let prover = LinearProver::new(params.clone(), witness, system.clone()).unwrap();
//! let proof = prover.prove(&mut rng).unwrap();
//! let verifier = LinearVerifier::new(params, statement, system).unwrap();
//! assert!(verifier.verify(&proof).unwrap());
//! ```

/// Scenario configuration for the driver.
pub mod config;
/// Group abstraction and randomness.
pub mod crypto;
mod error;
/// Concrete prime-order groups.
pub mod groups;
/// Commitments and proof protocols.
pub mod protocol;

pub use crypto::{Group, SecureRng};
pub use error::Error;
pub use groups::{Ristretto255, P256};
pub use protocol::range::{Prover as RangeProver, Verifier as RangeVerifier};
pub use protocol::{
    InnerProductProof, LinearProof, LinearProver, LinearSystem, LinearVerifier, Opening,
    OpeningMode, Parameters, RangeProof, SchnorrProof, Statement, Transcript, Witness,
};

/// Result type alias using the library's error type.
pub type Result<T> = core::result::Result<T, Error>;
