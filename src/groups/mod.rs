/// NIST P-256 group implementation (hash-to-curve via RFC 9380).
pub mod p256;
/// Ristretto255 group implementation (fast, modern elliptic curve).
pub mod ristretto;

pub use self::p256::P256;
pub use ristretto::Ristretto255;
