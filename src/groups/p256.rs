//! NIST P-256 (secp256r1) elliptic curve group implementation.
//!
//! # Security Level
//!
//! P-256 provides approximately 128 bits of security against classical attacks.
//!
//! # Hashing to the curve
//!
//! Generators are derived with the RFC 9380 `P256_XMD:SHA-256_SSWU_RO_` suite,
//! so no generator has a known discrete log relative to another.

use p256::elliptic_curve::hash2curve::{ExpandMsgXmd, GroupDigest};
use p256::elliptic_curve::ops::Reduce;
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::elliptic_curve::{Field, PrimeField};
use p256::{
    AffinePoint, EncodedPoint, FieldBytes, NistP256, ProjectivePoint, Scalar as P256Scalar, U256,
};
use rand_core::CryptoRngCore;
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Number of bytes in a P-256 scalar (32 bytes).
const P256_SCALAR_BYTES: usize = 32;

/// Number of bytes in a compressed P-256 point (33 bytes: 1 byte prefix + 32 byte x-coordinate).
const P256_COMPRESSED_BYTES: usize = 33;

/// Domain separation tag for hash-to-curve.
const HASH_TO_CURVE_DST: &[u8] = b"budget-zkp-v1-P256_XMD:SHA-256_SSWU_RO_";

/// P-256 (secp256r1) elliptic curve group implementation.
#[derive(Clone, Debug)]
pub struct P256;

/// Scalar modulo the P-256 group order, zeroized on drop.
#[derive(Clone, Debug)]
pub struct Scalar(P256Scalar);

/// P-256 point in projective coordinates; encoded compressed.
#[derive(Clone, Debug)]
pub struct Element(ProjectivePoint);

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        // P256Scalar doesn't expose mutable internals, so we overwrite with zero
        self.0 = P256Scalar::ZERO;
    }
}

impl Drop for Scalar {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_affine().eq(&other.0.to_affine())
    }
}

impl Eq for Element {}

impl Group for P256 {
    type Scalar = Scalar;
    type Element = Element;

    fn name() -> &'static str {
        "P-256"
    }

    fn hash_to_element(label: &[u8]) -> Self::Element {
        // expand_message_xmd only fails for a DST longer than 255 bytes.
        let point =
            NistP256::hash_from_bytes::<ExpandMsgXmd<Sha256>>(&[label], &[HASH_TO_CURVE_DST])
                .unwrap_or_else(|_| unreachable!("hash-to-curve DST is within bounds"));
        Element(point)
    }

    fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() != P256_SCALAR_BYTES {
            return Err(Error::InvalidScalar(format!(
                "Expected {} bytes, got {}",
                P256_SCALAR_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; P256_SCALAR_BYTES];
        arr.copy_from_slice(bytes);

        match Option::<P256Scalar>::from(P256Scalar::from_repr(arr.into())) {
            Some(scalar) => Ok(Scalar(scalar)),
            None => Err(Error::InvalidScalar(
                "Bytes do not represent a valid P-256 scalar".to_string(),
            )),
        }
    }

    fn scalar_to_bytes(scalar: &Self::Scalar) -> Vec<u8> {
        scalar.0.to_bytes().to_vec()
    }

    fn scalar_from_uniform_bytes(bytes: &[u8; 64]) -> Self::Scalar {
        // hi * 2^256 + lo, reduced modulo the group order.
        let hi = <P256Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(&bytes[..32]));
        let lo = <P256Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(&bytes[32..]));
        let two_256 = <P256Scalar as Reduce<U256>>::reduce(U256::MAX) + P256Scalar::ONE;
        Scalar(hi * two_256 + lo)
    }

    fn scalar_from_u64(value: u64) -> Self::Scalar {
        Scalar(P256Scalar::from(value))
    }

    fn element_from_bytes(bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != P256_COMPRESSED_BYTES {
            return Err(Error::InvalidGroupElement(format!(
                "Expected {} bytes, got {}",
                P256_COMPRESSED_BYTES,
                bytes.len()
            )));
        }

        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| Error::InvalidGroupElement("Failed to parse encoded point".to_string()))?;

        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or_else(|| {
                Error::InvalidGroupElement("Bytes do not represent a valid P-256 point".to_string())
            })?;

        Ok(Element(ProjectivePoint::from(affine)))
    }

    fn element_to_bytes(element: &Self::Element) -> Vec<u8> {
        let affine = element.0.to_affine();
        affine.to_encoded_point(true).as_bytes().to_vec()
    }

    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar {
        Scalar(P256Scalar::random(rng))
    }

    fn scalar_mul(element: &Self::Element, scalar: &Self::Scalar) -> Self::Element {
        Element(element.0 * scalar.0)
    }

    fn element_mul(a: &Self::Element, b: &Self::Element) -> Self::Element {
        Element(a.0 + b.0)
    }

    fn element_invert(a: &Self::Element) -> Self::Element {
        Element(-a.0)
    }

    fn identity() -> Self::Element {
        Element(ProjectivePoint::IDENTITY)
    }

    fn is_identity(element: &Self::Element) -> bool {
        element.0.to_affine().is_identity().into()
    }

    fn validate_element(element: &Self::Element) -> Result<()> {
        // Check if the point is on the curve
        let affine = element.0.to_affine();

        // Identity is always valid
        if bool::from(affine.is_identity()) {
            return Ok(());
        }

        // For non-identity points, verify they can be encoded and decoded
        let encoded = affine.to_encoded_point(true);
        match Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded)) {
            Some(decoded) if decoded == affine => Ok(()),
            _ => Err(Error::InvalidGroupElement(
                "Element failed recompression validation".to_string(),
            )),
        }
    }

    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 + b.0)
    }

    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 - b.0)
    }

    fn scalar_mul_scalar(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar {
        Scalar(a.0 * b.0)
    }

    fn scalar_negate(scalar: &Self::Scalar) -> Self::Scalar {
        Scalar(-scalar.0)
    }

    fn scalar_invert(scalar: &Self::Scalar) -> Option<Self::Scalar> {
        if Self::scalar_is_zero(scalar) {
            None
        } else {
            Option::<P256Scalar>::from(scalar.0.invert()).map(Scalar)
        }
    }

    fn scalar_is_zero(scalar: &Self::Scalar) -> bool {
        scalar.0.is_zero().into()
    }
}
