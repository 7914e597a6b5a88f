use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar as DalekScalar;
use curve25519_dalek::traits::{Identity, VartimeMultiscalarMul};
use rand_core::CryptoRngCore;
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use crate::{Error, Group, Result};

/// Number of bytes in a Ristretto255 scalar or compressed element (32 bytes).
const RISTRETTO_BYTES: usize = 32;

/// Number of bytes used for wide scalar reduction (64 bytes).
const WIDE_REDUCTION_BYTES: usize = 64;

/// Domain separation tag prefixed to every hash-to-group label.
const HASH_TO_GROUP_DST: &[u8] = b"budget-zkp-v1-ristretto255-hash-to-group";

/// Ristretto255 group implementation providing fast, prime-order elliptic curve operations.
#[derive(Clone, Debug)]
pub struct Ristretto255;

/// Scalar in the Ristretto255 group.
///
/// Scalars are automatically zeroized when dropped for security.
#[derive(Clone, Debug, Eq, PartialEq, Zeroize)]
#[zeroize(drop)]
pub struct Scalar(DalekScalar);

/// Element (point) in the Ristretto255 group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Element(RistrettoPoint);

impl Group for Ristretto255 {
    type Scalar = Scalar;
    type Element = Element;

    fn name() -> &'static str {
        "Ristretto255"
    }

    fn hash_to_element(label: &[u8]) -> Self::Element {
        let mut hasher = Sha512::new();
        hasher.update(HASH_TO_GROUP_DST);
        hasher.update(label);
        let mut wide = [0u8; WIDE_REDUCTION_BYTES];
        wide.copy_from_slice(&hasher.finalize());
        Element(RistrettoPoint::from_uniform_bytes(&wide))
    }

    fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::Scalar> {
        if bytes.len() != RISTRETTO_BYTES {
            return Err(Error::InvalidScalar(format!(
                "Expected {} bytes, got {}",
                RISTRETTO_BYTES,
                bytes.len()
            )));
        }

        let mut arr = [0u8; RISTRETTO_BYTES];
        arr.copy_from_slice(bytes);

        match DalekScalar::from_canonical_bytes(arr).into() {
            Some(scalar) => Ok(Scalar(scalar)),
            None => Err(Error::InvalidScalar(
                "Bytes do not represent a valid scalar".to_string(),
            )),
        }
    }

    fn scalar_to_bytes(scalar: &Self::Scalar) -> Vec<u8> {
        scalar.0.to_bytes().to_vec()
    }

    fn scalar_from_uniform_bytes(bytes: &[u8; WIDE_REDUCTION_BYTES]) -> Self::Scalar {
        Scalar(DalekScalar::from_bytes_mod_order_wide(bytes))
    }

    fn scalar_from_u64(value: u64) -> Self::Scalar {
        Scalar(DalekScalar::from(value))
    }

    fn element_from_bytes(bytes: &[u8]) -> Result<Self::Element> {
        if bytes.len() != RISTRETTO_BYTES {
            return Err(Error::InvalidGroupElement(format!(
                "Expected {} bytes, got {}",
                RISTRETTO_BYTES,
                bytes.len()
            )));
        }

        let compressed = CompressedRistretto::from_slice(bytes).map_err(|_| {
            Error::InvalidGroupElement("Bytes do not form a compressed point".to_string())
        })?;

        match compressed.decompress() {
            Some(point) => Ok(Element(point)),
            None => Err(Error::InvalidGroupElement(
                "Bytes do not represent a valid Ristretto point".to_string(),
            )),
        }
    }

    fn element_to_bytes(element: &Self::Element) -> Vec<u8> {
        element.0.compress().to_bytes().to_vec()
    }

    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar {
        let mut bytes = [0u8; WIDE_REDUCTION_BYTES];
        rng.fill_bytes(&mut bytes);
        Scalar(DalekScalar::from_bytes_mod_order_wide(&bytes))
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
        Element(RistrettoPoint::identity())
    }

    fn is_identity(element: &Self::Element) -> bool {
        element.0 == RistrettoPoint::identity()
    }

    // Every decompressed Ristretto point lies in the prime-order group.
    fn validate_element(_element: &Self::Element) -> Result<()> {
        Ok(())
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
            Some(Scalar(scalar.0.invert()))
        }
    }

    fn scalar_is_zero(scalar: &Self::Scalar) -> bool {
        scalar.0 == DalekScalar::ZERO
    }

    fn scalar_zero() -> Self::Scalar {
        Scalar(DalekScalar::ZERO)
    }

    fn scalar_one() -> Self::Scalar {
        Scalar(DalekScalar::ONE)
    }

    fn multiscalar_mul(scalars: &[Self::Scalar], elements: &[Self::Element]) -> Self::Element {
        debug_assert_eq!(scalars.len(), elements.len());
        Element(RistrettoPoint::vartime_multiscalar_mul(
            scalars.iter().map(|s| s.0),
            elements.iter().map(|e| e.0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SecureRng;

    #[test]
    fn hash_to_element_separates_labels() {
        let g = Ristretto255::hash_to_element(b"g");
        let h = Ristretto255::hash_to_element(b"h");
        assert_ne!(g, h);
        assert!(!Ristretto255::is_identity(&g));
        assert_eq!(g, Ristretto255::hash_to_element(b"g"));
    }

    #[test]
    fn scalar_inversion() {
        let mut rng = SecureRng::new();
        let a = Ristretto255::random_scalar(&mut rng);

        let a_inv = Ristretto255::scalar_invert(&a).unwrap();
        let product = Ristretto255::scalar_mul_scalar(&a, &a_inv);
        assert_eq!(product, Ristretto255::scalar_one());

        assert!(Ristretto255::scalar_invert(&Ristretto255::scalar_zero()).is_none());
    }

    #[test]
    fn scalar_serialization() {
        let mut rng = SecureRng::new();
        let scalar = Ristretto255::random_scalar(&mut rng);
        let bytes = Ristretto255::scalar_to_bytes(&scalar);
        let deserialized = Ristretto255::scalar_from_bytes(&bytes).unwrap();
        assert_eq!(scalar, deserialized);
    }

    #[test]
    fn non_canonical_scalar_rejected() {
        assert!(Ristretto255::scalar_from_bytes(&[0xFF; 32]).is_err());
        assert!(Ristretto255::scalar_from_bytes(&[0u8; 31]).is_err());
    }

    #[test]
    fn element_serialization() {
        let g = Ristretto255::hash_to_element(b"base");
        let mut rng = SecureRng::new();
        let x = Ristretto255::random_scalar(&mut rng);
        let y = Ristretto255::scalar_mul(&g, &x);

        let bytes = Ristretto255::element_to_bytes(&y);
        let deserialized = Ristretto255::element_from_bytes(&bytes).unwrap();
        assert_eq!(y, deserialized);
    }

    #[test]
    fn element_inverse_cancels() {
        let g = Ristretto255::hash_to_element(b"base");
        let inv = Ristretto255::element_invert(&g);
        assert!(Ristretto255::is_identity(&Ristretto255::element_mul(&g, &inv)));
    }

    #[test]
    fn multiscalar_matches_naive() {
        let mut rng = SecureRng::new();
        let scalars = rng.scalars::<Ristretto255>(4);
        let elements: Vec<_> = (0u8..4)
            .map(|i| Ristretto255::hash_to_element(&[i]))
            .collect();

        let naive = scalars
            .iter()
            .zip(&elements)
            .fold(Ristretto255::identity(), |acc, (s, e)| {
                Ristretto255::element_mul(&acc, &Ristretto255::scalar_mul(e, s))
            });

        assert_eq!(Ristretto255::multiscalar_mul(&scalars, &elements), naive);
    }
}
