use core::fmt::Debug;

use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::Result;

/// Trait for prime-order groups used by the commitment scheme and every proof.
///
/// The notation is multiplicative, like the protocol descriptions: `scalar_mul`
/// is exponentiation `e^s` and `element_mul` is the group operation `a · b`.
/// Implementations provide both group operations (for elements) and field
/// operations (for scalars modulo the group order).
pub trait Group: Clone + Debug + Send + Sync + 'static {
    /// Scalar type for this group (exponents/discrete logs).
    ///
    /// Scalars must be zeroizable for security.
    type Scalar: Clone + Debug + Eq + PartialEq + Zeroize + Send + Sync;

    /// Element type for this group (group elements/points).
    type Element: Clone + Debug + Eq + PartialEq + Send + Sync;

    /// Returns the name of this group implementation.
    fn name() -> &'static str;

    /// Deterministically maps a label to a group element.
    ///
    /// Distinct labels must yield elements with no known discrete log relation
    /// to each other.
    fn hash_to_element(label: &[u8]) -> Self::Element;

    /// Deserializes a scalar from its canonical encoding.
    fn scalar_from_bytes(b: &[u8]) -> Result<Self::Scalar>;

    /// Serializes a scalar to its canonical encoding.
    fn scalar_to_bytes(s: &Self::Scalar) -> Vec<u8>;

    /// Reduces 64 uniformly random bytes to a scalar with negligible bias.
    fn scalar_from_uniform_bytes(bytes: &[u8; 64]) -> Self::Scalar;

    /// Embeds an unsigned integer as a scalar.
    fn scalar_from_u64(value: u64) -> Self::Scalar;

    /// Deserializes a group element from bytes.
    fn element_from_bytes(b: &[u8]) -> Result<Self::Element>;

    /// Serializes a group element to bytes.
    fn element_to_bytes(e: &Self::Element) -> Vec<u8>;

    /// Generates a random scalar using the provided RNG.
    fn random_scalar<R: CryptoRngCore>(rng: &mut R) -> Self::Scalar;

    /// Performs scalar multiplication: `element ^ scalar`.
    fn scalar_mul(e: &Self::Element, s: &Self::Scalar) -> Self::Element;

    /// Combines two group elements: `a · b`.
    fn element_mul(a: &Self::Element, b: &Self::Element) -> Self::Element;

    /// Returns the inverse element `a^{-1}`.
    fn element_invert(a: &Self::Element) -> Self::Element;

    /// Returns the identity element of the group.
    fn identity() -> Self::Element;

    /// Checks if an element is the identity.
    fn is_identity(element: &Self::Element) -> bool;

    /// Validates that an element is in the correct subgroup.
    fn validate_element(e: &Self::Element) -> Result<()>;

    /// Adds two scalars: `a + b`.
    fn scalar_add(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Subtracts two scalars: `a - b`.
    fn scalar_sub(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Multiplies two scalars: `a * b`.
    fn scalar_mul_scalar(a: &Self::Scalar, b: &Self::Scalar) -> Self::Scalar;

    /// Negates a scalar: `-s`.
    fn scalar_negate(s: &Self::Scalar) -> Self::Scalar;

    /// Computes the multiplicative inverse of a scalar.
    ///
    /// Returns `None` if the scalar is zero.
    fn scalar_invert(s: &Self::Scalar) -> Option<Self::Scalar>;

    /// Checks if a scalar is zero.
    fn scalar_is_zero(s: &Self::Scalar) -> bool;

    /// The additive identity of the scalar field.
    fn scalar_zero() -> Self::Scalar {
        Self::scalar_from_u64(0)
    }

    /// The multiplicative identity of the scalar field.
    fn scalar_one() -> Self::Scalar {
        Self::scalar_from_u64(1)
    }

    /// Computes `Π elements_i ^ scalars_i`.
    ///
    /// Both slices must have the same length. Groups with a native
    /// multi-scalar multiplication override this.
    fn multiscalar_mul(scalars: &[Self::Scalar], elements: &[Self::Element]) -> Self::Element {
        debug_assert_eq!(scalars.len(), elements.len());
        scalars
            .iter()
            .zip(elements)
            .fold(Self::identity(), |acc, (s, e)| {
                Self::element_mul(&acc, &Self::scalar_mul(e, s))
            })
    }
}
