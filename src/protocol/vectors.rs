//! Pure helpers over scalar and element sequences.
//!
//! Everything here is deterministic and side-effect free. Length
//! disagreements surface as [`Error::DimensionMismatch`].

use crate::{Error, Group, Result};

fn ensure_same_len(context: &'static str, a: usize, b: usize) -> Result<()> {
    if a != b {
        return Err(Error::dimension(context, a, b));
    }
    Ok(())
}

/// Little-endian binary expansion of `value` as `bits` scalars in `{0, 1}`.
///
/// Bits above `bits` are dropped, so a value outside `[0, 2^bits)` yields a
/// decomposition of `value mod 2^bits`.
pub fn bit_decompose<G: Group>(value: u64, bits: usize) -> Vec<G::Scalar> {
    (0..bits)
        .map(|i| {
            let bit = if i < 64 { (value >> i) & 1 } else { 0 };
            G::scalar_from_u64(bit)
        })
        .collect()
}

/// `[1, base, base^2, ..., base^(len-1)]`.
pub fn powers<G: Group>(base: &G::Scalar, len: usize) -> Vec<G::Scalar> {
    let mut out = Vec::with_capacity(len);
    let mut current = G::scalar_one();
    for _ in 0..len {
        let next = G::scalar_mul_scalar(&current, base);
        out.push(current);
        current = next;
    }
    out
}

/// `base^exp` by square-and-multiply.
pub fn scalar_pow<G: Group>(base: &G::Scalar, mut exp: u64) -> G::Scalar {
    let mut result = G::scalar_one();
    let mut square = base.clone();
    while exp > 0 {
        if exp & 1 == 1 {
            result = G::scalar_mul_scalar(&result, &square);
        }
        square = G::scalar_mul_scalar(&square, &square);
        exp >>= 1;
    }
    result
}

/// `1 + base + ... + base^(len-1)` in closed form `(base^len - 1) / (base - 1)`.
///
/// Falls back to `len` when `base == 1`.
pub fn geometric_sum<G: Group>(base: &G::Scalar, len: usize) -> G::Scalar {
    let one = G::scalar_one();
    match G::scalar_invert(&G::scalar_sub(base, &one)) {
        Some(denominator_inv) => {
            let numerator = G::scalar_sub(&scalar_pow::<G>(base, len as u64), &one);
            G::scalar_mul_scalar(&numerator, &denominator_inv)
        }
        None => G::scalar_from_u64(len as u64),
    }
}

/// `⟨a, b⟩ = Σ a_i · b_i`.
pub fn inner_product<G: Group>(a: &[G::Scalar], b: &[G::Scalar]) -> Result<G::Scalar> {
    ensure_same_len("inner product", a.len(), b.len())?;
    Ok(a.iter().zip(b).fold(G::scalar_zero(), |acc, (x, y)| {
        G::scalar_add(&acc, &G::scalar_mul_scalar(x, y))
    }))
}

/// Entry-wise product `a ∘ b`.
pub fn hadamard<G: Group>(a: &[G::Scalar], b: &[G::Scalar]) -> Result<Vec<G::Scalar>> {
    ensure_same_len("hadamard product", a.len(), b.len())?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| G::scalar_mul_scalar(x, y))
        .collect())
}

/// Entry-wise sum `a + b`.
pub fn add<G: Group>(a: &[G::Scalar], b: &[G::Scalar]) -> Result<Vec<G::Scalar>> {
    ensure_same_len("vector addition", a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| G::scalar_add(x, y)).collect())
}

/// `a + c·1`.
pub fn offset<G: Group>(a: &[G::Scalar], c: &G::Scalar) -> Vec<G::Scalar> {
    a.iter().map(|x| G::scalar_add(x, c)).collect()
}

/// `c · a`.
pub fn scale<G: Group>(a: &[G::Scalar], c: &G::Scalar) -> Vec<G::Scalar> {
    a.iter().map(|x| G::scalar_mul_scalar(x, c)).collect()
}

/// `Σ a_i`.
pub fn sum<G: Group>(a: &[G::Scalar]) -> G::Scalar {
    a.iter().fold(G::scalar_zero(), |acc, x| G::scalar_add(&acc, x))
}

/// Embeds a signed integer, mapping negatives to their additive inverse.
pub fn scalar_from_i64<G: Group>(value: i64) -> G::Scalar {
    let magnitude = G::scalar_from_u64(value.unsigned_abs());
    if value < 0 {
        G::scalar_negate(&magnitude)
    } else {
        magnitude
    }
}

/// Evaluates `Σ coefficients_j · x^j` by Horner's rule.
pub fn evaluate_polynomial<G: Group>(coefficients: &[G::Scalar], x: &G::Scalar) -> G::Scalar {
    coefficients.iter().rev().fold(G::scalar_zero(), |acc, c| {
        G::scalar_add(&G::scalar_mul_scalar(&acc, x), c)
    })
}

/// `lo_i · x_lo + hi_i · x_hi` for each `i`.
pub fn fold_scalars<G: Group>(
    lo: &[G::Scalar],
    hi: &[G::Scalar],
    x_lo: &G::Scalar,
    x_hi: &G::Scalar,
) -> Result<Vec<G::Scalar>> {
    ensure_same_len("scalar fold", lo.len(), hi.len())?;
    Ok(lo
        .iter()
        .zip(hi)
        .map(|(l, h)| G::scalar_add(&G::scalar_mul_scalar(l, x_lo), &G::scalar_mul_scalar(h, x_hi)))
        .collect())
}

/// `lo_i^x_lo · hi_i^x_hi` for each `i`.
pub fn fold_elements<G: Group>(
    lo: &[G::Element],
    hi: &[G::Element],
    x_lo: &G::Scalar,
    x_hi: &G::Scalar,
) -> Result<Vec<G::Element>> {
    ensure_same_len("generator fold", lo.len(), hi.len())?;
    let scalars = [x_lo.clone(), x_hi.clone()];
    Ok(lo
        .iter()
        .zip(hi)
        .map(|(l, h)| G::multiscalar_mul(&scalars, &[l.clone(), h.clone()]))
        .collect())
}

/// `Π elements_i ^ scalars_i`, checking that the lengths agree.
pub fn multiexp<G: Group>(scalars: &[G::Scalar], elements: &[G::Element]) -> Result<G::Element> {
    ensure_same_len("multi-exponentiation", scalars.len(), elements.len())?;
    Ok(G::multiscalar_mul(scalars, elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ristretto255 as R;

    fn s(v: u64) -> <R as Group>::Scalar {
        R::scalar_from_u64(v)
    }

    #[test]
    fn bit_decompose_is_little_endian() {
        let bits = bit_decompose::<R>(0b1011, 6);
        let expected: Vec<_> = [1, 1, 0, 1, 0, 0].iter().map(|&b| s(b)).collect();
        assert_eq!(bits, expected);
    }

    #[test]
    fn bit_decompose_truncates_wide_values() {
        assert_eq!(bit_decompose::<R>(1 << 16, 16), vec![s(0); 16]);
        assert_eq!(bit_decompose::<R>(u64::MAX, 64), vec![s(1); 64]);
    }

    #[test]
    fn powers_and_geometric_sum_agree() {
        let base = s(3);
        let p = powers::<R>(&base, 5);
        assert_eq!(p, vec![s(1), s(3), s(9), s(27), s(81)]);
        assert_eq!(sum::<R>(&p), geometric_sum::<R>(&base, 5));
        assert_eq!(scalar_pow::<R>(&base, 4), s(81));
    }

    #[test]
    fn geometric_sum_of_one_counts_terms() {
        assert_eq!(geometric_sum::<R>(&s(1), 7), s(7));
        assert_eq!(geometric_sum::<R>(&s(2), 16), s(65535));
    }

    #[test]
    fn inner_product_and_mismatch() {
        let a = [s(1), s(2), s(3)];
        let b = [s(4), s(5), s(6)];
        assert_eq!(inner_product::<R>(&a, &b).unwrap(), s(32));
        assert!(matches!(
            inner_product::<R>(&a, &b[..2]),
            Err(Error::DimensionMismatch { expected: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn horner_matches_expansion() {
        // 300 + 700x + 1100x^2 at x = 2
        let coefficients = [s(300), s(700), s(1100)];
        assert_eq!(evaluate_polynomial::<R>(&coefficients, &s(2)), s(6100));
        assert_eq!(evaluate_polynomial::<R>(&[], &s(2)), s(0));
    }

    #[test]
    fn signed_embedding() {
        assert_eq!(
            R::scalar_add(&scalar_from_i64::<R>(-5), &s(5)),
            R::scalar_zero()
        );
        assert_eq!(scalar_from_i64::<R>(12), s(12));
    }

    #[test]
    fn offset_by_minus_one_maps_bits_to_right_vector() {
        let a_l = bit_decompose::<R>(0b101, 3);
        let a_r = offset::<R>(&a_l, &R::scalar_negate(&R::scalar_one()));
        let minus_one = R::scalar_negate(&R::scalar_one());
        assert_eq!(a_r, vec![R::scalar_zero(), minus_one, R::scalar_zero()]);
        assert!(hadamard::<R>(&a_l, &a_r).unwrap().iter().all(R::scalar_is_zero));
    }

    #[test]
    fn fold_halves() {
        let folded = fold_scalars::<R>(&[s(1), s(2)], &[s(3), s(4)], &s(10), &s(100)).unwrap();
        assert_eq!(folded, vec![s(310), s(420)]);

        let g = R::hash_to_element(b"g");
        let h = R::hash_to_element(b"h");
        let folded = fold_elements::<R>(&[g.clone()], &[h.clone()], &s(2), &s(3)).unwrap();
        let expected = R::element_mul(&R::scalar_mul(&g, &s(2)), &R::scalar_mul(&h, &s(3)));
        assert_eq!(folded, vec![expected]);
    }
}
