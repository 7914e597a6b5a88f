#![no_main]

use budget_zkp::{Group, Parameters, RangeProof, RangeVerifier, Ristretto255, Statement, Witness};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(proof) = RangeProof::<Ristretto255>::from_bytes(data) else {
        return;
    };
    let Ok(params) = Parameters::<Ristretto255>::new(2, 8) else {
        return;
    };
    let blindings = vec![Ristretto255::scalar_from_u64(1), Ristretto255::scalar_from_u64(2)];
    let Ok(witness) = Witness::new(vec![3, 4], blindings) else {
        return;
    };
    let statement = Statement::from_witness(&params, &witness);
    let Ok(verifier) = RangeVerifier::new(params, statement) else {
        return;
    };

    // Arbitrary bytes must never verify.
    assert!(!matches!(verifier.verify(&proof), Ok(true)));
});
