#![no_main]

use budget_zkp::{LinearProof, RangeProof, Ristretto255, SchnorrProof, P256};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(proof) = RangeProof::<Ristretto255>::from_bytes(data) {
        assert_eq!(proof.to_bytes(), data);
    }
    let _ = RangeProof::<P256>::from_bytes(data);
    let _ = LinearProof::<Ristretto255>::from_bytes(data);
    let _ = SchnorrProof::<Ristretto255>::from_bytes(data);
});
