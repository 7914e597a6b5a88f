#![no_main]

use budget_zkp::{LinearSystem, Ristretto255};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<Vec<i64>>, Vec<i64>, Vec<u64>)| {
    let (matrix, rhs, values) = data;
    if let Ok(system) = LinearSystem::<Ristretto255>::from_integers(&matrix, &rhs) {
        assert_eq!(system.rows(), rhs.len());
        let x: Vec<_> = values
            .iter()
            .map(|&v| <Ristretto255 as budget_zkp::Group>::scalar_from_u64(v))
            .collect();
        let _ = system.is_satisfied_by(&x);
    }
});
