mod common;

use budget_zkp::{
    Error, Group, LinearProof, LinearProver, LinearSystem, LinearVerifier, Ristretto255, SecureRng,
    P256,
};
use common::{
    init_tracing, scenario_matrix, scenario_rhs, scenario_system, setup, SCENARIO_BITS,
    SCENARIO_VALUES,
};

fn prove_and_verify<G: Group>(values: &[u64], matrix: &[Vec<i64>], rhs: &[i64]) -> bool {
    let mut rng = SecureRng::new();
    let (params, witness, statement) = setup::<G>(values, SCENARIO_BITS, &mut rng);
    let system = LinearSystem::<G>::from_integers(matrix, rhs).expect("valid system");

    let proof =
        LinearProver::with_statement(params.clone(), witness, statement.clone(), system.clone())
            .expect("dimensions match")
            .prove(&mut rng)
            .expect("Proof generation should succeed");

    let received = LinearProof::<G>::from_bytes(&proof.to_bytes())
        .expect("Deserialization should succeed");

    LinearVerifier::new(params, statement, system)
        .expect("dimensions match")
        .verify(&received)
        .expect("verification runs")
}

#[test]
fn scenario_accepts() {
    init_tracing();
    assert!(prove_and_verify::<Ristretto255>(
        &SCENARIO_VALUES,
        &scenario_matrix(),
        &scenario_rhs()
    ));
    assert!(prove_and_verify::<P256>(
        &SCENARIO_VALUES,
        &scenario_matrix(),
        &scenario_rhs()
    ));
}

#[test]
fn mutating_any_rhs_entry_rejects() {
    init_tracing();
    for row in 0..3 {
        for delta in [-1i64, 1, 1000] {
            let mut rhs = scenario_rhs();
            rhs[row] += delta;
            assert!(
                !prove_and_verify::<Ristretto255>(&SCENARIO_VALUES, &scenario_matrix(), &rhs),
                "b[{row}] shifted by {delta} must reject"
            );
        }
    }
}

#[test]
fn mutating_a_matrix_entry_rejects() {
    let mut matrix = scenario_matrix();
    matrix[2][3] += 1;
    assert!(!prove_and_verify::<Ristretto255>(
        &SCENARIO_VALUES,
        &matrix,
        &scenario_rhs()
    ));
}

#[test]
fn negative_coefficients_are_supported() {
    // 40 - 10 - 30 = 0, 2·20 - 40 = 0
    let matrix = vec![vec![-1, 0, -1, 1], vec![0, 2, 0, -1]];
    assert!(prove_and_verify::<Ristretto255>(
        &SCENARIO_VALUES,
        &matrix,
        &[0, 0]
    ));
    assert!(!prove_and_verify::<Ristretto255>(
        &SCENARIO_VALUES,
        &matrix,
        &[0, -1]
    ));
}

#[test]
fn proof_is_bound_to_the_system() {
    let mut rng = SecureRng::new();
    let (params, witness, statement) =
        setup::<Ristretto255>(&SCENARIO_VALUES, SCENARIO_BITS, &mut rng);

    let proof = LinearProver::with_statement(
        params.clone(),
        witness,
        statement.clone(),
        scenario_system(),
    )
    .unwrap()
    .prove(&mut rng)
    .unwrap();

    // Same solution set, different presentation: the transcript differs.
    let reordered = LinearSystem::<Ristretto255>::from_integers(
        &[vec![5, 6, 7, 8], vec![1, 2, 3, 4], vec![9, 10, 11, 12]],
        &[700, 300, 1100],
    )
    .unwrap();
    let verifier = LinearVerifier::new(params, statement, reordered).unwrap();
    assert!(!verifier.verify(&proof).unwrap());
}

#[test]
fn column_mismatch_is_a_precondition_error() {
    let mut rng = SecureRng::new();
    let (params, _, statement) = setup::<Ristretto255>(&[1, 2], SCENARIO_BITS, &mut rng);
    let result = LinearVerifier::new(params, statement, scenario_system::<Ristretto255>());
    assert!(matches!(result, Err(Error::DimensionMismatch { .. })));
}
