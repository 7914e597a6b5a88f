//! Common test utilities shared across integration tests.
#![allow(dead_code)]

use budget_zkp::{Group, LinearSystem, Parameters, SecureRng, Statement, Witness};

/// Values of the reference scenario.
pub const SCENARIO_VALUES: [u64; 4] = [10, 20, 30, 40];

/// Bit width of the reference scenario.
pub const SCENARIO_BITS: usize = 16;

/// Initialize test tracing (call once at the beginning of tests).
///
/// Library debug output goes to the test writer, so it only shows for
/// failing tests. Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("budget_zkp=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// Parameters, witness and statement for `values` at `bits` bits.
pub fn setup<G: Group>(
    values: &[u64],
    bits: usize,
    rng: &mut SecureRng,
) -> (Parameters<G>, Witness<G>, Statement<G>) {
    let params = Parameters::<G>::new(values.len(), bits).expect("valid parameters");
    let witness = Witness::random(values.to_vec(), rng);
    let statement = Statement::from_witness(&params, &witness);
    (params, witness, statement)
}

/// The 3x4 budget system satisfied by [`SCENARIO_VALUES`].
pub fn scenario_system<G: Group>() -> LinearSystem<G> {
    LinearSystem::from_integers(&scenario_matrix(), &scenario_rhs()).expect("valid system")
}

pub fn scenario_matrix() -> Vec<Vec<i64>> {
    vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8], vec![9, 10, 11, 12]]
}

pub fn scenario_rhs() -> Vec<i64> {
    vec![300, 700, 1100]
}
