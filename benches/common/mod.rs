//! Shared trace generation for benchmarks.

use plancache::workload::{Plan, PlanCatalog};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand_distr::{Distribution, Zipf};

/// Zipf-distributed key stream over `[0, universe)`.
///
/// `exponent` controls skew: near 0 is uniform, 1.0 is the classic web/query
/// popularity curve.
pub fn zipf_trace(universe: u64, exponent: f64, len: usize, seed: u64) -> Vec<u64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let zipf = Zipf::new(universe, exponent).expect("valid zipf parameters");
    (0..len)
        .map(|_| zipf.sample(&mut rng) as u64 - 1)
        .collect()
}

/// Plans whose planning cost grows with the key and whose token count
/// cycles, so cost-aware strategies have something to weigh. Covers every
/// key `zipf_trace` can emit, so no lookup falls back to the zero-cost plan.
pub fn catalog(universe: u64) -> PlanCatalog<u64, u64> {
    (0..universe)
        .map(|key| {
            let cost = 1.0 + (key % 17) as f64 * 3.0;
            let size = 8.0 + (key % 5) as f64 * 16.0;
            (key, Plan::new(key, cost, size))
        })
        .collect()
}
