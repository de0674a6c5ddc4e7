#![allow(dead_code)]

use std::path::PathBuf;

use satreduce::{
    instances::WcnfFormula,
    solvers::{MaxSatSolution, SolveMaxSat, SolverError},
    types::{Assignment, Lit},
};

/// Exhaustive MaxSAT oracle for small formulas
#[derive(Debug, Default)]
pub struct BruteForce {
    pub calls: usize,
}

impl SolveMaxSat for BruteForce {
    fn solve(&mut self, formula: &WcnfFormula) -> Result<MaxSatSolution, SolverError> {
        self.calls += 1;
        let n_vars = formula.n_vars();
        assert!(n_vars <= 20, "formula too large for the brute force oracle");
        let mut best: Option<(usize, Assignment)> = None;
        for bits in 0u32..(1 << n_vars) {
            let assignment: Assignment = (0..n_vars)
                .map(|idx| Lit::new(idx, bits & (1 << idx) == 0))
                .collect();
            if let Some(cost) = formula.cost(&assignment) {
                if best.as_ref().map_or(true, |(best_cost, _)| cost < *best_cost) {
                    best = Some((cost, assignment));
                }
            }
        }
        let (cost, assignment) = best.ok_or(SolverError::Unsatisfiable)?;
        MaxSatSolution::validate(formula, cost, assignment)
    }
}

/// Path of a file in the `data` directory
pub fn data(name: &str) -> PathBuf {
    let manifest = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    PathBuf::from(format!("{manifest}/data/{name}"))
}
