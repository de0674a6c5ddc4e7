//! # Interfaces to MaxSAT Solvers
//!
//! The reductions in this crate only need a single operation from a solver:
//! find an optimal assignment of a [`WcnfFormula`]. This is captured by the
//! [`SolveMaxSat`] trait. The solver that ships with this crate is
//! [`ExternalSolver`], which calls a MaxSAT solver executable that reads DIMACS
//! WCNF and writes output in the format of the MaxSAT evaluations.
//!
//! ## Example
//!
//! ```no_run
//! use std::process::Command;
//! use satreduce::{
//!     instances::{WcnfFormula, Weight},
//!     clause,
//!     solvers::{ExternalSolver, SolveMaxSat},
//! };
//!
//! let mut formula = WcnfFormula::new();
//! let a = formula.new_var();
//! formula.add_clause(clause![a.pos_lit()], Weight::Soft(1)).unwrap();
//! let mut solver = ExternalSolver::new_default(Command::new("<path to solver binary>"));
//! let solution = solver.solve(&formula).unwrap();
//! assert_eq!(solution.cost, 0);
//! ```

use thiserror::Error;

use crate::{
    instances::{fio::MaxSatOutputError, WcnfFormula},
    types::{Assignment, Clause, Lit, TernaryVal, Var},
};

pub mod external;
pub use external::Solver as ExternalSolver;

/// Trait for all MaxSAT solvers that can be used for the reductions
pub trait SolveMaxSat {
    /// Finds an optimal assignment of a formula
    ///
    /// # Errors
    ///
    /// If the hard clauses are unsatisfiable, if the solver gives up, or if
    /// the solver fails in an implementation-specific way.
    fn solve(&mut self, formula: &WcnfFormula) -> Result<MaxSatSolution, SolverError>;
}

impl<S: SolveMaxSat + ?Sized> SolveMaxSat for &mut S {
    fn solve(&mut self, formula: &WcnfFormula) -> Result<MaxSatSolution, SolverError> {
        (**self).solve(formula)
    }
}

/// An optimal solution of a [`WcnfFormula`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxSatSolution {
    /// The sum of the weights of the falsified soft clauses
    pub cost: usize,
    /// A value for every variable of the formula
    pub assignment: Assignment,
}

impl MaxSatSolution {
    /// Checks an assignment reported by a solver against the formula. The
    /// assignment is truncated to the variables of the formula and the cost
    /// is recomputed; a reported cost that differs is only logged.
    ///
    /// # Errors
    ///
    /// [`SolverError::IncompleteAssignment`] if a variable of the formula is
    /// not assigned, [`SolverError::HardClauseViolated`] if a hard clause is
    /// falsified.
    pub fn validate(
        formula: &WcnfFormula,
        reported_cost: usize,
        assignment: Assignment,
    ) -> Result<MaxSatSolution, SolverError> {
        let assignment = match formula.max_var() {
            Some(max_var) => {
                if let Some(var) = assignment.first_unassigned(max_var) {
                    return Err(SolverError::IncompleteAssignment(var));
                }
                assignment.truncate(max_var)
            }
            None => Assignment::default(),
        };
        if let Some(clause) = formula.hards().find(|cl| !cl.is_sat(&assignment)) {
            return Err(SolverError::HardClauseViolated(clause.clone()));
        }
        let cost = formula.cost(&assignment).unwrap_or(reported_cost);
        if cost != reported_cost {
            tracing::warn!(
                reported = reported_cost,
                actual = cost,
                "solver reported a cost that does not match its assignment"
            );
        }
        Ok(MaxSatSolution { cost, assignment })
    }

    /// Gets the solution as a list of signed 1-based literals, one per
    /// variable
    #[must_use]
    pub fn model(&self) -> Vec<i32> {
        self.assignment.iter().map(Lit::to_ipasir).collect()
    }

    /// Gets the value of a variable in the solution
    #[must_use]
    pub fn var_value(&self, var: Var) -> TernaryVal {
        self.assignment.var_value(var)
    }

    /// Gets the value of a literal in the solution
    #[must_use]
    pub fn lit_value(&self, lit: Lit) -> TernaryVal {
        self.assignment.lit_value(lit)
    }
}

/// Type representing solver errors
#[derive(Error, Debug)]
pub enum SolverError {
    /// IO error while communicating with the solver
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The solver exited with an unexpected code
    #[error("solver returned unexpected code {0}")]
    ExitCode(i32),
    /// The solver was terminated by a signal
    #[error("solver process terminated by signal")]
    Signal,
    /// The solver output could not be parsed
    #[error("invalid solver output: {0}")]
    Output(#[from] MaxSatOutputError),
    /// The hard clauses cannot be satisfied
    #[error("the hard clauses are unsatisfiable")]
    Unsatisfiable,
    /// The solver gave up without a solution
    #[error("the solver did not find a solution")]
    Unknown,
    /// The solution does not assign a variable of the formula
    #[error("the solution does not assign variable {0}")]
    IncompleteAssignment(Var),
    /// The solution falsifies a hard clause
    #[error("the solution violates hard clause {0}")]
    HardClauseViolated(Clause),
}
