//! # Instance Representations
//!
//! Types representing the inputs of the reductions (graphs and package
//! upgrade instances) and their output, the weighted CNF formula.

use crate::types::Var;

mod wcnf;
pub use wcnf::{FormulaError, WcnfFormula, Weight};

mod graph;
pub use graph::{Edge, EdgeCountMismatch, Graph};

mod registry;
pub use registry::Registry;

mod packages;
pub use packages::{Conflict, Dependency, PackageInstance};

pub mod fio;

/// Trait for variable managers keeping track of used variables
pub trait ManageVars {
    /// Uses up the next free variable
    fn new_var(&mut self) -> Var;
    /// Gets the used variable with the highest index
    fn max_var(&self) -> Option<Var>;
    /// Gets the number of used variables. Typically this is just the index of
    /// the next free variable.
    fn n_used(&self) -> u32;
}

/// Simple counting variable manager. Variables are handed out in increasing
/// order and never reused.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BasicVarManager {
    next_var: Var,
}

impl BasicVarManager {
    /// Creates a new variable manager from a next free variable
    #[must_use]
    pub fn from_next_free(next_var: Var) -> BasicVarManager {
        BasicVarManager { next_var }
    }
}

impl ManageVars for BasicVarManager {
    fn new_var(&mut self) -> Var {
        let v = self.next_var;
        self.next_var += 1;
        v
    }

    fn max_var(&self) -> Option<Var> {
        if self.next_var == Var::new(0) {
            None
        } else {
            Some(self.next_var - 1)
        }
    }

    fn n_used(&self) -> u32 {
        self.next_var.idx32()
    }
}

impl Default for BasicVarManager {
    fn default() -> Self {
        Self {
            next_var: Var::new(0),
        }
    }
}
