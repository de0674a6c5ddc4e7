//! # Reductions to Weighted Partial MaxSAT
//!
//! Each reduction takes a problem instance and builds a fresh
//! [`WcnfFormula`](crate::instances::WcnfFormula) whose optimal assignments are
//! exactly the optimal solutions of the problem. The encodings keep the
//! mapping from problem elements to variables so that solutions can be
//! decoded with the functions in [`crate::decode`].

pub mod atomics;
pub mod graph;
pub mod packages;

/// Trait for encodings that track statistics.
pub trait EncodeStats {
    /// Gets the number of clauses in the encoding
    fn n_clauses(&self) -> usize;

    /// Gets the number of variables in the encoding
    fn n_vars(&self) -> u32;
}
