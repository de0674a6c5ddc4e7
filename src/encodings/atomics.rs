//! # "Atomic" Clause Shapes
//!
//! The clause shapes the reductions are built from.

use crate::{
    clause,
    types::{Clause, Lit},
};

/// Implication of form `a -> (b1 | b2 | ... | bm)`
#[must_use]
pub fn lit_impl_clause(a: Lit, b: &[Lit]) -> Clause {
    let mut cl = clause![!a];
    cl.extend(b.iter().copied());
    cl
}

/// At most one of `a` and `b`, i.e., `!(a & b)`
#[must_use]
pub fn not_both(a: Lit, b: Lit) -> Clause {
    clause![!a, !b]
}

/// At least one of `a` and `b`
#[must_use]
pub fn either(a: Lit, b: Lit) -> Clause {
    clause![a, b]
}
