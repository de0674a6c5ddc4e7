//! # Decoding Solutions
//!
//! Turns a [`MaxSatSolution`] back into sets of problem elements. The graph
//! reductions read the variables that are true, the package reduction reads
//! the ones that are false.

use crate::{
    solvers::MaxSatSolution,
    types::{TernaryVal, Var},
};

/// Filters `vars` to those that are true in the solution, keeping the order
/// of `vars`
pub fn true_vars<'sol, I>(
    solution: &'sol MaxSatSolution,
    vars: I,
) -> impl Iterator<Item = Var> + 'sol
where
    I: IntoIterator<Item = Var>,
    I::IntoIter: 'sol,
{
    with_value(solution, vars, TernaryVal::True)
}

/// Filters `vars` to those that are false in the solution, keeping the order
/// of `vars`
pub fn false_vars<'sol, I>(
    solution: &'sol MaxSatSolution,
    vars: I,
) -> impl Iterator<Item = Var> + 'sol
where
    I: IntoIterator<Item = Var>,
    I::IntoIter: 'sol,
{
    with_value(solution, vars, TernaryVal::False)
}

fn with_value<'sol, I>(
    solution: &'sol MaxSatSolution,
    vars: I,
    value: TernaryVal,
) -> impl Iterator<Item = Var> + 'sol
where
    I: IntoIterator<Item = Var>,
    I::IntoIter: 'sol,
{
    vars.into_iter()
        .filter(move |&var| solution.var_value(var) == value)
}
