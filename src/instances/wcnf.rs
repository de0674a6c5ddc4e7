//! # Weighted CNF Formulas
//!
//! A [`WcnfFormula`] is the target of every reduction in this crate. It owns
//! the variables it hands out and an ordered list of weighted clauses.

use std::io;

use thiserror::Error;

use crate::types::{Assignment, Clause, Var};

use super::{fio, BasicVarManager, ManageVars};

/// The weight of a clause in a [`WcnfFormula`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    /// The top weight, i.e., a clause that any solution must satisfy
    Hard,
    /// A soft clause that costs the given weight if violated
    Soft(usize),
}

impl Weight {
    /// Checks whether the weight marks a hard clause
    #[must_use]
    pub fn is_hard(self) -> bool {
        matches!(self, Weight::Hard)
    }
}

impl From<usize> for Weight {
    fn from(value: usize) -> Self {
        Weight::Soft(value)
    }
}

/// Errors when adding clauses to a [`WcnfFormula`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormulaError {
    /// Clauses must contain at least one literal
    #[error("cannot add an empty clause")]
    EmptyClause,
    /// Soft clauses must have a positive weight
    #[error("soft clauses need a weight greater than zero")]
    ZeroWeight,
}

/// Type representing a weighted partial MaxSAT instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WcnfFormula {
    var_manager: BasicVarManager,
    clauses: Vec<(Clause, Weight)>,
}

impl WcnfFormula {
    /// Creates a new empty formula
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty formula that continues allocating variables from a
    /// given variable manager
    #[must_use]
    pub fn with_var_manager(var_manager: BasicVarManager) -> Self {
        WcnfFormula {
            var_manager,
            clauses: vec![],
        }
    }

    /// Allocates the next unused variable
    pub fn new_var(&mut self) -> Var {
        self.var_manager.new_var()
    }

    /// Gets the number of allocated variables
    #[must_use]
    pub fn n_vars(&self) -> u32 {
        self.var_manager.n_used()
    }

    /// Gets the allocated variable with the highest index
    #[must_use]
    pub fn max_var(&self) -> Option<Var> {
        self.var_manager.max_var()
    }

    /// Appends a clause with a weight
    ///
    /// All literals must be over variables that were allocated from this
    /// formula.
    ///
    /// # Errors
    ///
    /// [`FormulaError::EmptyClause`] or [`FormulaError::ZeroWeight`]
    pub fn add_clause(&mut self, clause: Clause, weight: Weight) -> Result<(), FormulaError> {
        if clause.is_empty() {
            return Err(FormulaError::EmptyClause);
        }
        if weight == Weight::Soft(0) {
            return Err(FormulaError::ZeroWeight);
        }
        debug_assert!(
            clause.iter().all(|l| l.var().idx32() < self.n_vars()),
            "clause {clause} references unallocated variables"
        );
        self.clauses.push((clause, weight));
        Ok(())
    }

    /// Appends multiple clauses with the same weight
    ///
    /// # Errors
    ///
    /// Like [`WcnfFormula::add_clause`]. Clauses before the failing one remain
    /// in the formula.
    pub fn add_clauses<I>(&mut self, clauses: I, weight: Weight) -> Result<(), FormulaError>
    where
        I: IntoIterator<Item = Clause>,
    {
        clauses
            .into_iter()
            .try_for_each(|cl| self.add_clause(cl, weight))
    }

    /// Gets the number of clauses
    #[must_use]
    pub fn n_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Gets the number of hard clauses
    #[must_use]
    pub fn n_hard(&self) -> usize {
        self.clauses.iter().filter(|(_, w)| w.is_hard()).count()
    }

    /// Gets the number of soft clauses
    #[must_use]
    pub fn n_soft(&self) -> usize {
        self.n_clauses() - self.n_hard()
    }

    /// Checks whether the formula has no clauses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Iterates over the clauses in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(Clause, Weight)> {
        self.clauses.iter()
    }

    /// Iterates over the hard clauses
    pub fn hards(&self) -> impl Iterator<Item = &Clause> {
        self.clauses
            .iter()
            .filter_map(|(cl, w)| w.is_hard().then_some(cl))
    }

    /// Iterates over the soft clauses and their weights
    pub fn softs(&self) -> impl Iterator<Item = (&Clause, usize)> {
        self.clauses.iter().filter_map(|(cl, w)| match w {
            Weight::Hard => None,
            Weight::Soft(w) => Some((cl, *w)),
        })
    }

    /// Gets the sum of all soft clause weights
    #[must_use]
    pub fn soft_weight_sum(&self) -> usize {
        self.softs().map(|(_, w)| w).sum()
    }

    /// Gets the numeric top weight, which is strictly greater than the sum of
    /// all soft weights
    #[must_use]
    pub fn top(&self) -> usize {
        self.soft_weight_sum() + 1
    }

    /// Computes the cost of an assignment, i.e., the sum of the weights of the
    /// violated soft clauses. Returns [`None`] if a hard clause is not
    /// satisfied.
    #[must_use]
    pub fn cost(&self, assignment: &Assignment) -> Option<usize> {
        if self.hards().any(|cl| !cl.is_sat(assignment)) {
            return None;
        }
        Some(
            self.softs()
                .filter(|(cl, _)| !cl.is_sat(assignment))
                .map(|(_, w)| w)
                .sum(),
        )
    }

    /// Writes the formula to DIMACS WCNF
    ///
    /// # Errors
    ///
    /// If writing fails
    pub fn write_dimacs<W: io::Write>(
        &self,
        writer: &mut W,
        format: fio::dimacs::WcnfFormat,
    ) -> Result<(), io::Error> {
        fio::dimacs::write_wcnf_annotated(writer, self, format)
    }
}

#[cfg(test)]
mod tests {
    use super::{FormulaError, WcnfFormula, Weight};
    use crate::{
        clause,
        types::{Assignment, Clause, TernaryVal},
    };

    #[test]
    fn allocation_is_monotonic() {
        let mut formula = WcnfFormula::new();
        let a = formula.new_var();
        let b = formula.new_var();
        assert_eq!(a.to_ipasir(), 1);
        assert_eq!(b.to_ipasir(), 2);
        assert_eq!(formula.n_vars(), 2);
    }

    #[test]
    fn add_clause_checks() {
        let mut formula = WcnfFormula::new();
        let a = formula.new_var();
        assert_eq!(
            formula.add_clause(Clause::new(), Weight::Soft(1)),
            Err(FormulaError::EmptyClause)
        );
        assert_eq!(
            formula.add_clause(clause![a.pos_lit()], Weight::Soft(0)),
            Err(FormulaError::ZeroWeight)
        );
        formula.add_clause(clause![a.pos_lit()], Weight::Hard).unwrap();
        assert_eq!(formula.n_clauses(), 1);
    }

    #[test]
    fn batch_add() {
        let mut formula = WcnfFormula::new();
        let a = formula.new_var();
        let b = formula.new_var();
        formula
            .add_clauses([clause![a.neg_lit()], clause![b.neg_lit()]], Weight::Soft(3))
            .unwrap();
        formula
            .add_clauses([clause![a.pos_lit(), b.pos_lit()]], Weight::Hard)
            .unwrap();
        assert_eq!(formula.n_soft(), 2);
        assert_eq!(formula.n_hard(), 1);
        assert_eq!(formula.soft_weight_sum(), 6);
        assert_eq!(formula.top(), 7);
    }

    #[test]
    fn cost_of_assignment() {
        let mut formula = WcnfFormula::new();
        let a = formula.new_var();
        let b = formula.new_var();
        formula.add_clause(clause![a.neg_lit()], Weight::Soft(1)).unwrap();
        formula.add_clause(clause![b.neg_lit()], Weight::Soft(2)).unwrap();
        formula
            .add_clause(clause![a.pos_lit(), b.pos_lit()], Weight::Hard)
            .unwrap();
        let assign = Assignment::from(vec![TernaryVal::True, TernaryVal::False]);
        assert_eq!(formula.cost(&assign), Some(1));
        let assign = Assignment::from(vec![TernaryVal::True, TernaryVal::True]);
        assert_eq!(formula.cost(&assign), Some(3));
        let assign = Assignment::from(vec![TernaryVal::False, TernaryVal::False]);
        assert_eq!(formula.cost(&assign), None);
    }
}
