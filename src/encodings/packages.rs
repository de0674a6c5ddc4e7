//! # Package Upgrades as MaxSAT
//!
//! Every package is a variable that is true if the package is installed. A
//! soft unit `[x_p]` per package asks for as many installed packages as
//! possible; a dependency group becomes the hard clause
//! `[!dependent | req_1 | ... | req_k]` and a conflict the hard clause
//! `[!a | !b]`. The cost of an optimal solution is the number of packages
//! that cannot be installed.

use crate::{
    clause,
    instances::{Conflict, FormulaError, PackageInstance, WcnfFormula, Weight},
    solvers::MaxSatSolution,
    types::Var,
};

use super::{atomics, EncodeStats};

/// The package reduction
#[derive(Debug, Clone)]
pub struct PackageEncoding {
    formula: WcnfFormula,
    package_vars: Vec<Var>,
}

impl PackageEncoding {
    /// Gets the encoded formula
    #[must_use]
    pub fn formula(&self) -> &WcnfFormula {
        &self.formula
    }

    /// Gets the package variables in declaration order
    #[must_use]
    pub fn package_vars(&self) -> &[Var] {
        &self.package_vars
    }

    /// Decodes a solution into the ids of the packages that are not
    /// installed, in declaration order
    #[must_use]
    pub fn removed(&self, solution: &MaxSatSolution) -> Vec<u32> {
        crate::decode::false_vars(solution, self.package_vars.iter().copied())
            .map(Var::to_ipasir)
            .collect()
    }

    /// Decodes a solution into the ids of the packages that are installed,
    /// in declaration order
    #[must_use]
    pub fn installed(&self, solution: &MaxSatSolution) -> Vec<u32> {
        crate::decode::true_vars(solution, self.package_vars.iter().copied())
            .map(Var::to_ipasir)
            .collect()
    }
}

impl EncodeStats for PackageEncoding {
    fn n_clauses(&self) -> usize {
        self.formula.n_clauses()
    }

    fn n_vars(&self) -> u32 {
        self.formula.n_vars()
    }
}

/// Encodes a package upgrade instance. The variables of the formula are the
/// package variables of the instance.
///
/// # Errors
///
/// Never for a valid instance, the error only comes from the formula interface
pub fn encode(inst: &PackageInstance) -> Result<PackageEncoding, FormulaError> {
    let mut formula = WcnfFormula::with_var_manager(inst.packages().var_manager());
    let package_vars: Vec<Var> = inst.packages().iter().map(|(_, var)| var).collect();
    formula.add_clauses(
        package_vars.iter().map(|var| clause![var.pos_lit()]),
        Weight::Soft(1),
    )?;
    for dep in inst.dependencies() {
        let reqs: Vec<_> = dep.requirements.iter().map(|var| var.pos_lit()).collect();
        formula.add_clause(
            atomics::lit_impl_clause(dep.dependent.pos_lit(), &reqs),
            Weight::Hard,
        )?;
    }
    for &Conflict(a, b) in inst.conflicts() {
        formula.add_clause(atomics::not_both(a.pos_lit(), b.pos_lit()), Weight::Hard)?;
    }
    let enc = PackageEncoding {
        formula,
        package_vars,
    };
    tracing::debug!(
        vars = enc.n_vars(),
        clauses = enc.n_clauses(),
        hard = enc.formula.n_hard(),
        "encoded package instance"
    );
    Ok(enc)
}

#[cfg(test)]
mod tests {
    use super::encode;
    use crate::{
        clause,
        encodings::EncodeStats,
        instances::{Conflict, Dependency, PackageInstance, Weight},
        lit,
        solvers::MaxSatSolution,
        types::{Assignment, TernaryVal},
    };

    fn instance() -> PackageInstance {
        let mut inst = PackageInstance::new();
        let a = inst.add_package("a").unwrap();
        let b = inst.add_package("b").unwrap();
        let c = inst.add_package("c").unwrap();
        inst.add_dependency(Dependency {
            dependent: a,
            requirements: vec![b],
        });
        inst.add_conflict(Conflict(b, c));
        inst
    }

    #[test]
    fn clauses() {
        let enc = encode(&instance()).unwrap();
        assert_eq!(enc.n_vars(), 3);
        let clauses: Vec<_> = enc.formula().iter().cloned().collect();
        assert_eq!(
            clauses,
            vec![
                (clause![lit![0]], Weight::Soft(1)),
                (clause![lit![1]], Weight::Soft(1)),
                (clause![lit![2]], Weight::Soft(1)),
                (clause![!lit![0], lit![1]], Weight::Hard),
                (clause![!lit![1], !lit![2]], Weight::Hard),
            ]
        );
    }

    #[test]
    fn decode() {
        let enc = encode(&instance()).unwrap();
        let assignment = Assignment::from(vec![
            TernaryVal::True,
            TernaryVal::True,
            TernaryVal::False,
        ]);
        let sol = MaxSatSolution::validate(enc.formula(), 1, assignment).unwrap();
        assert_eq!(sol.cost, 1);
        assert_eq!(enc.removed(&sol), vec![3]);
        assert_eq!(enc.installed(&sol), vec![1, 2]);
    }

    #[test]
    fn empty_instance() {
        let enc = encode(&PackageInstance::new()).unwrap();
        assert!(enc.formula().is_empty());
        assert_eq!(enc.n_vars(), 0);
    }
}
