//! # Reduction Pipelines
//!
//! Each pipeline encodes a problem instance, solves the formula with a
//! [`SolveMaxSat`] implementation and decodes the solution. A pipeline builds
//! its own formula, so pipelines can be run one after another with the same
//! solver.

use thiserror::Error;

use crate::{
    encodings::{self, graph::GraphEncoding},
    instances::{fio::FormatError, FormulaError, Graph, PackageInstance},
    solvers::{SolveMaxSat, SolverError},
};

/// Errors of a reduction pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// The input could not be parsed
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The formula could not be built
    #[error(transparent)]
    Formula(#[from] FormulaError),
    /// The solver failed
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// A set of nodes with the cost of the optimal solution it was decoded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSolution {
    /// The labels of the selected nodes, in increasing order
    pub nodes: Vec<u32>,
    /// The cost of the MaxSAT solution
    pub cost: usize,
    /// The optimized quantity of the graph problem: the size of the cover,
    /// the size of the clique or the number of cut edges
    pub value: usize,
}

impl GraphSolution {
    /// Gets the nodes among `1..=n_nodes` that are not selected. For a cut,
    /// this is the other side.
    #[must_use]
    pub fn other_side(&self, n_nodes: u32) -> Vec<u32> {
        (1..=n_nodes)
            .filter(|node| self.nodes.binary_search(node).is_err())
            .collect()
    }
}

/// The outcome of a package upgrade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSelection {
    /// The number of packages that cannot be installed
    pub cost: usize,
    /// The ids of the packages that are not installed
    pub removed: Vec<u32>,
    /// The ids of the installed packages
    pub installed: Vec<u32>,
}

fn solve_graph<S, F>(enc: GraphEncoding, solver: &mut S, value: F) -> Result<GraphSolution, Error>
where
    S: SolveMaxSat + ?Sized,
    F: FnOnce(usize) -> usize,
{
    let solution = solver.solve(enc.formula())?;
    Ok(GraphSolution {
        nodes: enc.selected_nodes(&solution),
        cost: solution.cost,
        value: value(solution.cost),
    })
}

/// Finds a minimum vertex cover. The cost and the value are both the size of
/// the cover.
///
/// # Errors
///
/// If the solver fails
pub fn min_vertex_cover<S>(graph: &Graph, solver: &mut S) -> Result<GraphSolution, Error>
where
    S: SolveMaxSat + ?Sized,
{
    solve_graph(encodings::graph::vertex_cover(graph)?, solver, |cost| cost)
}

/// Finds a maximum clique. The cost is the number of nodes outside of the
/// clique, the value is the size of the clique.
///
/// # Errors
///
/// If the solver fails
pub fn max_clique<S>(graph: &Graph, solver: &mut S) -> Result<GraphSolution, Error>
where
    S: SolveMaxSat + ?Sized,
{
    let n_nodes = graph.n_nodes() as usize;
    solve_graph(encodings::graph::clique(graph)?, solver, |cost| n_nodes - cost)
}

/// Finds a maximum cut. The nodes are one side of the cut. The cost is the
/// number of edges that are not cut, the value is the number of cut edges.
///
/// # Errors
///
/// If the solver fails
pub fn max_cut<S>(graph: &Graph, solver: &mut S) -> Result<GraphSolution, Error>
where
    S: SolveMaxSat + ?Sized,
{
    let n_edges = graph.n_edges();
    solve_graph(encodings::graph::cut(graph)?, solver, |cost| n_edges - cost)
}

/// Installs as many packages as possible while respecting all dependencies
/// and conflicts
///
/// # Errors
///
/// If the solver fails, e.g., with [`SolverError::Unsatisfiable`]
pub fn upgrade<S>(inst: &PackageInstance, solver: &mut S) -> Result<PackageSelection, Error>
where
    S: SolveMaxSat + ?Sized,
{
    let enc = encodings::packages::encode(inst)?;
    let solution = solver.solve(enc.formula())?;
    Ok(PackageSelection {
        cost: solution.cost,
        removed: enc.removed(&solution),
        installed: enc.installed(&solution),
    })
}

#[cfg(test)]
mod tests {
    use super::GraphSolution;

    #[test]
    fn other_side() {
        let sol = GraphSolution {
            nodes: vec![1, 3],
            cost: 0,
            value: 2,
        };
        assert_eq!(sol.other_side(5), vec![2, 4, 5]);
        assert_eq!(sol.other_side(0), Vec::<u32>::new());
    }
}
