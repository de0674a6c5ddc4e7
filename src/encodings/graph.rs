//! # Graph Problems as MaxSAT
//!
//! All three reductions allocate one variable per node, in label order, so
//! node `v` is represented by the variable with DIMACS id `v`.
//!
//! - **Minimum vertex cover**: a soft unit `[!x_v]` per node and a hard
//!   clause `[x_u | x_v]` per edge.
//! - **Maximum clique**: a soft unit `[x_v]` per node and a hard clause
//!   `[!x_u | !x_v]` per edge of the complement graph.
//! - **Maximum cut**: for every edge the soft clauses `[x_u | x_v]` and
//!   `[!x_u | !x_v]`. An edge with both endpoints on the same side falsifies
//!   exactly one of the two, so the cost is the number of uncut edges.
//!
//! Isolated nodes are unconstrained in all three reductions.

use crate::{
    clause,
    instances::{FormulaError, Graph, WcnfFormula, Weight},
    solvers::MaxSatSolution,
    types::{Lit, Var},
};

use super::{atomics, EncodeStats};

/// A graph reduction: the formula and the variable of every node
#[derive(Debug, Clone)]
pub struct GraphEncoding {
    formula: WcnfFormula,
    node_vars: Vec<Var>,
}

impl GraphEncoding {
    fn new(graph: &Graph) -> Self {
        let mut formula = WcnfFormula::new();
        let node_vars = graph.nodes().map(|_| formula.new_var()).collect();
        GraphEncoding { formula, node_vars }
    }

    fn lit(&self, node: u32) -> Lit {
        self.node_vars[node as usize - 1].pos_lit()
    }

    /// Gets the encoded formula
    #[must_use]
    pub fn formula(&self) -> &WcnfFormula {
        &self.formula
    }

    /// Gets the variable of a node
    ///
    /// # Panics
    ///
    /// If the node is not in the graph
    #[must_use]
    pub fn node_var(&self, node: u32) -> Var {
        self.lit(node).var()
    }

    /// Gets the variables of all nodes in label order
    #[must_use]
    pub fn node_vars(&self) -> &[Var] {
        &self.node_vars
    }

    /// Decodes a solution into the labels of the nodes whose variable is
    /// true, in variable order
    #[must_use]
    pub fn selected_nodes(&self, solution: &MaxSatSolution) -> Vec<u32> {
        crate::decode::true_vars(solution, self.node_vars.iter().copied())
            .map(Var::to_ipasir)
            .collect()
    }
}

impl EncodeStats for GraphEncoding {
    fn n_clauses(&self) -> usize {
        self.formula.n_clauses()
    }

    fn n_vars(&self) -> u32 {
        self.formula.n_vars()
    }
}

/// Encodes minimum vertex cover
///
/// # Errors
///
/// Never for a valid graph, the error only comes from the formula interface
pub fn vertex_cover(graph: &Graph) -> Result<GraphEncoding, FormulaError> {
    let mut enc = GraphEncoding::new(graph);
    for node in graph.nodes() {
        let lit = enc.lit(node);
        enc.formula.add_clause(clause![!lit], Weight::Soft(1))?;
    }
    for edge in graph.edges() {
        let (u, v) = edge.nodes();
        let cl = atomics::either(enc.lit(u), enc.lit(v));
        enc.formula.add_clause(cl, Weight::Hard)?;
    }
    log_encoding("vertex cover", &enc);
    Ok(enc)
}

/// Encodes maximum clique
///
/// # Errors
///
/// Never for a valid graph, the error only comes from the formula interface
pub fn clique(graph: &Graph) -> Result<GraphEncoding, FormulaError> {
    let mut enc = GraphEncoding::new(graph);
    for node in graph.nodes() {
        let lit = enc.lit(node);
        enc.formula.add_clause(clause![lit], Weight::Soft(1))?;
    }
    for edge in graph.complement() {
        let (u, v) = edge.nodes();
        let cl = atomics::not_both(enc.lit(u), enc.lit(v));
        enc.formula.add_clause(cl, Weight::Hard)?;
    }
    log_encoding("clique", &enc);
    Ok(enc)
}

/// Encodes maximum cut
///
/// # Errors
///
/// Never for a valid graph, the error only comes from the formula interface
pub fn cut(graph: &Graph) -> Result<GraphEncoding, FormulaError> {
    let mut enc = GraphEncoding::new(graph);
    for edge in graph.edges() {
        let (u, v) = edge.nodes();
        let (u, v) = (enc.lit(u), enc.lit(v));
        enc.formula.add_clauses(
            [atomics::either(u, v), atomics::not_both(u, v)],
            Weight::Soft(1),
        )?;
    }
    log_encoding("cut", &enc);
    Ok(enc)
}

fn log_encoding(problem: &str, enc: &GraphEncoding) {
    tracing::debug!(
        problem,
        vars = enc.n_vars(),
        clauses = enc.n_clauses(),
        hard = enc.formula.n_hard(),
        "encoded graph problem"
    );
}
