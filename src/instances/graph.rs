//! # Undirected Graphs
//!
//! Simple undirected graphs with nodes labeled `1..=n`, as read from the
//! DIMACS edge format.

use std::{collections::BTreeSet, fmt, io, ops::RangeInclusive, path::Path};

use itertools::Itertools;

use super::fio::{self, FormatError};

/// An undirected edge between two distinct nodes. The smaller label is always
/// stored first, so `Edge::new(2, 1) == Edge::new(1, 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(u32, u32);

impl Edge {
    /// Creates a normalized edge
    ///
    /// # Panics
    ///
    /// If `u == v`.
    #[must_use]
    pub fn new(u: u32, v: u32) -> Edge {
        assert_ne!(u, v, "self-loops are not edges of a simple graph");
        if u < v {
            Edge(u, v)
        } else {
            Edge(v, u)
        }
    }

    /// Gets the two endpoints, smaller label first
    #[must_use]
    pub fn nodes(self) -> (u32, u32) {
        (self.0, self.1)
    }

    /// Checks whether a node is an endpoint of the edge
    #[must_use]
    pub fn touches(self, node: u32) -> bool {
        self.0 == node || self.1 == node
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.0, self.1)
    }
}

/// The header of a graph file declared a different number of edges than the
/// number of distinct edges found in the file. This is only a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCountMismatch {
    /// The edge count declared in the header
    pub declared: usize,
    /// The number of distinct edges in the file
    pub actual: usize,
}

impl fmt::Display for EdgeCountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "header declares {} edges but {} distinct edges were read",
            self.declared, self.actual
        )
    }
}

/// Type representing a simple undirected graph
#[derive(Debug, Clone, Default)]
pub struct Graph {
    n_nodes: u32,
    edges: BTreeSet<Edge>,
    /// Edge count from the file header, if the graph was parsed
    declared_edges: Option<usize>,
}

/// Graphs are equal if they have the same nodes and edges
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.n_nodes == other.n_nodes && self.edges == other.edges
    }
}

impl Eq for Graph {}

impl Graph {
    /// Creates a graph with `n_nodes` nodes and no edges
    #[must_use]
    pub fn new(n_nodes: u32) -> Self {
        Graph {
            n_nodes,
            edges: BTreeSet::new(),
            declared_edges: None,
        }
    }

    pub(crate) fn with_declared_edges(n_nodes: u32, declared_edges: usize) -> Self {
        Graph {
            declared_edges: Some(declared_edges),
            ..Graph::new(n_nodes)
        }
    }

    /// Adds an undirected edge. Returns `false` if the edge was already
    /// present.
    ///
    /// # Panics
    ///
    /// If `u == v` or one of the nodes is not in `1..=n`.
    pub fn add_edge(&mut self, u: u32, v: u32) -> bool {
        assert!(
            self.nodes().contains(&u) && self.nodes().contains(&v),
            "edge {{{u}, {v}}} is out of the node range 1..={}",
            self.n_nodes
        );
        self.edges.insert(Edge::new(u, v))
    }

    /// Gets the number of nodes
    #[must_use]
    pub fn n_nodes(&self) -> u32 {
        self.n_nodes
    }

    /// Gets the number of distinct edges
    #[must_use]
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Gets the node labels
    #[must_use]
    pub fn nodes(&self) -> RangeInclusive<u32> {
        1..=self.n_nodes
    }

    /// Iterates over the edges in ascending order
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// Checks whether two distinct nodes are adjacent
    #[must_use]
    pub fn has_edge(&self, u: u32, v: u32) -> bool {
        u != v && self.edges.contains(&Edge::new(u, v))
    }

    /// Compares the edge count declared in the file header with the number of
    /// distinct edges. Returns [`None`] for graphs that were not parsed or
    /// when the counts agree.
    #[must_use]
    pub fn edge_count_mismatch(&self) -> Option<EdgeCountMismatch> {
        let declared = self.declared_edges?;
        (declared != self.n_edges()).then_some(EdgeCountMismatch {
            declared,
            actual: self.n_edges(),
        })
    }

    /// Computes all pairs of distinct nodes that are _not_ connected by an
    /// edge. This is quadratic in the number of nodes.
    #[must_use]
    pub fn complement(&self) -> BTreeSet<Edge> {
        self.nodes()
            .tuple_combinations()
            .map(|(u, v)| Edge(u, v))
            .filter(|e| !self.edges.contains(e))
            .collect()
    }

    /// Builds the complement graph on the same nodes
    #[must_use]
    pub fn complement_graph(&self) -> Graph {
        Graph {
            n_nodes: self.n_nodes,
            edges: self.complement(),
            declared_edges: None,
        }
    }

    /// Counts the edges with exactly one endpoint in `side`
    #[must_use]
    pub fn crossing_edges(&self, side: &[u32]) -> usize {
        let side: BTreeSet<u32> = side.iter().copied().collect();
        self.edges
            .iter()
            .filter(|e| side.contains(&e.0) != side.contains(&e.1))
            .count()
    }

    /// Checks whether every edge has an endpoint in `nodes`
    #[must_use]
    pub fn is_vertex_cover(&self, nodes: &[u32]) -> bool {
        self.edges
            .iter()
            .all(|e| nodes.iter().any(|&n| e.touches(n)))
    }

    /// Checks whether `nodes` are pairwise adjacent
    #[must_use]
    pub fn is_clique(&self, nodes: &[u32]) -> bool {
        nodes
            .iter()
            .tuple_combinations()
            .all(|(&u, &v)| self.has_edge(u, v))
    }

    /// Parses a graph in DIMACS edge format from a reader
    ///
    /// # Errors
    ///
    /// [`FormatError`] if the input is malformed
    pub fn parse<R: io::BufRead>(reader: R) -> Result<Graph, FormatError> {
        fio::edge::parse_graph(reader)
    }

    /// Parses a graph in DIMACS edge format from a file. With feature
    /// `compression`, `.bz2`, `.gz` and `.xz` files are decompressed.
    ///
    /// # Errors
    ///
    /// If the file cannot be opened or is malformed
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Graph, FormatError> {
        let reader = fio::open_compressed_uncompressed_read(path)?;
        Graph::parse(io::BufReader::new(reader))
    }
}
