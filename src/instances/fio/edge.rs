//! # Parsing DIMACS Edge Files
//!
//! Graphs in the format of the DIMACS graph coloring challenge:
//!
//! ```text
//! c optional comments
//! p edge <nodes> <edges>
//! e <node> <node>
//! ```
//!
//! Duplicate edges (in either direction) are read once. If the header
//! declares a different number of edges than the number of distinct edges,
//! a warning is logged and parsing continues.

use std::io::BufRead;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{self as cc, digit1, space0, space1},
    combinator::{all_consuming, map_res},
    sequence::tuple,
    IResult,
};

use crate::instances::Graph;

use super::{FormatError, LineReader};

/// Parses a graph in DIMACS edge format
///
/// # Errors
///
/// If the header is missing, duplicated or malformed, if a line is neither a
/// comment nor an edge, or if an edge is invalid.
pub fn parse_graph<R: BufRead>(reader: R) -> Result<Graph, FormatError> {
    let mut lines = LineReader::new(reader);
    let mut graph: Option<Graph> = None;
    while let Some((line_num, line)) = lines.next_line()? {
        if line.starts_with('c') {
            continue;
        }
        if line.starts_with('p') {
            if graph.is_some() {
                return Err(FormatError::UnexpectedLine {
                    line: line_num,
                    content: line.to_string(),
                    expected: "an edge or comment line",
                });
            }
            let (_, (n_nodes, n_edges)) =
                all_consuming(p_line)(line).map_err(|_| FormatError::InvalidHeader {
                    line: line_num,
                    content: line.to_string(),
                })?;
            graph = Some(Graph::with_declared_edges(n_nodes, n_edges));
            continue;
        }
        let Some(graph) = graph.as_mut() else {
            return Err(FormatError::UnexpectedLine {
                line: line_num,
                content: line.to_string(),
                expected: "a `p edge` header",
            });
        };
        if !line.starts_with('e') {
            return Err(FormatError::UnexpectedLine {
                line: line_num,
                content: line.to_string(),
                expected: "an edge or comment line",
            });
        }
        let (_, (u, v)) = all_consuming(e_line)(line).map_err(|_| FormatError::InvalidLine {
            line: line_num,
            content: line.to_string(),
            reason: "expected `e <node> <node>`",
        })?;
        if let Some(node) = [u, v].into_iter().find(|n| !graph.nodes().contains(n)) {
            return Err(FormatError::NodeOutOfRange {
                line: line_num,
                node,
                n_nodes: graph.n_nodes(),
            });
        }
        if u == v {
            return Err(FormatError::SelfLoop {
                line: line_num,
                node: u,
            });
        }
        graph.add_edge(u, v);
    }
    let graph = graph.ok_or(FormatError::MissingHeader {
        line: lines.next_line_num(),
    })?;
    if let Some(mismatch) = graph.edge_count_mismatch() {
        tracing::warn!("incorrect number of edges: {mismatch}");
    }
    tracing::debug!(
        nodes = graph.n_nodes(),
        edges = graph.n_edges(),
        "parsed graph"
    );
    Ok(graph)
}

/// Parses `p edge <nodes> <edges>`, also accepting `col` as the format token
fn p_line(input: &str) -> IResult<&str, (u32, usize)> {
    let (input, (_, _, _, _, n_nodes, _, n_edges, _)) = tuple((
        tag("p"),
        space1,
        alt((tag("edge"), tag("col"))),
        space1,
        cc::u32,
        space1,
        map_res(digit1, str::parse::<usize>),
        space0,
    ))(input)?;
    Ok((input, (n_nodes, n_edges)))
}

/// Parses `e <node> <node>`
fn e_line(input: &str) -> IResult<&str, (u32, u32)> {
    let (input, (_, _, u, _, v, _)) =
        tuple((tag("e"), space1, cc::u32, space1, cc::u32, space0))(input)?;
    Ok((input, (u, v)))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{e_line, p_line, parse_graph};
    use crate::instances::{fio::FormatError, Edge, EdgeCountMismatch};

    #[test]
    fn p_line_pass() {
        assert_eq!(p_line("p edge 5 7"), Ok(("", (5, 7))));
        assert_eq!(p_line("p col 3 0 "), Ok(("", (3, 0))));
    }

    #[test]
    fn p_line_fail() {
        assert!(p_line("p cnf 5 7").is_err());
        assert!(p_line("p edge 5").is_err());
        assert!(p_line("p edge -5 7").is_err());
    }

    #[test]
    fn e_line_pass() {
        assert_eq!(e_line("e 1 2"), Ok(("", (1, 2))));
        assert_eq!(e_line("e  10\t3"), Ok(("", (10, 3))));
        assert!(e_line("e 1").is_err());
    }

    #[test]
    fn parse_triangle() {
        let data = "c a triangle\np edge 3 3\ne 1 2\ne 2 3\n\ne 1 3\n";
        let graph = parse_graph(Cursor::new(data)).unwrap();
        assert_eq!(graph.n_nodes(), 3);
        assert_eq!(graph.n_edges(), 3);
        assert!(graph.has_edge(3, 1));
        assert_eq!(graph.edge_count_mismatch(), None);
    }

    #[test]
    fn duplicates_are_a_warning() {
        let data = "p edge 3 3\ne 1 2\ne 2 1\ne 1 2\n";
        let graph = parse_graph(Cursor::new(data)).unwrap();
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![Edge::new(1, 2)]);
        assert_eq!(
            graph.edge_count_mismatch(),
            Some(EdgeCountMismatch {
                declared: 3,
                actual: 1
            })
        );
    }

    #[test]
    fn missing_header() {
        assert!(matches!(
            parse_graph(Cursor::new("c nothing\n")),
            Err(FormatError::MissingHeader { line: 2 })
        ));
        assert!(matches!(
            parse_graph(Cursor::new("e 1 2\n")),
            Err(FormatError::UnexpectedLine { line: 1, .. })
        ));
    }

    #[test]
    fn malformed_lines() {
        assert!(matches!(
            parse_graph(Cursor::new("p edge three 1\n")),
            Err(FormatError::InvalidHeader { line: 1, .. })
        ));
        assert!(matches!(
            parse_graph(Cursor::new("p edge 3 1\np edge 3 1\n")),
            Err(FormatError::UnexpectedLine { line: 2, .. })
        ));
        assert!(matches!(
            parse_graph(Cursor::new("p edge 3 1\ne 1\n")),
            Err(FormatError::InvalidLine { line: 2, .. })
        ));
        assert!(matches!(
            parse_graph(Cursor::new("p edge 3 1\nx 1 2\n")),
            Err(FormatError::UnexpectedLine { line: 2, .. })
        ));
    }

    #[test]
    fn invalid_edges() {
        assert!(matches!(
            parse_graph(Cursor::new("p edge 3 1\ne 1 4\n")),
            Err(FormatError::NodeOutOfRange {
                line: 2,
                node: 4,
                n_nodes: 3
            })
        ));
        assert!(matches!(
            parse_graph(Cursor::new("p edge 3 1\ne 0 1\n")),
            Err(FormatError::NodeOutOfRange { node: 0, .. })
        ));
        assert!(matches!(
            parse_graph(Cursor::new("p edge 3 1\ne 2 2\n")),
            Err(FormatError::SelfLoop { line: 2, node: 2 })
        ));
    }
}
