//! # Module for File IO (Writing and Parsing)
//!
//! Parsers for the two input formats (DIMACS edge graphs and package upgrade
//! instances), the DIMACS WCNF writer, and the parser for the output of
//! MaxSAT solvers. It is recommended to go through the interface of the
//! instance types rather than using these functions directly.

use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
};

use thiserror::Error;

use crate::types::{Assignment, InvalidVLine};

pub mod dimacs;
pub mod edge;
pub mod spu;

/// Errors for malformed input files. All variants except IO errors carry the
/// 1-based number of the offending line.
#[derive(Error, Debug)]
pub enum FormatError {
    /// IO error reading the input
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The input ended before a header line was found
    #[error("line {line}: missing header")]
    MissingHeader {
        /// The line number
        line: usize,
    },
    /// The header line could not be parsed
    #[error("line {line}: invalid header `{content}`")]
    InvalidHeader {
        /// The line number
        line: usize,
        /// The offending line
        content: String,
    },
    /// A line marker that is not allowed at this position
    #[error("line {line}: unexpected line `{content}`, expected {expected}")]
    UnexpectedLine {
        /// The line number
        line: usize,
        /// The offending line
        content: String,
        /// What would have been valid
        expected: &'static str,
    },
    /// A line with a valid marker but malformed content
    #[error("line {line}: invalid line `{content}`: {reason}")]
    InvalidLine {
        /// The line number
        line: usize,
        /// The offending line
        content: String,
        /// What is wrong with it
        reason: &'static str,
    },
    /// An edge endpoint outside of `1..=n`
    #[error("line {line}: node {node} is out of the range 1..={n_nodes}")]
    NodeOutOfRange {
        /// The line number
        line: usize,
        /// The offending node
        node: u32,
        /// The number of nodes declared in the header
        n_nodes: u32,
    },
    /// An edge from a node to itself
    #[error("line {line}: self-loop on node {node}")]
    SelfLoop {
        /// The line number
        line: usize,
        /// The offending node
        node: u32,
    },
    /// A package name declared twice
    #[error("line {line}: package `{name}` is declared twice")]
    DuplicatePackage {
        /// The line number
        line: usize,
        /// The package name
        name: String,
    },
    /// A reference to a package that was never declared
    #[error("line {line}: unknown package `{name}`")]
    UnknownPackage {
        /// The line number
        line: usize,
        /// The package name
        name: String,
    },
}

/// Reads non-empty lines and keeps track of line numbers
#[derive(Debug)]
pub(crate) struct LineReader<R> {
    reader: R,
    buffer: String,
    line_num: usize,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        LineReader {
            reader,
            buffer: String::new(),
            line_num: 0,
        }
    }

    /// Loads the next non-empty line and returns it trimmed, together with
    /// its 1-based number. Returns [`None`] at the end of the input.
    pub(crate) fn next_line(&mut self) -> Result<Option<(usize, &str)>, io::Error> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_num += 1;
            // tolerate empty lines
            if !self.buffer.trim().is_empty() {
                break;
            }
        }
        Ok(Some((self.line_num, self.buffer.trim())))
    }

    /// The number of the line that would be read next
    pub(crate) fn next_line_num(&self) -> usize {
        self.line_num + 1
    }
}

/// Opens a reader for the file at Path.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub(crate) fn open_compressed_uncompressed_read<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn io::Read>, io::Error> {
    let path = path.as_ref();
    let raw_reader = File::open(path)?;
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            return Ok(Box::new(bzip2::read::BzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            return Ok(Box::new(flate2::read::GzDecoder::new(raw_reader)));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            return Ok(Box::new(xz2::read::XzDecoder::new(raw_reader)));
        }
    }
    Ok(Box::new(raw_reader))
}

/// Opens a writer for the file at Path.
/// With feature `compression` supports bzip2, gzip and xz compression.
pub(crate) fn open_compressed_uncompressed_write<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn io::Write>, io::Error> {
    let path = path.as_ref();
    let raw_writer = File::create(path)?;
    #[cfg(feature = "compression")]
    if let Some(ext) = path.extension() {
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("bz2")) {
            return Ok(Box::new(io::BufWriter::new(bzip2::write::BzEncoder::new(
                raw_writer,
                bzip2::Compression::fast(),
            ))));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("gz")) {
            return Ok(Box::new(io::BufWriter::new(flate2::write::GzEncoder::new(
                raw_writer,
                flate2::Compression::fast(),
            ))));
        }
        if ext.eq_ignore_ascii_case(std::ffi::OsStr::new("xz")) {
            return Ok(Box::new(io::BufWriter::new(xz2::write::XzEncoder::new(
                raw_writer, 1,
            ))));
        }
    }
    Ok(Box::new(io::BufWriter::new(raw_writer)))
}

/// The result reported by a MaxSAT solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverOutput {
    /// `s OPTIMUM FOUND`
    Optimum {
        /// The cost from the last `o` line
        cost: usize,
        /// The assignment from the `v` line(s)
        assignment: Assignment,
    },
    /// `s SATISFIABLE`, a solution without proof of optimality
    Satisfiable {
        /// The cost from the last `o` line
        cost: usize,
        /// The assignment from the `v` line(s)
        assignment: Assignment,
    },
    /// `s UNSATISFIABLE`, the hard clauses cannot be satisfied
    Unsat,
    /// `s UNKNOWN`
    Unknown,
}

/// Errors in the output of a MaxSAT solver
#[derive(Error, Debug)]
pub enum MaxSatOutputError {
    /// IO error reading the output
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// No status line
    #[error("no solution line found in the output")]
    NoSline,
    /// No cost line for a solution
    #[error("no cost line found in the output")]
    NoOline,
    /// No value line for a solution
    #[error("no value line found in the output")]
    NoVline,
    /// Status line with unknown status
    #[error("invalid solution line: {0}")]
    InvalidSLine(String),
    /// Cost line without a valid cost
    #[error("invalid cost line: {0}")]
    InvalidOLine(String),
    /// Invalid value line
    #[error(transparent)]
    InvalidVLine(#[from] InvalidVLine),
}

/// Parses the output of a MaxSAT solver in the format of the MaxSAT
/// evaluations
///
/// Value lines can either list signed literals (`v 1 -2 3`, possibly over
/// several lines) or be a single binary string (`v 100`). The output is read
/// as a binary string only if it has exactly one value line consisting of a
/// single token of `0`s and `1`s with one character per variable of the
/// formula, i.e., `n_vars` characters. Otherwise, e.g., `v 10` for a formula
/// with ten variables, value lines are read as signed literals.
///
/// Parsing stops at the status line for unsatisfiable or unknown results, so
/// the reader is not necessarily consumed.
///
/// # Errors
///
/// If the output is incomplete or malformed.
pub fn parse_maxsat_solver_output<R: BufRead>(
    reader: R,
    n_vars: u32,
) -> Result<SolverOutput, MaxSatOutputError> {
    let mut optimum = None;
    let mut cost = None;
    let mut vlines: Vec<String> = vec![];

    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();

        if let Some(status) = line.strip_prefix("s ") {
            match status.trim() {
                "OPTIMUM FOUND" => optimum = Some(true),
                "SATISFIABLE" => optimum = Some(false),
                "UNSATISFIABLE" => return Ok(SolverOutput::Unsat),
                "UNKNOWN" | "INDETERMINATE" => return Ok(SolverOutput::Unknown),
                _ => return Err(MaxSatOutputError::InvalidSLine(line.to_string())),
            }
        } else if let Some(value) = line.strip_prefix("o ") {
            cost = Some(
                value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| MaxSatOutputError::InvalidOLine(line.to_string()))?,
            );
        } else if line == "v" || line.starts_with("v ") {
            vlines.push(line.to_string());
        }
    }

    let Some(optimum) = optimum else {
        return Err(MaxSatOutputError::NoSline);
    };
    let cost = cost.ok_or(MaxSatOutputError::NoOline)?;
    let assignment = match vlines.as_slice() {
        [] => return Err(MaxSatOutputError::NoVline),
        [line] if is_binary_vline(line, n_vars) => Assignment::from_binary_vline(line)?,
        lines => {
            let mut assign = Assignment::default();
            for line in lines {
                assign.extend_from_vline(line)?;
            }
            assign
        }
    };
    if optimum {
        Ok(SolverOutput::Optimum { cost, assignment })
    } else {
        Ok(SolverOutput::Satisfiable { cost, assignment })
    }
}

fn is_binary_vline(line: &str, n_vars: u32) -> bool {
    let body = line[1..].trim();
    body.len() == n_vars as usize && body.chars().all(|c| c == '0' || c == '1')
}
