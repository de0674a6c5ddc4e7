//! # satreduce - Problem Reductions to Weighted Partial MaxSAT
//!
//! `satreduce` encodes classic graph problems (minimum vertex cover, maximum
//! clique, maximum cut) and package upgrade problems as weighted partial
//! MaxSAT formulas, hands them to an external MaxSAT solver and decodes the
//! solver's assignment back into a solution of the original problem.
//!
//! ## Example
//!
//! ```no_run
//! use std::process::Command;
//! use satreduce::{algs, instances::Graph, solvers::ExternalSolver};
//!
//! let graph = Graph::from_path("graph.col").unwrap();
//! let mut solver = ExternalSolver::new_default(Command::new("<path to solver binary>"));
//! let cover = algs::min_vertex_cover(&graph, &mut solver).unwrap();
//! println!("MVC {:?}", cover.nodes);
//! ```
//!
//! ## Features
//!
//! | Feature name | Description |
//! | --- | --- |
//! | `fxhash` | Use the faster firefox hash function from `rustc-hash` for the package registry. |
//! | `compression` | Enable parsing compressed input and writing compressed WCNF files. |

pub mod algs;
pub mod decode;
pub mod encodings;
pub mod instances;
pub mod solvers;
pub mod types;
