#![cfg(unix)]

use std::{fs, process::Command};

use satreduce::{
    algs,
    instances::{fio::dimacs::WcnfFormat, Graph, PackageInstance},
    solvers::{
        external::{InputVia, OutputVia},
        ExternalSolver, SolveMaxSat, SolverError,
    },
    var,
};

mod common;
use common::data;

/// A shell "solver". The instance file, if any, is `$0`.
fn sh(script: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    cmd
}

fn triangle() -> Graph {
    Graph::from_path(data("triangle.col")).unwrap()
}

const TRIANGLE_COVER: &str = "printf 'c fake solver\\no 2\\ns OPTIMUM FOUND\\nv -1 2 3 -4\\n'";

#[test]
fn tempfile_pipe() {
    // the vertex cover of the triangle has 4 vars, 4 soft and 3 hard clauses
    let script = format!("grep -q '^p wcnf 4 7 5$' \"$0\" || exit 1; {TRIANGLE_COVER}");
    let mut solver = ExternalSolver::new_default(sh(&script));
    let cover = algs::min_vertex_cover(&triangle(), &mut solver).unwrap();
    assert_eq!(cover.nodes, vec![2, 3]);
    assert_eq!(cover.cost, 2);
}

#[test]
fn pipe_pipe() {
    let script = format!("grep -q '^p wcnf 4 7 5$' || exit 1; {TRIANGLE_COVER}");
    let mut solver = ExternalSolver::new(sh(&script), InputVia::pipe(), OutputVia::pipe());
    let cover = algs::min_vertex_cover(&triangle(), &mut solver).unwrap();
    assert_eq!(cover.nodes, vec![2, 3]);
}

#[test]
fn file_file() {
    let dir = tempfile::tempdir().unwrap();
    let wcnf = dir.path().join("cover.wcnf");
    let log = dir.path().join("solver.log");
    let mut solver = ExternalSolver::new(
        sh(TRIANGLE_COVER),
        InputVia::file_last(&wcnf),
        OutputVia::file(&log),
    )
    .with_format(WcnfFormat::Post22);
    let cover = algs::min_vertex_cover(&triangle(), &mut solver).unwrap();
    assert_eq!(cover.nodes, vec![2, 3]);
    let written = fs::read_to_string(&wcnf).unwrap();
    assert!(written.contains("\nh 1 2 0\n"));
    assert!(written.contains("\n1 -4 0\n"));
    assert!(!written.contains("p wcnf"));
    assert!(fs::read_to_string(&log).unwrap().contains("OPTIMUM FOUND"));
}

#[test]
fn pipe_file() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("solver.log");
    let script = format!("cat > /dev/null; {TRIANGLE_COVER}");
    let mut solver = ExternalSolver::new(sh(&script), InputVia::pipe(), OutputVia::file(&log));
    let cover = algs::min_vertex_cover(&triangle(), &mut solver).unwrap();
    assert_eq!(cover.nodes, vec![2, 3]);
}

#[test]
fn binary_vline() {
    let mut solver =
        ExternalSolver::new_default(sh("printf 'o 2\\ns OPTIMUM FOUND\\nv 0110\\n'"));
    let cover = algs::min_vertex_cover(&triangle(), &mut solver).unwrap();
    assert_eq!(cover.nodes, vec![2, 3]);
}

#[test]
fn solver_is_reusable() {
    let mut solver = ExternalSolver::new_default(sh(TRIANGLE_COVER));
    let graph = triangle();
    let first = algs::min_vertex_cover(&graph, &mut solver).unwrap();
    let second = algs::min_vertex_cover(&graph, &mut solver).unwrap();
    assert_eq!(first, second);
}

#[test]
fn satisfiable_and_exit_code_30() {
    let mut solver = ExternalSolver::new_default(sh(
        "printf 'o 2\\ns SATISFIABLE\\nv -1 2 3 -4\\n'; exit 30",
    ));
    let cover = algs::min_vertex_cover(&triangle(), &mut solver).unwrap();
    assert_eq!(cover.cost, 2);
}

#[test]
fn wrong_cost_is_recomputed() {
    let mut solver =
        ExternalSolver::new_default(sh("printf 'o 7\\ns OPTIMUM FOUND\\nv -1 2 3 -4\\n'"));
    let cover = algs::min_vertex_cover(&triangle(), &mut solver).unwrap();
    assert_eq!(cover.cost, 2);
}

#[test]
fn unsatisfiable() {
    let mut solver = ExternalSolver::new_default(sh("echo 's UNSATISFIABLE'; exit 20"));
    assert!(matches!(
        algs::min_vertex_cover(&triangle(), &mut solver),
        Err(algs::Error::Solver(SolverError::Unsatisfiable))
    ));
}

/// Prints a long trailer after the status line, more than a pipe buffer holds
const UNSAT_WITH_TRAILER: &str =
    "echo 's UNSATISFIABLE'; head -c 300000 /dev/zero | tr '\\0' 'c'; echo; exit 20";

#[test]
fn unsatisfiable_with_trailing_output() {
    let mut solver = ExternalSolver::new_default(sh(UNSAT_WITH_TRAILER));
    assert!(matches!(
        algs::min_vertex_cover(&triangle(), &mut solver),
        Err(algs::Error::Solver(SolverError::Unsatisfiable))
    ));
    let mut solver =
        ExternalSolver::new(sh(UNSAT_WITH_TRAILER), InputVia::pipe(), OutputVia::pipe());
    assert!(matches!(
        algs::min_vertex_cover(&triangle(), &mut solver),
        Err(algs::Error::Solver(SolverError::Unsatisfiable))
    ));
}

#[test]
fn malformed_output_with_trailing_output() {
    let script = "echo 's MAYBE'; head -c 300000 /dev/zero | tr '\\0' 'c'; echo";
    let mut solver = ExternalSolver::new(sh(script), InputVia::pipe(), OutputVia::pipe());
    assert!(matches!(
        algs::max_clique(&triangle(), &mut solver),
        Err(algs::Error::Solver(SolverError::Output(_)))
    ));
}

#[test]
fn unknown() {
    let mut solver = ExternalSolver::new_default(sh("echo 's UNKNOWN'"));
    assert!(matches!(
        algs::max_cut(&triangle(), &mut solver),
        Err(algs::Error::Solver(SolverError::Unknown))
    ));
}

#[test]
fn unexpected_exit_code() {
    let mut solver = ExternalSolver::new_default(sh("exit 3"));
    assert!(matches!(
        algs::min_vertex_cover(&triangle(), &mut solver),
        Err(algs::Error::Solver(SolverError::ExitCode(3)))
    ));
}

#[test]
fn malformed_output() {
    let mut solver = ExternalSolver::new_default(sh("echo 'o 1'"));
    assert!(matches!(
        algs::min_vertex_cover(&triangle(), &mut solver),
        Err(algs::Error::Solver(SolverError::Output(_)))
    ));
}

#[test]
fn hard_clause_violated() {
    let mut solver =
        ExternalSolver::new_default(sh("printf 'o 0\\ns OPTIMUM FOUND\\nv -1 -2 -3 -4\\n'"));
    assert!(matches!(
        algs::min_vertex_cover(&triangle(), &mut solver),
        Err(algs::Error::Solver(SolverError::HardClauseViolated(_)))
    ));
}

#[test]
fn incomplete_assignment() {
    let mut solver = ExternalSolver::new_default(sh("printf 'o 0\\ns OPTIMUM FOUND\\nv 1 2\\n'"));
    let err = algs::max_clique(&triangle(), &mut solver).unwrap_err();
    assert!(matches!(
        err,
        algs::Error::Solver(SolverError::IncompleteAssignment(v)) if v == var![2]
    ));
}

#[test]
fn package_upgrade() {
    let inst = PackageInstance::from_path(data("conflict.spu")).unwrap();
    let mut solver = ExternalSolver::new(
        sh("grep -q '^3 -1 -2 0$' || exit 1; printf 'o 1\\ns OPTIMUM FOUND\\nv 1 -2\\n'"),
        InputVia::pipe(),
        OutputVia::pipe(),
    );
    let sel = algs::upgrade(&inst, &mut solver).unwrap();
    assert_eq!(sel.cost, 1);
    assert_eq!(sel.removed, vec![2]);
    assert_eq!(sel.installed, vec![1]);
}

#[test]
fn direct_solve() {
    let graph = triangle();
    let enc = satreduce::encodings::graph::cut(&graph).unwrap();
    let mut solver =
        ExternalSolver::new_default(sh("printf 'o 1\\ns OPTIMUM FOUND\\nv 1 -2 -3 4\\n'"));
    let sol = solver.solve(enc.formula()).unwrap();
    assert_eq!(sol.cost, 1);
    assert_eq!(sol.model(), vec![1, -2, -3, 4]);
}
