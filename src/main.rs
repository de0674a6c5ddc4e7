//! # `satreduce`
//!
//! Solves graph problems and package upgrade instances with an external
//! MaxSAT solver.
//!
//! ```text
//! satreduce graph <solver> <graph file> [--problem mvc|clique|cut|all]
//! satreduce spu <solver> <instance file> [--names]
//! ```

use std::{path::PathBuf, process::Command};

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use satreduce::{
    algs,
    instances::{fio::dimacs::WcnfFormat, Graph, PackageInstance},
    solvers::{
        external::{InputVia, OutputVia},
        ExternalSolver,
    },
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
    /// The log level to use if `RUST_LOG` is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Cmd {
    /// Minimum vertex cover, maximum clique and maximum cut of a DIMACS edge graph
    Graph {
        #[command(flatten)]
        solver: SolverArgs,
        /// The graph in DIMACS edge format
        graph: PathBuf,
        /// The problem to solve
        #[arg(long, value_enum, default_value_t = Problem::All)]
        problem: Problem,
    },
    /// Install as many packages as possible under dependencies and conflicts
    Spu {
        #[command(flatten)]
        solver: SolverArgs,
        /// The package upgrade instance
        instance: PathBuf,
        /// Print package names instead of ids
        #[arg(long)]
        names: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Problem {
    /// Minimum vertex cover
    Mvc,
    /// Maximum clique
    Clique,
    /// Maximum cut
    Cut,
    /// All three problems
    All,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// `p wcnf` header with the top weight on hard clauses
    Pre22,
    /// Hard clauses marked with `h`, as used since the 2022 MaxSAT evaluation
    Post22,
}

impl From<Format> for WcnfFormat {
    fn from(value: Format) -> Self {
        match value {
            Format::Pre22 => WcnfFormat::Pre22,
            Format::Post22 => WcnfFormat::Post22,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Input {
    /// Write the formula to a temporary file passed as the last argument
    Tempfile,
    /// Write the formula to the solver's `stdin`
    Pipe,
}

#[derive(Args)]
struct SolverArgs {
    /// The MaxSAT solver executable
    solver: PathBuf,
    /// An additional argument for the solver, can be repeated
    #[arg(long = "solver-arg", allow_hyphen_values = true)]
    solver_args: Vec<String>,
    /// The WCNF dialect the solver reads
    #[arg(long, value_enum, default_value_t = Format::Pre22)]
    format: Format,
    /// How the formula is passed to the solver
    #[arg(long, value_enum, default_value_t = Input::Tempfile)]
    input: Input,
    /// Write the formula to this file and keep it, instead of `--input`
    #[arg(long)]
    keep_wcnf: Option<PathBuf>,
}

impl SolverArgs {
    fn build(&self) -> ExternalSolver {
        let mut cmd = Command::new(&self.solver);
        cmd.args(&self.solver_args);
        let input = match (&self.keep_wcnf, self.input) {
            (Some(path), _) => InputVia::file_last(path),
            (None, Input::Tempfile) => InputVia::tempfile_last(),
            (None, Input::Pipe) => InputVia::pipe(),
        };
        ExternalSolver::new(cmd, input, OutputVia::pipe()).with_format(self.format.into())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();

    match cli.cmd {
        Cmd::Graph {
            solver,
            graph,
            problem,
        } => {
            let graph = Graph::from_path(&graph)
                .with_context(|| format!("failed to read graph {}", graph.display()))?;
            let mut solver = solver.build();
            if matches!(problem, Problem::Mvc | Problem::All) {
                let cover = algs::min_vertex_cover(&graph, &mut solver)
                    .context("minimum vertex cover failed")?;
                print_nodes("MVC", &cover.nodes);
            }
            if matches!(problem, Problem::Clique | Problem::All) {
                let clique =
                    algs::max_clique(&graph, &mut solver).context("maximum clique failed")?;
                print_nodes("MCLIQUE", &clique.nodes);
            }
            if matches!(problem, Problem::Cut | Problem::All) {
                let cut = algs::max_cut(&graph, &mut solver).context("maximum cut failed")?;
                print_nodes("MCUT", &cut.nodes);
            }
        }
        Cmd::Spu {
            solver,
            instance,
            names,
        } => {
            let inst = PackageInstance::from_path(&instance)
                .with_context(|| format!("failed to read instance {}", instance.display()))?;
            let selection =
                algs::upgrade(&inst, &mut solver.build()).context("package upgrade failed")?;
            println!("o {}", selection.cost);
            let removed: Vec<String> = if names {
                selection
                    .removed
                    .iter()
                    .filter_map(|&id| inst.name(id).map(String::from))
                    .collect()
            } else {
                selection.removed.iter().map(u32::to_string).collect()
            };
            if removed.is_empty() {
                println!("v");
            } else {
                println!("v {}", removed.join(" "));
            }
        }
    }
    Ok(())
}

fn print_nodes(tag: &str, nodes: &[u32]) {
    let nodes: Vec<String> = nodes.iter().map(u32::to_string).collect();
    println!("{tag} {}", nodes.join(" "));
}
