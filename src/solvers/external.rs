//! # Solver Interface for External Executables
//!
//! Calls a MaxSAT solver binary, hands it the formula as DIMACS WCNF and parses
//! its output via [`fio::parse_maxsat_solver_output`]. The command is rebuilt
//! for every call, so one solver value can solve many formulas in sequence.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{self, Command, ExitStatus},
};

use crate::instances::{
    fio::{self, dimacs::WcnfFormat, MaxSatOutputError, SolverOutput},
    WcnfFormula,
};

use super::{MaxSatSolution, SolveMaxSat, SolverError};

/// Specifies what argument position the instance is passed to the solver at
///
/// Most solvers expect the instance as the last argument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum InstanceArg {
    /// Pass the instance file path as the first solver argument
    First,
    /// Pass the instance file path as the last argument
    #[default]
    Last,
}

/// Options for how the input instance should be passed to the external solver
#[derive(Debug, Clone)]
pub struct InputVia(InputViaInt);

#[derive(Debug, Clone)]
enum InputViaInt {
    /// Writes the instance to a file at the specified path that is _not_
    /// removed afterwards
    File(PathBuf, InstanceArg),
    /// Writes the instance to a temporary file that is removed after the call
    TempFile(InstanceArg),
    /// Writes the instance to `stdin`
    Pipe,
}

impl InputVia {
    /// Pass the input via a persistent file at `path`, passed to the solver as the last argument
    ///
    /// With feature `compression`, a path ending in `.bz2`, `.gz` or `.xz`
    /// gets a compressed file.
    #[must_use]
    pub fn file_last<P: AsRef<Path>>(path: P) -> Self {
        InputVia(InputViaInt::File(
            path.as_ref().to_path_buf(),
            InstanceArg::Last,
        ))
    }

    /// Pass the input via a persistent file at `path`, passed to the solver as the first argument
    #[must_use]
    pub fn file_first<P: AsRef<Path>>(path: P) -> Self {
        InputVia(InputViaInt::File(
            path.as_ref().to_path_buf(),
            InstanceArg::First,
        ))
    }

    /// Pass the input via a temporary file, passed to the solver as the last argument
    #[must_use]
    pub fn tempfile_last() -> Self {
        InputVia(InputViaInt::TempFile(InstanceArg::Last))
    }

    /// Pass the input via a temporary file, passed to the solver as the first argument
    #[must_use]
    pub fn tempfile_first() -> Self {
        InputVia(InputViaInt::TempFile(InstanceArg::First))
    }

    /// Pass the input via a pipe to `<stdin>`
    ///
    /// Not all solvers support reading from `stdin`
    #[must_use]
    pub fn pipe() -> Self {
        InputVia(InputViaInt::Pipe)
    }
}

impl Default for InputVia {
    fn default() -> Self {
        InputVia(InputViaInt::TempFile(InstanceArg::default()))
    }
}

/// Options for how the output of the solver is read
#[derive(Debug, Clone, Default)]
pub struct OutputVia(OutputViaInt);

#[derive(Debug, Clone, Default)]
enum OutputViaInt {
    /// The solver output is written to a file at the given path that is not automatically deleted
    File(PathBuf),
    /// The solver output is read directly through a pipe
    #[default]
    Pipe,
}

impl OutputVia {
    /// Process the solver output via a persistent file at `path`
    #[must_use]
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        OutputVia(OutputViaInt::File(path.as_ref().to_path_buf()))
    }

    /// Process the solver output via a pipe from `<stdout>`
    #[must_use]
    pub fn pipe() -> Self {
        OutputVia(OutputViaInt::Pipe)
    }
}

/// A MaxSAT solver called via an external executable
#[derive(Debug)]
pub struct Solver {
    cmd: Command,
    input: InputVia,
    output: OutputVia,
    format: WcnfFormat,
}

impl Solver {
    /// Initializes a solver with a [`Command`] that is fully set up, except for the input instance
    ///
    /// # Notes
    ///
    /// - If the solver output is processed via a file, compression is _not_ supported
    /// - If [`Command::env_clear`] was called on the command, the fact that the environment has
    ///     been cleared is forgotten when the command is rebuilt for a call
    ///
    /// # Example
    ///
    /// ```
    /// use std::process::Command;
    /// use satreduce::solvers::{ExternalSolver, external};
    /// let solver = ExternalSolver::new(
    ///     Command::new("<path to solver binary>"),
    ///     external::InputVia::tempfile_last(),
    ///     external::OutputVia::pipe(),
    /// );
    /// ```
    /// After this initialization, the `solver` instance can be used with the
    /// [`SolveMaxSat`] trait.
    #[must_use]
    pub fn new(cmd: Command, input: InputVia, output: OutputVia) -> Self {
        Solver {
            cmd,
            input,
            output,
            format: WcnfFormat::default(),
        }
    }

    /// Initializes a solver with default values for [`InputVia`] and [`OutputVia`]
    ///
    /// The default values are passing the input via a temporary file and processing the output via
    /// a pipe.
    #[must_use]
    pub fn new_default(cmd: Command) -> Self {
        Solver::new(cmd, InputVia::default(), OutputVia::default())
    }

    /// Sets the WCNF dialect the formula is written in
    #[must_use]
    pub fn with_format(mut self, format: WcnfFormat) -> Self {
        self.format = format;
        self
    }

    /// Builds a fresh copy of the configured command, optionally with the
    /// instance path added as an argument
    fn command(&self, instance: Option<(&Path, InstanceArg)>) -> Command {
        let mut cmd = Command::new(self.cmd.get_program());
        if let Some((path, InstanceArg::First)) = instance {
            cmd.arg(path);
        }
        cmd.args(self.cmd.get_args());
        if let Some((path, InstanceArg::Last)) = instance {
            cmd.arg(path);
        }
        for (key, val) in self.cmd.get_envs() {
            if let Some(val) = val {
                cmd.env(key, val);
            } else {
                cmd.env_remove(key);
            }
        }
        if let Some(dir) = self.cmd.get_current_dir() {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn call_external(&self, formula: &WcnfFormula) -> Result<SolverOutput, SolverError> {
        // when writing to a temporary file, this needs to be explicitly closed at the end
        let mut temppath = None;
        let mut cmd = match &self.input.0 {
            InputViaInt::File(in_path, argpos) => {
                fio::dimacs::write_wcnf_annotated(
                    &mut fio::open_compressed_uncompressed_write(in_path)?,
                    formula,
                    self.format,
                )?;
                self.command(Some((in_path.as_path(), *argpos)))
            }
            InputViaInt::TempFile(argpos) => {
                let mut writer = io::BufWriter::new(tempfile::NamedTempFile::new()?);
                fio::dimacs::write_wcnf_annotated(&mut writer, formula, self.format)?;
                let path = writer
                    .into_inner()
                    .map_err(io::IntoInnerError::into_error)?
                    .into_temp_path();
                let in_path: &Path = &path;
                let cmd = self.command(Some((in_path, *argpos)));
                temppath = Some(path);
                cmd
            }
            InputViaInt::Pipe => return self.call_piped(formula),
        };
        tracing::debug!(?cmd, "calling external solver");
        let output = match &self.output.0 {
            OutputViaInt::File(path) => {
                // NOTE: this currently does not support compression
                cmd.stdout(fs::File::create(path)?);
                let exit = cmd.status()?;
                check_exit_code(exit)?;
                fio::parse_maxsat_solver_output(
                    io::BufReader::new(fs::File::open(path)?),
                    formula.n_vars(),
                )?
            }
            OutputViaInt::Pipe => {
                let mut child = cmd.stdout(process::Stdio::piped()).spawn()?;
                let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
                let (output, drained) = read_output(stdout, formula.n_vars());
                let exit = child.wait()?;
                check_exit_code(exit)?;
                drained?;
                output?
            }
        };
        if let Some(temppath) = temppath {
            temppath.close()?;
        }
        Ok(output)
    }

    /// Calls the solver with the formula written to `stdin`
    fn call_piped(&self, formula: &WcnfFormula) -> Result<SolverOutput, SolverError> {
        let mut cmd = self.command(None);
        cmd.stdin(process::Stdio::piped());
        tracing::debug!(?cmd, "calling external solver");
        match &self.output.0 {
            OutputViaInt::File(path) => {
                // NOTE: this currently does not support compression
                let mut child = cmd.stdout(fs::File::create(path)?).spawn()?;
                let stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
                write_stdin(stdin, formula, self.format)?;
                let exit = child.wait()?;
                check_exit_code(exit)?;
                Ok(fio::parse_maxsat_solver_output(
                    io::BufReader::new(fs::File::open(path)?),
                    formula.n_vars(),
                )?)
            }
            OutputViaInt::Pipe => {
                let mut child = cmd.stdout(process::Stdio::piped()).spawn()?;
                let stdin = child.stdin.take().ok_or_else(|| missing_pipe("stdin"))?;
                let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
                let n_vars = formula.n_vars();
                // second thread for processing stdout to avoid blocking
                let output_handle = std::thread::spawn(move || read_output(stdout, n_vars));
                // main thread writes input to stdin
                write_stdin(stdin, formula, self.format)?;
                let exit = child.wait()?;
                let (output, drained) = output_handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                check_exit_code(exit)?;
                drained?;
                Ok(output?)
            }
        }
    }
}

impl SolveMaxSat for Solver {
    fn solve(&mut self, formula: &WcnfFormula) -> Result<MaxSatSolution, SolverError> {
        tracing::debug!(
            vars = formula.n_vars(),
            hard = formula.n_hard(),
            soft = formula.n_soft(),
            format = ?self.format,
            "solving formula externally"
        );
        let (cost, assignment) = match self.call_external(formula)? {
            SolverOutput::Optimum { cost, assignment } => (cost, assignment),
            SolverOutput::Satisfiable { cost, assignment } => {
                tracing::warn!(cost, "solver found a solution but did not prove optimality");
                (cost, assignment)
            }
            SolverOutput::Unsat => return Err(SolverError::Unsatisfiable),
            SolverOutput::Unknown => return Err(SolverError::Unknown),
        };
        MaxSatSolution::validate(formula, cost, assignment)
    }
}

/// Parses the solver output from its `stdout` and then reads the pipe to the
/// end. The parser stops early for some results and the solver must not block
/// on a full pipe while it is waited for.
fn read_output(
    stdout: process::ChildStdout,
    n_vars: u32,
) -> (Result<SolverOutput, MaxSatOutputError>, io::Result<u64>) {
    let mut stdout = io::BufReader::new(stdout);
    let output = fio::parse_maxsat_solver_output(&mut stdout, n_vars);
    let drained = io::copy(&mut stdout, &mut io::sink());
    match &drained {
        Ok(bytes) if *bytes > 0 => {
            tracing::debug!(bytes, "discarded trailing solver output");
        }
        _ => {}
    }
    (output, drained)
}

/// Writes the formula to the solver's `stdin` and closes it. A solver that
/// exits without reading all of its input is not an error here; its output
/// decides.
fn write_stdin(
    stdin: process::ChildStdin,
    formula: &WcnfFormula,
    format: WcnfFormat,
) -> Result<(), io::Error> {
    let mut stdin = io::BufWriter::new(stdin);
    match fio::dimacs::write_wcnf_annotated(&mut stdin, formula, format) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("solver closed its input early");
            Ok(())
        }
        res => res,
    }
}

fn missing_pipe(name: &str) -> io::Error {
    io::Error::other(format!("could not capture solver {name}"))
}

/// Checks the exit status against the codes MaxSAT solvers use
fn check_exit_code(status: ExitStatus) -> Result<(), SolverError> {
    match status.code() {
        // we don't check these against the output
        Some(0 | 10 | 20 | 30) => Ok(()),
        Some(code) => Err(SolverError::ExitCode(code)),
        None => Err(SolverError::Signal),
    }
}

#[cfg(test)]
mod tests {
    use std::{ffi::OsStr, path::Path, process::Command};

    use super::{InstanceArg, Solver};

    #[test]
    fn command_is_rebuilt() {
        let mut cmd = Command::new("solver");
        cmd.arg("--flag").env("SOLVER_SEED", "1").current_dir("/tmp");
        let solver = Solver::new_default(cmd);
        let first = solver.command(Some((Path::new("a.wcnf"), InstanceArg::First)));
        assert_eq!(first.get_program(), OsStr::new("solver"));
        assert_eq!(
            first.get_args().collect::<Vec<_>>(),
            vec![OsStr::new("a.wcnf"), OsStr::new("--flag")]
        );
        assert_eq!(first.get_current_dir(), Some(Path::new("/tmp")));
        assert_eq!(
            first.get_envs().collect::<Vec<_>>(),
            vec![(OsStr::new("SOLVER_SEED"), Some(OsStr::new("1")))]
        );
        let last = solver.command(Some((Path::new("b.wcnf"), InstanceArg::Last)));
        assert_eq!(
            last.get_args().collect::<Vec<_>>(),
            vec![OsStr::new("--flag"), OsStr::new("b.wcnf")]
        );
        let piped = solver.command(None);
        assert_eq!(
            piped.get_args().collect::<Vec<_>>(),
            vec![OsStr::new("--flag")]
        );
    }
}
