//! External-process engine.
//!
//! Runs the configured executable with the working directory as its cwd,
//! optionally behind an MPI launcher (`<exec> -n <np> <executable> <args>`).
//! The process's stdout and stderr are captured; only the exit status and
//! the files it leaves behind are interpreted.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::contract::{Engine, EngineError};

/// Lines of stderr kept in [`EngineError::ExitFailure`].
const STDERR_TAIL_LINES: usize = 20;

/// MPI launcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MpiLaunch {
    /// Launcher executable (e.g., `mpiexec`).
    pub exec: String,
    /// Number of ranks.
    pub np: u32,
}

/// Captured output of the last completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Engine that spawns an external program.
#[derive(Debug)]
pub struct ProcessEngine {
    executable: PathBuf,
    args: Vec<String>,
    mpi: Option<MpiLaunch>,
    work_dir: Option<PathBuf>,
    last_output: Option<RunOutput>,
}

impl ProcessEngine {
    #[must_use]
    pub fn new(executable: PathBuf, args: Vec<String>, mpi: Option<MpiLaunch>) -> Self {
        Self {
            executable,
            args,
            mpi,
            work_dir: None,
            last_output: None,
        }
    }

    /// Output of the last successful run, if any.
    #[must_use]
    pub fn last_output(&self) -> Option<&RunOutput> {
        self.last_output.as_ref()
    }

    /// The command this engine would run in `work_dir`.
    fn command(&self, work_dir: &Path) -> Command {
        let mut command = match &self.mpi {
            Some(mpi) => {
                let mut c = Command::new(&mpi.exec);
                c.arg("-n").arg(mpi.np.to_string()).arg(&self.executable);
                c
            }
            None => Command::new(&self.executable),
        };
        command.args(&self.args).current_dir(work_dir);
        command
    }

    fn program_label(&self) -> String {
        match &self.mpi {
            Some(mpi) => format!("{} -n {} {}", mpi.exec, mpi.np, self.executable.display()),
            None => self.executable.display().to_string(),
        }
    }
}

impl Engine for ProcessEngine {
    fn name(&self) -> &str {
        "process"
    }

    fn init(&mut self, work_dir: &Path) -> Result<(), EngineError> {
        if !work_dir.is_dir() {
            return Err(EngineError::WorkDir {
                path: work_dir.to_path_buf(),
            });
        }
        self.work_dir = Some(work_dir.to_path_buf());
        self.last_output = None;
        Ok(())
    }

    fn run(&mut self) -> Result<(), EngineError> {
        let work_dir = self
            .work_dir
            .as_deref()
            .ok_or_else(|| EngineError::NotInitialized {
                engine: self.name().to_string(),
            })?;
        let program = self.program_label();
        info!(program = %program, dir = %work_dir.display(), "running external program");

        let output = self
            .command(work_dir)
            .output()
            .map_err(|source| EngineError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        debug!(
            stdout_lines = stdout.lines().count(),
            stderr_lines = stderr.lines().count(),
            status = %output.status,
            "external program finished"
        );

        if !output.status.success() {
            return Err(EngineError::ExitFailure {
                program,
                code: output.status.code(),
                stderr_tail: tail_lines(&stderr, STDERR_TAIL_LINES),
            });
        }
        self.last_output = Some(RunOutput { stdout, stderr });
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), EngineError> {
        self.work_dir = None;
        Ok(())
    }
}

/// The last `n` lines of `text`, newline-joined, trailing whitespace trimmed.
fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
