//! Engine contract: the capability the harness needs from a simulation engine.
//!
//! An engine is opened on a working directory, runs once, and is finalized.
//! The harness never reaches into engine internals; it observes only the
//! result of each call and the files left in the working directory.
//!
//! Lifecycle is owned by [`EngineSession`]: `open` initializes, `close`
//! finalizes explicitly, and dropping an unclosed session still finalizes.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Typed failure of an engine call.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// `run` was called before `init` or after `finalize`.
    #[error("engine {engine} is not initialized")]
    NotInitialized { engine: String },
    /// The working directory does not exist or is not a directory.
    #[error("working directory {path} is not a directory")]
    WorkDir { path: PathBuf },
    /// The external program could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The external program exited unsuccessfully (`code` is `None` when
    /// killed by a signal).
    #[error("{program} exited with {}: {stderr_tail}", exit_label(.code))]
    ExitFailure {
        program: String,
        code: Option<i32>,
        stderr_tail: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "signal".to_string(),
    }
}

/// The capability a simulation engine provides to the harness.
pub trait Engine {
    /// Short identifier used in logs (e.g., `"process"`).
    fn name(&self) -> &str;

    /// Prepare to run in `work_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkDir`] if `work_dir` is unusable.
    fn init(&mut self, work_dir: &Path) -> Result<(), EngineError>;

    /// Run the simulation once, to completion.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the engine is not initialized or the run fails.
    fn run(&mut self) -> Result<(), EngineError>;

    /// Release whatever `init` acquired. Calling it twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if teardown fails.
    fn finalize(&mut self) -> Result<(), EngineError>;
}

/// Scoped ownership of an initialized engine.
pub struct EngineSession<'e> {
    engine: &'e mut dyn Engine,
    closed: bool,
}

impl<'e> EngineSession<'e> {
    /// Initialize `engine` on `work_dir`.
    ///
    /// # Errors
    ///
    /// Returns the engine's `init` error; nothing is finalized in that case.
    pub fn open(engine: &'e mut dyn Engine, work_dir: &Path) -> Result<Self, EngineError> {
        engine.init(work_dir)?;
        debug!(engine = engine.name(), dir = %work_dir.display(), "engine initialized");
        Ok(Self {
            engine,
            closed: false,
        })
    }

    /// Run the simulation.
    ///
    /// # Errors
    ///
    /// Returns the engine's `run` error.
    pub fn run(&mut self) -> Result<(), EngineError> {
        self.engine.run()
    }

    /// Finalize explicitly, surfacing teardown errors.
    ///
    /// # Errors
    ///
    /// Returns the engine's `finalize` error.
    pub fn close(mut self) -> Result<(), EngineError> {
        self.closed = true;
        self.engine.finalize()
    }
}

impl Drop for EngineSession<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.engine.finalize() {
            warn!(engine = self.engine.name(), error = %e, "engine finalize failed on drop");
        }
    }
}
