//! No-op engine.
//!
//! Records the calls it receives and otherwise does nothing. Used for dry
//! runs against pre-existing outputs and in tests of the harness pipeline.

use std::path::{Path, PathBuf};

use crate::contract::{Engine, EngineError};

/// One call received by a [`StubEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Init(PathBuf),
    Run,
    Finalize,
}

#[derive(Debug, Default)]
pub struct StubEngine {
    calls: Vec<EngineCall>,
    initialized: bool,
    fail_run: bool,
}

impl StubEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub whose `run` always fails with exit status 1.
    #[must_use]
    pub fn failing_run() -> Self {
        Self {
            fail_run: true,
            ..Self::default()
        }
    }

    /// Calls received so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }
}

impl Engine for StubEngine {
    fn name(&self) -> &str {
        "stub"
    }

    fn init(&mut self, work_dir: &Path) -> Result<(), EngineError> {
        if !work_dir.is_dir() {
            return Err(EngineError::WorkDir {
                path: work_dir.to_path_buf(),
            });
        }
        self.calls.push(EngineCall::Init(work_dir.to_path_buf()));
        self.initialized = true;
        Ok(())
    }

    fn run(&mut self) -> Result<(), EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized {
                engine: self.name().to_string(),
            });
        }
        self.calls.push(EngineCall::Run);
        if self.fail_run {
            return Err(EngineError::ExitFailure {
                program: "stub".into(),
                code: Some(1),
                stderr_tail: "stub configured to fail".into(),
            });
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), EngineError> {
        self.calls.push(EngineCall::Finalize);
        self.initialized = false;
        Ok(())
    }
}
