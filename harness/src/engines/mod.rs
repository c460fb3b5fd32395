//! Engine implementations and configuration-driven selection.

pub mod process;
pub mod stub;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::contract::Engine;
use process::{MpiLaunch, ProcessEngine};
use stub::StubEngine;

/// Which engine to run, as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum EngineConfig {
    /// Spawn an external executable in the working directory.
    Process {
        executable: PathBuf,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        mpi: Option<MpiLaunch>,
    },
    /// Do nothing; the working directory must already hold the outputs.
    Stub,
}

impl EngineConfig {
    /// Instantiate the configured engine.
    #[must_use]
    pub fn build(&self) -> Box<dyn Engine> {
        match self {
            Self::Process {
                executable,
                args,
                mpi,
            } => Box::new(ProcessEngine::new(executable.clone(), args.clone(), mpi.clone())),
            Self::Stub => Box::new(StubEngine::new()),
        }
    }
}
