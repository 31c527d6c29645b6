//! Toolchain process execution

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use gobuild_core::{BuildError, BuildResult};
use tracing::debug;

/// A single toolchain command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    /// Working directory, inherited when `None`.
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Spawn the invocation, wait for it and return its exit status.
///
/// Stdio and environment are inherited. There is no timeout.
pub fn execute(invocation: &Invocation) -> BuildResult<ExitStatus> {
    let spawn_error = |source| BuildError::Spawn {
        program: invocation.program.clone(),
        source,
    };

    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args);
    if let Some(dir) = &invocation.cwd {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(spawn_error)?;
    debug!(pid = child.id(), dir = ?invocation.cwd, cmd = %invocation, "exec");

    let status = child.wait().map_err(spawn_error)?;
    debug!(pid = child.id(), %status, "exited");
    Ok(status)
}
