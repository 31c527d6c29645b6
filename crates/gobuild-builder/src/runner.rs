//! Hand the process over to the built executable

use std::convert::Infallible;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use gobuild_core::{BuildError, BuildResult};
use tracing::info;

/// Replace the current process with `<root>/<target>`, forwarding `args`.
///
/// `argv[0]` is `target` as given. Only returns on failure.
#[cfg(unix)]
pub fn run(root: &Path, target: &Path, args: &[OsString]) -> BuildResult<Infallible> {
    use std::os::unix::process::CommandExt;

    let program = root.join(target);
    info!("running {}", program.display());

    let source = Command::new(&program).arg0(target).args(args).exec();
    Err(BuildError::RunFailed {
        target: program,
        source,
    })
}

/// Without `exec`, run the executable as a child and exit with its status.
#[cfg(not(unix))]
pub fn run(root: &Path, target: &Path, args: &[OsString]) -> BuildResult<Infallible> {
    let program = root.join(target);
    info!("running {}", program.display());

    let status = Command::new(&program)
        .args(args)
        .status()
        .map_err(|source| BuildError::RunFailed {
            target: program.clone(),
            source,
        })?;
    std::process::exit(status.code().unwrap_or(1))
}
