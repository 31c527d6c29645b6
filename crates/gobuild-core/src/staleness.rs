//! Timestamp-based staleness decisions for derived artifacts

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;

use crate::error::{BuildError, BuildResult};

/// Outcome of comparing an artifact against its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Staleness {
    /// The artifact does not exist yet.
    ArtifactMissing,
    /// An input was modified after the artifact.
    SourceNewer,
    UpToDate,
}

impl Staleness {
    pub fn must_rebuild(self) -> bool {
        !matches!(self, Staleness::UpToDate)
    }
}

/// Compare one input against one artifact.
///
/// Fails with `SourceMissing` when the input cannot be stat'ed. Equal
/// timestamps count as up to date.
pub fn check(source: &Path, artifact: &Path) -> BuildResult<Staleness> {
    check_any([source], artifact)
}

/// `check` reduced to a bool.
pub fn must_rebuild(source: &Path, artifact: &Path) -> BuildResult<bool> {
    check(source, artifact).map(Staleness::must_rebuild)
}

/// Compare several inputs against one artifact; any newer input makes the
/// whole artifact stale.
pub fn check_any<'a, I>(sources: I, artifact: &Path) -> BuildResult<Staleness>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut newest: Option<SystemTime> = None;
    for source in sources {
        let modified = modified(source).map_err(|e| BuildError::source_missing(source, e))?;
        newest = Some(newest.map_or(modified, |n| n.max(modified)));
    }

    let Ok(artifact_time) = modified(artifact) else {
        tracing::trace!("{} missing", artifact.display());
        return Ok(Staleness::ArtifactMissing);
    };

    match newest {
        Some(source_time) if artifact_time < source_time => Ok(Staleness::SourceNewer),
        _ => Ok(Staleness::UpToDate),
    }
}

fn modified(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}
