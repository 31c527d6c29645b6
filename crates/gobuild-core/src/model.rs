//! Module paths and the artifact names derived from them

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension of Go source files.
pub const SOURCE_EXT: &str = "go";

/// A normalized, slash-separated module identifier without extension.
///
/// `util`, `lib/strings` and `../shared/log` are all module paths. The
/// value is always lexically clean, so two paths naming the same module
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModulePath(String);

impl ModulePath {
    /// Build a module path from raw text, normalizing it.
    pub fn new(raw: impl AsRef<str>) -> Self {
        ModulePath(normalize(raw.as_ref()))
    }

    /// Build a module path from a command-line argument, dropping a
    /// trailing `.go` if present.
    pub fn from_arg(arg: &str) -> Self {
        let stem = arg
            .strip_suffix(SOURCE_EXT)
            .and_then(|s| s.strip_suffix('.'))
            .filter(|s| !s.is_empty() && !s.ends_with('/'))
            .unwrap_or(arg);
        ModulePath::new(stem)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory part, empty for top-level modules.
    pub fn dir(&self) -> &str {
        match self.0.rfind('/') {
            Some(0) => "/",
            Some(i) => &self.0[..i],
            None => "",
        }
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        match self.0.rfind('/') {
            Some(i) => &self.0[i + 1..],
            None => &self.0,
        }
    }

    /// Resolve `relative` against the directory of this module.
    pub fn resolve(&self, relative: &str) -> ModulePath {
        let dir = self.dir();
        if dir.is_empty() {
            ModulePath::new(relative)
        } else {
            ModulePath::new(format!("{}/{}", dir, relative))
        }
    }

    /// `<path>.go`
    pub fn source_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.0, SOURCE_EXT))
    }

    /// `<name>.go`, the file name handed to the compiler.
    pub fn source_file_name(&self) -> String {
        format!("{}.{}", self.name(), SOURCE_EXT)
    }

    /// `<path>.<arch tag>`
    pub fn object_file(&self, arch_tag: char) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.0, arch_tag))
    }

    /// The executable produced for this module as a build target.
    pub fn executable(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Directory the compiler runs in, under `root`.
    pub fn work_dir(&self, root: &Path) -> PathBuf {
        match self.dir() {
            "" => root.to_path_buf(),
            dir => root.join(dir),
        }
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModulePath {
    fn from(raw: &str) -> Self {
        ModulePath::new(raw)
    }
}

/// Whether an import path names a module of the local tree.
pub fn is_local_import(import: &str) -> bool {
    import == "." || import == ".." || import.starts_with("./") || import.starts_with("../")
}

/// Lexically clean a slash-separated path.
///
/// Drops empty and `.` segments, folds `name/..` pairs, keeps leading `..`
/// on relative paths and discards them at the root of absolute ones. An
/// empty result becomes `.`.
pub fn normalize(raw: &str) -> String {
    let rooted = raw.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            name => segments.push(name),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
