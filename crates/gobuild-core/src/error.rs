//! Build error taxonomy

use std::path::PathBuf;
use thiserror::Error;

use crate::model::ModulePath;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse {path}:{line}: {message}")]
    ParseError {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("stat {path}: {source}")]
    SourceMissing {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("compiling {module} failed{}", describe_code(*.code))]
    CompileFailed { module: ModulePath, code: Option<i32> },

    #[error("linking {target} failed{}", describe_code(*.code))]
    LinkFailed { target: PathBuf, code: Option<i32> },

    #[error("running {target}: {source}")]
    RunFailed {
        target: PathBuf,
        source: std::io::Error,
    },

    #[error("exec {program}: {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("unknown architecture '{0}' (expected 5/arm, 6/amd64 or 8/386)")]
    UnknownArch(String),

    #[error("Go grammar unavailable: {0}")]
    Parser(String),
}

impl BuildError {
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn source_missing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceMissing {
            path: path.into(),
            source,
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit status {})", code),
        None => " (terminated by signal)".to_string(),
    }
}
