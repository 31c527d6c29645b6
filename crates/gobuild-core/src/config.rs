//! Toolchain configuration, built once at startup

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;

use crate::error::BuildError;

/// Target architecture of the Plan 9 style toolchain.
///
/// The tag character names the compiler (`6g`), the linker (`6l`) and the
/// object file extension (`.6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Arm,
    #[default]
    Amd64,
    X86,
}

impl Arch {
    pub fn tag(self) -> char {
        match self {
            Arch::Arm => '5',
            Arch::Amd64 => '6',
            Arch::X86 => '8',
        }
    }
}

impl FromStr for Arch {
    type Err = BuildError;

    /// Accepts the tag (`6`) or the GOARCH name (`amd64`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "5" | "arm" => Ok(Arch::Arm),
            "6" | "amd64" => Ok(Arch::Amd64),
            "8" | "386" | "x86" => Ok(Arch::X86),
            _ => Err(BuildError::UnknownArch(s.to_string())),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Arch::Arm => "arm",
            Arch::Amd64 => "amd64",
            Arch::X86 => "386",
        };
        f.write_str(name)
    }
}

/// Where the toolchain lives and which architecture it targets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolchainConfig {
    /// Directory holding the compiler and linker. `None` resolves them
    /// through `PATH`.
    pub bin_dir: Option<PathBuf>,
    pub arch: Arch,
}

impl ToolchainConfig {
    pub fn new(bin_dir: Option<PathBuf>, arch: Arch) -> Self {
        let bin_dir = bin_dir.filter(|dir| !dir.as_os_str().is_empty());
        ToolchainConfig { bin_dir, arch }
    }

    /// `<bin>/<tag>g`
    pub fn compiler(&self) -> PathBuf {
        self.tool(&format!("{}g", self.arch.tag()))
    }

    /// `<bin>/<tag>l`
    pub fn linker(&self) -> PathBuf {
        self.tool(&format!("{}l", self.arch.tag()))
    }

    pub fn object_tag(&self) -> char {
        self.arch.tag()
    }

    fn tool(&self, name: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}
