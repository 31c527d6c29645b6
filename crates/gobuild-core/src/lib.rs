//! gobuild core: module paths, the dependency table, staleness and configuration

pub mod config;
pub mod error;
pub mod model;
pub mod staleness;
pub mod table;


#[cfg(test)]
pub mod test_utils;

pub use config::{Arch, ToolchainConfig};
pub use error::{BuildError, BuildResult};
pub use model::{ModulePath, SOURCE_EXT, is_local_import, normalize};
pub use staleness::{Staleness, check, check_any, must_rebuild};
pub use table::DependencyTable;
