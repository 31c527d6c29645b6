//! Toolchain driving for gobuild: compile, link and run

pub mod builder;
pub mod executor;
pub mod runner;



pub use builder::{BuildReport, Builder};
pub use executor::{Invocation, execute};
pub use runner::run;
