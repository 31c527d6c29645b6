//! Import extraction and dependency collection for Go source trees

pub mod collector;
pub mod extractor;
pub mod parser;


pub use collector::{DependencyGraph, collect};
pub use extractor::{GoImportExtractor, ImportExtractor};
pub use parser::{GoParser, ImportSpec};
