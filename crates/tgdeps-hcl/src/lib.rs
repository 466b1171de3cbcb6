//! Terragrunt configuration discovery and record extraction.
//!
//! [`extract_record`] turns the text of one configuration file into a
//! [`ModuleRecord`](tgdeps_core::ModuleRecord); [`ProjectLoader`] walks a
//! project through a [`FileSystem`](tgdeps_fs::FileSystem) and extracts a
//! record for every configuration file it finds.

pub mod extractor;
pub mod loader;

pub use extractor::{extract_record, strip_comments};
pub use loader::{ProjectLoader, DEFAULT_IGNORE_PATTERNS};
