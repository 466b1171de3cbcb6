//! Project configuration for tgdeps.
//!
//! Settings live in `.tgdeps.toml` at the project root. Every field has a
//! default, so a missing file and an empty file mean the same thing.

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader, CONFIG_FILE_NAME};
pub use types::{AnalysisSettings, DiscoverySettings, TgdepsConfig};
pub use validation::{validate_project_path, ValidationError};
