use serde::{Deserialize, Serialize};
use tgdeps_core::{GraphBuilder, DEFAULT_CONFIG_FILENAME};
use tgdeps_fs::DiscoveryOptions;

/// Contents of `.tgdeps.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TgdepsConfig {
    /// How the graph is built
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// How configuration files are found
    #[serde(default)]
    pub discovery: DiscoverySettings,
}

/// Settings for graph construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnalysisSettings {
    /// Per-directory configuration file name
    #[serde(default = "default_config_filename")]
    pub config_filename: String,

    /// Report each cycle once rather than once per rotation
    #[serde(default = "default_true")]
    pub dedupe_cycles: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            config_filename: default_config_filename(),
            dedupe_cycles: default_true(),
        }
    }
}

/// Settings for the project walk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiscoverySettings {
    /// Glob patterns to skip, relative to the project root
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,

    /// Files larger than this many bytes are skipped
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    #[serde(default)]
    pub follow_symlinks: bool,

    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
            max_file_size: default_max_file_size(),
            follow_symlinks: false,
            respect_gitignore: default_true(),
            max_depth: default_max_depth(),
        }
    }
}

impl TgdepsConfig {
    /// Renders the configuration as TOML, as written by `tgdeps config init`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Graph builder configured from the analysis settings.
    pub fn graph_builder(&self) -> GraphBuilder {
        GraphBuilder::new()
            .config_filename(self.analysis.config_filename.clone())
            .dedupe_cycles(self.analysis.dedupe_cycles)
    }

    /// Filesystem walk options from the discovery settings.
    pub fn discovery_options(&self) -> DiscoveryOptions {
        DiscoveryOptions {
            max_file_size: Some(self.discovery.max_file_size),
            follow_symlinks: self.discovery.follow_symlinks,
            max_depth: self.discovery.max_depth,
            include_hidden: false,
            respect_gitignore: self.discovery.respect_gitignore,
        }
    }
}

// Default value functions
fn default_config_filename() -> String {
    DEFAULT_CONFIG_FILENAME.to_string()
}

fn default_ignore() -> Vec<String> {
    vec!["**/.terragrunt-cache/**".to_string()]
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_max_depth() -> usize {
    100
}

fn default_true() -> bool {
    true
}
