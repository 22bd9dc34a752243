//! Config loader: assembles sources in precedence order and deserializes.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::BackstackConfig;
use config::ConfigError;
use config::File;
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project root.
    ///
    /// Precedence (lowest to highest): defaults, user-level file,
    /// `<root>/config/config.toml`, `<root>/config/{BACKSTACK_ENV}.toml`, environment.
    pub fn load(root: &Path) -> Result<BackstackConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, root)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load configuration from one explicit file over the defaults.
    pub fn load_from_file(path: &Path) -> Result<BackstackConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }
}
