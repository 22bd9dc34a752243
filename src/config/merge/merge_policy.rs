//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override earlier ones key by key; unset keys fall back to
/// these defaults and then to the serde defaults of `BackstackConfig`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("navigation.back_if_exists", false)?
        .set_default("navigation.back_press_interval_ms", 300_i64)?
        .set_default("animations.add_in", "slide_in_right")?
        .set_default("animations.add_out", "slide_out_left")?
        .set_default("animations.back_in", "slide_in_left")?
        .set_default("animations.back_out", "slide_out_right")?
        .set_default("logging.level", "info")
}
