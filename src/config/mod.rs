//! Tool configuration
//!
//! Settings are merged from three layers, later layers winning:
//! 1. Built-in defaults
//! 2. Project config file (configstore.toml)
//! 3. CLI flags

mod defaults;
mod effective;
mod merge;

pub use defaults::{BuiltinDefaults, DEFAULT_CONFIG_FILE};
pub use effective::{ConfigError, ConfigOrigin, ConfigSource, EffectiveConfig};
pub use merge::{deep_merge, merge_layers};
