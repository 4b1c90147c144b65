//! Re-exports of the most commonly used types.

pub use crate::algo::{Algorithm, AlgorithmFactory, AlgorithmRegistry, Dummy};
pub use crate::config::{ConfigError, ConfigValue, DumpConfig, PluginConfig};
pub use crate::dump::{DumpError, DumpTap};
pub use crate::plugin::{PlugError, ProcPlug};
