#![warn(missing_docs)]
//! # alsa-procplug
//!
//! An ALSA external PCM ("extplug") plugin that intercepts a playback stream
//! and routes every block through a processing [`Algorithm`](algo::Algorithm).
//! Algorithms are looked up by name in a runtime [registry](algo::AlgorithmRegistry);
//! the shipped `"dummy"` algorithm forwards blocks untouched and serves as a
//! template for real processing.
//!
//! The plugin can additionally capture the raw bytes of every block to a pair
//! of headerless dump files, one before and one after processing, for offline
//! inspection.
//!
//! Configured from the user's ALSA configuration, e.g.:
//!
//! ```text
//! pcm.procplug {
//!     type procplug
//!     slave "hw:1,0,0"
//!     algo "dummy"
//!     dump_enable 1
//!     input_fname "/tmp/in.raw"
//!     output_fname "/tmp/out.raw"
//! }
//! ```
//!
//! The host invokes the lifecycle strictly serialized per instance: `init`
//! once, `transfer` once per block from its own I/O loop, `close` once at
//! teardown. Nothing in this crate spawns threads or blocks beyond the
//! synchronous dump file writes.
//!
//! Everything except the [`ffi`] glue is independent of libasound and can be
//! exercised hostless, which is how the tests drive it.

pub mod algo;
pub mod config;
pub mod dump;
pub mod help;
pub mod plugin;
pub mod prelude;

#[cfg(os_alsa)]
pub mod ffi;

pub use algo::{Algorithm, AlgorithmRegistry};
pub use config::{ConfigError, ConfigValue, PluginConfig};
pub use plugin::{PlugError, ProcPlug};
