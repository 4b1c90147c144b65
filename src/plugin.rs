//! The plugin adapter: per-instance state and the three lifecycle callbacks
//! the host invokes.
//!
//! The host drives a fixed lifecycle, strictly serialized per instance:
//! `init` once before streaming, `transfer` once per block from its I/O loop,
//! `close` once at teardown. The adapter enforces that order explicitly and
//! leaves an instance unusable after a failed `init`.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::algo::{Algorithm, AlgorithmRegistry};
use crate::config::{ConfigError, DumpConfig, PluginConfig};
use crate::dump::{DumpError, DumpTap};

/// Type of errors surfaced to the host. Every variant aborts the operation
/// that produced it; the plugin never retries.
#[derive(Debug, Error)]
pub enum PlugError {
    /// Malformed or incomplete plugin configuration.
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// The `algo` key named an algorithm absent from the registry.
    #[error("unknown algo {0:?}")]
    UnknownAlgorithm(String),
    /// A dump tap file could not be opened.
    #[error("{0}")]
    Dump(#[from] DumpError),
    /// Writing a dump block failed.
    #[error("dump write failed: {0}")]
    Io(#[from] io::Error),
    /// `help=1` was supplied; the host should print usage and abort setup.
    #[error("help requested")]
    HelpRequested,
    /// A lifecycle callback was invoked outside its legal state.
    #[error("{0} called out of order")]
    OutOfOrder(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Created,
    Ready,
    Closed,
}

/// Per-instance plugin state tying the configured algorithm and dump taps to
/// the host lifecycle.
pub struct ProcPlug {
    algo: Box<dyn Algorithm>,
    dump_config: Option<DumpConfig>,
    tap: Option<DumpTap>,
    state: State,
}

impl fmt::Debug for ProcPlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcPlug")
            .field("state", &self.state)
            .field("dump_config", &self.dump_config)
            .finish_non_exhaustive()
    }
}

impl ProcPlug {
    /// Construct an adapter from a parsed configuration.
    ///
    /// The algorithm name is resolved first, so an unrecognized name fails
    /// with [`PlugError::UnknownAlgorithm`] even when `help` is set. With a
    /// recognized name and the `help` flag set, this returns
    /// [`PlugError::HelpRequested`] before any resource is touched. Dump
    /// files are not opened here; that happens in [`init`](Self::init).
    pub fn from_config(
        config: PluginConfig,
        registry: &AlgorithmRegistry,
    ) -> Result<Self, PlugError> {
        let algo = registry
            .create(&config.algo)
            .ok_or_else(|| PlugError::UnknownAlgorithm(config.algo.clone()))?;
        if config.help {
            return Err(PlugError::HelpRequested);
        }
        log::debug!("procplug: algo {:?}, dump {:?}", config.algo, config.dump);
        Ok(Self {
            algo,
            dump_config: config.dump,
            tap: None,
            state: State::Created,
        })
    }

    /// Host `init` callback: initialize the algorithm, then open the dump
    /// taps when dumping is configured. A tap-open failure aborts and leaves
    /// the instance unusable for streaming; only `close` remains legal.
    pub fn init(&mut self) -> Result<(), PlugError> {
        if self.state != State::Created {
            return Err(PlugError::OutOfOrder("init"));
        }
        self.algo.init();
        if let Some(config) = &self.dump_config {
            self.tap = Some(DumpTap::open(config)?);
        }
        self.state = State::Ready;
        Ok(())
    }

    /// Host `transfer` callback: optional pre-dump of the source block,
    /// delegation to the algorithm, optional post-dump of the processed
    /// block. Returns the number of bytes written to `dst`; the FFI layer
    /// reports the frame count back to the host.
    pub fn transfer(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize, PlugError> {
        if self.state != State::Ready {
            return Err(PlugError::OutOfOrder("transfer"));
        }
        if let Some(tap) = &mut self.tap {
            tap.write_input(src)?;
        }
        let written = self.algo.transfer(dst, src);
        if let Some(tap) = &mut self.tap {
            tap.write_output(&dst[..written])?;
        }
        Ok(written)
    }

    /// Host `close` callback: close the algorithm and release the dump taps.
    /// Idempotent, and legal after a failed `init`.
    pub fn close(&mut self) {
        if self.state == State::Closed {
            return;
        }
        self.algo.close();
        self.tap = None;
        self.state = State::Closed;
    }
}
