//! Diagnostic dump taps.
//!
//! When `dump_enable` is set, the plugin captures the raw bytes of every
//! block to two headerless files, one before and one after processing. The
//! files are created when streaming starts and released when the stream
//! closes; writes are synchronous so the captures trail the stream by at most
//! one block.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::DumpConfig;

/// Type of errors from the dump taps.
#[derive(Debug, Error)]
pub enum DumpError {
    /// One of the dump files could not be created.
    #[error("failed to open {role} dump file {path:?}: {source}")]
    Open {
        /// Which tap failed, `"input"` or `"output"`.
        role: &'static str,
        /// The offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// An open pair of dump files.
///
/// Both files are created (truncating any previous capture) together; the
/// configuration guarantees the paths are distinct and non-empty.
#[derive(Debug)]
pub struct DumpTap {
    input: File,
    output: File,
    config: DumpConfig,
}

impl DumpTap {
    /// Create both dump files in write-binary mode.
    pub fn open(config: &DumpConfig) -> Result<Self, DumpError> {
        let input = create(&config.input_path, "input")?;
        let output = create(&config.output_path, "output")?;
        Ok(Self {
            input,
            output,
            config: config.clone(),
        })
    }

    /// Append one block of pre-processing bytes to the input dump.
    pub fn write_input(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.input.write_all(bytes)
    }

    /// Append one block of post-processing bytes to the output dump.
    pub fn write_output(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.write_all(bytes)
    }
}

fn create(path: &Path, role: &'static str) -> Result<File, DumpError> {
    File::create(path).map_err(|source| DumpError::Open {
        role,
        path: path.to_owned(),
        source,
    })
}

impl Drop for DumpTap {
    fn drop(&mut self) {
        log::info!(
            "dump files written: input {:?}, output {:?}",
            self.config.input_path,
            self.config.output_path
        );
    }
}
