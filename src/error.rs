//! Error types for music-file-finder
//!
//! This module defines the error hierarchy for:
//! - Root location validation (fatal)
//! - Configuration errors (fatal)
//! - Per-entry scan failures (recoverable, reported on the error channel)

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for music-file-finder
#[derive(Error, Debug)]
pub enum ScanError {
    /// The search root does not exist or cannot be stat'ed
    #[error("Location is invalid value '{}'", path.display())]
    InvalidLocation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors (writing results, spawning threads)
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Report writer thread panicked
    #[error("Report writer terminated unexpectedly")]
    WriterPanicked,
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid exclude pattern
    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidExcludePattern { pattern: String, reason: String },

    /// Header length out of range
    #[error("Invalid header length {len}: must be between {min} and {max}")]
    InvalidHeaderLength { len: usize, min: usize, max: usize },
}

/// The filesystem operation that failed for a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Listing a directory
    ReadDir,
    /// Fetching the type of a directory entry
    EntryMetadata,
    /// Opening a file
    FileOpen,
    /// Reading a file's header
    FileRead,
}

impl Operation {
    /// File-level failures are the ones `silence` suppresses
    pub fn is_file_level(self) -> bool {
        matches!(self, Operation::FileOpen | Operation::FileRead)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::ReadDir => "directory read",
            Operation::EntryMetadata => "entry metadata",
            Operation::FileOpen => "file open",
            Operation::FileRead => "file read",
        };
        f.write_str(name)
    }
}

/// A recoverable failure on one directory or file
///
/// Displays as `<operation> failed <path>, <underlying error>`.
#[derive(Error, Debug)]
#[error("{op} failed {}, {source}", path.display())]
pub struct EntryError {
    pub op: Operation,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl EntryError {
    pub fn new(op: Operation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for ScanError
pub type Result<T> = std::result::Result<T, ScanError>;
