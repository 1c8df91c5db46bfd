//! music-file-finder - find audio files by their headers
//!
//! Recursively scans a directory tree and reports every file whose leading
//! bytes identify it as audio. File extensions are never consulted.
//!
//! # Features
//!
//! - **Concurrent Fan-out**: one tokio task per subdirectory, each waiting
//!   for its own children before completing.
//!
//! - **Pluggable Classification**: a dedicated audio signature matcher
//!   (261-byte header) or generic MIME sniffing (512-byte header).
//!
//! - **Non-fatal Errors**: unreadable files and directories are reported on
//!   the error channel and skipped; the scan always runs to completion.
//!
//! # Example
//!
//! ```bash
//! # Scan the current directory
//! music-file-finder
//!
//! # Show near misses, MIME sniffing
//! music-file-finder -l ~/Music -d --classifier mime
//! ```
//!
//! Library use:
//!
//! ```no_run
//! use music_file_finder::{run_scan, ScanConfig};
//!
//! # async fn demo() -> music_file_finder::Result<()> {
//! let config = ScanConfig::new("/srv/music");
//! config.validate_location()?;
//! let result = run_scan(config, std::io::stdout(), std::io::stderr()).await?;
//! println!("{} audio files", result.stats.audio_files);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod report;
pub mod summary;
pub mod walker;

pub use config::{CliArgs, ScanConfig};
pub use content::{Classifier, ClassifierKind, Verdict};
pub use error::{Result, ScanError};
pub use walker::{run_scan, ScanOutput, ScanStats, TreeScanner};
