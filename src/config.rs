//! Configuration types for music-file-finder
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - Search root validation

use crate::content::{Classifier, ClassifierKind};
use crate::error::{ConfigError, ScanError};
use clap::Parser;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Header length limits for `--header-bytes`
const MIN_HEADER_LEN: usize = 4;
const MAX_HEADER_LEN: usize = 64 * 1024;

/// Find audio files by sniffing file headers
#[derive(Parser, Debug, Clone)]
#[command(
    name = "music-file-finder",
    version,
    about = "Find audio files in a directory tree by sniffing file headers",
    long_about = "Recursively scans a directory and prints the path of every file whose \
                  leading bytes identify it as audio. File extensions are ignored.\n\n\
                  Errors on individual files and directories are reported on stderr \
                  and never stop the scan.",
    after_help = "EXAMPLES:\n    \
        music-file-finder -l ~/Music\n    \
        music-file-finder -l /srv/media -d --classifier mime\n    \
        music-file-finder -l . --silence --exclude '/\\.git/' --summary"
)]
pub struct CliArgs {
    /// Search location
    #[arg(short = 'l', long, default_value = ".", value_name = "PATH")]
    pub location: PathBuf,

    /// Report files that are not audio along with their detected type
    #[arg(short = 'd', long)]
    pub debug: bool,

    /// Suppress file open and read errors
    #[arg(short = 's', long)]
    pub silence: bool,

    /// Classification strategy
    #[arg(short = 'c', long, value_enum, default_value_t = ClassifierKind::Signature)]
    pub classifier: ClassifierKind,

    /// Number of header bytes to inspect (defaults to the classifier's own)
    #[arg(long, value_name = "NUM")]
    pub header_bytes: Option<usize>,

    /// Maximum directory depth below the search location (unlimited if not set)
    #[arg(long, value_name = "NUM")]
    pub max_depth: Option<usize>,

    /// Skip paths matching pattern (can be repeated)
    #[arg(long = "exclude", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub exclude_patterns: Vec<String>,

    /// Print a summary to stderr when the scan finishes
    #[arg(long)]
    pub summary: bool,

    /// Verbose logging on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Parse process arguments, accepting the single-dash `-silence` spelling
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }
}

/// Rewrite `-silence` to `--silence`, which clap would otherwise split into short flags
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-silence" {
                OsString::from("--silence")
            } else {
                arg
            }
        })
        .collect()
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Search root
    pub root: PathBuf,

    /// Header classifier
    pub classifier: Classifier,

    /// Report near misses
    pub debug: bool,

    /// Suppress file open/read errors
    pub silence: bool,

    /// Maximum traversal depth
    pub max_depth: Option<usize>,

    /// Compiled exclude patterns
    pub exclude_patterns: Vec<Regex>,

    /// Print a summary at the end
    pub show_summary: bool,

    /// Verbose logging
    pub verbose: bool,
}

impl ScanConfig {
    /// Defaults matching the CLI: signature classifier, no filters
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            classifier: Classifier::signature(),
            debug: false,
            silence: false,
            max_depth: None,
            exclude_patterns: Vec::new(),
            show_summary: false,
            verbose: false,
        }
    }

    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut classifier = Classifier::from_kind(args.classifier);
        if let Some(len) = args.header_bytes {
            if !(MIN_HEADER_LEN..=MAX_HEADER_LEN).contains(&len) {
                return Err(ConfigError::InvalidHeaderLength {
                    len,
                    min: MIN_HEADER_LEN,
                    max: MAX_HEADER_LEN,
                });
            }
            classifier = classifier.with_prefix_len(len);
        }

        // Compile exclude patterns
        let exclude_patterns = args
            .exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidExcludePattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: args.location,
            classifier,
            debug: args.debug,
            silence: args.silence,
            max_depth: args.max_depth,
            exclude_patterns,
            show_summary: args.summary,
            verbose: args.verbose,
        })
    }

    /// Check that the search root exists and can be stat'ed
    pub fn validate_location(&self) -> Result<(), ScanError> {
        std::fs::metadata(&self.root)
            .map(|_| ())
            .map_err(|source| ScanError::InvalidLocation {
                path: self.root.clone(),
                source,
            })
    }

    /// Check if a path should be skipped
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.exclude_patterns.is_empty() {
            return false;
        }
        let path = path.to_string_lossy();
        self.exclude_patterns.iter().any(|re| re.is_match(&path))
    }

    /// Whether a directory at `depth` below the root may be scanned
    pub fn descends_into(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }
}
