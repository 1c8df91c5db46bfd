//! Scan coordinator
//!
//! Connects a [`TreeScanner`] to a [`ReportWriter`] and runs one scan from
//! the configured root to completion.

use super::tree::{ScanStats, TreeScanner};
use crate::config::ScanConfig;
use crate::error::{Result, ScanError};
use crate::report::ReportWriter;
use std::io::Write;

/// Everything a finished scan hands back
#[derive(Debug)]
pub struct ScanOutput<O, E> {
    pub stats: ScanStats,
    /// The output writer, holding one audio path per line
    pub out: O,
    /// The error writer, holding diagnostics
    pub err: E,
}

/// Scan `config.root`, writing audio paths to `out` and diagnostics to `err`
///
/// The root is not validated here; see [`ScanConfig::validate_location`].
pub async fn run_scan<O, E>(config: ScanConfig, out: O, err: E) -> Result<ScanOutput<O, E>>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    let (events, writer) = ReportWriter::spawn(out, err)?;

    let root = config.root.clone();
    let scanner = TreeScanner::new(config, events);
    let stats = scanner.scan(&root).await;

    // Last sender goes away here, letting the writer drain and exit
    drop(scanner);

    let (out, err) = tokio::task::spawn_blocking(move || writer.finish())
        .await
        .map_err(|_| ScanError::WriterPanicked)??;

    Ok(ScanOutput { stats, out, err })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_run_scan_collects_output() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("c.flac"), b"fLaC\x00\x00\x00\x22").unwrap();

        let result = run_scan(ScanConfig::new(dir.path()), Vec::new(), Vec::new())
            .await
            .unwrap();

        let out = String::from_utf8(result.out).unwrap();
        assert_eq!(
            out,
            format!("{}\n", dir.path().join("sub").join("c.flac").display())
        );
        assert!(result.err.is_empty());
        assert_eq!(result.stats.dirs, 2);
        assert_eq!(result.stats.audio_files, 1);
    }
}
