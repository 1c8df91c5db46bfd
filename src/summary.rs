//! End-of-scan summary
//!
//! Printed to stderr so stdout stays a clean list of paths.

use crate::content::Classifier;
use crate::walker::ScanStats;
use console::style;
use humansize::{format_size, BINARY};
use std::path::Path;

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Files inspected per second
fn files_per_second(stats: &ScanStats) -> f64 {
    let secs = stats.duration.as_secs_f64();
    if secs > 0.0 {
        stats.files as f64 / secs
    } else {
        0.0
    }
}

/// Print a summary of the scan results
pub fn print_summary(stats: &ScanStats, root: &Path, classifier: &Classifier) {
    eprintln!();
    eprintln!("{}", style("Scan Complete").green().bold());
    eprintln!("{}", style("─".repeat(50)).dim());
    eprintln!("  {} {}", style("Location:").bold(), root.display());
    eprintln!("  {} {}", style("Classifier:").bold(), classifier);
    eprintln!("  {} {}", style("Directories:").bold(), format_number(stats.dirs));
    eprintln!("  {} {}", style("Files:").bold(), format_number(stats.files));
    eprintln!(
        "  {} {} ({})",
        style("Audio:").bold(),
        format_number(stats.audio_files),
        format_size(stats.audio_bytes, BINARY)
    );
    eprintln!(
        "  {} {:.1}s ({:.0} files/sec)",
        style("Duration:").bold(),
        stats.duration.as_secs_f64(),
        files_per_second(stats)
    );
    if stats.errors > 0 {
        eprintln!(
            "  {} {}",
            style("Errors:").yellow().bold(),
            format_number(stats.errors)
        );
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(12345), "12,345");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_files_per_second() {
        let stats = ScanStats {
            files: 500,
            duration: Duration::from_secs(2),
            ..ScanStats::default()
        };
        assert_eq!(files_per_second(&stats), 250.0);
        assert_eq!(files_per_second(&ScanStats::default()), 0.0);
    }
}
