//! Concurrent directory tree scanning
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────────────────┐
//!                  │       TreeScanner        │
//!                  │  one tokio task per dir  │
//!                  │  JoinSet barrier per dir │
//!                  └────────────┬─────────────┘
//!                               │ ScanEvent
//!                               ▼
//!                  ┌──────────────────────────┐
//!                  │   report-writer thread   │
//!                  │  stdout: audio paths     │
//!                  │  stderr: diagnostics     │
//!                  └──────────────────────────┘
//! ```

pub mod coordinator;
pub mod tree;

pub use coordinator::{run_scan, ScanOutput};
pub use tree::{ScanStats, TreeScanner};
