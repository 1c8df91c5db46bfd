//! Recursive fan-out tree scanner
//!
//! Every directory is scanned by its own tokio task. A task lists its
//! directory once, classifies files inline in listing order, spawns one
//! child task per subdirectory, then waits on its `JoinSet` until all of
//! those children have finished. Since each child waits on its own children
//! first, the root task completes only after the whole tree has been visited.
//!
//! ```text
//! scan(/music)
//! ├── a.mp3           → classify → Audio
//! ├── spawn scan(/music/rock) ──┐
//! ├── spawn scan(/music/jazz) ──┤
//! └── join all ◄────────────────┘
//! ```
//!
//! There is no cap on concurrent tasks and no cancellation: once started, a
//! scan runs to completion.

use crate::config::ScanConfig;
use crate::content::read_header;
use crate::error::{EntryError, Operation};
use crate::report::ScanEvent;
use crossbeam_channel::Sender;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs::{self, File};
use tokio::task::JoinSet;
use tracing::{debug, info, trace, warn};

type ScanFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Result of a completed scan
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Directories successfully listed
    pub dirs: u64,
    /// Files handed to the classifier
    pub files: u64,
    /// Files classified as audio
    pub audio_files: u64,
    /// Combined size of audio files
    pub audio_bytes: u64,
    /// Recoverable errors, including silenced ones
    pub errors: u64,
    pub duration: Duration,
}

#[derive(Debug, Default)]
struct Counters {
    dirs: AtomicU64,
    files: AtomicU64,
    audio_files: AtomicU64,
    audio_bytes: AtomicU64,
    errors: AtomicU64,
}

impl Counters {
    fn snapshot(&self, duration: Duration) -> ScanStats {
        ScanStats {
            dirs: self.dirs.load(Ordering::Relaxed),
            files: self.files.load(Ordering::Relaxed),
            audio_files: self.audio_files.load(Ordering::Relaxed),
            audio_bytes: self.audio_bytes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            duration,
        }
    }
}

/// Scans a directory tree and reports audio files as [`ScanEvent`]s
pub struct TreeScanner {
    config: Arc<ScanConfig>,
    events: Sender<ScanEvent>,
}

impl TreeScanner {
    pub fn new(config: ScanConfig, events: Sender<ScanEvent>) -> Self {
        Self {
            config: Arc::new(config),
            events,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `root` and everything below it
    ///
    /// `root` is expected to exist; a root that cannot be listed is reported
    /// like any other unreadable directory. Must be called within a tokio
    /// runtime. Returns once every spawned task has completed.
    pub async fn scan(&self, root: &Path) -> ScanStats {
        let start = Instant::now();
        let ctx = Arc::new(ScanContext {
            config: Arc::clone(&self.config),
            events: self.events.clone(),
            counters: Counters::default(),
        });

        info!(
            root = %root.display(),
            classifier = %self.config.classifier,
            "Starting scan"
        );

        Arc::clone(&ctx).scan_dir(root.to_path_buf(), 0).await;

        let stats = ctx.counters.snapshot(start.elapsed());
        info!(
            dirs = stats.dirs,
            files = stats.files,
            audio = stats.audio_files,
            errors = stats.errors,
            "Scan finished"
        );
        stats
    }
}

/// State shared by every task of one scan
struct ScanContext {
    config: Arc<ScanConfig>,
    events: Sender<ScanEvent>,
    counters: Counters,
}

impl ScanContext {
    fn scan_dir(self: Arc<Self>, dir: PathBuf, depth: usize) -> ScanFuture {
        Box::pin(async move {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(source) => {
                    self.report_error(Operation::ReadDir, dir, source);
                    return;
                }
            };
            self.counters.dirs.fetch_add(1, Ordering::Relaxed);
            debug!(dir = %dir.display(), depth, "Scanning directory");

            let mut children = JoinSet::new();

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(source) => {
                        // Keep what was dispatched, but stop listing this directory
                        self.report_error(Operation::ReadDir, dir.clone(), source);
                        break;
                    }
                };

                let path = entry.path();
                if self.config.is_excluded(&path) {
                    trace!(path = %path.display(), "Excluded");
                    continue;
                }

                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    Err(source) => {
                        self.report_error(Operation::EntryMetadata, path, source);
                        continue;
                    }
                };

                if file_type.is_dir() {
                    if self.config.descends_into(depth + 1) {
                        children.spawn(Arc::clone(&self).scan_dir(path, depth + 1));
                    } else {
                        trace!(path = %path.display(), "Max depth reached");
                    }
                } else if file_type.is_file() {
                    self.inspect_file(path).await;
                } else if file_type.is_symlink() {
                    // Follow links to files only; linked directories could form cycles
                    match fs::metadata(&path).await {
                        Ok(meta) if meta.is_file() => self.inspect_file(path).await,
                        Ok(_) => trace!(path = %path.display(), "Skipping link to non-file"),
                        Err(source) => self.report_error(Operation::EntryMetadata, path, source),
                    }
                } else {
                    trace!(path = %path.display(), "Skipping special file");
                }
            }

            while let Some(joined) = children.join_next().await {
                if let Err(e) = joined {
                    warn!(dir = %dir.display(), error = %e, "Subdirectory task failed");
                    self.counters.errors.fetch_add(1, Ordering::Relaxed);
                }
            }
        })
    }

    async fn inspect_file(&self, path: PathBuf) {
        self.counters.files.fetch_add(1, Ordering::Relaxed);
        let classifier = self.config.classifier;

        let mut file = match File::open(&path).await {
            Ok(file) => file,
            Err(source) => {
                self.report_error(Operation::FileOpen, path, source);
                return;
            }
        };

        let header = match read_header(&mut file, classifier.prefix_len()).await {
            Ok(header) => header,
            Err(source) => {
                self.report_error(Operation::FileRead, path, source);
                return;
            }
        };

        let verdict = classifier.classify(&header);
        if verdict.is_audio() {
            let size = file.metadata().await.map(|m| m.len()).unwrap_or_default();
            drop(file);
            self.counters.audio_files.fetch_add(1, Ordering::Relaxed);
            self.counters.audio_bytes.fetch_add(size, Ordering::Relaxed);
            self.emit(ScanEvent::Audio(path));
        } else {
            drop(file);
            trace!(
                path = %path.display(),
                content_type = verdict.content_type(),
                "Not audio"
            );
            if self.config.debug {
                self.emit(ScanEvent::NotAudio {
                    path,
                    content_type: verdict.content_type(),
                });
            }
        }
    }

    fn report_error(&self, op: Operation, path: PathBuf, source: io::Error) {
        self.counters.errors.fetch_add(1, Ordering::Relaxed);
        let error = EntryError::new(op, path, source);
        if self.config.silence && op.is_file_level() {
            debug!(%error, "Suppressed");
            return;
        }
        self.emit(ScanEvent::Failed(error));
    }

    fn emit(&self, event: ScanEvent) {
        if let Err(e) = self.events.send(event) {
            warn!(event = ?e.into_inner(), "Report channel closed, dropping event");
        }
    }
}
