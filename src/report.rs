//! Serialized result and error output
//!
//! Scan tasks never touch the output streams directly. They send
//! [`ScanEvent`]s over a channel to a single writer thread, which owns both
//! writers and emits each event as one complete line.
//!
//! ```text
//! scan task ─┐
//! scan task ─┼─► channel ─► report-writer thread ─┬─► out (audio paths)
//! scan task ─┘                                    └─► err (diagnostics)
//! ```

use crate::error::{EntryError, Result, ScanError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Something a scan task wants reported
#[derive(Debug)]
pub enum ScanEvent {
    /// File classified as audio
    Audio(PathBuf),

    /// File rejected by the classifier (debug mode only)
    NotAudio {
        path: PathBuf,
        content_type: &'static str,
    },

    /// Recoverable failure on a directory or file
    Failed(EntryError),
}

/// Handle to the writer thread
pub struct ReportWriter<O, E> {
    handle: JoinHandle<io::Result<(O, E)>>,
}

impl<O, E> ReportWriter<O, E>
where
    O: Write + Send + 'static,
    E: Write + Send + 'static,
{
    /// Spawn the writer thread; it runs until every sender is dropped
    pub fn spawn(out: O, err: E) -> Result<(Sender<ScanEvent>, Self)> {
        let (tx, rx) = unbounded();
        let handle = thread::Builder::new()
            .name("report-writer".into())
            .spawn(move || writer_loop(rx, out, err))?;
        Ok((tx, Self { handle }))
    }

    /// Wait for the channel to drain and take the writers back
    pub fn finish(self) -> Result<(O, E)> {
        let writers = self.handle.join().map_err(|_| ScanError::WriterPanicked)??;
        Ok(writers)
    }
}

/// One output stream; after its first failed write it discards further lines
struct Sink<W> {
    writer: W,
    lines: u64,
    error: Option<io::Error>,
}

impl<W: Write> Sink<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            lines: 0,
            error: None,
        }
    }

    fn write_line(&mut self, line: &[u8]) {
        if self.error.is_some() {
            return;
        }
        match self.writer.write_all(line) {
            Ok(()) => self.lines += 1,
            Err(e) => self.error = Some(e),
        }
    }

    fn flush(&mut self) {
        if self.error.is_none() {
            if let Err(e) = self.writer.flush() {
                self.error = Some(e);
            }
        }
    }
}

/// Audio paths are written as raw bytes so non-UTF-8 names survive intact
fn path_line(path: &Path) -> Vec<u8> {
    let bytes = path.as_os_str().as_encoded_bytes();
    let mut line = Vec::with_capacity(bytes.len() + 1);
    line.extend_from_slice(bytes);
    line.push(b'\n');
    line
}

fn writer_loop<O: Write, E: Write>(rx: Receiver<ScanEvent>, out: O, err: E) -> io::Result<(O, E)> {
    let mut out = Sink::new(out);
    let mut err = Sink::new(err);

    // Keeps draining after a failed write so senders never block or error
    for event in rx {
        match event {
            ScanEvent::Audio(path) => out.write_line(&path_line(&path)),
            ScanEvent::NotAudio { path, content_type } => err.write_line(
                format!("Not audio file: '{}' is '{}'\n", path.display(), content_type).as_bytes(),
            ),
            ScanEvent::Failed(error) => err.write_line(format!("{}\n", error).as_bytes()),
        }
    }

    out.flush();
    err.flush();
    debug!(out = out.lines, err = err.lines, "Report writer finished");

    match (out.error, err.error) {
        (Some(e), _) | (None, Some(e)) => Err(e),
        (None, None) => Ok((out.writer, err.writer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Operation;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_events_are_routed() {
        let (tx, writer) = ReportWriter::spawn(Vec::new(), Vec::new()).unwrap();
        tx.send(ScanEvent::Audio(PathBuf::from("music/a.mp3"))).unwrap();
        tx.send(ScanEvent::NotAudio {
            path: PathBuf::from("music/d.jpg"),
            content_type: "image/jpeg",
        })
        .unwrap();
        tx.send(ScanEvent::Failed(EntryError::new(
            Operation::ReadDir,
            "music/locked",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        )))
        .unwrap();
        drop(tx);

        let (out, err) = writer.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "music/a.mp3\n");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "Not audio file: 'music/d.jpg' is 'image/jpeg'\n\
             directory read failed music/locked, Permission denied\n"
        );
    }

    #[test]
    fn test_concurrent_senders_write_whole_lines() {
        let (tx, writer) = ReportWriter::spawn(Vec::new(), Vec::new()).unwrap();
        let senders: Vec<_> = (0..8)
            .map(|t| {
                let tx = tx.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        let path = PathBuf::from(format!("dir{}/track{:03}.flac", t, i));
                        tx.send(ScanEvent::Audio(path)).unwrap();
                    }
                })
            })
            .collect();
        drop(tx);
        for s in senders {
            s.join().unwrap();
        }

        let (out, _) = writer.finish().unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 800);
        assert!(lines
            .iter()
            .all(|l| l.starts_with("dir") && l.ends_with(".flac")));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_returned() {
        let (tx, writer) = ReportWriter::spawn(BrokenPipe, Vec::new()).unwrap();
        for i in 0..10 {
            tx.send(ScanEvent::Audio(PathBuf::from(format!("{}.mp3", i))))
                .unwrap();
        }
        drop(tx);
        let err = writer.finish().err().unwrap();
        assert!(matches!(err, ScanError::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    /// Writer whose contents stay readable after it is moved into the thread
    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_error_stream_keeps_results() {
        let out = Shared::default();
        let (tx, writer) = ReportWriter::spawn(out.clone(), BrokenPipe).unwrap();
        tx.send(ScanEvent::NotAudio {
            path: PathBuf::from("d.jpg"),
            content_type: "image/jpeg",
        })
        .unwrap();
        for i in 0..3 {
            tx.send(ScanEvent::Audio(PathBuf::from(format!("{}.mp3", i))))
                .unwrap();
        }
        drop(tx);

        assert!(writer.finish().is_err());
        assert_eq!(&*out.0.lock().unwrap(), b"0.mp3\n1.mp3\n2.mp3\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_audio_paths_keep_raw_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from(OsStr::from_bytes(b"music/caf\xe9.mp3"));
        let (tx, writer) = ReportWriter::spawn(Vec::new(), Vec::new()).unwrap();
        tx.send(ScanEvent::Audio(path)).unwrap();
        drop(tx);

        let (out, _) = writer.finish().unwrap();
        assert_eq!(out, b"music/caf\xe9.mp3\n");
    }
}
