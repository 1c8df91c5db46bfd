//! Header-based content classification
//!
//! A [`Classifier`] pairs a header prefix length with a matcher function.
//! Two strategies are provided:
//! - [`ClassifierKind::Signature`]: dedicated audio signature matching over
//!   261 bytes (see [`filetype`])
//! - [`ClassifierKind::Mime`]: generic MIME sniffing over 512 bytes, audio
//!   when the sniffed type starts with `audio/` (see [`sniff`])
//!
//! The two strategies disagree on some formats. FLAC and Ogg are audio to the
//! signature matcher only, since MIME sniffing reports them as
//! `application/octet-stream` and `application/ogg`.

pub mod filetype;
pub mod sniff;

use std::fmt;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

pub use filetype::SIGNATURE_HEADER_LEN;
pub use sniff::MIME_SNIFF_LEN;

/// Outcome of classifying a file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    audio: bool,
    content_type: &'static str,
}

impl Verdict {
    pub fn audio(content_type: &'static str) -> Self {
        Self {
            audio: true,
            content_type,
        }
    }

    pub fn not_audio(content_type: &'static str) -> Self {
        Self {
            audio: false,
            content_type,
        }
    }

    pub fn is_audio(&self) -> bool {
        self.audio
    }

    /// Detected content type, used to explain near misses in debug mode
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }
}

/// Built-in classification strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClassifierKind {
    /// Dedicated audio signature matcher (261-byte header)
    Signature,
    /// Generic MIME sniffing, audio/* types only (512-byte header)
    Mime,
}

/// A header classifier: how many leading bytes to read and how to judge them
#[derive(Clone, Copy)]
pub struct Classifier {
    name: &'static str,
    prefix_len: usize,
    matcher: fn(&[u8]) -> Verdict,
}

impl Classifier {
    /// Build a custom classifier
    pub fn new(name: &'static str, prefix_len: usize, matcher: fn(&[u8]) -> Verdict) -> Self {
        Self {
            name,
            prefix_len,
            matcher,
        }
    }

    pub fn signature() -> Self {
        Self::new("signature", SIGNATURE_HEADER_LEN, filetype::classify)
    }

    pub fn mime() -> Self {
        Self::new("mime", MIME_SNIFF_LEN, sniff::classify)
    }

    pub fn from_kind(kind: ClassifierKind) -> Self {
        match kind {
            ClassifierKind::Signature => Self::signature(),
            ClassifierKind::Mime => Self::mime(),
        }
    }

    /// Same matcher, different number of header bytes
    pub fn with_prefix_len(self, prefix_len: usize) -> Self {
        Self { prefix_len, ..self }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Classify a header; only the first `prefix_len` bytes are considered
    pub fn classify(&self, header: &[u8]) -> Verdict {
        let len = header.len().min(self.prefix_len);
        (self.matcher)(&header[..len])
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::signature()
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("name", &self.name)
            .field("prefix_len", &self.prefix_len)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.prefix_len)
    }
}

/// Read up to `len` leading bytes
///
/// Short files yield a short buffer rather than an error.
pub async fn read_header<R>(reader: R, len: usize) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut header = Vec::with_capacity(len);
    reader.take(len as u64).read_to_end(&mut header).await?;
    Ok(header)
}
