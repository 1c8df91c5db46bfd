//! Audio detection using magic bytes
//!
//! Uses the `infer` crate to match audio container signatures from the file
//! header. Covers MP3 (ID3 tag and bare frame sync), FLAC, Ogg, WAV, AIFF,
//! MIDI, M4A, AMR, AAC, DSF and APE.
//!
//! Only the first 261 bytes of a file are needed.

use super::Verdict;

/// Header bytes needed by the signature matcher
pub const SIGNATURE_HEADER_LEN: usize = 261;

/// Detect the MIME type of a file from its header bytes
///
/// Returns None if no known signature matches.
///
/// # Example
///
/// ```
/// use music_file_finder::content::filetype::detect_file_type;
///
/// let flac_header = b"fLaC\x00\x00\x00\x22";
/// assert_eq!(detect_file_type(flac_header), Some("audio/x-flac"));
///
/// let unknown = &[0x00, 0x01, 0x02, 0x03];
/// assert_eq!(detect_file_type(unknown), None);
/// ```
pub fn detect_file_type(header: &[u8]) -> Option<&'static str> {
    infer::get(header).map(|kind| kind.mime_type())
}

/// Check if the content is an audio file
pub fn is_audio(header: &[u8]) -> bool {
    infer::is_audio(header)
}

/// Signature classifier
pub fn classify(header: &[u8]) -> Verdict {
    let content_type = detect_file_type(header).unwrap_or("unknown");
    if is_audio(header) {
        Verdict::audio(content_type)
    } else {
        Verdict::not_audio(content_type)
    }
}
