//! Generic MIME type sniffing
//!
//! Implements the media-type sniffing rules browsers and HTTP servers apply
//! to unlabeled content: a fixed table of leading-byte signatures, a few
//! container checks (RIFF/IFF forms, ISO-BMFF `ftyp`), and finally a
//! text-versus-binary fallback. At most 512 bytes are considered.
//!
//! Audio coverage is narrower than [`super::filetype`]: `.snd`, AIFF,
//! ID3-tagged MP3, MIDI and WAVE are `audio/*`. Ogg sniffs as
//! `application/ogg`, and FLAC or untagged MP3 fall through to
//! `application/octet-stream`.

use super::Verdict;

/// Maximum number of bytes sniffing looks at
pub const MIME_SNIFF_LEN: usize = 512;

const TEXT_HTML: &str = "text/html; charset=utf-8";
const TEXT_XML: &str = "text/xml; charset=utf-8";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

/// Tags that mark HTML when they open the document (case-insensitive)
const HTML_TAGS: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// Exact leading-byte signatures, checked in order
const PREFIXES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"\xFE\xFF", "text/plain; charset=utf-16be"),
    (b"\xFF\xFE", "text/plain; charset=utf-16le"),
    (b"\xEF\xBB\xBF", TEXT_PLAIN),
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"\x00\x00\x02\x00", "image/x-icon"),
    (b"BM", "image/bmp"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\x89PNG\x0D\x0A\x1A\x0A", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b".snd", "audio/basic"),
    (b"ID3", "audio/mpeg"),
    (b"OggS\x00", "application/ogg"),
    (b"MThd\x00\x00\x00\x06", "audio/midi"),
    (b"\x1A\x45\xDF\xA3", "video/webm"),
    (b"Rar!\x1A\x07\x00", "application/x-rar-compressed"),
    (b"Rar!\x1A\x07\x01\x00", "application/x-rar-compressed"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
    (b"\x00asm", "application/wasm"),
    (b"wOFF", "font/woff"),
    (b"wOF2", "font/woff2"),
    (b"OTTO", "font/otf"),
    (b"\x00\x01\x00\x00", "font/ttf"),
];

/// IFF-style containers: (chunk id at 0, form type at 8, content type)
const FORMS: &[(&[u8; 4], &[u8; 4], &str)] = &[
    (b"RIFF", b"WEBP", "image/webp"),
    (b"FORM", b"AIFF", "audio/aiff"),
    (b"RIFF", b"AVI ", "video/avi"),
    (b"RIFF", b"WAVE", "audio/wave"),
];

/// Sniff the content type of a header
///
/// # Example
///
/// ```
/// use music_file_finder::content::sniff::detect_content_type;
///
/// assert_eq!(detect_content_type(b"ID3\x04\x00"), "audio/mpeg");
/// assert_eq!(detect_content_type(b"fLaC\x00\x00\x00\x22"), "application/octet-stream");
/// assert_eq!(detect_content_type(b"hello"), "text/plain; charset=utf-8");
/// ```
pub fn detect_content_type(header: &[u8]) -> &'static str {
    let data = &header[..header.len().min(MIME_SNIFF_LEN)];

    let trimmed = skip_whitespace(data);
    if HTML_TAGS.iter().any(|tag| is_html_tag(trimmed, tag)) {
        return TEXT_HTML;
    }
    if trimmed.starts_with(b"<?xml") {
        return TEXT_XML;
    }

    if let Some((_, content_type)) = PREFIXES.iter().find(|(sig, _)| data.starts_with(sig)) {
        return content_type;
    }

    if data.len() >= 12 {
        let found = FORMS
            .iter()
            .find(|(chunk, form, _)| &data[0..4] == *chunk && &data[8..12] == *form);
        if let Some((_, _, content_type)) = found {
            return content_type;
        }
    }

    if is_mp4(data) {
        return "video/mp4";
    }

    if data.iter().copied().any(is_binary_byte) {
        OCTET_STREAM
    } else {
        TEXT_PLAIN
    }
}

/// MIME classifier: audio when the sniffed type is `audio/*`
pub fn classify(header: &[u8]) -> Verdict {
    let content_type = detect_content_type(header);
    if content_type.starts_with("audio/") {
        Verdict::audio(content_type)
    } else {
        Verdict::not_audio(content_type)
    }
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

/// Tag must be followed by a space or `>` to count
fn is_html_tag(data: &[u8], tag: &[u8]) -> bool {
    if data.len() <= tag.len() || !data[..tag.len()].eq_ignore_ascii_case(tag) {
        return false;
    }
    matches!(data[tag.len()], b' ' | b'>')
}

/// ISO base media file: a leading `ftyp` box with an mp4 brand
fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if box_size % 4 != 0 || box_size < 12 || data.len() < box_size {
        return false;
    }
    if &data[4..8] != b"ftyp" {
        return false;
    }
    // Major brand at 8, then compatible brands from 16, skipping the minor version
    (8..box_size)
        .step_by(4)
        .filter(|&offset| offset != 12)
        .any(|offset| data[offset..].starts_with(b"mp4"))
}

/// Control bytes that never appear in text
fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_signatures() {
        assert_eq!(detect_content_type(b".snd\x00\x00\x00\x18"), "audio/basic");
        assert_eq!(detect_content_type(b"ID3\x03\x00\x00\x00\x00"), "audio/mpeg");
        assert_eq!(
            detect_content_type(b"MThd\x00\x00\x00\x06\x00\x01"),
            "audio/midi"
        );
        assert_eq!(
            detect_content_type(b"RIFF\x24\x08\x00\x00WAVEfmt "),
            "audio/wave"
        );
        assert_eq!(
            detect_content_type(b"FORM\x00\x00\x10\x00AIFFCOMM"),
            "audio/aiff"
        );
    }

    #[test]
    fn test_near_misses() {
        assert_eq!(detect_content_type(b"OggS\x00\x02\x00\x00"), "application/ogg");
        assert!(!classify(b"OggS\x00\x02\x00\x00").is_audio());
        assert_eq!(
            detect_content_type(b"RIFF\x24\x08\x00\x00AVI LIST"),
            "video/avi"
        );
        // Bare MPEG frame sync has no sniffing rule
        assert_eq!(
            detect_content_type(&[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00]),
            OCTET_STREAM
        );
    }

    #[test]
    fn test_images_and_documents() {
        assert_eq!(
            detect_content_type(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46]),
            "image/jpeg"
        );
        assert_eq!(
            detect_content_type(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            "image/png"
        );
        assert_eq!(detect_content_type(b"%PDF-1.5\n"), "application/pdf");
    }

    #[test]
    fn test_html_and_xml() {
        assert_eq!(detect_content_type(b"  \n<!doctype html>"), TEXT_HTML);
        assert_eq!(detect_content_type(b"<p>hello</p>"), TEXT_HTML);
        assert_eq!(detect_content_type(b"<?xml version=\"1.0\"?>"), TEXT_XML);
        // Tag must be terminated
        assert_eq!(detect_content_type(b"<pre>"), TEXT_PLAIN);
    }

    #[test]
    fn test_mp4() {
        let mut header = vec![0x00, 0x00, 0x00, 0x18];
        header.extend_from_slice(b"ftypisom\x00\x00\x02\x00isommp41");
        assert_eq!(detect_content_type(&header), "video/mp4");
    }

    #[test]
    fn test_text_fallback() {
        assert_eq!(detect_content_type(b"title,artist\n"), TEXT_PLAIN);
        assert_eq!(detect_content_type(b""), TEXT_PLAIN);
        assert_eq!(detect_content_type(b"abc\x00def"), OCTET_STREAM);
    }

    #[test]
    fn test_only_first_512_bytes_count() {
        let mut data = vec![b'a'; MIME_SNIFF_LEN];
        data.push(0x00);
        assert_eq!(detect_content_type(&data), TEXT_PLAIN);
    }
}
