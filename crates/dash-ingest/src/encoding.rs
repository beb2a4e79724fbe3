//! Character encoding detection for delimited text.

use std::io::{Read, Seek, SeekFrom};

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

use crate::error::Result;

/// Number of leading bytes sampled for detection.
pub const ENCODING_SAMPLE_BYTES: usize = 10_000;

/// Best-guess encoding for a byte sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingGuess {
    pub encoding: &'static Encoding,
    /// False when the detector had too little signal to be sure.
    pub confident: bool,
}

impl EncodingGuess {
    pub fn label(&self) -> &'static str {
        self.encoding.name()
    }
}

/// Guesses the encoding of a stream from its first [`ENCODING_SAMPLE_BYTES`] bytes.
///
/// The stream is rewound to offset 0 before returning, so a caller can
/// read the full content afterwards.
pub fn detect_encoding<R: Read + Seek>(reader: &mut R) -> Result<EncodingGuess> {
    detect_encoding_with_limit(reader, ENCODING_SAMPLE_BYTES)
}

/// Same as [`detect_encoding`] with a custom sample size.
pub fn detect_encoding_with_limit<R: Read + Seek>(
    reader: &mut R,
    limit: usize,
) -> Result<EncodingGuess> {
    reader.seek(SeekFrom::Start(0))?;
    let mut sample = Vec::with_capacity(limit);
    reader.by_ref().take(limit as u64).read_to_end(&mut sample)?;
    reader.seek(SeekFrom::Start(0))?;

    let is_complete = sample.len() < limit;
    Ok(guess_encoding(&sample, is_complete))
}

/// Guesses the encoding of an in-memory sample.
///
/// A byte-order mark wins outright. Otherwise the statistical detector's
/// best guess is returned even when it is not confident.
pub fn guess_encoding(sample: &[u8], is_complete: bool) -> EncodingGuess {
    if let Some((encoding, _)) = Encoding::for_bom(sample) {
        debug!(encoding = encoding.name(), "encoding taken from byte-order mark");
        return EncodingGuess {
            encoding,
            confident: true,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, is_complete);
    let (encoding, confident) = detector.guess_assess(None, true);
    if confident {
        debug!(encoding = encoding.name(), sample_len = sample.len(), "encoding detected");
    } else {
        warn!(
            encoding = encoding.name(),
            sample_len = sample.len(),
            "encoding guess is not confident"
        );
    }
    EncodingGuess {
        encoding,
        confident,
    }
}

/// Decodes `bytes` as `encoding`, failing on any malformed sequence.
///
/// A leading byte-order mark for the same encoding is skipped.
pub fn decode_strict(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };
    if encoding == UTF_8 {
        return std::str::from_utf8(body).ok().map(str::to_string);
    }
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(std::borrow::Cow::into_owned)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use encoding_rs::{UTF_16LE, WINDOWS_1252};

    use super::*;

    #[test]
    fn test_detection_rewinds_stream() {
        let content = "name,city\nJos\u{e9},M\u{fc}nchen\n".repeat(1_000);
        let (bytes, _, _) = WINDOWS_1252.encode(&content);
        let mut cursor = Cursor::new(bytes.to_vec());

        detect_encoding(&mut cursor).unwrap();

        assert_eq!(cursor.position(), 0);
        let mut full = Vec::new();
        cursor.read_to_end(&mut full).unwrap();
        assert_eq!(full, bytes.to_vec());
    }

    #[test]
    fn test_detection_rewinds_short_stream() {
        let mut cursor = Cursor::new(b"a,b\n1,2\n".to_vec());
        cursor.set_position(4);

        let guess = detect_encoding(&mut cursor).unwrap();

        assert_eq!(cursor.position(), 0);
        assert!(decode_strict(b"a,b\n1,2\n", guess.encoding).is_some());
    }

    #[test]
    fn test_bom_wins() {
        let guess = guess_encoding(&[0xFF, 0xFE, b'a', 0x00], true);
        assert_eq!(guess.encoding, UTF_16LE);
        assert!(guess.confident);
    }

    #[test]
    fn test_latin_text_is_not_utf8() {
        let text = "Caf\u{e9} cr\u{e8}me br\u{fb}l\u{e9}e, na\u{ef}ve fa\u{e7}ade, \u{e0} la carte\n"
            .repeat(20);
        let (bytes, _, _) = WINDOWS_1252.encode(&text);
        let guess = guess_encoding(&bytes, true);
        assert_ne!(guess.encoding, UTF_8);
        assert!(decode_strict(&bytes, UTF_8).is_none());
        assert!(decode_strict(&bytes, guess.encoding).is_some());
    }

    #[test]
    fn test_decode_strict() {
        assert_eq!(decode_strict(b"abc", UTF_8).as_deref(), Some("abc"));
        assert_eq!(
            decode_strict(b"\xEF\xBB\xBFabc", UTF_8).as_deref(),
            Some("abc")
        );
        assert_eq!(decode_strict(b"caf\xe9", UTF_8), None);
        assert_eq!(
            decode_strict(b"caf\xe9", WINDOWS_1252).as_deref(),
            Some("caf\u{e9}")
        );
    }
}
