/*!
 * Recovery of text from bytes in an unknown encoding.
 *
 * Subtitle files are uploaded by users in whatever code page their editor
 * used. The encoding is detected from the bytes themselves and decoding
 * substitutes U+FFFD for anything that cannot be mapped, so it never fails.
 */

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use log::debug;

/// Guess the encoding of `bytes`
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode `bytes` with their detected encoding, replacing malformed sequences
pub fn decode_best_effort(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (text, used, had_errors) = encoding.decode(bytes);
    debug!(
        "Decoded {} bytes as {}{}",
        bytes.len(),
        used.name(),
        if had_errors { " with replacements" } else { "" }
    );
    text.into_owned()
}
