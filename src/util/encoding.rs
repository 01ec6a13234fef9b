//! Text encoding detection and transcoding
//!
//! Detection order: byte-order mark, then strict UTF-8, then `chardetng`'s
//! guess. Saving keeps the loaded format: UTF-16 stays UTF-16 and a BOM
//! read on load is written back.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

/// Encoding used when nothing better is known
pub fn default_encoding() -> &'static Encoding {
    UTF_8
}

/// Resolve a user-supplied label such as `"latin1"` or `"UTF-16LE"`
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}

/// Guess the encoding of raw file bytes
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Result of decoding file bytes
#[derive(Debug)]
pub struct DecodedText {
    pub text: String,
    /// Encoding actually used (a BOM overrides the requested one)
    pub encoding: &'static Encoding,
    /// The input started with a byte-order mark
    pub had_bom: bool,
    /// Malformed sequences were replaced with U+FFFD
    pub had_errors: bool,
}

pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> DecodedText {
    let had_bom = Encoding::for_bom(bytes).is_some();
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            "Malformed {} input replaced with U+FFFD while decoding",
            used.name()
        );
    }
    DecodedText {
        text: text.into_owned(),
        encoding: used,
        had_bom,
        had_errors,
    }
}

pub fn is_utf16(encoding: &'static Encoding) -> bool {
    encoding == UTF_16LE || encoding == UTF_16BE
}

/// Result of encoding text for writing
#[derive(Debug)]
pub struct EncodedText<'a> {
    pub bytes: Cow<'a, [u8]>,
    pub encoding: &'static Encoding,
    /// A byte-order mark was written
    pub with_bom: bool,
    /// Some characters were not representable and became numeric character references
    pub had_unmappable: bool,
}

/// Encode `text` for writing, prefixed with a BOM when asked
///
/// UTF-16 is written directly since `encoding_rs` only decodes it. A BOM is
/// only ever written for UTF-8 and UTF-16.
pub fn encode<'a>(text: &'a str, encoding: &'static Encoding, with_bom: bool) -> EncodedText<'a> {
    if is_utf16(encoding) {
        return EncodedText {
            bytes: Cow::Owned(encode_utf16(text, encoding == UTF_16LE, with_bom)),
            encoding,
            with_bom,
            had_unmappable: false,
        };
    }

    let (bytes, used, had_unmappable) = encoding.encode(text);
    if used != encoding {
        tracing::warn!(
            "{} cannot be written, saving as {} instead",
            encoding.name(),
            used.name()
        );
    }

    let with_bom = with_bom && used == UTF_8;
    let bytes = if with_bom {
        let mut out = Vec::with_capacity(UTF8_BOM.len() + bytes.len());
        out.extend_from_slice(UTF8_BOM);
        out.extend_from_slice(&bytes);
        Cow::Owned(out)
    } else {
        bytes
    };

    EncodedText {
        bytes,
        encoding: used,
        with_bom,
        had_unmappable,
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn encode_utf16(text: &str, little_endian: bool, with_bom: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + text.len() * 2);
    let mut push = |unit: u16| {
        let bytes = if little_endian {
            unit.to_le_bytes()
        } else {
            unit.to_be_bytes()
        };
        out.extend_from_slice(&bytes);
    };
    if with_bom {
        push(0xFEFF);
    }
    for unit in text.encode_utf16() {
        push(unit);
    }
    out
}
