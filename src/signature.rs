//! Unicode signature (byte-order mark) recognition.
//!
//! A signature is authoritative: when one is present at the start of a
//! buffer it names both the transformation format and, for the multi-byte
//! forms, the byte order, so no heuristic or statistical pass is needed.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};

/// A Unicode signature found at the start of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signature {
    /// UTF-8 signature `EF BB BF`
    Utf8,
    /// UTF-16 little-endian mark `FF FE`
    Utf16Le,
    /// UTF-16 big-endian mark `FE FF`
    Utf16Be,
    /// UTF-32 little-endian mark `FF FE 00 00`
    Utf32Le,
    /// UTF-32 big-endian mark `00 00 FE FF`
    Utf32Be,
}

impl Signature {
    /// The fixed byte prefix announcing this signature.
    pub fn bom(self) -> &'static [u8] {
        match self {
            Signature::Utf8 => &[0xEF, 0xBB, 0xBF],
            Signature::Utf16Le => &[0xFF, 0xFE],
            Signature::Utf16Be => &[0xFE, 0xFF],
            Signature::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Signature::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
        }
    }

    /// Canonical name of the charset this signature announces.
    pub fn charset(self) -> &'static str {
        match self {
            Signature::Utf8 => "UTF-8",
            Signature::Utf16Le => "UTF-16LE",
            Signature::Utf16Be => "UTF-16BE",
            Signature::Utf32Le => "UTF-32LE",
            Signature::Utf32Be => "UTF-32BE",
        }
    }

    /// The announced charset as a decoder, where the platform has one.
    ///
    /// The UTF-32 forms are recognized but have no decoder here, so they
    /// can be reported by detection but not validated or converted.
    pub fn encoding(self) -> Option<&'static Encoding> {
        match self {
            Signature::Utf8 => Some(UTF_8),
            Signature::Utf16Le => Some(UTF_16LE),
            Signature::Utf16Be => Some(UTF_16BE),
            Signature::Utf32Le | Signature::Utf32Be => None,
        }
    }

    /// The signature that announces `encoding`, if it defines one.
    pub fn for_encoding(encoding: &'static Encoding) -> Option<Signature> {
        if encoding == UTF_8 {
            Some(Signature::Utf8)
        } else if encoding == UTF_16LE {
            Some(Signature::Utf16Le)
        } else if encoding == UTF_16BE {
            Some(Signature::Utf16Be)
        } else {
            None
        }
    }
}

/// Check the start of `buffer` for a Unicode signature.
///
/// A buffer too short for a given signature simply does not match it;
/// absence of any signature is a normal outcome, not a failure. The 2-byte
/// UTF-16LE mark is a prefix of the 4-byte UTF-32LE mark, so `FF FE` only
/// counts as UTF-16 when it is not followed by `00 00`.
pub fn match_signature(buffer: &[u8]) -> Option<Signature> {
    if buffer.starts_with(&[0xFF, 0xFE]) {
        if buffer.starts_with(&[0xFF, 0xFE, 0x00, 0x00]) {
            return Some(Signature::Utf32Le);
        }
        return Some(Signature::Utf16Le);
    }

    if buffer.starts_with(&[0xFE, 0xFF]) {
        // Mirrors the UTF-32LE exclusion; no UTF-32 mark shares this
        // prefix, so a trailing 00 00 means the buffer is something else.
        if buffer.starts_with(&[0xFE, 0xFF, 0x00, 0x00]) {
            return None;
        }
        return Some(Signature::Utf16Be);
    }

    if buffer.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some(Signature::Utf8);
    }

    if buffer.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        return Some(Signature::Utf32Be);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16le_mark() {
        assert_eq!(
            match_signature(&[0xFF, 0xFE, 0x41, 0x00]),
            Some(Signature::Utf16Le)
        );
        // Bare 2-byte mark, and a 3-byte buffer too short for the UTF-32 rule
        assert_eq!(match_signature(&[0xFF, 0xFE]), Some(Signature::Utf16Le));
        assert_eq!(
            match_signature(&[0xFF, 0xFE, 0x00]),
            Some(Signature::Utf16Le)
        );
    }

    #[test]
    fn test_utf32le_takes_precedence_over_utf16le() {
        assert_eq!(
            match_signature(&[0xFF, 0xFE, 0x00, 0x00]),
            Some(Signature::Utf32Le)
        );
        assert_eq!(
            match_signature(&[0xFF, 0xFE, 0x00, 0x00, 0x41, 0x00]),
            Some(Signature::Utf32Le)
        );
    }

    #[test]
    fn test_utf16be_mark() {
        assert_eq!(match_signature(&[0xFE, 0xFF]), Some(Signature::Utf16Be));
        assert_eq!(
            match_signature(&[0xFE, 0xFF, 0x00, 0x48]),
            Some(Signature::Utf16Be)
        );
        // Mirrored exclusion: FE FF 00 00 is not a UTF-16BE signature
        assert_eq!(match_signature(&[0xFE, 0xFF, 0x00, 0x00]), None);
    }

    #[test]
    fn test_utf8_signature() {
        assert_eq!(
            match_signature(&[0xEF, 0xBB, 0xBF, b'H', b'i']),
            Some(Signature::Utf8)
        );
        // Two bytes of the three-byte signature are not enough
        assert_eq!(match_signature(&[0xEF, 0xBB]), None);
    }

    #[test]
    fn test_utf32be_mark() {
        assert_eq!(
            match_signature(&[0x00, 0x00, 0xFE, 0xFF]),
            Some(Signature::Utf32Be)
        );
        assert_eq!(match_signature(&[0x00, 0x00, 0xFE]), None);
    }

    #[test]
    fn test_no_signature() {
        assert_eq!(match_signature(b""), None);
        assert_eq!(match_signature(&[0xFF]), None);
        assert_eq!(match_signature(b"Hello, world"), None);
        assert_eq!(match_signature(&[0x00, 0x48, 0x00, 0x69]), None);
    }

    #[test]
    fn test_signature_properties() {
        assert_eq!(Signature::Utf8.bom(), &[0xEF, 0xBB, 0xBF]);
        assert_eq!(Signature::Utf16Le.charset(), "UTF-16LE");
        assert_eq!(Signature::Utf16Be.encoding(), Some(UTF_16BE));
        assert_eq!(Signature::Utf32Le.encoding(), None);
        assert_eq!(Signature::for_encoding(UTF_8), Some(Signature::Utf8));
        assert_eq!(Signature::for_encoding(encoding_rs::WINDOWS_1252), None);
    }
}
