//! Strict decode validation, the safety gate in front of any destructive
//! re-encoding.
//!
//! A buffer either decodes under a candidate encoding with zero lossy
//! substitutions or it does not; there is no partial outcome. Callers treat
//! `Invalid` as "skip this conversion", never as a fatal condition.

use encoding_rs::Encoding;

use crate::{Error, Result};

/// Whether a buffer decodes losslessly under a candidate encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// Every byte sequence decoded without substitution.
    Valid,
    /// Some byte sequence cannot be represented under the encoding.
    Invalid,
}

impl Validity {
    /// True for [`Validity::Valid`].
    pub fn is_valid(self) -> bool {
        matches!(self, Validity::Valid)
    }
}

/// Check that `bytes` decode under `encoding` with no replacement
/// characters.
///
/// Uses the non-lossy decoder, so a `Valid` outcome guarantees a subsequent
/// conversion will not silently corrupt data. A leading signature is plain
/// content here: it decodes like any other bytes.
pub fn validate(encoding: &'static Encoding, bytes: &[u8]) -> Validity {
    match encoding.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(_) => Validity::Valid,
        None => Validity::Invalid,
    }
}

/// Validate only the window `offset..offset + len` of `bytes`.
///
/// A window that falls outside the buffer is a range error rather than a
/// partial decode.
pub fn validate_range(
    encoding: &'static Encoding,
    bytes: &[u8],
    offset: usize,
    len: usize,
) -> Result<Validity> {
    let out_of_range = Error::RangeOutOfBounds {
        offset,
        len,
        buffer_len: bytes.len(),
    };
    let end = match offset.checked_add(len) {
        Some(end) if end <= bytes.len() => end,
        _ => return Err(out_of_range),
    };
    Ok(validate(encoding, &bytes[offset..end]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{SHIFT_JIS, UTF_8, UTF_16LE, WINDOWS_1252};

    #[test]
    fn test_roundtrip_windows_1252() {
        let (bytes, _, unmappable) = WINDOWS_1252.encode("café €1.50");
        assert!(!unmappable);
        assert_eq!(validate(WINDOWS_1252, &bytes), Validity::Valid);
    }

    #[test]
    fn test_roundtrip_utf16le() {
        let bytes: Vec<u8> = "Hello 世界"
            .encode_utf16()
            .flat_map(|u| u.to_le_bytes())
            .collect();
        assert_eq!(validate(UTF_16LE, &bytes), Validity::Valid);
    }

    #[test]
    fn test_lone_continuation_byte_is_invalid_utf8() {
        assert_eq!(validate(UTF_8, &[b'a', b'b', 0x80]), Validity::Invalid);
    }

    #[test]
    fn test_truncated_utf16_pair_is_invalid() {
        assert_eq!(
            validate(UTF_16LE, &[0x48, 0x00, 0x69]),
            Validity::Invalid
        );
    }

    #[test]
    fn test_bad_shift_jis_trail_byte_is_invalid() {
        // 0x81 opens a two-byte sequence; 0x00 is not a legal trail byte.
        assert_eq!(validate(SHIFT_JIS, &[0x81, 0x00]), Validity::Invalid);
    }

    #[test]
    fn test_empty_buffer_is_valid() {
        assert_eq!(validate(UTF_8, b""), Validity::Valid);
    }

    #[test]
    fn test_signature_bytes_validate_as_content() {
        assert_eq!(
            validate(UTF_8, &[0xEF, 0xBB, 0xBF, b'H', b'i']),
            Validity::Valid
        );
    }

    #[test]
    fn test_range_window_isolates_bytes() {
        // The window skips the invalid bytes on either side.
        let bytes = [0xFF, b'o', b'k', 0xFF];
        assert_eq!(
            validate_range(UTF_8, &bytes, 1, 2).unwrap(),
            Validity::Valid
        );
        assert_eq!(
            validate_range(UTF_8, &bytes, 0, 2).unwrap(),
            Validity::Invalid
        );
    }

    #[test]
    fn test_range_out_of_bounds() {
        assert!(matches!(
            validate_range(UTF_8, b"hi", 1, 5),
            Err(Error::RangeOutOfBounds { .. })
        ));
        assert!(matches!(
            validate_range(UTF_8, b"hi", 3, 0),
            Err(Error::RangeOutOfBounds { .. })
        ));
        assert!(matches!(
            validate_range(UTF_8, b"hi", usize::MAX, 2),
            Err(Error::RangeOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_full_range_matches_whole_buffer() {
        let bytes = b"plain text";
        assert_eq!(
            validate_range(UTF_8, bytes, 0, bytes.len()).unwrap(),
            Validity::Valid
        );
    }
}
