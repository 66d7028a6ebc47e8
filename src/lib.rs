//! # CharsetProbe - Text Encoding Detection and Safe Conversion
//!
//! Detects the character encoding of raw byte buffers and guards
//! conversions with a strict decode pass so that re-encoding never
//! silently corrupts data.
//!
//! ## Features
//!
//! - **Signature matching** for the UTF-8, UTF-16, and UTF-32 byte-order
//!   marks, with the 4-byte marks taking precedence over their 2-byte
//!   prefixes
//! - **UTF-16 heuristics** that infer byte order from null-parity and
//!   control-character patterns in signature-less buffers
//! - **Statistical classification** fallback covering the legacy charsets
//! - **Strict validation** that rejects, rather than repairs, bytes a
//!   candidate encoding cannot decode
//! - **Logical target names** such as `utf-8-bom` and `utf-16BE` resolved
//!   to concrete encoder configurations
//!
//! ## Quick Start
//!
//! ```rust
//! use charset_probe::EncodingDetector;
//!
//! let detector = EncodingDetector::new();
//! let detection = detector.detect(&[0xFF, 0xFE, b'H', 0x00]).unwrap();
//! assert_eq!(detection.charset, "UTF-16LE");
//! assert!(detection.has_signature);
//! ```
//!
//! Conversion validates first and skips buffers the source charset cannot
//! decode losslessly:
//!
//! ```rust
//! use charset_probe::Converter;
//!
//! let converter = Converter::new("windows-1252", "utf-8").unwrap();
//! let converted = converter.convert(b"caf\xE9").unwrap();
//! assert_eq!(converted, "café".as_bytes());
//! ```

#![deny(missing_docs)]

use std::fmt;

pub mod detection;
pub mod signature;
pub mod target;
pub mod validate;

pub use detection::{Detection, EncodingDetector};
pub use signature::{Signature, match_signature};
pub use target::TargetEncoding;
pub use validate::{Validity, validate, validate_range};

/// Result type for encoding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during detection, validation, or conversion setup
#[derive(Debug)]
pub enum Error {
    /// A read budget of zero bytes was configured
    InvalidReadBudget,
    /// Validation was asked for a window outside the buffer
    RangeOutOfBounds {
        /// Start of the requested window
        offset: usize,
        /// Length of the requested window
        len: usize,
        /// Actual buffer length the window was checked against
        buffer_len: usize,
    },
    /// A logical target-encoding name the resolver does not know
    UnknownTarget(String),
    /// A charset label the platform decoder cannot handle
    UnsupportedCharset(String),
    /// Reading from a byte source failed
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidReadBudget => {
                write!(f, "Read budget must be at least one byte")
            }
            Error::RangeOutOfBounds {
                offset,
                len,
                buffer_len,
            } => {
                write!(
                    f,
                    "Range at offset {} with length {} is outside the {}-byte buffer",
                    offset, len, buffer_len
                )
            }
            Error::UnknownTarget(name) => write!(f, "Unknown target encoding: {}", name),
            Error::UnsupportedCharset(label) => write!(f, "Unsupported charset: {}", label),
            Error::Io(err) => write!(f, "Read failed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Converts byte buffers from a source charset into a resolved target,
/// validating every buffer before touching it.
///
/// The validation gate means a returned buffer is always a faithful
/// re-encoding: bytes the source charset cannot decode are skipped, never
/// replaced.
pub struct Converter {
    from: &'static encoding_rs::Encoding,
    target: TargetEncoding,
}

impl Converter {
    /// Create a converter from a source charset label and a logical target
    /// name (see [`TargetEncoding::resolve`]).
    pub fn new(from_label: &str, target_name: &str) -> Result<Self> {
        let from = encoding_rs::Encoding::for_label(from_label.as_bytes())
            .filter(|&e| e != encoding_rs::REPLACEMENT)
            .ok_or_else(|| Error::UnsupportedCharset(from_label.to_string()))?;
        let target = TargetEncoding::resolve(target_name)?;
        Ok(Self { from, target })
    }

    /// The source encoding buffers are validated against.
    pub fn from_encoding(&self) -> &'static encoding_rs::Encoding {
        self.from
    }

    /// The resolved target configuration.
    pub fn target(&self) -> &TargetEncoding {
        &self.target
    }

    /// Convert `bytes` into the target encoding.
    ///
    /// Returns `None` when `bytes` do not validate under the source
    /// charset; callers skip the conversion in that case rather than
    /// treating it as a failure. A leading signature matching the source
    /// charset is consumed, and re-emitted only if the target asks for one.
    pub fn convert(&self, bytes: &[u8]) -> Option<Vec<u8>> {
        if !validate(self.from, bytes).is_valid() {
            return None;
        }

        let content = strip_signature(self.from, bytes);
        let text = self
            .from
            .decode_without_bom_handling_and_without_replacement(content)?;
        Some(self.target.encode(&text))
    }
}

/// Drop a leading signature from `bytes` when it announces `encoding`
/// itself; a signature for some other charset is content, not markup.
fn strip_signature<'a>(encoding: &'static encoding_rs::Encoding, bytes: &'a [u8]) -> &'a [u8] {
    match signature::match_signature(bytes) {
        Some(sig) if sig.encoding() == Some(encoding) => &bytes[sig.bom().len()..],
        _ => bytes,
    }
}
