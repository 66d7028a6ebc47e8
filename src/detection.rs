//! Encoding detection using signature matching, UTF-16 byte-pattern
//! heuristics, and statistical classification as a last resort.
//!
//! The stages run in strict precedence order: a signature match is
//! authoritative, the UTF-16 heuristics only run on signature-less buffers,
//! and the statistical classifier only sees buffers neither earlier stage
//! could decide.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::signature::match_signature;
use crate::{Error, Result};

/// Charset names detection can report, as a fixed table: the signature and
/// heuristic forms first, then the statistical classifier's vocabulary.
pub const DETECTABLE_CHARSETS: &[&str] = &[
    "UTF-8",
    "UTF-16LE",
    "UTF-16BE",
    "UTF-32LE",
    "UTF-32BE",
    "Big5",
    "EUC-JP",
    "EUC-KR",
    "GBK",
    "IBM866",
    "ISO-2022-JP",
    "ISO-8859-2",
    "ISO-8859-4",
    "ISO-8859-5",
    "ISO-8859-6",
    "ISO-8859-7",
    "ISO-8859-8",
    "KOI8-U",
    "Shift_JIS",
    "windows-874",
    "windows-1250",
    "windows-1251",
    "windows-1252",
    "windows-1253",
    "windows-1254",
    "windows-1255",
    "windows-1256",
    "windows-1257",
    "windows-1258",
];

/// Outcome of a successful encoding detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Canonical charset name, e.g. `"UTF-16LE"` or `"windows-1252"`.
    pub charset: &'static str,
    /// Whether the charset was announced by a leading signature.
    pub has_signature: bool,
    /// Confidence score where one is available. A signature match is
    /// certain; heuristic and classifier results carry no score.
    pub confidence: Option<f32>,
}

/// Detects the character encoding of byte buffers and files.
pub struct EncodingDetector {
    /// Maximum bytes to read and analyze; `None` means the whole source.
    max_read: Option<usize>,
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self { max_read: None }
    }
}

impl EncodingDetector {
    /// Create a detector that reads and analyzes the entire source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detector that reads at most `max_read` bytes from a source.
    ///
    /// A budget larger than the source is clamped to the source's actual
    /// length; a budget of zero can never detect anything and is rejected.
    pub fn with_max_read(max_read: usize) -> Result<Self> {
        if max_read == 0 {
            return Err(Error::InvalidReadBudget);
        }
        Ok(Self {
            max_read: Some(max_read),
        })
    }

    /// Detect the encoding of an in-memory buffer.
    ///
    /// Returns `None` when no stage produces an answer; that is an
    /// expected terminal outcome, not a failure.
    pub fn detect(&self, data: &[u8]) -> Option<Detection> {
        let sample = match self.max_read {
            Some(max) if data.len() > max => &data[..max],
            _ => data,
        };

        if let Some(signature) = match_signature(sample) {
            return Some(Detection {
                charset: signature.charset(),
                has_signature: true,
                confidence: Some(1.0),
            });
        }

        if let Some(charset) = detect_utf16(sample) {
            return Some(Detection {
                charset,
                has_signature: false,
                confidence: None,
            });
        }

        classify(sample)
    }

    /// Detect the encoding of a file, reading at most the configured budget.
    pub fn detect_file<P: AsRef<Path>>(&self, path: P) -> Result<Option<Detection>> {
        let file = File::open(path)?;
        self.detect_reader(file)
    }

    /// Detect the encoding from any byte source, reading at most the
    /// configured budget in a single pass.
    ///
    /// A source shorter than the budget is read to its end; that is not an
    /// error.
    pub fn detect_reader<R: Read>(&self, reader: R) -> Result<Option<Detection>> {
        let mut data = Vec::new();
        let mut reader = reader;
        match self.max_read {
            Some(max) => {
                reader.take(max as u64).read_to_end(&mut data)?;
            }
            None => {
                reader.read_to_end(&mut data)?;
            }
        }
        Ok(self.detect(&data))
    }
}

/// Infer UTF-16 byte order from byte patterns when no signature is present.
///
/// The null-parity scan runs first; the control-character scan is the
/// fallback when parity is inconclusive.
fn detect_utf16(data: &[u8]) -> Option<&'static str> {
    check_utf16_ascii(data).or_else(|| check_utf16_control_chars(data))
}

/// Null-parity heuristic: ASCII-range text in UTF-16 puts a null in every
/// other byte, on the side the byte order dictates.
///
/// The asymmetric thresholds tolerate a buffer that is mostly but not
/// purely ASCII-range text while still rejecting binary or mixed data: the
/// winning side must cover more than half of all pairs, and the opposite
/// side must stay under a tenth.
fn check_utf16_ascii(data: &[u8]) -> Option<&'static str> {
    const THRESHOLD: f64 = 0.5;
    const LIMIT: f64 = 0.1;

    // A trailing odd byte is ignored; fewer than one full pair is no signal.
    let pairs = data.len() / 2;
    if pairs == 0 {
        return None;
    }

    let mut le_pairs = 0usize;
    let mut be_pairs = 0usize;
    for pair in data.chunks_exact(2) {
        if pair[0] == 0 && pair[1] != 0 {
            be_pairs += 1;
        } else if pair[0] != 0 && pair[1] == 0 {
            le_pairs += 1;
        }
    }

    let le_fraction = le_pairs as f64 / pairs as f64;
    let be_fraction = be_pairs as f64 / pairs as f64;

    if le_fraction > THRESHOLD && be_fraction < LIMIT {
        return Some("UTF-16LE");
    }
    if be_fraction > THRESHOLD && le_fraction < LIMIT {
        return Some("UTF-16BE");
    }

    None
}

/// Control-character heuristic: CR, LF, space, and TAB appear even in
/// non-Latin text, and in UTF-16 each one pairs with a null whose position
/// reveals the byte order.
///
/// Seeing the null on both sides within one buffer rules UTF-16 out
/// entirely, so the scan stops early in that case.
fn check_utf16_control_chars(data: &[u8]) -> Option<&'static str> {
    if data.len() < 2 {
        return None;
    }

    let mut le_controls = 0usize;
    let mut be_controls = 0usize;
    for pair in data.chunks_exact(2) {
        if pair[0] == 0 && is_textual_control(pair[1]) {
            be_controls += 1;
        } else if pair[1] == 0 && is_textual_control(pair[0]) {
            le_controls += 1;
        }

        if le_controls > 0 && be_controls > 0 {
            return None;
        }
    }

    if le_controls > 0 {
        return Some("UTF-16LE");
    }
    if be_controls > 0 {
        return Some("UTF-16BE");
    }

    None
}

fn is_textual_control(byte: u8) -> bool {
    matches!(byte, b'\r' | b'\n' | b' ' | b'\t')
}

/// Hand the sample to the statistical classifier.
///
/// The classifier always names some charset for a non-empty sample, falling
/// back to windows-1252 when nothing scores better; an empty sample has no
/// signal at all and stays undecided.
fn classify(sample: &[u8]) -> Option<Detection> {
    if sample.is_empty() {
        return None;
    }

    let mut classifier = chardetng::EncodingDetector::new();
    classifier.feed(sample, true);
    let encoding = classifier.guess(None, true);

    Some(Detection {
        charset: encoding.name(),
        has_signature: false,
        confidence: None,
    })
}
