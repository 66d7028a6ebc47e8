//! Logical target-encoding names and the encoder configurations they
//! resolve to.
//!
//! A caller-facing name distinguishes a bare encoding from its
//! signature-emitting variant (`utf-8` vs `utf-8-bom`) and, for the 16-bit
//! forms, the byte order (`utf-16` is little-endian, `utf-16be` the big-
//! endian variant). The resolver maps a name to a concrete configuration or
//! fails; it never guesses.

use encoding_rs::{Encoding, REPLACEMENT, UTF_16BE, UTF_16LE};

use crate::signature::Signature;
use crate::{Error, Result};

/// Suffix marking the signature-emitting variant of a Unicode target.
const BOM_SUFFIX: &str = "-bom";

/// Logical target names beyond the plain charset labels: the signature-
/// emitting and byte-order variants of the Unicode transformation formats.
pub const TARGET_NAMES: &[&str] = &[
    "utf-8",
    "utf-8-bom",
    "utf-16",
    "utf-16-bom",
    "utf-16be",
    "utf-16be-bom",
];

/// A concrete encoder configuration resolved from a logical target name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetEncoding {
    encoding: &'static Encoding,
    with_signature: bool,
}

impl TargetEncoding {
    /// Resolve a logical target name into an encoder configuration.
    ///
    /// Names are matched case-insensitively against the platform's charset
    /// labels, with an optional `-bom` suffix selecting the signature-
    /// emitting variant. The suffix only exists for the formats that define
    /// a signature; `windows-1252-bom` is as unknown as a typo.
    pub fn resolve(name: &str) -> Result<Self> {
        let unknown = || Error::UnknownTarget(name.to_string());

        let lower = name.to_ascii_lowercase();
        let (base, with_signature) = match lower.strip_suffix(BOM_SUFFIX) {
            Some(base) => (base, true),
            None => (lower.as_str(), false),
        };

        let encoding = Encoding::for_label(base.as_bytes()).ok_or_else(unknown)?;
        // Labels like "hz-gb-2312" resolve to the replacement encoding,
        // which can never be a conversion target.
        if encoding == REPLACEMENT {
            return Err(unknown());
        }
        if with_signature && Signature::for_encoding(encoding).is_none() {
            return Err(unknown());
        }

        Ok(Self {
            encoding,
            with_signature,
        })
    }

    /// The resolved concrete encoding.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Canonical name of the resolved encoding.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Whether encoded output starts with the Unicode signature.
    pub fn emits_signature(&self) -> bool {
        self.with_signature
    }

    /// Encode `text` into this target, emitting the signature first when
    /// the configuration asks for one.
    ///
    /// UTF-16 output is serialized from code units in the resolved byte
    /// order, since the platform encoder only emits byte-oriented
    /// encodings; everything else goes through the platform encoder as-is.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut output = Vec::with_capacity(text.len() + 4);
        if self.with_signature {
            if let Some(signature) = Signature::for_encoding(self.encoding) {
                output.extend_from_slice(signature.bom());
            }
        }

        if self.encoding == UTF_16LE || self.encoding == UTF_16BE {
            for unit in text.encode_utf16() {
                let bytes = if self.encoding == UTF_16LE {
                    unit.to_le_bytes()
                } else {
                    unit.to_be_bytes()
                };
                output.extend_from_slice(&bytes);
            }
        } else {
            let (bytes, _, _) = self.encoding.encode(text);
            output.extend_from_slice(&bytes);
        }

        output
    }
}
