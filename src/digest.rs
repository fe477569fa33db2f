//! Digest encodings and the hex-vs-base64 heuristic.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::Serialize;
use std::fmt;

use crate::error::ConvertError;

/// Length of a hex-encoded 16-byte digest.
const HEX_DIGEST_LEN: usize = 32;

/// Decoder that accepts unpadded values and non-zero trailing bits.
/// Rendering still goes through `STANDARD`, so output is canonical.
const LENIENT_DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Textual encoding of a digest.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Encoding {
    Hex,
    Base64,
}

impl Encoding {
    /// Guess the encoding of a bare digest string.
    ///
    /// Exactly 32 ASCII alphanumerics reads as hex; everything else is taken
    /// to be base64. A 32-character base64 value with no `+`, `/` or `=` is
    /// therefore read as hex.
    pub(crate) fn infer(value: &str) -> Self {
        if value.len() == HEX_DIGEST_LEN && value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Encoding::Hex
        } else {
            Encoding::Base64
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Encoding::Hex => "hex",
            Encoding::Base64 => "base64",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decoded digest bytes. The length is not checked against any algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Digest {
    bytes: Vec<u8>,
}

impl Digest {
    pub(crate) fn decode(value: &str, encoding: Encoding) -> Result<Self, ConvertError> {
        let decoded = match encoding {
            Encoding::Hex => hex::decode(value).map_err(|err| err.to_string()),
            Encoding::Base64 => LENIENT_DECODER.decode(value).map_err(|err| err.to_string()),
        };
        decoded
            .map(|bytes| Self { bytes })
            .map_err(|reason| ConvertError::MalformedDigestEncoding {
                input: value.to_string(),
                encoding,
                reason,
            })
    }

    pub(crate) fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub(crate) fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
