//! Capture-to-report pipeline and output rendering.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::digest::{Digest, Encoding};
use crate::error::ConvertError;
use crate::extract::extract_digest;
use crate::reader::Capture;
use crate::transcript::Transcript;

/// Both renderings of a digest alongside the string they came from.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct Conversion {
    pub(crate) input: String,
    pub(crate) encoding: Encoding,
    pub(crate) base64: String,
    pub(crate) hex: String,
}

impl Conversion {
    pub(crate) fn render_text(&self) -> String {
        format!(
            "input string:   {}\ninput encoding: {}\nbase64-encoded: {}\nhex-encoded:    {}\n",
            self.input, self.encoding, self.base64, self.hex
        )
    }

    pub(crate) fn render_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(self).context("serialize conversion")?;
        text.push('\n');
        Ok(text)
    }
}

/// Extract, classify, and decode the digest held in `capture`.
pub(crate) fn convert<W: Write>(
    capture: &Capture,
    transcript: &mut Transcript<W>,
) -> Result<Conversion, ConvertError> {
    let extraction = extract_digest(&capture.text, capture.truncated_at())?;
    transcript.note(format!("input shape: {}", extraction.shape.describe()));

    let encoding = if extraction.forced_base64 {
        transcript.note("encoding: base64 (taken from Content-MD5 header)");
        Encoding::Base64
    } else {
        let inferred = Encoding::infer(extraction.digest);
        transcript.note(format!("encoding: {inferred} (inferred from digest shape)"));
        inferred
    };

    let digest = Digest::decode(extraction.digest, encoding)?;
    Ok(Conversion {
        input: extraction.digest.to_string(),
        encoding,
        base64: digest.to_base64(),
        hex: digest.to_hex(),
    })
}
