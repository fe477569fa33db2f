//! Fatal conversion errors surfaced to the user.

use thiserror::Error;

use crate::digest::Encoding;

/// Errors raised while extracting or decoding a digest.
#[derive(Error, Debug)]
pub(crate) enum ConvertError {
    /// Multi-line input that does not open with an HTTP/1.x status line.
    #[error("multi-line input must start with an HTTP/1.x status line, got {first_line:?}")]
    MissingStatusLine { first_line: String },

    /// No `Content-MD5` header before the end of the header block.
    #[error("no Content-MD5 header found in HTTP response headers{}", truncation_note(.truncated_at))]
    MissingDigestHeader { truncated_at: Option<usize> },

    /// The extracted digest is not valid under the chosen encoding.
    #[error("cannot decode {input:?} as {encoding}: {reason}")]
    MalformedDigestEncoding {
        input: String,
        encoding: Encoding,
        reason: String,
    },
}

fn truncation_note(truncated_at: &Option<usize>) -> String {
    match truncated_at {
        Some(max_bytes) => format!(
            " (input was truncated at {max_bytes} bytes; the header may have been cut off)"
        ),
        None => String::new(),
    }
}
