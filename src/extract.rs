//! Locate the digest in bare or HTTP-response input.

use crate::error::ConvertError;

const DIGEST_HEADER: &str = "content-md5:";
const STATUS_LINE_PREFIX: &str = "HTTP/1";

/// Where the digest string was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputShape {
    /// A single line holding only the digest.
    Bare,
    /// A single `Content-MD5:` header line.
    HeaderLine,
    /// A multi-line HTTP response.
    HttpResponse,
}

impl InputShape {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            InputShape::Bare => "bare digest",
            InputShape::HeaderLine => "Content-MD5 header line",
            InputShape::HttpResponse => "HTTP response",
        }
    }
}

/// Digest substring plus how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Extraction<'a> {
    pub(crate) digest: &'a str,
    /// Set when the value came from a header, which is always base64.
    pub(crate) forced_base64: bool,
    pub(crate) shape: InputShape,
}

/// Extract the digest from captured text.
///
/// `truncated_at` only feeds the error message when no header is found.
pub(crate) fn extract_digest(
    text: &str,
    truncated_at: Option<usize>,
) -> Result<Extraction<'_>, ConvertError> {
    let mut lines = text.trim().lines();
    let first = lines.next().unwrap_or("");
    let mut rest = lines.peekable();

    if rest.peek().is_none() {
        if let Some(value) = header_value(first) {
            return Ok(Extraction {
                digest: value,
                forced_base64: true,
                shape: InputShape::HeaderLine,
            });
        }
        return Ok(Extraction {
            digest: first.trim(),
            forced_base64: false,
            shape: InputShape::Bare,
        });
    }

    if !first.starts_with(STATUS_LINE_PREFIX) {
        return Err(ConvertError::MissingStatusLine {
            first_line: first.to_string(),
        });
    }

    for line in rest {
        // Blank line ends the header block.
        if line.trim().is_empty() {
            break;
        }
        if let Some(value) = header_value(line) {
            return Ok(Extraction {
                digest: value,
                forced_base64: true,
                shape: InputShape::HttpResponse,
            });
        }
    }

    Err(ConvertError::MissingDigestHeader { truncated_at })
}

fn header_value(line: &str) -> Option<&str> {
    let matches = line
        .get(..DIGEST_HEADER.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DIGEST_HEADER));
    if !matches {
        return None;
    }
    line.split_once(':').map(|(_, value)| value.trim())
}
