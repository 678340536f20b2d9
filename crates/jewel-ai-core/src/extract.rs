//! Locating the JSON object inside a free-text model reply
//!
//! Models wrap their JSON in prose, code fences, or both. Extraction runs in
//! two passes:
//!
//! 1. Scan for balanced `{...}` spans, skipping braces inside string
//!    literals. Candidates are tried left to right and the first one that
//!    parses wins. A candidate that balances but fails to parse is skipped
//!    as a whole, so its inner objects are never mistaken for the reply.
//! 2. If no candidate parses, fall back to the span from the first `{` to
//!    the last `}`.
//!
//! The returned value is untyped; nothing downstream may rely on its shape
//! until it has passed validation.

use serde_json::Value;

use crate::error::ExtractionError;

/// Unclosed `{` rescans tolerated before the balanced scan gives up
///
/// Each unclosed brace scans to the end of the reply, so this bounds the scan
/// at a fixed multiple of the reply length.
pub const MAX_UNCLOSED_BRACES: usize = 32;

/// Extract and parse the JSON object embedded in `raw`
pub fn extract(raw: &str) -> Result<Value, ExtractionError> {
    for span in balanced_spans(raw) {
        match serde_json::from_str::<Value>(span) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::trace!(error = %e, len = span.len(), "Skipping unparsable balanced span");
            }
        }
    }

    let span = naive_span(raw).ok_or_else(|| ExtractionError::no_json_span(raw))?;
    serde_json::from_str::<Value>(span).map_err(|e| ExtractionError::unparsable(raw, e.to_string()))
}

/// Span from the first `{` to the last `}`, inclusive
pub fn naive_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if start < end {
        Some(&raw[start..=end])
    } else {
        None
    }
}

/// Top-level balanced `{...}` spans in order of appearance
///
/// A `{` that never closes is skipped and scanning resumes at the next `{`.
/// After [`MAX_UNCLOSED_BRACES`] such braces the scan stops and only the
/// spans found so far are returned.
pub fn balanced_spans(raw: &str) -> Vec<&str> {
    let bytes = raw.as_bytes();
    let mut spans = Vec::new();
    let mut cursor = 0;
    let mut unclosed = 0;

    while let Some(offset) = bytes[cursor..].iter().position(|&b| b == b'{') {
        let start = cursor + offset;
        match closing_brace(bytes, start) {
            Some(end) => {
                spans.push(&raw[start..=end]);
                cursor = end + 1;
            }
            None => {
                unclosed += 1;
                if unclosed >= MAX_UNCLOSED_BRACES {
                    tracing::debug!(unclosed, "Too many unclosed braces, stopping balanced scan");
                    break;
                }
                cursor = start + 1;
            }
        }
    }

    spans
}

/// Index of the `}` closing the `{` at `start`
///
/// Works on bytes: every delimiter is ASCII, and UTF-8 continuation bytes
/// never collide with ASCII, so the indices are always char boundaries.
fn closing_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }

    None
}
