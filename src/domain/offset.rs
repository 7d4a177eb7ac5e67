//! Offset text helpers.
//!
//! Offsets travel as fixed-width, zero-padded, base-10 ASCII text so that
//! lexicographic order equals numeric order for cursors of the same width.

use thiserror::Error;

/// Width used for offsets rendered when no reference cursor dictates one.
pub const DEFAULT_OFFSET_WIDTH: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed offset '{0}'")]
pub struct MalformedOffset(pub String);

/// Parse offset text into its numeric value.
///
/// Rejects empty text, anything outside `0-9`, and values beyond `u64`.
pub fn parse_offset(offset: &str) -> Result<u64, MalformedOffset> {
    if offset.is_empty() || !offset.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MalformedOffset(offset.to_string()));
    }
    offset
        .parse::<u64>()
        .map_err(|_| MalformedOffset(offset.to_string()))
}

/// Render `value` zero-padded to `width` digits.
///
/// Values needing more digits than `width` are rendered in full.
pub fn format_offset(value: u64, width: usize) -> String {
    format!("{:0width$}", value, width = width)
}
