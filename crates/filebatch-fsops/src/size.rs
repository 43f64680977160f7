//! Size threshold parsing.

use crate::error::{FsOpsError, FsOpsResult};

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Parse `<integer>[KB|MB|GB]` into bytes. Units are case-insensitive powers of 1024; a bare
/// integer is a byte count.
///
/// # Errors
///
/// Returns [`FsOpsError::InvalidSize`] when the number is malformed or the result overflows.
pub fn parse_size(value: &str) -> FsOpsResult<u64> {
    let upper = value.trim().to_ascii_uppercase();
    let (digits, multiplier) = if let Some(digits) = upper.strip_suffix("KB") {
        (digits, KIB)
    } else if let Some(digits) = upper.strip_suffix("MB") {
        (digits, MIB)
    } else if let Some(digits) = upper.strip_suffix("GB") {
        (digits, GIB)
    } else {
        (upper.as_str(), 1)
    };

    let number = digits
        .trim()
        .parse::<u64>()
        .map_err(|_| FsOpsError::InvalidSize {
            value: value.to_string(),
            reason: "not_an_integer",
        })?;

    number
        .checked_mul(multiplier)
        .ok_or_else(|| FsOpsError::InvalidSize {
            value: value.to_string(),
            reason: "overflow",
        })
}
