//! Script number encoding with consensus minimal-encoding rules.
//!
//! Numbers are little-endian sign-magnitude byte strings: the most
//! significant bit of the last byte carries the sign. Zero is the empty
//! string. The width of an encoded number is bounded by the caller, which
//! is 4 bytes for most pre-genesis consensus uses.

use std::fmt;

/// Default maximum encoded width of a script number.
pub const MAXIMUM_ELEMENT_SIZE: usize = 4;

/// Widest encoding representable by [`ScriptNum`].
pub const MAX_INT64_ELEMENT_SIZE: usize = 8;

/// Errors raised while decoding a script number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptNumError {
    /// Encoding is wider than the allowed maximum.
    #[error("script number is {len} bytes which exceeds the max allowed of {max}")]
    TooLong { len: usize, max: usize },

    /// Encoding carries a redundant trailing byte.
    #[error("non-minimally encoded script number")]
    NonMinimal,
}

/// A bounded script number.
///
/// The range is symmetric, `-i64::MAX..=i64::MAX`: an 8-byte sign-magnitude
/// encoding cannot hold `i64::MIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScriptNum(i64);

impl ScriptNum {
    /// Smallest representable value.
    pub const MIN: ScriptNum = ScriptNum(-i64::MAX);
    /// Largest representable value.
    pub const MAX: ScriptNum = ScriptNum(i64::MAX);

    /// Wrap an integer value, saturating `i64::MIN` to [`ScriptNum::MIN`].
    pub const fn new(value: i64) -> Self {
        if value < Self::MIN.0 {
            Self::MIN
        } else {
            ScriptNum(value)
        }
    }

    /// Decode a script number from its byte encoding.
    ///
    /// # Arguments
    /// * `bytes` - The encoded number.
    /// * `require_minimal` - Reject encodings with a redundant trailing byte.
    /// * `max_len` - Maximum allowed width in bytes (capped at 8).
    ///
    /// # Returns
    /// The decoded number, or a `ScriptNumError` if the width or encoding is invalid.
    pub fn from_bytes(
        bytes: &[u8],
        require_minimal: bool,
        max_len: usize,
    ) -> Result<Self, ScriptNumError> {
        let max = max_len.min(MAX_INT64_ELEMENT_SIZE);
        if bytes.len() > max {
            return Err(ScriptNumError::TooLong {
                len: bytes.len(),
                max,
            });
        }
        if require_minimal && !is_minimal(bytes) {
            return Err(ScriptNumError::NonMinimal);
        }
        Ok(ScriptNum(decode_le_sign_magnitude(bytes)))
    }

    /// Return the value.
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Return the value saturated to the `i32` range.
    pub fn getint(&self) -> i32 {
        self.0.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }

    /// Serialize to the minimal byte encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.0 == 0 {
            return Vec::new();
        }

        let negative = self.0 < 0;
        let mut abs = self.0.unsigned_abs();
        let mut result = Vec::with_capacity(MAX_INT64_ELEMENT_SIZE + 1);
        while abs > 0 {
            result.push((abs & 0xff) as u8);
            abs >>= 8;
        }

        // The top bit of the last byte is the sign; add a byte if it is taken.
        let last = result.len() - 1;
        if result[last] & 0x80 != 0 {
            result.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            result[last] |= 0x80;
        }
        result
    }
}

impl From<i64> for ScriptNum {
    fn from(value: i64) -> Self {
        ScriptNum::new(value)
    }
}

impl fmt::Display for ScriptNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Check that `bytes` is a minimal numeric encoding no wider than `max_len`.
pub fn is_minimally_encoded(bytes: &[u8], max_len: usize) -> bool {
    bytes.len() <= max_len && is_minimal(bytes)
}

fn is_minimal(bytes: &[u8]) -> bool {
    match bytes {
        [] => true,
        // The last byte may only be 0x00/0x80 when it is needed to hold the
        // sign bit that the previous byte cannot.
        [.., prev, last] => last & 0x7f != 0 || prev & 0x80 != 0,
        [only] => only & 0x7f != 0,
    }
}

fn decode_le_sign_magnitude(bytes: &[u8]) -> i64 {
    let Some((&last, _)) = bytes.split_last() else {
        return 0;
    };
    let mut magnitude: u64 = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let b = if i == bytes.len() - 1 { b & 0x7f } else { b };
        magnitude |= (b as u64) << (8 * i);
    }
    if last & 0x80 != 0 {
        // Magnitude of an 8-byte encoding is at most 2^63 - 1.
        -(magnitude as i64)
    } else {
        magnitude as i64
    }
}
