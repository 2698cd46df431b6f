//! Block height committed in a coinbase input script.

use crate::opcodes::*;
use crate::script::Script;
use crate::script_num::ScriptNum;

/// Reasons the coinbase height cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoinbaseHeightError {
    #[error("empty coinbase scriptSig")]
    EmptyScriptSig,
    #[error("invalid coinbase scriptSig: height needs {declared} bytes, {available} available")]
    LengthExceedsScript { declared: usize, available: usize },
    #[error("coinbase height is {0} bytes wide")]
    HeightTooLong(usize),
    #[error("negative coinbase height {0}")]
    NegativeHeight(i64),
}

/// Read the block height from the start of a coinbase scriptSig.
///
/// The first byte is OP_0, one of OP_1..OP_16, or the length of a number
/// that follows it. The number is not required to be minimally encoded.
pub fn coinbase_height(script_sig: &Script) -> Result<u64, CoinbaseHeightError> {
    let bytes = script_sig.as_bytes();
    let (&first, rest) = bytes
        .split_first()
        .ok_or(CoinbaseHeightError::EmptyScriptSig)?;

    if let Some(n) = decode_op_n(first) {
        return Ok(n as u64);
    }

    let len = first as usize;
    let height = rest.get(..len).ok_or(CoinbaseHeightError::LengthExceedsScript {
        declared: len,
        available: rest.len(),
    })?;
    // Wider than 8 bytes is the only possible failure without minimality.
    let num = ScriptNum::from_bytes(height, false, len)
        .map_err(|_| CoinbaseHeightError::HeightTooLong(len))?;
    u64::try_from(num.value()).map_err(|_| CoinbaseHeightError::NegativeHeight(num.value()))
}
