/// Error types for script construction.
///
/// Decoding, classification and rendering do not use this type: a malformed
/// instruction is reported through [`crate::MalformedPush`] and analysis
/// degrades to flags or sentinel output instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// An opcode value outside 0..=255 was appended.
    #[error("invalid opcode value: {0}")]
    InvalidOpcode(i64),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Push data exceeds the 4-byte length field.
    #[error("data too big: {0} bytes")]
    DataTooBig(usize),

    /// Multisig template parameters are out of range.
    #[error("invalid multisig parameters: {required} of {keys}")]
    InvalidMultisig { required: usize, keys: usize },
}
