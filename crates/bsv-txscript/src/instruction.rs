//! Script instruction decoding and push-data encoding.
//!
//! An instruction is either a bare opcode or a data push together with its
//! operand. Decoding is strictly forward: [`read_instruction`] takes a byte
//! buffer and a cursor and returns the next instruction with the cursor that
//! follows it, the end of the script, or a malformed push. Nothing is read
//! past the end of the buffer.

use std::fmt;

use crate::opcodes::*;
use crate::ScriptError;

/// A single decoded script instruction borrowing its operand from the script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub opcode: u8,
    /// The operand, present for every opcode in OP_0..=OP_PUSHDATA4.
    pub data: Option<&'a [u8]>,
}

impl<'a> Instruction<'a> {
    /// Return true if the opcode is in the push range (OP_0..=OP_16).
    ///
    /// This includes OP_RESERVED, which is what the consensus push-only
    /// rule has always accepted.
    pub fn is_push(&self) -> bool {
        self.opcode <= OP_16
    }

    /// Return the pushed bytes for a data push instruction.
    pub fn push_data(&self) -> Option<&'a [u8]> {
        self.data
    }

    /// Copy this instruction into an owned [`ScriptChunk`].
    pub fn to_chunk(&self) -> ScriptChunk {
        ScriptChunk {
            op: self.opcode,
            data: self.data.map(<[u8]>::to_vec),
        }
    }
}

/// An owned decoded instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte.
    pub op: u8,
    /// The data payload, if this chunk is a push operation.
    pub data: Option<Vec<u8>>,
}

/// What part of a push instruction ran past the end of the script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MalformedKind {
    /// The 1, 2 or 4 byte length field of OP_PUSHDATA1/2/4 is cut short.
    TruncatedLength,
    /// The operand is shorter than its declared length.
    TruncatedData,
}

impl fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedKind::TruncatedLength => f.write_str("truncated push length"),
            MalformedKind::TruncatedData => f.write_str("truncated push data"),
        }
    }
}

/// A push instruction that could not be decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("malformed push at offset {offset}: {kind}")]
pub struct MalformedPush {
    /// Offset of the opcode byte of the bad instruction.
    pub offset: usize,
    /// Which part was missing.
    pub kind: MalformedKind,
}

/// Result of one decoding step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded<'a> {
    /// An instruction and the offset just past it.
    Instruction {
        instruction: Instruction<'a>,
        next: usize,
    },
    /// The cursor is at the end of the buffer.
    EndOfScript,
    /// The instruction at the cursor is truncated. Scanning must stop.
    Malformed(MalformedPush),
}

/// Decode the instruction starting at `pos`.
///
/// # Arguments
/// * `bytes` - The raw script bytes.
/// * `pos` - Offset of the opcode byte to decode.
///
/// # Returns
/// The decoded instruction with the next cursor, `EndOfScript` when `pos`
/// is at (or past) the end, or `Malformed` for a truncated push.
pub fn read_instruction(bytes: &[u8], pos: usize) -> Decoded<'_> {
    let Some(&opcode) = bytes.get(pos) else {
        return Decoded::EndOfScript;
    };
    let malformed = |kind| Decoded::Malformed(MalformedPush { offset: pos, kind });

    if !is_push_data_op(opcode) {
        return Decoded::Instruction {
            instruction: Instruction { opcode, data: None },
            next: pos + 1,
        };
    }

    let len_width = match opcode {
        OP_PUSHDATA1 => 1,
        OP_PUSHDATA2 => 2,
        OP_PUSHDATA4 => 4,
        _ => 0,
    };
    let data_start = pos + 1 + len_width;
    let len = if len_width == 0 {
        opcode as usize
    } else {
        match bytes.get(pos + 1..data_start) {
            Some(field) => read_le(field),
            None => return malformed(MalformedKind::TruncatedLength),
        }
    };

    // `bytes.len() - data_start` cannot underflow: the length field was in bounds.
    if bytes.len() - data_start < len {
        return malformed(MalformedKind::TruncatedData);
    }
    let next = data_start + len;
    Decoded::Instruction {
        instruction: Instruction {
            opcode,
            data: Some(&bytes[data_start..next]),
        },
        next,
    }
}

fn read_le(field: &[u8]) -> usize {
    field
        .iter()
        .rev()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize)
}

/// Iterator over the instructions of a script.
///
/// Yields `Err` at most once, on the first malformed push, and then stops.
#[derive(Clone, Debug)]
pub struct Instructions<'a> {
    bytes: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Instructions<'a> {
    /// Start iterating at offset `pos` of `bytes`.
    pub fn new(bytes: &'a [u8], pos: usize) -> Self {
        Instructions {
            bytes,
            pos,
            done: false,
        }
    }

    /// Offset of the next instruction to be decoded.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Result<Instruction<'a>, MalformedPush>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match read_instruction(self.bytes, self.pos) {
            Decoded::Instruction { instruction, next } => {
                self.pos = next;
                Some(Ok(instruction))
            }
            Decoded::EndOfScript => {
                self.done = true;
                None
            }
            Decoded::Malformed(err) => {
                tracing::trace!(offset = err.offset, kind = %err.kind, "stopping scan at malformed push");
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for Instructions<'_> {}

/// Compute the push prefix bytes for a data payload of the given length.
///
/// Always the shortest form: a direct length byte below OP_PUSHDATA1,
/// then OP_PUSHDATA1, OP_PUSHDATA2 and OP_PUSHDATA4.
///
/// # Returns
/// The prefix to place before the data, or `DataTooBig` when the length
/// does not fit a 4-byte length field.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    if data_len < OP_PUSHDATA1 as usize {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xff {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xffff {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else {
        let len = u32::try_from(data_len).map_err(|_| ScriptError::DataTooBig(data_len))?;
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&len.to_le_bytes());
        Ok(buf)
    }
}
