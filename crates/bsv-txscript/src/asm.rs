//! Human-readable script rendering.
//!
//! Rendering never fails. A malformed push ends the output with an
//! `[error]` token (ASM) or a raw hex token (debug format).

use crate::flags::ScriptFlags;
use crate::instruction::{read_instruction, Decoded};
use crate::opcodes::*;
use crate::script::Script;
use crate::script_num::{ScriptNum, MAXIMUM_ELEMENT_SIZE};
use crate::sig_encoding::check_signature_encoding;
use crate::sighash::{sighash_type_name, SIGHASH_FORKID};

/// Token emitted in place of an instruction that could not be decoded.
pub const ASM_ERROR_TOKEN: &str = "[error]";

impl Script {
    /// Render the script as space-separated ASM.
    ///
    /// Pushes of up to 4 bytes render as the number they encode and longer
    /// pushes as hex. Small integer opcodes render as their value, the NOP
    /// opcodes without their `OP_` prefix, and everything else by name.
    ///
    /// With `attempt_sighash_decode`, a long push that passes the strict
    /// signature encoding check has its trailing sighash byte replaced by a
    /// label, e.g. `3044...01[ALL]` becomes `3044...[ALL]`. Known OP_RETURN
    /// scripts are never decorated.
    ///
    /// # Arguments
    /// * `attempt_sighash_decode` - Decorate signature-like pushes.
    pub fn to_asm(&self, attempt_sighash_decode: bool) -> String {
        let decorate = attempt_sighash_decode && !self.is_known_op_return();
        let mut tokens: Vec<String> = Vec::new();
        for instruction in self.instructions() {
            let Ok(instruction) = instruction else {
                tokens.push(ASM_ERROR_TOKEN.to_string());
                break;
            };
            let token = match instruction.push_data() {
                Some(data) if data.len() <= MAXIMUM_ELEMENT_SIZE => {
                    push_as_number(data).to_string()
                }
                Some(data) if decorate => push_as_signature(data),
                Some(data) => hex::encode(data),
                None => asm_opcode_name(instruction.opcode).to_string(),
            };
            tokens.push(token);
        }
        tokens.join(" ")
    }

    /// Render the script as ASM without signature decoration.
    pub fn to_asm_string(&self) -> String {
        self.to_asm(false)
    }

    /// Render the script in the debug format used by test fixtures.
    ///
    /// Small integers render as numbers and OP_NOP..OP_NOP10 by name without
    /// the `OP_` prefix. Pushes render as `0x<prefix> 0x<data>` and any
    /// other opcode as `0x<byte>`. A malformed tail is one `0x<hex>` token.
    pub fn format_script(&self) -> String {
        let bytes = self.as_bytes();
        let mut tokens: Vec<String> = Vec::new();
        let mut pos = 0;
        loop {
            match read_instruction(bytes, pos) {
                Decoded::EndOfScript => break,
                Decoded::Malformed(_) => {
                    tokens.push(format!("0x{}", hex::encode(&bytes[pos..])));
                    break;
                }
                Decoded::Instruction { instruction, next } => {
                    let op = instruction.opcode;
                    let data = instruction.push_data().unwrap_or_default();
                    let token = if op == OP_0 {
                        "0".to_string()
                    } else if op == OP_1NEGATE || (OP_1..=OP_16).contains(&op) {
                        opcode_name(op).to_string()
                    } else if (OP_NOP..=OP_NOP10).contains(&op) {
                        let name = opcode_name(op);
                        name.strip_prefix("OP_").unwrap_or(name).to_string()
                    } else if !data.is_empty() {
                        let data_start = next - data.len();
                        format!(
                            "0x{} 0x{}",
                            hex::encode(&bytes[pos..data_start]),
                            hex::encode(data)
                        )
                    } else {
                        format!("0x{}", hex::encode(&bytes[pos..next]))
                    };
                    tokens.push(token);
                    pos = next;
                }
            }
        }
        tokens.join(" ")
    }
}

/// Interpret a short push as a number, the way ASM shows it.
fn push_as_number(data: &[u8]) -> i32 {
    ScriptNum::from_bytes(data, false, MAXIMUM_ELEMENT_SIZE)
        .map(|n| n.getint())
        .unwrap_or_default()
}

/// Hex of a long push, with a `[TYPE]` label in place of the trailing
/// sighash byte when the push looks like a signature.
fn push_as_signature(data: &[u8]) -> String {
    let Some((&sighash, body)) = data.split_last() else {
        return String::new();
    };
    let mut flags = ScriptFlags::VERIFY_STRICT_ENCODING;
    if sighash & SIGHASH_FORKID != 0 {
        flags |= ScriptFlags::ENABLE_SIGHASH_FORKID;
    }
    match sighash_type_name(sighash) {
        Some(name) if check_signature_encoding(data, flags).is_ok() => {
            format!("{}[{}]", hex::encode(body), name)
        }
        _ => hex::encode(data),
    }
}

/// Opcode name for ASM output.
fn asm_opcode_name(op: u8) -> &'static str {
    let name = opcode_name(op);
    match op {
        OP_NOP | OP_NOP1..=OP_NOP10 => name.strip_prefix("OP_").unwrap_or(name),
        _ => name,
    }
}
