//! BSV transaction scripts - encoding, decoding and static analysis.
//!
//! Provides the Script buffer type, opcode definitions, instruction
//! decoding, script numbers, signature-operation counting, template
//! classification and ASM rendering. Scripts are never executed here.

pub mod analysis;
pub mod asm;
pub mod coinbase;
pub mod config;
pub mod flags;
pub mod instruction;
pub mod json;
pub mod opcodes;
pub mod script;
pub mod script_num;
pub mod sig_encoding;
pub mod sighash;
pub mod standard;

mod error;
pub use analysis::SigOpCount;
pub use coinbase::{coinbase_height, CoinbaseHeightError};
pub use config::ScriptConfig;
pub use error::ScriptError;
pub use flags::ScriptFlags;
pub use instruction::{
    push_data_prefix, read_instruction, Decoded, Instruction, Instructions, MalformedKind,
    MalformedPush, ScriptChunk,
};
pub use json::{ScriptPubKeyJson, ScriptSigJson};
pub use script::Script;
pub use script_num::{ScriptNum, ScriptNumError};
pub use sig_encoding::{check_signature_encoding, SignatureEncodingError};
pub use standard::{required_sigs, solver, Solution, TxOutType};
