//! Standard output template classification.
//!
//! Recognizes the output script templates a wallet or block explorer cares
//! about and extracts their parameters (public keys, hashes, multisig
//! counts).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::instruction::Instruction;
use crate::opcodes::*;
use crate::script::Script;
use crate::script_num::{is_minimally_encoded, ScriptNum, MAXIMUM_ELEMENT_SIZE};

/// Output script template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxOutType {
    NonStandard,
    PubKey,
    PubKeyHash,
    ScriptHash,
    MultiSig,
    NullData,
}

impl TxOutType {
    /// Name used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxOutType::NonStandard => "nonstandard",
            TxOutType::PubKey => "pubkey",
            TxOutType::PubKeyHash => "pubkeyhash",
            TxOutType::ScriptHash => "scripthash",
            TxOutType::MultiSig => "multisig",
            TxOutType::NullData => "nulldata",
        }
    }
}

impl fmt::Display for TxOutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified output script and its template parameters.
///
/// `solutions` holds:
/// * `PubKey` - the public key.
/// * `PubKeyHash` / `ScriptHash` - the 20-byte hash.
/// * `MultiSig` - the encoded `m`, each public key, then the encoded `n`.
/// * `NullData` / `NonStandard` - nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub kind: TxOutType,
    pub solutions: Vec<Vec<u8>>,
}

impl Solution {
    fn nonstandard() -> Self {
        Solution {
            kind: TxOutType::NonStandard,
            solutions: Vec::new(),
        }
    }

    fn new(kind: TxOutType, solutions: Vec<Vec<u8>>) -> Self {
        Solution { kind, solutions }
    }

    /// Return true if the script matched a standard template.
    pub fn is_standard(&self) -> bool {
        self.kind != TxOutType::NonStandard
    }
}

/// Classify an output script.
///
/// P2SH is only a template before genesis; afterwards such outputs are
/// nonstandard. Data outputs start with OP_FALSE OP_RETURN (or, before
/// genesis, a bare OP_RETURN) and are push-only after that prefix.
///
/// # Arguments
/// * `script` - The output (locking) script.
/// * `genesis_enabled` - Apply the post-genesis template rules.
pub fn solver(script: &Script, genesis_enabled: bool) -> Solution {
    let bytes = script.as_bytes();

    if script.is_p2sh() {
        if genesis_enabled {
            return Solution::nonstandard();
        }
        return Solution::new(TxOutType::ScriptHash, vec![bytes[2..22].to_vec()]);
    }

    let data_offset = if !genesis_enabled && bytes.starts_with(&[OP_RETURN]) {
        Some(1)
    } else if bytes.starts_with(&[OP_FALSE, OP_RETURN]) {
        Some(2)
    } else {
        None
    };
    if let Some(offset) = data_offset {
        if script.is_push_only_from(offset) {
            return Solution::new(TxOutType::NullData, Vec::new());
        }
    }

    let Ok(instructions) = script.instructions().collect::<Result<Vec<_>, _>>() else {
        return Solution::nonstandard();
    };

    if let Some(key) = match_pay_to_pubkey(&instructions) {
        return Solution::new(TxOutType::PubKey, vec![key.to_vec()]);
    }
    if let Some(hash) = match_pay_to_pubkey_hash(&instructions) {
        return Solution::new(TxOutType::PubKeyHash, vec![hash.to_vec()]);
    }
    if let Some(solutions) = match_multisig(&instructions, genesis_enabled) {
        return Solution::new(TxOutType::MultiSig, solutions);
    }
    Solution::nonstandard()
}

/// Number of signatures needed to spend a classified output.
///
/// `None` for data and nonstandard outputs.
pub fn required_sigs(solution: &Solution) -> Option<u32> {
    match solution.kind {
        TxOutType::PubKey | TxOutType::PubKeyHash | TxOutType::ScriptHash => Some(1),
        TxOutType::MultiSig => {
            let m = solution.solutions.first()?;
            let m = ScriptNum::from_bytes(m, false, MAXIMUM_ELEMENT_SIZE).ok()?;
            u32::try_from(m.value()).ok()
        }
        TxOutType::NullData | TxOutType::NonStandard => None,
    }
}

fn is_pubkey_push(instruction: &Instruction<'_>) -> bool {
    instruction
        .push_data()
        .is_some_and(|data| (33..=65).contains(&data.len()))
}

/// <pubkey> OP_CHECKSIG
fn match_pay_to_pubkey<'a>(instructions: &[Instruction<'a>]) -> Option<&'a [u8]> {
    match instructions {
        [key, check] if is_pubkey_push(key) && check.opcode == OP_CHECKSIG => key.push_data(),
        _ => None,
    }
}

/// OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
fn match_pay_to_pubkey_hash<'a>(instructions: &[Instruction<'a>]) -> Option<&'a [u8]> {
    match instructions {
        [dup, hash160, hash, equal_verify, check]
            if dup.opcode == OP_DUP
                && hash160.opcode == OP_HASH160
                && equal_verify.opcode == OP_EQUALVERIFY
                && check.opcode == OP_CHECKSIG =>
        {
            hash.push_data().filter(|h| h.len() == 20)
        }
        _ => None,
    }
}

/// <m> <pubkey>... <n> OP_CHECKMULTISIG
fn match_multisig(instructions: &[Instruction<'_>], genesis_enabled: bool) -> Option<Vec<Vec<u8>>> {
    let [first, keys @ .., last_count, check] = instructions else {
        return None;
    };
    if check.opcode != OP_CHECKMULTISIG || !keys.iter().all(is_pubkey_push) {
        return None;
    }
    let m = small_integer_operand(first, genesis_enabled)?;
    let n = small_integer_operand(last_count, genesis_enabled)?;
    if !is_minimally_encoded(&m, MAXIMUM_ELEMENT_SIZE)
        || !is_minimally_encoded(&n, MAXIMUM_ELEMENT_SIZE)
    {
        return None;
    }

    let m_value = ScriptNum::from_bytes(&m, false, MAXIMUM_ELEMENT_SIZE).ok()?.value();
    let n_value = ScriptNum::from_bytes(&n, false, MAXIMUM_ELEMENT_SIZE).ok()?.value();
    if m_value < 1 || n_value < 1 || m_value > n_value || keys.len() as i64 != n_value {
        return None;
    }

    let mut solutions = Vec::with_capacity(keys.len() + 2);
    solutions.push(m);
    solutions.extend(keys.iter().filter_map(|k| k.push_data()).map(<[u8]>::to_vec));
    solutions.push(n);
    Some(solutions)
}

/// Encoded value of a multisig count operand.
///
/// OP_0 and OP_1..OP_16 always qualify. After genesis a data push of up to
/// 4 bytes does too.
fn small_integer_operand(instruction: &Instruction<'_>, genesis_enabled: bool) -> Option<Vec<u8>> {
    if instruction.opcode == OP_0 {
        return Some(Vec::new());
    }
    if let Some(n) = decode_op_n(instruction.opcode) {
        return Some(vec![n]);
    }
    match instruction.push_data() {
        Some(data) if genesis_enabled && !data.is_empty() && data.len() <= MAXIMUM_ELEMENT_SIZE => {
            Some(data.to_vec())
        }
        _ => None,
    }
}
