//! Script buffer type - a sequence of opcodes and data pushes.
//!
//! A `Script` is an arbitrary byte vector. It is not required to decode
//! cleanly: any byte sequence is a legal value and every scan has to be
//! prepared to stop at a malformed push. Scripts are built once, through
//! the append methods or from stored bytes, and are read-only afterwards.

use std::fmt;
use std::ops::{Add, AddAssign};

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::instruction::{push_data_prefix, Instructions, MalformedPush, ScriptChunk};
use crate::opcodes::*;
use crate::script_num::ScriptNum;
use crate::ScriptError;

/// A Bitcoin script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - Raw script bytes.
    ///
    /// # Returns
    /// A `Script` wrapping a copy of the given bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Build a pay-to-public-key-hash output script.
    ///
    /// Pattern: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
    pub fn new_p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        let mut script = Script(Vec::with_capacity(25));
        script
            .append_opcode(OP_DUP)
            .append_opcode(OP_HASH160)
            .push_short(pubkey_hash)
            .append_opcode(OP_EQUALVERIFY)
            .append_opcode(OP_CHECKSIG);
        script
    }

    /// Build a pay-to-script-hash output script.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL
    pub fn new_p2sh(script_hash: &[u8; 20]) -> Self {
        let mut script = Script(Vec::with_capacity(23));
        script
            .append_opcode(OP_HASH160)
            .push_short(script_hash)
            .append_opcode(OP_EQUAL);
        script
    }

    /// Build a bare `m`-of-`n` multisig output script.
    ///
    /// Pattern: <m> <pubkey>... <n> OP_CHECKMULTISIG
    ///
    /// # Arguments
    /// * `required` - Number of signatures required (`m`).
    /// * `pubkeys` - The public keys, in order.
    ///
    /// # Returns
    /// The script, or `InvalidMultisig` when `required` is zero or larger
    /// than the number of keys.
    pub fn new_multisig(required: usize, pubkeys: &[&[u8]]) -> Result<Self, ScriptError> {
        if required == 0 || required > pubkeys.len() {
            return Err(ScriptError::InvalidMultisig {
                required,
                keys: pubkeys.len(),
            });
        }
        let mut script = Script::new();
        script.append_int64(required as i64);
        for key in pubkeys {
            script.append_push_data(key)?;
        }
        script
            .append_int64(pubkeys.len() as i64)
            .append_opcode(OP_CHECKMULTISIG);
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Return a reference to the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// HASH160 (RIPEMD-160 of SHA-256) of the script bytes.
    ///
    /// This is the script hash committed to by a pay-to-script-hash output.
    pub fn script_id(&self) -> [u8; 20] {
        let sha = Sha256::digest(&self.0);
        let mut output = [0u8; 20];
        output.copy_from_slice(&Ripemd160::digest(sha));
        output
    }

    // -----------------------------------------------------------------------
    // Decoding
    // -----------------------------------------------------------------------

    /// Iterate over the instructions of the script.
    pub fn instructions(&self) -> Instructions<'_> {
        Instructions::new(&self.0, 0)
    }

    /// Iterate over the instructions starting at byte offset `pos`.
    pub fn instructions_from(&self, pos: usize) -> Instructions<'_> {
        Instructions::new(&self.0, pos)
    }

    /// Parse the script into a vector of owned chunks.
    ///
    /// # Returns
    /// The decoded chunks, or the first malformed push.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, MalformedPush> {
        self.instructions()
            .map(|ins| ins.map(|i| i.to_chunk()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Mutation / building
    // -----------------------------------------------------------------------

    /// Append a single opcode byte.
    ///
    /// No operand is written, so appending a push opcode this way leaves
    /// the script expecting data that the next append must supply.
    pub fn append_opcode(&mut self, op: u8) -> &mut Self {
        self.0.push(op);
        self
    }

    /// Append an opcode given as a wider integer.
    ///
    /// # Returns
    /// `InvalidOpcode` when the value is outside 0..=255.
    pub fn append_opcode_value(&mut self, value: i64) -> Result<&mut Self, ScriptError> {
        let op = u8::try_from(value).map_err(|_| ScriptError::InvalidOpcode(value))?;
        Ok(self.append_opcode(op))
    }

    /// Append an integer using the shortest form.
    ///
    /// 0 is OP_0, -1 is OP_1NEGATE and 1..=16 are OP_1..OP_16. Anything else
    /// is pushed as a minimally encoded script number. `i64::MIN` is pushed
    /// as [`ScriptNum::MIN`], the widest value an 8-byte number can hold.
    pub fn append_int64(&mut self, n: i64) -> &mut Self {
        match n {
            0 => self.append_opcode(OP_0),
            -1 => self.append_opcode(OP_1NEGATE),
            1..=16 => self.append_opcode(OP_1 + (n as u8) - 1),
            _ => self.push_short(&ScriptNum::new(n).to_bytes()),
        }
    }

    /// Append a script number as a data push of its minimal encoding.
    ///
    /// Unlike [`Script::append_int64`] this never uses the small-integer
    /// opcodes, so 5 is pushed as `01 05`.
    pub fn append_num(&mut self, num: &ScriptNum) -> &mut Self {
        self.push_short(&num.to_bytes())
    }

    /// Append data bytes to the script with the minimal push prefix.
    ///
    /// Chooses a direct push for up to 75 bytes, OP_PUSHDATA1 up to 255,
    /// OP_PUSHDATA2 up to 65535 and OP_PUSHDATA4 beyond.
    ///
    /// # Arguments
    /// * `data` - The data bytes to push.
    ///
    /// # Returns
    /// The script for chaining, or an error if the data is too large.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<&mut Self, ScriptError> {
        let prefix = push_data_prefix(data.len())?;
        self.0.reserve(prefix.len() + data.len());
        self.0.extend_from_slice(&prefix);
        self.0.extend_from_slice(data);
        Ok(self)
    }

    /// Append another script's bytes after this one's.
    ///
    /// This composes two programs; the other script is not pushed as data.
    pub fn concat(&mut self, other: &Script) -> &mut Self {
        self.0.extend_from_slice(&other.0);
        self
    }

    /// Push at most 75 bytes with a direct length prefix.
    fn push_short(&mut self, data: &[u8]) -> &mut Self {
        debug_assert!(data.len() < OP_PUSHDATA1 as usize);
        self.0.push(data.len() as u8);
        self.0.extend_from_slice(data);
        self
    }

    /// Mutable access for in-crate rewriting (pattern removal).
    pub(crate) fn replace_bytes(&mut self, bytes: Vec<u8>) {
        self.0 = bytes;
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl From<&[u8]> for Script {
    fn from(bytes: &[u8]) -> Self {
        Script::from_bytes(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Add<&Script> for Script {
    type Output = Script;

    fn add(mut self, rhs: &Script) -> Script {
        self.concat(rhs);
        self
    }
}

impl Add for Script {
    type Output = Script;

    fn add(mut self, rhs: Script) -> Script {
        self.0.extend(rhs.0);
        self
    }
}

impl AddAssign<&Script> for Script {
    fn add_assign(&mut self, rhs: &Script) {
        self.concat(rhs);
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
