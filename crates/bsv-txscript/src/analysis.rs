//! Static analysis over decoded instructions.
//!
//! Signature-operation counting, template matching, spendability heuristics
//! and pattern search/removal. None of these fail: a malformed push either
//! ends the scan or makes a predicate false.

use crate::config::ScriptConfig;
use crate::instruction::{read_instruction, Decoded, Instruction};
use crate::opcodes::*;
use crate::script::Script;
use crate::script_num::{ScriptNum, MAXIMUM_ELEMENT_SIZE};

/// Result of counting signature operations.
///
/// `error` is set when a multisig key count could not be read (negative,
/// wider than 4 bytes or not minimally encoded). That occurrence adds zero
/// to `count`; whether the owning script is rejected is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SigOpCount {
    pub count: u64,
    pub error: bool,
}

impl Script {
    // -----------------------------------------------------------------------
    // Signature operations
    // -----------------------------------------------------------------------

    /// Count signature operations in this script.
    ///
    /// OP_CHECKSIG and OP_CHECKSIGVERIFY count 1 each. A multisig check
    /// counts the key count pushed just before it when that can be read,
    /// and the pre-genesis maximum of 20 otherwise.
    ///
    /// Before genesis the key count is only read in `accurate` mode and only
    /// from OP_0..OP_16. After genesis it is always read, from any small
    /// integer opcode, OP_1NEGATE or data push.
    ///
    /// # Arguments
    /// * `accurate` - Read key counts before genesis.
    /// * `genesis_enabled` - Apply the post-genesis rules.
    pub fn sig_op_count(&self, accurate: bool, genesis_enabled: bool) -> SigOpCount {
        self.sig_op_count_with(&ScriptConfig::default(), accurate, genesis_enabled)
    }

    /// [`Script::sig_op_count`] charging `config`'s flat multisig cost for
    /// key counts that are not read.
    pub fn sig_op_count_with(
        &self,
        config: &ScriptConfig,
        accurate: bool,
        genesis_enabled: bool,
    ) -> SigOpCount {
        let mut result = SigOpCount::default();
        let mut last: Option<Instruction<'_>> = None;

        for instruction in self.instructions() {
            let Ok(instruction) = instruction else { break };
            match instruction.opcode {
                OP_CHECKSIG | OP_CHECKSIGVERIFY => result.count += 1,
                OP_CHECKMULTISIG | OP_CHECKMULTISIGVERIFY => {
                    match multisig_key_count(last.as_ref(), accurate, genesis_enabled) {
                        KeyCount::Known(n) => result.count += n,
                        KeyCount::Unknown => {
                            result.count += config.max_pub_keys_per_multisig_before_genesis
                        }
                        KeyCount::Invalid => {
                            tracing::debug!(
                                script = %self,
                                "unreadable multisig key count, counting zero sigops"
                            );
                            result.error = true;
                        }
                    }
                }
                _ => {}
            }
            last = Some(instruction);
        }
        result
    }

    /// Count signature operations of a pay-to-script-hash spend.
    ///
    /// If this script is a P2SH output, the last item pushed by `script_sig`
    /// is taken as the redeem script and counted accurately. Anything else
    /// counts 0: sigops of non-P2SH outputs are counted on the output itself
    /// by [`Script::sig_op_count`].
    ///
    /// A `script_sig` that is not push-only, or does not decode, counts 0.
    pub fn p2sh_sig_op_count(&self, script_sig: &Script, genesis_enabled: bool) -> SigOpCount {
        self.p2sh_sig_op_count_with(&ScriptConfig::default(), script_sig, genesis_enabled)
    }

    /// [`Script::p2sh_sig_op_count`] with the limits of `config`.
    pub fn p2sh_sig_op_count_with(
        &self,
        config: &ScriptConfig,
        script_sig: &Script,
        genesis_enabled: bool,
    ) -> SigOpCount {
        if !self.is_p2sh() {
            return SigOpCount::default();
        }

        let mut redeem: &[u8] = &[];
        for instruction in script_sig.instructions() {
            let Ok(instruction) = instruction else {
                return SigOpCount::default();
            };
            if instruction.opcode > OP_16 {
                return SigOpCount::default();
            }
            redeem = instruction.data.unwrap_or_default();
        }

        Script::from_bytes(redeem).sig_op_count_with(config, true, genesis_enabled)
    }

    // -----------------------------------------------------------------------
    // Template matching
    // -----------------------------------------------------------------------

    /// Check if this is a Pay-to-Script-Hash (P2SH) output script.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL, exactly 23 bytes.
    pub fn is_p2sh(&self) -> bool {
        matches!(
            self.as_bytes(),
            [OP_HASH160, OP_DATA_20, .., OP_EQUAL] if self.len() == 23
        )
    }

    /// Match the witness program template.
    ///
    /// A version opcode (OP_0 or OP_1..OP_16) followed by one direct push of
    /// 2 to 40 bytes, and nothing else.
    ///
    /// # Returns
    /// The version number and the program bytes.
    pub fn witness_program(&self) -> Option<(u8, &[u8])> {
        let bytes = self.as_bytes();
        if !(4..=42).contains(&bytes.len()) {
            return None;
        }
        let version = decode_op_n(bytes[0])?;
        if bytes[1] as usize + 2 != bytes.len() {
            return None;
        }
        Some((version, &bytes[2..]))
    }

    /// Return true if the script holds only push instructions (OP_16 or
    /// below) and decodes to the end.
    pub fn is_push_only(&self) -> bool {
        self.is_push_only_from(0)
    }

    /// Same as [`Script::is_push_only`], starting at byte offset `pos`.
    pub fn is_push_only_from(&self, pos: usize) -> bool {
        self.instructions_from(pos)
            .all(|ins| ins.map(|i| i.is_push()).unwrap_or(false))
    }

    // -----------------------------------------------------------------------
    // Spendability
    // -----------------------------------------------------------------------

    /// Return true if the output is provably unspendable and can be pruned.
    ///
    /// Before genesis: starts with OP_RETURN or OP_FALSE OP_RETURN, or is
    /// larger than the pre-genesis script size limit. After genesis only the
    /// OP_FALSE OP_RETURN prefix counts. A post-genesis script that always
    /// leaves false on the stack before a trailing OP_RETURN is not detected.
    pub fn is_unspendable(&self, genesis_enabled: bool) -> bool {
        self.is_unspendable_with(&ScriptConfig::default(), genesis_enabled)
    }

    /// [`Script::is_unspendable`] with the script size limit of `config`.
    pub fn is_unspendable_with(&self, config: &ScriptConfig, genesis_enabled: bool) -> bool {
        let bytes = self.as_bytes();
        let oversized = config
            .max_script_size(genesis_enabled)
            .is_some_and(|max| bytes.len() > max);
        let op_return = if genesis_enabled {
            bytes.starts_with(&[OP_FALSE, OP_RETURN])
        } else {
            self.is_known_op_return()
        };
        op_return || oversized
    }

    /// Return true if the script starts with OP_RETURN or OP_FALSE OP_RETURN.
    ///
    /// Does not depend on genesis; used when decoding and displaying outputs.
    pub fn is_known_op_return(&self) -> bool {
        let bytes = self.as_bytes();
        bytes.starts_with(&[OP_RETURN]) || bytes.starts_with(&[OP_FALSE, OP_RETURN])
    }

    // -----------------------------------------------------------------------
    // Search and removal
    // -----------------------------------------------------------------------

    /// Count the decoded occurrences of `op`.
    ///
    /// Counting stops silently at a malformed push.
    pub fn find(&self, op: u8) -> usize {
        self.instructions()
            .map_while(Result::ok)
            .filter(|i| i.opcode == op)
            .count()
    }

    /// Remove every occurrence of `pattern` that starts on an instruction
    /// boundary, returning how many were removed.
    ///
    /// Matching is byte-exact. After a match the next comparison is made
    /// right after it, so back-to-back copies are all removed. The scan for
    /// boundaries stops at the first malformed push and the rest of the
    /// script is kept as is. An empty pattern removes nothing.
    pub fn find_and_delete(&mut self, pattern: &[u8]) -> usize {
        if pattern.is_empty() {
            return 0;
        }

        let bytes = self.as_bytes();
        let mut kept = Vec::with_capacity(bytes.len());
        let mut found = 0;
        let mut pos = 0;
        let mut kept_from = 0;
        loop {
            kept.extend_from_slice(&bytes[kept_from..pos]);
            while bytes[pos..].starts_with(pattern) {
                pos += pattern.len();
                found += 1;
            }
            kept_from = pos;
            match read_instruction(bytes, pos) {
                Decoded::Instruction { next, .. } => pos = next,
                Decoded::EndOfScript | Decoded::Malformed(_) => break,
            }
        }

        if found > 0 {
            kept.extend_from_slice(&bytes[kept_from..]);
            self.replace_bytes(kept);
        }
        found
    }
}

enum KeyCount {
    Known(u64),
    Unknown,
    Invalid,
}

/// Read the multisig key count from the instruction preceding the check.
fn multisig_key_count(
    last: Option<&Instruction<'_>>,
    accurate: bool,
    genesis_enabled: bool,
) -> KeyCount {
    let Some(last) = last else {
        return KeyCount::Unknown;
    };

    if !genesis_enabled {
        return match decode_op_n(last.opcode) {
            Some(n) if accurate => KeyCount::Known(n as u64),
            _ => KeyCount::Unknown,
        };
    }

    if let Some(n) = decode_op_n(last.opcode) {
        return KeyCount::Known(n as u64);
    }
    if last.opcode == OP_1NEGATE {
        return KeyCount::Invalid;
    }
    let Some(data) = last.push_data() else {
        return KeyCount::Unknown;
    };
    match ScriptNum::from_bytes(data, true, MAXIMUM_ELEMENT_SIZE) {
        Ok(n) if n.value() >= 0 => KeyCount::Known(n.value() as u64),
        _ => KeyCount::Invalid,
    }
}

#[cfg(test)]
mod tests {
    //! Tests for static analysis.
    //!
    //! Sigop vectors follow the node's sigop counting tests: accurate and
    //! flat multisig counting, genesis key counts above 16, and the error
    //! flag for negative or oversized counts.

    use super::*;
    use crate::config::MAX_SCRIPT_SIZE_BEFORE_GENESIS;

    const DUMMY: [u8; 20] = [0u8; 20];

    fn multisig_with_count(count: &[u8]) -> Script {
        let mut script = Script::new();
        script.append_opcode(OP_1);
        script.append_push_data(&DUMMY).expect("push");
        script.append_push_data(&DUMMY).expect("push");
        script.concat(&Script::from_bytes(count));
        script.append_opcode(OP_CHECKMULTISIG);
        script
    }

    // -----------------------------------------------------------------------
    // sig_op_count
    // -----------------------------------------------------------------------

    /// An empty script has no sigops.
    #[test]
    fn test_sig_op_count_empty() {
        let script = Script::new();
        assert_eq!(script.sig_op_count(false, false), SigOpCount::default());
        assert_eq!(script.sig_op_count(true, true), SigOpCount::default());
    }

    /// Accurate mode reads OP_N; flat mode charges 20.
    #[test]
    fn test_sig_op_count_accurate_and_flat() {
        let mut script = multisig_with_count(&[OP_2]);
        assert_eq!(script.sig_op_count(true, false).count, 2);

        script
            .append_opcode(OP_IF)
            .append_opcode(OP_CHECKSIG)
            .append_opcode(OP_ENDIF);
        assert_eq!(script.sig_op_count(true, false).count, 3);
        assert_eq!(script.sig_op_count(false, false).count, 21);
    }

    /// Three keys under OP_3 count as 3 accurate, 20 flat.
    #[test]
    fn test_sig_op_count_three_keys() {
        let key = [0x02u8; 33];
        let script = Script::new_multisig(1, &[&key[..], &key[..], &key[..]]).expect("multisig");
        assert_eq!(script.sig_op_count(true, false).count, 3);
        assert_eq!(script.sig_op_count(false, false).count, 20);
    }

    /// CHECKSIGVERIFY and CHECKMULTISIGVERIFY count like their plain forms.
    #[test]
    fn test_sig_op_count_verify_variants() {
        let script = Script::from_bytes(&[OP_CHECKSIGVERIFY, OP_5, OP_CHECKMULTISIGVERIFY]);
        assert_eq!(script.sig_op_count(true, false).count, 6);
        assert_eq!(script.sig_op_count(false, false).count, 21);
    }

    /// A multisig check with nothing before it is charged the flat maximum.
    #[test]
    fn test_sig_op_count_leading_multisig() {
        let script = Script::from_bytes(&[OP_CHECKMULTISIG]);
        assert_eq!(script.sig_op_count(true, true).count, 20);
        assert!(!script.sig_op_count(true, true).error);
    }

    /// After genesis counts above 16 are read from data pushes.
    #[test]
    fn test_sig_op_count_genesis_large_counts() {
        let key = [0x03u8; 33];
        let keys: Vec<&[u8]> = (0..100).map(|_| &key[..]).collect();
        let script = Script::new_multisig(1, &keys).expect("multisig");
        assert_eq!(script.sig_op_count(false, true).count, 100);

        let script = multisig_with_count(&[0x01, 99]);
        assert_eq!(script.sig_op_count(false, true).count, 99);
        assert_eq!(script.sig_op_count(true, false).count, 20);
        assert_eq!(script.sig_op_count(false, false).count, 20);
    }

    /// OP_9 is read everywhere except flat pre-genesis mode.
    #[test]
    fn test_sig_op_count_op9() {
        let script = multisig_with_count(&[OP_9]);
        assert_eq!(script.sig_op_count(false, false), SigOpCount { count: 20, error: false });
        assert_eq!(script.sig_op_count(true, false), SigOpCount { count: 9, error: false });
        assert_eq!(script.sig_op_count(false, true), SigOpCount { count: 9, error: false });
        assert_eq!(script.sig_op_count(true, true), SigOpCount { count: 9, error: false });
    }

    /// A pushed 19 is only understood after genesis.
    #[test]
    fn test_sig_op_count_pushed_19() {
        let script = multisig_with_count(&[0x01, 19]);
        assert_eq!(script.sig_op_count(false, false), SigOpCount { count: 20, error: false });
        assert_eq!(script.sig_op_count(true, false), SigOpCount { count: 20, error: false });
        assert_eq!(script.sig_op_count(false, true), SigOpCount { count: 19, error: false });
        assert_eq!(script.sig_op_count(true, true), SigOpCount { count: 19, error: false });
    }

    /// A negative count is an error after genesis only.
    #[test]
    fn test_sig_op_count_negative() {
        for count in [&[0x01u8, 0x81][..], &[OP_1NEGATE][..]] {
            let script = multisig_with_count(count);
            assert_eq!(script.sig_op_count(false, false), SigOpCount { count: 20, error: false });
            assert_eq!(script.sig_op_count(true, false), SigOpCount { count: 20, error: false });
            assert_eq!(script.sig_op_count(false, true), SigOpCount { count: 0, error: true });
            assert_eq!(script.sig_op_count(true, true), SigOpCount { count: 0, error: true });
        }
    }

    /// A count wider than 4 bytes is an error after genesis only.
    #[test]
    fn test_sig_op_count_oversized() {
        let script = multisig_with_count(&[0x05, 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(script.sig_op_count(true, false), SigOpCount { count: 20, error: false });
        assert_eq!(script.sig_op_count(true, true), SigOpCount { count: 0, error: true });
    }

    /// A non-minimal count is an error after genesis.
    #[test]
    fn test_sig_op_count_non_minimal() {
        let script = multisig_with_count(&[0x02, 0x05, 0x00]);
        assert_eq!(script.sig_op_count(true, true), SigOpCount { count: 0, error: true });
    }

    /// The error flag does not stop counting of later sigops.
    #[test]
    fn test_sig_op_count_error_continues() {
        let mut script = multisig_with_count(&[OP_1NEGATE]);
        script.append_opcode(OP_CHECKSIG);
        assert_eq!(script.sig_op_count(true, true), SigOpCount { count: 1, error: true });
    }

    /// Counting stops at a malformed push and keeps what was counted.
    #[test]
    fn test_sig_op_count_malformed_tail() {
        let script = Script::from_bytes(&[OP_CHECKSIG, OP_PUSHDATA1, 0x05, OP_CHECKSIG]);
        assert_eq!(script.sig_op_count(true, true).count, 1);
    }

    // -----------------------------------------------------------------------
    // p2sh_sig_op_count
    // -----------------------------------------------------------------------

    /// The redeem script pushed last by scriptSig is counted accurately.
    #[test]
    fn test_p2sh_sig_op_count() {
        let mut redeem = multisig_with_count(&[OP_2]);
        redeem
            .append_opcode(OP_IF)
            .append_opcode(OP_CHECKSIG)
            .append_opcode(OP_ENDIF);
        let p2sh = Script::new_p2sh(&redeem.script_id());

        let mut script_sig = Script::new();
        script_sig.append_opcode(OP_0);
        script_sig.append_push_data(redeem.as_bytes()).expect("push");
        assert_eq!(p2sh.p2sh_sig_op_count(&script_sig, false).count, 3);

        // The output itself only has its hash.
        assert_eq!(p2sh.sig_op_count(true, false).count, 0);
    }

    /// Non-P2SH outputs and non-push scriptSigs count zero.
    #[test]
    fn test_p2sh_sig_op_count_zero_cases() {
        let redeem = Script::from_bytes(&[OP_CHECKSIG]);
        let mut script_sig = Script::new();
        script_sig.append_push_data(redeem.as_bytes()).expect("push");

        let p2pkh = Script::new_p2pkh(&DUMMY);
        assert_eq!(p2pkh.p2sh_sig_op_count(&script_sig, false).count, 0);

        let p2sh = Script::new_p2sh(&redeem.script_id());
        assert_eq!(p2sh.p2sh_sig_op_count(&script_sig, false).count, 1);

        let mut not_push_only = script_sig.clone();
        not_push_only.append_opcode(OP_DUP);
        assert_eq!(p2sh.p2sh_sig_op_count(&not_push_only, false).count, 0);

        let truncated = Script::from_bytes(&[0x01, OP_CHECKSIG, OP_PUSHDATA1]);
        assert_eq!(p2sh.p2sh_sig_op_count(&truncated, false).count, 0);

        assert_eq!(p2sh.p2sh_sig_op_count(&Script::new(), false).count, 0);
    }

    // -----------------------------------------------------------------------
    // Template matching
    // -----------------------------------------------------------------------

    /// Only the exact 23-byte layout is P2SH.
    #[test]
    fn test_is_p2sh() {
        let p2sh = Script::from_hex("a9149de5aeaff9c48431ba4dd6e8af73d51f38e451cb87")
            .expect("valid hex");
        assert!(p2sh.is_p2sh());

        let push19 = Script::from_hex("a9139de5aeaff9c48431ba4dd6e8af73d51f38e451cb87")
            .expect("valid hex");
        assert!(!push19.is_p2sh());
        let push21 = Script::from_hex("a9159de5aeaff9c48431ba4dd6e8af73d51f38e451cb0087")
            .expect("valid hex");
        assert!(!push21.is_p2sh());
        let reordered = Script::from_hex("879de5aeaff9c48431ba4dd6e8af73d51f38e451cb14a9")
            .expect("valid hex");
        assert!(!reordered.is_p2sh());
        let trailing = Script::from_hex("a9149de5aeaff9c48431ba4dd6e8af73d51f38e451cb8700")
            .expect("valid hex");
        assert!(!trailing.is_p2sh());
        assert!(!Script::new_p2pkh(&DUMMY).is_p2sh());
    }

    /// Witness programs are a version opcode plus one 2..=40 byte push.
    #[test]
    fn test_witness_program() {
        let mut v0 = vec![OP_0, 20];
        v0.extend_from_slice(&DUMMY);
        let script = Script::from(v0);
        assert_eq!(script.witness_program(), Some((0, &DUMMY[..])));

        let v16 = Script::from_bytes(&[OP_16, 2, 0xaa, 0xbb]);
        assert_eq!(v16.witness_program(), Some((16, &[0xaa, 0xbb][..])));

        assert_eq!(Script::from_bytes(&[OP_1, 1, 0xaa]).witness_program(), None);
        assert_eq!(Script::from_bytes(&[OP_1NEGATE, 2, 0xaa, 0xbb]).witness_program(), None);
        assert_eq!(Script::from_bytes(&[OP_1, 3, 0xaa, 0xbb]).witness_program(), None);
        let mut too_long = vec![OP_1, 41];
        too_long.extend_from_slice(&[0u8; 41]);
        assert_eq!(Script::from(too_long).witness_program(), None);
    }

    /// Push-only accepts OP_0..OP_16 and rejects anything above or malformed.
    #[test]
    fn test_is_push_only() {
        assert!(Script::new().is_push_only());
        assert!(Script::from_bytes(&[OP_0, 0x01, 0xff, OP_1NEGATE, OP_RESERVED, OP_16]).is_push_only());
        assert!(!Script::from_bytes(&[OP_1, OP_NOP]).is_push_only());
        assert!(!Script::from_bytes(&[OP_1, OP_PUSHDATA2, 0x05]).is_push_only());
        assert!(Script::from_bytes(&[OP_DUP, OP_1]).is_push_only_from(1));
        assert!(!Script::from_bytes(&[OP_DUP, OP_1]).is_push_only_from(0));
    }

    // -----------------------------------------------------------------------
    // Spendability
    // -----------------------------------------------------------------------

    /// Pre-genesis rules: OP_RETURN prefix, OP_FALSE OP_RETURN, or oversized.
    #[test]
    fn test_is_unspendable_pre_genesis() {
        assert!(Script::from_bytes(&[OP_RETURN]).is_unspendable(false));
        assert!(Script::from_bytes(&[OP_FALSE, OP_RETURN, 0x01, 0x02]).is_unspendable(false));
        assert!(!Script::from_bytes(&[OP_1, OP_RETURN]).is_unspendable(false));
        assert!(!Script::new().is_unspendable(false));

        let limit = Script::from(vec![OP_NOP; MAX_SCRIPT_SIZE_BEFORE_GENESIS]);
        assert!(!limit.is_unspendable(false));
        let oversized = Script::from(vec![OP_NOP; MAX_SCRIPT_SIZE_BEFORE_GENESIS + 1]);
        assert!(oversized.is_unspendable(false));
        assert!(!oversized.is_unspendable(true));
    }

    /// The size limit and the flat multisig charge come from the config.
    #[test]
    fn test_config_limits() {
        let config = ScriptConfig {
            max_script_size_before_genesis: 8,
            max_pub_keys_per_multisig_before_genesis: 3,
            ..ScriptConfig::regtest()
        };

        let nine = Script::from(vec![OP_NOP; 9]);
        assert!(nine.is_unspendable_with(&config, false));
        assert!(!nine.is_unspendable_with(&config, true));
        assert!(!nine.is_unspendable(false));
        assert!(!Script::from(vec![OP_NOP; 8]).is_unspendable_with(&config, false));

        let flat = Script::from_bytes(&[OP_CHECKSIG, OP_CHECKMULTISIG]);
        assert_eq!(flat.sig_op_count_with(&config, false, false).count, 4);
        assert_eq!(flat.sig_op_count(false, false).count, 21);

        let multisig = multisig_with_count(&[OP_2]);
        assert_eq!(multisig.sig_op_count_with(&config, false, false).count, 3);
        assert_eq!(multisig.sig_op_count_with(&config, true, false).count, 2);

        // A redeem script whose key count is not a push.
        let mut redeem = Script::new();
        redeem.append_opcode(OP_DUP).append_opcode(OP_CHECKMULTISIG);
        let p2sh = Script::new_p2sh(&redeem.script_id());
        let mut script_sig = Script::new();
        script_sig.append_push_data(redeem.as_bytes()).expect("push");
        assert_eq!(
            p2sh.p2sh_sig_op_count_with(&config, &script_sig, false).count,
            3
        );
        assert_eq!(p2sh.p2sh_sig_op_count(&script_sig, false).count, 20);
    }

    /// Post-genesis only OP_FALSE OP_RETURN is recognized.
    #[test]
    fn test_is_unspendable_post_genesis() {
        assert!(!Script::from_bytes(&[OP_RETURN]).is_unspendable(true));
        assert!(Script::from_bytes(&[OP_FALSE, OP_RETURN]).is_unspendable(true));
        assert!(Script::from_bytes(&[OP_FALSE, OP_RETURN, OP_PUSHDATA4]).is_unspendable(true));
        assert!(!Script::from_bytes(&[OP_1, OP_RETURN]).is_unspendable(true));
        // Always false, but not detected.
        assert!(!Script::from_bytes(&[OP_1, OP_DROP, OP_FALSE, OP_RETURN]).is_unspendable(true));
    }

    /// Known OP_RETURN detection ignores genesis and script size.
    #[test]
    fn test_is_known_op_return() {
        assert!(Script::from_bytes(&[OP_RETURN]).is_known_op_return());
        assert!(Script::from_bytes(&[OP_FALSE, OP_RETURN]).is_known_op_return());
        assert!(!Script::from_bytes(&[OP_FALSE]).is_known_op_return());
        assert!(!Script::from(vec![OP_NOP; MAX_SCRIPT_SIZE_BEFORE_GENESIS + 1]).is_known_op_return());
    }

    // -----------------------------------------------------------------------
    // find / find_and_delete
    // -----------------------------------------------------------------------

    /// find counts decoded opcodes, not bytes inside push data.
    #[test]
    fn test_find() {
        let script = Script::from_bytes(&[OP_CHECKSIG, 0x02, OP_CHECKSIG, OP_CHECKSIG, OP_CHECKSIG]);
        assert_eq!(script.find(OP_CHECKSIG), 2);
        assert_eq!(script.find(OP_DUP), 0);

        let truncated = Script::from_bytes(&[OP_CHECKSIG, OP_PUSHDATA1, 0x09, OP_CHECKSIG]);
        assert_eq!(truncated.find(OP_CHECKSIG), 1);
    }

    /// An empty pattern removes nothing.
    #[test]
    fn test_find_and_delete_empty_pattern() {
        let mut script = Script::from_bytes(&[OP_DUP, OP_DUP]);
        assert_eq!(script.find_and_delete(&[]), 0);
        assert_eq!(script.as_bytes(), &[OP_DUP, OP_DUP]);
    }

    /// Vectors from the node's FindAndDelete tests.
    #[test]
    fn test_find_and_delete_vectors() {
        let cases: &[(&str, &str, usize, &str)] = &[
            ("0302ff03", "0302ff03", 1, ""),
            ("0302ff030302ff03", "0302ff03", 2, ""),
            ("0302ff030302ff03", "02", 0, "0302ff030302ff03"),
            ("0302ff030302ff03", "ff", 0, "0302ff030302ff03"),
            // Strips the push-three prefix, leaving two push-two instructions.
            ("0302ff030302ff03", "03", 2, "02ff0302ff03"),
            // Matches only at instruction boundaries.
            ("02feed5169", "feed51", 0, "02feed5169"),
            ("02feed5169", "02feed51", 1, "69"),
            ("516902feed5169", "feed69", 0, "516902feed5169"),
            ("516902feed5169", "02feed51", 1, "516969"),
            // Back-to-back copies at one boundary are all removed.
            ("00000000", "00", 4, ""),
            ("0003feed", "03feed", 1, "00"),
            ("0003feed", "00", 1, "03feed"),
        ];
        for &(script_hex, pattern_hex, removed, expected) in cases {
            let mut script = Script::from_hex(script_hex).expect("valid hex");
            let pattern = hex::decode(pattern_hex).expect("valid hex");
            assert_eq!(script.find_and_delete(&pattern), removed, "{script_hex} - {pattern_hex}");
            assert_eq!(script.to_hex(), expected, "{script_hex} - {pattern_hex}");
        }
    }

    /// A malformed tail is kept verbatim after earlier removals.
    #[test]
    fn test_find_and_delete_malformed_tail() {
        let mut script = Script::from_bytes(&[OP_CHECKSIG, OP_DUP, OP_PUSHDATA2, 0xff]);
        assert_eq!(script.find_and_delete(&[OP_CHECKSIG]), 1);
        assert_eq!(script.as_bytes(), &[OP_DUP, OP_PUSHDATA2, 0xff]);
    }
}
