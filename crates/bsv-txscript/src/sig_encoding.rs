//! Structural checks on signature encodings.
//!
//! These look only at the byte layout of a DER signature followed by its
//! sighash byte. Nothing here verifies a signature against a key; the
//! checks exist so that disassembly can recognize data that looks like a
//! signature.

use crate::flags::ScriptFlags;
use crate::sighash::{is_defined_sighash_type, SIGHASH_FORKID};

/// Half the secp256k1 group order, big-endian.
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Reasons a signature fails the structural checks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureEncodingError {
    #[error("malformed signature: too short: {0} < 8")]
    TooShort(usize),
    #[error("malformed signature: too long: {0} > 72")]
    TooLong(usize),
    #[error("malformed signature: format has wrong type: {0:#x}")]
    InvalidSeqId(u8),
    #[error("malformed signature: bad length: {declared} != {actual}")]
    InvalidDataLen { declared: usize, actual: usize },
    #[error("malformed signature: S type indicator missing")]
    MissingSTypeId,
    #[error("malformed signature: S length missing")]
    MissingSLen,
    #[error("malformed signature: invalid S length")]
    InvalidSLen,
    #[error("malformed signature: R integer marker: {0:#x} != 0x02")]
    InvalidRIntId(u8),
    #[error("malformed signature: R length is zero")]
    ZeroRLen,
    #[error("malformed signature: R is negative")]
    NegativeR,
    #[error("malformed signature: R value has too much padding")]
    TooMuchRPadding,
    #[error("malformed signature: S integer marker: {0:#x} != 0x02")]
    InvalidSIntId(u8),
    #[error("malformed signature: S length is zero")]
    ZeroSLen,
    #[error("malformed signature: S is negative")]
    NegativeS,
    #[error("malformed signature: S value has too much padding")]
    TooMuchSPadding,
    #[error("signature is not canonical due to unnecessarily high S value")]
    HighS,
    #[error("invalid hash type {0:#x}")]
    InvalidSigHashType(u8),
    #[error("fork id sighash set without flag")]
    ForkIdWithoutFlag,
    #[error("fork id sighash not set with flag")]
    MissingForkId,
}

/// Check a signature (DER body plus trailing sighash byte) against `flags`.
///
/// An empty signature always passes. DER layout is checked when any of
/// `VERIFY_DER_SIGNATURES`, `VERIFY_LOW_S` or `VERIFY_STRICT_ENCODING` is
/// set; the sighash byte is checked under `VERIFY_STRICT_ENCODING`, where
/// its FORKID bit must agree with `ENABLE_SIGHASH_FORKID`.
pub fn check_signature_encoding(
    sig: &[u8],
    flags: ScriptFlags,
) -> Result<(), SignatureEncodingError> {
    let Some((&sighash, der)) = sig.split_last() else {
        return Ok(());
    };

    if flags.has_any(&[
        ScriptFlags::VERIFY_DER_SIGNATURES,
        ScriptFlags::VERIFY_LOW_S,
        ScriptFlags::VERIFY_STRICT_ENCODING,
    ]) {
        check_der_layout(der)?;
    }

    if flags.has_flag(ScriptFlags::VERIFY_LOW_S) {
        check_low_s(der)?;
    }

    if flags.has_flag(ScriptFlags::VERIFY_STRICT_ENCODING) {
        if !is_defined_sighash_type(sighash) {
            return Err(SignatureEncodingError::InvalidSigHashType(sighash));
        }
        let uses_fork_id = sighash & SIGHASH_FORKID != 0;
        let fork_id_enabled = flags.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID);
        if uses_fork_id && !fork_id_enabled {
            return Err(SignatureEncodingError::ForkIdWithoutFlag);
        }
        if fork_id_enabled && !uses_fork_id {
            return Err(SignatureEncodingError::MissingForkId);
        }
    }

    Ok(())
}

/// Validate the strict DER layout `0x30 len 0x02 rlen R 0x02 slen S`.
fn check_der_layout(sig: &[u8]) -> Result<(), SignatureEncodingError> {
    let sig_len = sig.len();
    if sig_len < 8 {
        return Err(SignatureEncodingError::TooShort(sig_len));
    }
    if sig_len > 72 {
        return Err(SignatureEncodingError::TooLong(sig_len));
    }
    if sig[0] != 0x30 {
        return Err(SignatureEncodingError::InvalidSeqId(sig[0]));
    }
    if sig[1] as usize != sig_len - 2 {
        return Err(SignatureEncodingError::InvalidDataLen {
            declared: sig[1] as usize,
            actual: sig_len - 2,
        });
    }

    let r_len = sig[3] as usize;
    let s_type_offset = 4 + r_len;
    let s_len_offset = s_type_offset + 1;
    if s_type_offset >= sig_len {
        return Err(SignatureEncodingError::MissingSTypeId);
    }
    if s_len_offset >= sig_len {
        return Err(SignatureEncodingError::MissingSLen);
    }

    let s_offset = s_len_offset + 1;
    let s_len = sig[s_len_offset] as usize;
    if s_offset + s_len != sig_len {
        return Err(SignatureEncodingError::InvalidSLen);
    }

    if sig[2] != 0x02 {
        return Err(SignatureEncodingError::InvalidRIntId(sig[2]));
    }
    if r_len == 0 {
        return Err(SignatureEncodingError::ZeroRLen);
    }
    if sig[4] & 0x80 != 0 {
        return Err(SignatureEncodingError::NegativeR);
    }
    if r_len > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return Err(SignatureEncodingError::TooMuchRPadding);
    }

    if sig[s_type_offset] != 0x02 {
        return Err(SignatureEncodingError::InvalidSIntId(sig[s_type_offset]));
    }
    if s_len == 0 {
        return Err(SignatureEncodingError::ZeroSLen);
    }
    if sig[s_offset] & 0x80 != 0 {
        return Err(SignatureEncodingError::NegativeS);
    }
    if s_len > 1 && sig[s_offset] == 0x00 && sig[s_offset + 1] & 0x80 == 0 {
        return Err(SignatureEncodingError::TooMuchSPadding);
    }

    Ok(())
}

/// Reject S values above half the curve order. Assumes a valid DER layout.
fn check_low_s(sig: &[u8]) -> Result<(), SignatureEncodingError> {
    let r_len = sig[3] as usize;
    let s_len = sig[5 + r_len] as usize;
    let s = &sig[6 + r_len..6 + r_len + s_len];
    let first_significant = s.iter().position(|&b| b != 0).unwrap_or(s.len());
    let s = &s[first_significant..];

    let high = match s.len().cmp(&HALF_ORDER.len()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => s > &HALF_ORDER[..],
    };
    if high {
        return Err(SignatureEncodingError::HighS);
    }
    Ok(())
}
