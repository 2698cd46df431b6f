//! Signature hash type flags and their display names.

pub const SIGHASH_ALL: u8 = 0x01;
pub const SIGHASH_NONE: u8 = 0x02;
pub const SIGHASH_SINGLE: u8 = 0x03;
pub const SIGHASH_FORKID: u8 = 0x40;
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;

/// Every recognized sighash byte with its display name.
pub static SIGHASH_TYPE_NAMES: [(u8, &str); 12] = [
    (SIGHASH_ALL, "ALL"),
    (SIGHASH_ALL | SIGHASH_ANYONECANPAY, "ALL|ANYONECANPAY"),
    (SIGHASH_ALL | SIGHASH_FORKID, "ALL|FORKID"),
    (SIGHASH_ALL | SIGHASH_FORKID | SIGHASH_ANYONECANPAY, "ALL|FORKID|ANYONECANPAY"),
    (SIGHASH_NONE, "NONE"),
    (SIGHASH_NONE | SIGHASH_ANYONECANPAY, "NONE|ANYONECANPAY"),
    (SIGHASH_NONE | SIGHASH_FORKID, "NONE|FORKID"),
    (SIGHASH_NONE | SIGHASH_FORKID | SIGHASH_ANYONECANPAY, "NONE|FORKID|ANYONECANPAY"),
    (SIGHASH_SINGLE, "SINGLE"),
    (SIGHASH_SINGLE | SIGHASH_ANYONECANPAY, "SINGLE|ANYONECANPAY"),
    (SIGHASH_SINGLE | SIGHASH_FORKID, "SINGLE|FORKID"),
    (SIGHASH_SINGLE | SIGHASH_FORKID | SIGHASH_ANYONECANPAY, "SINGLE|FORKID|ANYONECANPAY"),
];

/// Look up the display name of a sighash byte.
pub fn sighash_type_name(sighash: u8) -> Option<&'static str> {
    SIGHASH_TYPE_NAMES
        .iter()
        .find(|(value, _)| *value == sighash)
        .map(|(_, name)| *name)
}

/// Return true if the base type (ignoring FORKID and ANYONECANPAY) is
/// ALL, NONE or SINGLE.
pub fn is_defined_sighash_type(sighash: u8) -> bool {
    let base = sighash & !(SIGHASH_FORKID | SIGHASH_ANYONECANPAY);
    (SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base)
}
