//! Script verification flags (bitmask).

use std::ops::{BitOr, BitOrAssign};

/// Verification flags consumed by the signature encoding checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptFlags(pub u32);

impl ScriptFlags {
    pub const NONE: ScriptFlags = ScriptFlags(0);
    pub const VERIFY_DER_SIGNATURES: ScriptFlags = ScriptFlags(1 << 2);
    pub const VERIFY_STRICT_ENCODING: ScriptFlags = ScriptFlags(1 << 1);
    pub const VERIFY_LOW_S: ScriptFlags = ScriptFlags(1 << 3);
    pub const ENABLE_SIGHASH_FORKID: ScriptFlags = ScriptFlags(1 << 16);

    pub fn has_flag(self, flag: ScriptFlags) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn has_any(self, flags: &[ScriptFlags]) -> bool {
        flags.iter().any(|f| self.has_flag(*f))
    }
}

impl BitOr for ScriptFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        ScriptFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScriptFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
