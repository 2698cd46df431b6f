//! JSON views of scripts as they appear in decoded transactions.

use serde::{Deserialize, Serialize};

use crate::script::Script;
use crate::standard::{required_sigs, solver, TxOutType};

/// An output script as shown in a decoded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPubKeyJson {
    pub asm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(rename = "type")]
    pub kind: TxOutType,
    #[serde(rename = "reqSigs", default, skip_serializing_if = "Option::is_none")]
    pub req_sigs: Option<u32>,
}

/// An input script as shown in a decoded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSigJson {
    pub asm: String,
    pub hex: String,
}

impl Script {
    /// Build the JSON view of an output script.
    ///
    /// # Arguments
    /// * `include_hex` - Include the raw script hex.
    /// * `genesis_enabled` - Classify with the post-genesis template rules.
    pub fn to_script_pub_key_json(&self, include_hex: bool, genesis_enabled: bool) -> ScriptPubKeyJson {
        let solution = solver(self, genesis_enabled);
        ScriptPubKeyJson {
            asm: self.to_asm(false),
            hex: include_hex.then(|| self.to_hex()),
            kind: solution.kind,
            req_sigs: required_sigs(&solution),
        }
    }

    /// Build the JSON view of an input script.
    ///
    /// Signatures are shown with their sighash type decoded.
    pub fn to_script_sig_json(&self) -> ScriptSigJson {
        ScriptSigJson {
            asm: self.to_asm(true),
            hex: self.to_hex(),
        }
    }
}
