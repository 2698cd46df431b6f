//! Consensus limits and genesis activation configuration.

use serde::{Deserialize, Serialize};

/// Limits applied to scripts before genesis.
pub const MAX_SCRIPT_SIZE_BEFORE_GENESIS: usize = 10000;
pub const MAX_PUBKEYS_PER_MULTISIG_BEFORE_GENESIS: u64 = 20;

/// Genesis activation heights of the public networks.
pub const GENESIS_ACTIVATION_MAINNET: u64 = 620_538;
pub const GENESIS_ACTIVATION_TESTNET: u64 = 1_344_000;
pub const GENESIS_ACTIVATION_REGTEST: u64 = 10_000;

/// Script rule configuration.
///
/// Deserializes with every field optional; missing fields take the
/// mainnet values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// First block height at which the genesis rules apply.
    pub genesis_activation_height: u64,
    /// Scripts longer than this are unspendable before genesis.
    pub max_script_size_before_genesis: usize,
    /// Flat sigop charge for a multisig whose key count is not counted.
    pub max_pub_keys_per_multisig_before_genesis: u64,
}

impl ScriptConfig {
    pub fn mainnet() -> Self {
        ScriptConfig {
            genesis_activation_height: GENESIS_ACTIVATION_MAINNET,
            max_script_size_before_genesis: MAX_SCRIPT_SIZE_BEFORE_GENESIS,
            max_pub_keys_per_multisig_before_genesis: MAX_PUBKEYS_PER_MULTISIG_BEFORE_GENESIS,
        }
    }

    pub fn testnet() -> Self {
        ScriptConfig {
            genesis_activation_height: GENESIS_ACTIVATION_TESTNET,
            ..Self::mainnet()
        }
    }

    pub fn regtest() -> Self {
        ScriptConfig {
            genesis_activation_height: GENESIS_ACTIVATION_REGTEST,
            ..Self::mainnet()
        }
    }

    /// Return true if the post-genesis rule set applies at `height`.
    pub fn is_genesis_enabled(&self, height: u64) -> bool {
        height >= self.genesis_activation_height
    }

    /// Maximum script size in force, or `None` when unbounded after genesis.
    pub fn max_script_size(&self, genesis_enabled: bool) -> Option<usize> {
        if genesis_enabled {
            None
        } else {
            Some(self.max_script_size_before_genesis)
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    //! Tests for network presets and config deserialization.

    use super::*;

    // -----------------------------------------------------------------------
    // Presets
    // -----------------------------------------------------------------------

    /// Genesis rules apply from the activation height onwards.
    #[test]
    fn test_genesis_boundary() {
        let config = ScriptConfig::mainnet();
        assert!(!config.is_genesis_enabled(GENESIS_ACTIVATION_MAINNET - 1));
        assert!(config.is_genesis_enabled(GENESIS_ACTIVATION_MAINNET));
        assert!(ScriptConfig::regtest().is_genesis_enabled(10_000));
        assert!(!ScriptConfig::testnet().is_genesis_enabled(1_000_000));
    }

    /// The size limit only exists before genesis.
    #[test]
    fn test_max_script_size() {
        let config = ScriptConfig::default();
        assert_eq!(config.max_script_size(false), Some(10000));
        assert_eq!(config.max_script_size(true), None);
    }

    // -----------------------------------------------------------------------
    // Serde
    // -----------------------------------------------------------------------

    /// Missing fields take the mainnet values.
    #[test]
    fn test_deserialize_partial() {
        let config: ScriptConfig =
            serde_json::from_str(r#"{"genesis_activation_height": 150}"#).expect("valid json");
        assert_eq!(config.genesis_activation_height, 150);
        assert_eq!(config.max_script_size_before_genesis, MAX_SCRIPT_SIZE_BEFORE_GENESIS);
        assert_eq!(
            config.max_pub_keys_per_multisig_before_genesis,
            MAX_PUBKEYS_PER_MULTISIG_BEFORE_GENESIS
        );
    }

    /// Every field survives a JSON roundtrip.
    #[test]
    fn test_serde_roundtrip() {
        let config = ScriptConfig {
            max_script_size_before_genesis: 100,
            ..ScriptConfig::regtest()
        };
        let text = serde_json::to_string(&config).expect("serialize");
        let back: ScriptConfig = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, config);
    }
}
