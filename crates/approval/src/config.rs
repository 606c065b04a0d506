//! Construction parameters for the approval engine
//!
//! Loaded from a JSON deployment file. Missing fields fall back to
//! serde defaults; the owner can be overridden from the environment.

use multisig_core::{Address, AddressError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable overriding the owner address
pub const OWNER_ENV: &str = "MULTISIG_OWNER";

/// Errors while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid MULTISIG_OWNER: {0}")]
    InvalidOwner(#[from] AddressError),
}

/// Engine construction parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigConfig {
    /// Approvals required to complete a transaction
    #[serde(default = "default_quorum")]
    pub quorum: u32,

    /// Deployer; always a signer
    pub owner: Address,

    /// Additional signers (duplicates and the owner are merged)
    #[serde(default)]
    pub signers: Vec<Address>,
}

fn default_quorum() -> u32 {
    2
}

impl MultisigConfig {
    pub fn new(quorum: u32, owner: Address, signers: Vec<Address>) -> Self {
        Self {
            quorum,
            owner,
            signers,
        }
    }

    /// Load configuration from JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.with_env_overrides()
    }

    /// Apply `MULTISIG_OWNER` if it is set
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(owner) = std::env::var(OWNER_ENV) {
            self.owner = owner.parse()?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "owner": "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4" }"#;
        let config: MultisigConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.quorum, 2);
        assert!(config.signers.is_empty());
        assert_eq!(
            config.owner.to_string(),
            "0x5b38da6a701c568545dcfcb03fcb875f56beddc4"
        );
    }

    #[test]
    fn test_missing_owner_rejected() {
        let json = r#"{ "quorum": 2 }"#;
        assert!(serde_json::from_str::<MultisigConfig>(json).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "quorum": 3,
                "owner": "0x0000000000000000000000000000000000000001",
                "signers": [
                    "0x0000000000000000000000000000000000000002",
                    "0x0000000000000000000000000000000000000003"
                ]
            }}"#
        )
        .unwrap();

        let config = MultisigConfig::from_file(file.path()).unwrap();
        assert_eq!(config.quorum, 3);
        assert_eq!(config.signers.len(), 2);
    }

    #[test]
    fn test_bad_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            MultisigConfig::from_file(file.path()),
            Err(ConfigError::Parse(_))
        ));

        let missing = Path::new("/definitely/not/here.json");
        assert!(matches!(
            MultisigConfig::from_file(missing),
            Err(ConfigError::Io(_))
        ));
    }
}
