//! Deployment file: engine parameters plus initial vault holdings

use multisig_approval::{ConfigError, MultisigConfig};
use multisig_core::{Address, AddressError, Amount};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SAMPLE_OWNER: &str = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";
const SAMPLE_SIGNERS: [&str; 5] = [
    "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4",
    "0xAb8483F64d9C6d1EcF9b849Ae677dD3315835cb2",
    "0x4B20993Bc481177ec7E8f571ceCaE8A9e22C02db",
    "0x4B20993Bc481177ec7E8f571ceCaE8A9e22C02db",
    "0x617F2E2fD72FD9D5503197092aC168c91465E7f2",
];
const SAMPLE_TOKEN: &str = "0x170Bbd5A102B995517B133aa6b9275d103B9a120";

/// Tokens credited to the engine's vault at deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub token: Address,
    pub amount: Amount,
}

/// Everything needed to stand up an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(flatten)]
    pub multisig: MultisigConfig,

    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl DeploymentConfig {
    /// Load a deployment from JSON, applying environment overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut deployment: Self = serde_json::from_str(&content)?;
        deployment.multisig = deployment.multisig.with_env_overrides()?;
        Ok(deployment)
    }

    /// Sample deployment: quorum 2, five listed signers (one repeated),
    /// and 1000 tokens of 18 decimals in the vault.
    pub fn sample() -> Result<Self, AddressError> {
        let owner: Address = SAMPLE_OWNER.parse()?;
        let signers = SAMPLE_SIGNERS
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<Address>, _>>()?;

        Ok(Self {
            multisig: MultisigConfig::new(2, owner, signers),
            holdings: vec![Holding {
                token: SAMPLE_TOKEN.parse()?,
                amount: Amount::from_units(1000, 18),
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_json() {
        let json = r#"{
            "owner": "0x0000000000000000000000000000000000000001",
            "signers": ["0x0000000000000000000000000000000000000002"],
            "holdings": [
                { "token": "0x00000000000000000000000000000000000000ee", "amount": "1000" }
            ]
        }"#;
        let deployment: DeploymentConfig = serde_json::from_str(json).unwrap();

        assert_eq!(deployment.multisig.quorum, 2);
        assert_eq!(deployment.multisig.signers.len(), 1);
        assert_eq!(deployment.holdings[0].amount, Amount::new(1000));
    }

    #[test]
    fn test_sample_round_trips() {
        let sample = DeploymentConfig::sample().unwrap();
        let json = serde_json::to_string_pretty(&sample).unwrap();
        assert!(json.contains("0x5b38da6a701c568545dcfcb03fcb875f56beddc4"));

        let parsed: DeploymentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample);
    }
}
