use std::collections::HashMap;
use std::path::Path;

use ethers::types::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ANY_NETWORK;

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("{contract} has no recorded deployments")]
    NotDeployed { contract: String },
    #[error("{contract} has no deployment for network {network_id} (known: {known})")]
    UnknownNetwork {
        contract: String,
        network_id: String,
        known: String,
    },
    #[error("{contract} is deployed on multiple networks ({known}); set NETWORK_ID to pick one")]
    AmbiguousNetwork { contract: String, known: String },
    #[error("Invalid deployed address {address} for network {network_id}")]
    InvalidAddress {
        address: String,
        network_id: String,
    },
}

/// Truffle build artifact, reduced to the fields deployment lookup needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    #[serde(default)]
    pub networks: HashMap<String, NetworkDeployment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployment {
    pub address: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

impl ContractArtifact {
    /// Load an artifact from a Truffle `build/contracts/*.json` file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ArtifactError::Read {
                path: path.display().to_string(),
                source,
            })?;
        serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Resolve the deployed address the way `Contract.deployed()` does.
    /// A pinned `selector` must match a recorded deployment exactly. The
    /// `*` selector prefers the node's reported network id and falls back
    /// to a sole recorded deployment (Ganache restarts hand out fresh
    /// network ids while the artifact keeps the id it was deployed under).
    pub fn deployed_address(
        &self,
        selector: &str,
        net_version: &str,
    ) -> Result<Address, ArtifactError> {
        if self.networks.is_empty() {
            return Err(ArtifactError::NotDeployed {
                contract: self.contract_name.clone(),
            });
        }

        let entry = if selector == ANY_NETWORK {
            let sole = if self.networks.len() == 1 {
                self.networks.iter().next()
            } else {
                None
            };
            self.networks.get_key_value(net_version).or(sole)
        } else {
            self.networks.get_key_value(selector)
        };
        let (id, deployment) = match entry {
            Some(entry) => entry,
            None if selector == ANY_NETWORK => {
                return Err(ArtifactError::AmbiguousNetwork {
                    contract: self.contract_name.clone(),
                    known: self.known_networks(),
                })
            }
            None => {
                return Err(ArtifactError::UnknownNetwork {
                    contract: self.contract_name.clone(),
                    network_id: selector.to_string(),
                    known: self.known_networks(),
                })
            }
        };

        deployment
            .address
            .parse::<Address>()
            .map_err(|_| ArtifactError::InvalidAddress {
                address: deployment.address.clone(),
                network_id: id.clone(),
            })
    }

    fn known_networks(&self) -> String {
        let mut ids: Vec<&str> = self.networks.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR_A: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    const ADDR_B: &str = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512";

    fn artifact(networks: &[(&str, &str)]) -> ContractArtifact {
        ContractArtifact {
            contract_name: "ImageStore".to_string(),
            networks: networks
                .iter()
                .map(|(id, addr)| {
                    (
                        id.to_string(),
                        NetworkDeployment {
                            address: addr.to_string(),
                            transaction_hash: None,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_parse_truffle_artifact() {
        let json = r#"{
            "contractName": "ImageStore",
            "abi": [],
            "bytecode": "0x6080",
            "networks": {
                "5777": {
                    "address": "0x5FbDB2315678afecb367f032d93F642f64180aa3",
                    "transactionHash": "0xabc"
                }
            }
        }"#;
        let artifact: ContractArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.contract_name, "ImageStore");
        assert_eq!(artifact.networks.len(), 1);
        assert_eq!(
            artifact.networks["5777"].transaction_hash.as_deref(),
            Some("0xabc")
        );
    }

    #[test]
    fn test_pinned_network_match() {
        let artifact = artifact(&[("5777", ADDR_A), ("1337", ADDR_B)]);
        let addr = artifact.deployed_address("1337", "5777").unwrap();
        assert_eq!(addr, ADDR_B.parse::<Address>().unwrap());
    }

    #[test]
    fn test_pinned_unknown_network_does_not_fall_back() {
        // An explicit NETWORK_ID must match exactly, even when the artifact
        // records a single deployment elsewhere.
        let artifact = artifact(&[("5777", ADDR_A)]);
        let err = artifact.deployed_address("1337", "5777").unwrap_err();
        assert!(matches!(err, ArtifactError::UnknownNetwork { .. }));
    }

    #[test]
    fn test_wildcard_prefers_node_network() {
        let artifact = artifact(&[("5777", ADDR_A), ("1337", ADDR_B)]);
        let addr = artifact.deployed_address(ANY_NETWORK, "1337").unwrap();
        assert_eq!(addr, ADDR_B.parse::<Address>().unwrap());
    }

    #[test]
    fn test_wildcard_falls_back_to_sole_deployment() {
        // Ganache restarts hand out fresh network ids while the artifact
        // keeps the id it was deployed under.
        let artifact = artifact(&[("5777", ADDR_A)]);
        let addr = artifact.deployed_address(ANY_NETWORK, "5778").unwrap();
        assert_eq!(addr, ADDR_A.parse::<Address>().unwrap());
    }

    #[test]
    fn test_wildcard_ambiguous() {
        let artifact = artifact(&[("5777", ADDR_A), ("1337", ADDR_B)]);
        let err = artifact.deployed_address(ANY_NETWORK, "42").unwrap_err();
        match err {
            ArtifactError::AmbiguousNetwork { known, .. } => assert_eq!(known, "1337, 5777"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pinned_unknown_network_among_many() {
        let artifact = artifact(&[("5777", ADDR_A), ("1337", ADDR_B)]);
        let err = artifact.deployed_address("42", "5777").unwrap_err();
        match err {
            ArtifactError::UnknownNetwork { known, .. } => assert_eq!(known, "1337, 5777"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_deployments() {
        let artifact = artifact(&[]);
        let err = artifact.deployed_address("5777", "5777").unwrap_err();
        assert!(matches!(err, ArtifactError::NotDeployed { .. }));
    }

    #[test]
    fn test_invalid_address() {
        let artifact = artifact(&[("5777", "not-an-address")]);
        let err = artifact.deployed_address("5777", "5777").unwrap_err();
        assert!(matches!(err, ArtifactError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = ContractArtifact::load("build/contracts/DoesNotExist.json")
            .await
            .unwrap_err();
        assert!(matches!(err, ArtifactError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_malformed_json() {
        let path = std::env::temp_dir().join("image-on-chain-bad-artifact.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = ContractArtifact::load(&path).await.unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));

        tokio::fs::remove_file(&path).await.unwrap();
    }
}
