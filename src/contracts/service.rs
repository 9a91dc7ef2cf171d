use std::sync::Arc;

use ethers::prelude::*;
use thiserror::Error;

use super::artifact::{ArtifactError, ContractArtifact};
use crate::config::Config;

// Interface consumed from the deployed contract. The full ABI lives in the
// Truffle artifact; only these two methods are invoked here.
abigen!(
    ImageStore,
    r#"[
        function storeImage(string imageData) external
        function retrieveImage(address user) external view returns (string)
    ]"#
);

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid RPC endpoint {url}: {reason}")]
    Endpoint { url: String, reason: String },
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Node at {url} exposes no accounts")]
    NoAccounts { url: String },
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("Contract call failed: {0}")]
    Contract(#[from] ContractError<Provider<Http>>),
    #[error("Transaction {tx_hash} was dropped before a receipt was produced")]
    TransactionDropped { tx_hash: TxHash },
}

/// Handle to the deployed ImageStore instance, bound to the first account
/// the node exposes. Ganache keeps its accounts unlocked, so transactions
/// are signed node-side via `eth_sendTransaction`.
pub struct ImageStoreService {
    instance: ImageStore<Provider<Http>>,
    account: Address,
}

impl ImageStoreService {
    /// Connect to the development chain and resolve the deployed instance
    pub async fn connect(config: &Config) -> Result<Self, ServiceError> {
        let url = config.rpc_url();
        let provider = Provider::<Http>::try_from(url.as_str()).map_err(|e| {
            ServiceError::Endpoint {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;
        let provider = Arc::new(provider);

        let accounts = provider.get_accounts().await?;
        let account = *accounts
            .first()
            .ok_or_else(|| ServiceError::NoAccounts { url: url.clone() })?;

        let net_version = provider.get_net_version().await?;
        let artifact = ContractArtifact::load(&config.artifact_path).await?;
        let address = artifact.deployed_address(&config.chain.network_id, &net_version)?;

        tracing::debug!(
            contract = %artifact.contract_name,
            address = ?address,
            network_id = %net_version,
            account = ?account,
            "Resolved deployed contract instance"
        );

        let instance = ImageStore::new(address, provider);
        Ok(Self { instance, account })
    }

    /// The account authorizing calls and transactions (`accounts[0]`)
    pub fn account(&self) -> Address {
        self.account
    }

    /// Submit the image text in a transaction and wait for its receipt
    pub async fn store_image(&self, image_data: String) -> Result<TxHash, ServiceError> {
        let call = self.instance.store_image(image_data).from(self.account);
        let pending = call.send().await?;
        // PendingTransaction derefs to the tx hash
        let tx_hash = *pending;
        let receipt = pending
            .await?
            .ok_or(ServiceError::TransactionDropped { tx_hash })?;

        Ok(receipt.transaction_hash)
    }

    /// Read back the stored image text for the bound account
    pub async fn retrieve_image(&self) -> Result<String, ServiceError> {
        let image = self
            .instance
            .retrieve_image(self.account)
            .from(self.account)
            .call()
            .await?;
        Ok(image)
    }
}
