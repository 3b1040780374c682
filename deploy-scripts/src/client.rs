//! The network side of a deployment
//!
//! [`DeployClient`] is the seam between the deployer and the chain, and
//! [`RpcDeployClient`] implements it over JSON-RPC. Gas, nonce and chain id are
//! filled in by the provider stack.

use std::{future::Future, str::FromStr};

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, Bytes, TxHash},
    providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::debug;

use crate::errors::DeployError;

/// The provider type used to send deployments
pub type Wallet = DynProvider<Ethereum>;

/// A client able to submit contract deployments and wait on them
pub trait DeployClient {
    /// Submit a contract creation transaction carrying the given code,
    /// returning the transaction hash
    fn send_deployment(
        &self,
        code: Bytes,
    ) -> impl Future<Output = Result<TxHash, DeployError>> + Send;

    /// Wait for a submitted deployment to reach the given number of
    /// confirmations, returning the address of the new contract
    fn wait_for_deployment(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> impl Future<Output = Result<Address, DeployError>> + Send;
}

/// Sets up a signing provider from the RPC url and private key.
///
/// Does not contact the node; connectivity problems surface on the first request.
pub fn setup_client(rpc_url: &str, priv_key: &str) -> Result<Wallet, DeployError> {
    let url = Url::parse(rpc_url)
        .map_err(|e| DeployError::ClientInitialization(format!("invalid rpc url: {}", e)))?;
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| DeployError::ClientInitialization(format!("invalid private key: {}", e)))?;
    debug!(deployer = %signer.address(), %url, "configured deployer");

    let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
    Ok(DynProvider::new(provider))
}

/// A [`DeployClient`] talking to a node over JSON-RPC
#[derive(Clone)]
pub struct RpcDeployClient {
    /// The signing provider
    provider: Wallet,
}

impl RpcDeployClient {
    /// Create a client for the given node, signing with the given key
    pub fn new(rpc_url: &str, priv_key: &str) -> Result<Self, DeployError> {
        Ok(Self { provider: setup_client(rpc_url, priv_key)? })
    }
}

impl DeployClient for RpcDeployClient {
    async fn send_deployment(&self, code: Bytes) -> Result<TxHash, DeployError> {
        let tx = TransactionRequest::default().with_deploy_code(code);
        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| DeployError::Deployment(e.to_string()))?;

        Ok(*pending_tx.tx_hash())
    }

    async fn wait_for_deployment(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
    ) -> Result<Address, DeployError> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await
            .map_err(|e| DeployError::Deployment(e.to_string()))?;

        if !receipt.status() {
            return Err(DeployError::Deployment(format!("transaction {} reverted", tx_hash)));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            DeployError::Deployment(format!("no contract address in receipt of {}", tx_hash))
        })?;

        // The new address must hold runtime code
        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(|e| DeployError::Deployment(e.to_string()))?;
        if code.is_empty() {
            return Err(DeployError::Deployment(format!("no code at deployed address {}", address)));
        }

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::setup_client;
    use crate::{
        constants::{DEFAULT_PKEY, DEFAULT_RPC_URL},
        errors::DeployError,
    };

    #[test]
    fn test_setup_client() {
        assert!(setup_client(DEFAULT_RPC_URL, DEFAULT_PKEY).is_ok());
    }

    #[test]
    fn test_invalid_rpc_url() {
        let err = setup_client("not a url", DEFAULT_PKEY).unwrap_err();
        assert!(matches!(err, DeployError::ClientInitialization(_)));
    }

    #[test]
    fn test_invalid_private_key() {
        let err = setup_client(DEFAULT_RPC_URL, "0x1234").unwrap_err();
        assert!(matches!(err, DeployError::ClientInitialization(_)));
    }
}
