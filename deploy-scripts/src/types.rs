//! Types passed between the stages of a deployment

use std::{
    fmt::{self, Display, Formatter},
    time::Duration,
};

use alloy::primitives::{Address, TxHash};

use crate::constants::{
    DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_CONTRACT_NAME, NUM_DEPLOY_CONFIRMATIONS,
    SUCCESS_PREFIX,
};

/// Parameters of a single deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// The contract to deploy, either a bare or a fully qualified name
    pub contract: String,
    /// The number of confirmations to wait for
    pub confirmations: u64,
    /// How long to wait for those confirmations
    pub confirmation_timeout: Duration,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            contract: DEFAULT_CONTRACT_NAME.to_string(),
            confirmations: NUM_DEPLOY_CONFIRMATIONS,
            confirmation_timeout: Duration::from_secs(DEFAULT_CONFIRMATION_TIMEOUT_SECS),
        }
    }
}

/// The outcome of a successful deployment.
///
/// Displays as the line reported to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    /// The name of the deployed contract
    pub contract_name: String,
    /// The address of the deployed contract
    pub address: Address,
    /// The hash of the deployment transaction
    pub tx_hash: TxHash,
}

impl Display for DeploymentResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", SUCCESS_PREFIX, self.address)
    }
}
