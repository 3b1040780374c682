//! The deployment call chain: load the factory, send the deployment, wait for it

use tokio::time::timeout;
use tracing::info;

use crate::{
    artifacts::Artifacts,
    client::DeployClient,
    errors::DeployError,
    types::{DeployConfig, DeploymentResult},
};

/// Deploys a single compiled contract through a [`DeployClient`]
pub struct Deployer<C> {
    /// The client deployments are sent through
    client: C,
    /// Where the contract artifact is read from
    artifacts: Artifacts,
    /// The deployment parameters
    config: DeployConfig,
}

impl<C: DeployClient> Deployer<C> {
    /// Create a deployer
    pub fn new(client: C, artifacts: Artifacts, config: DeployConfig) -> Self {
        Self { client, artifacts, config }
    }

    /// Deploy the configured contract and wait for the deployment to be confirmed.
    ///
    /// The artifact is resolved before anything is sent, so a missing or
    /// undeployable artifact never reaches the network.
    pub async fn deploy(&self) -> Result<DeploymentResult, DeployError> {
        let factory = self.artifacts.get_contract_factory(&self.config.contract)?;
        let code = factory.deploy_code()?;
        info!(
            contract = %factory.fully_qualified_name(),
            code_size = code.len(),
            "deploying contract"
        );

        let tx_hash = self.client.send_deployment(code).await?;
        info!(%tx_hash, "deployment transaction sent");

        let confirmation = self.client.wait_for_deployment(tx_hash, self.config.confirmations);
        let address = timeout(self.config.confirmation_timeout, confirmation)
            .await
            .map_err(|_| {
                DeployError::ConfirmationTimeout(format!(
                    "transaction {} not confirmed after {}s",
                    tx_hash,
                    self.config.confirmation_timeout.as_secs()
                ))
            })??;
        info!(%address, confirmations = self.config.confirmations, "deployment confirmed");

        Ok(DeploymentResult {
            contract_name: factory.contract_name().to_string(),
            address,
            tx_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        str::FromStr,
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use alloy::primitives::{keccak256, Address, Bytes, TxHash};

    use super::Deployer;
    use crate::{
        artifacts::{
            tests::{project_artifacts, TEST_BYTECODE},
            Artifacts,
        },
        client::DeployClient,
        constants::{FAILURE_EXIT_CODE, SUCCESS_EXIT_CODE, SUCCESS_PREFIX},
        errors::DeployError,
        output::write_report,
        types::DeployConfig,
    };

    /// The address the mock network deploys to
    const MOCK_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    /// How the mock network responds to a deployment
    enum MockBehavior {
        /// Confirm the deployment at the given address
        Confirm(Address),
        /// Reject the transaction when it is sent
        Reject(String),
        /// Include the transaction, but revert it
        Revert,
        /// Accept the transaction and never confirm it
        NeverConfirm,
    }

    /// A network that records what it was asked to do
    struct MockClient {
        behavior: MockBehavior,
        sent: AtomicUsize,
        waited: AtomicUsize,
    }

    impl MockClient {
        fn new(behavior: MockBehavior) -> Self {
            Self { behavior, sent: AtomicUsize::new(0), waited: AtomicUsize::new(0) }
        }

        fn confirming() -> Self {
            Self::new(MockBehavior::Confirm(Address::from_str(MOCK_ADDRESS).unwrap()))
        }
    }

    impl DeployClient for &MockClient {
        async fn send_deployment(&self, code: Bytes) -> Result<TxHash, DeployError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                MockBehavior::Reject(reason) => Err(DeployError::Deployment(reason.clone())),
                _ => Ok(keccak256(&code)),
            }
        }

        async fn wait_for_deployment(
            &self,
            tx_hash: TxHash,
            _confirmations: u64,
        ) -> Result<Address, DeployError> {
            self.waited.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                MockBehavior::Confirm(address) => Ok(*address),
                MockBehavior::Revert => {
                    Err(DeployError::Deployment(format!("transaction {} reverted", tx_hash)))
                }
                MockBehavior::NeverConfirm => std::future::pending().await,
                MockBehavior::Reject(_) => panic!("waited on a rejected transaction"),
            }
        }
    }

    /// Run a deployment and report it, returning the exit code, stdout and stderr
    async fn run_and_report<C: DeployClient>(deployer: &Deployer<C>) -> (u8, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = write_report(deployer.deploy().await, &mut stdout, &mut stderr);

        (code, String::from_utf8(stdout).unwrap(), String::from_utf8(stderr).unwrap())
    }

    #[tokio::test]
    async fn test_deploy_success() {
        let artifacts = project_artifacts();
        let client = MockClient::confirming();
        let deployer =
            Deployer::new(&client, Artifacts::new(artifacts.path()), DeployConfig::default());

        let result = deployer.deploy().await.unwrap();
        assert_eq!(result.contract_name, "Project");
        assert_eq!(result.address, Address::from_str(MOCK_ADDRESS).unwrap());
        assert_eq!(result.tx_hash, keccak256(Bytes::from_str(TEST_BYTECODE).unwrap()));
        assert_eq!(client.sent.load(Ordering::SeqCst), 1);
        assert_eq!(client.waited.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_deploy_qualified_name() {
        let artifacts = project_artifacts();
        let client = MockClient::confirming();
        let config = DeployConfig {
            contract: "Project.sol:Project".to_string(),
            ..Default::default()
        };
        let deployer = Deployer::new(&client, Artifacts::new(artifacts.path()), config);

        let result = deployer.deploy().await.unwrap();
        assert_eq!(result.contract_name, "Project");
    }

    #[tokio::test]
    async fn test_deploy_success_report() {
        let artifacts = project_artifacts();
        let client = MockClient::confirming();
        let deployer =
            Deployer::new(&client, Artifacts::new(artifacts.path()), DeployConfig::default());

        let (code, stdout, stderr) = run_and_report(&deployer).await;
        assert_eq!(code, SUCCESS_EXIT_CODE);
        assert!(stderr.is_empty());

        let line = stdout.strip_suffix('\n').unwrap();
        let address = line.strip_prefix(SUCCESS_PREFIX).unwrap().trim_start();
        assert!(Address::parse_checksummed(address, None).is_ok());
    }

    #[tokio::test]
    async fn test_missing_artifact_sends_nothing() {
        let artifacts = tempfile::tempdir().unwrap();
        let client = MockClient::confirming();
        let deployer =
            Deployer::new(&client, Artifacts::new(artifacts.path()), DeployConfig::default());

        let (code, stdout, stderr) = run_and_report(&deployer).await;
        assert_eq!(code, FAILURE_EXIT_CODE);
        assert!(stdout.is_empty());
        assert!(stderr.starts_with("❌ Deployment failed:"));
        assert!(stderr.contains("artifact not found"));
        assert_eq!(client.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_transaction() {
        let artifacts = project_artifacts();
        let reason = "insufficient funds for gas * price + value";
        let client = MockClient::new(MockBehavior::Reject(reason.to_string()));
        let deployer =
            Deployer::new(&client, Artifacts::new(artifacts.path()), DeployConfig::default());

        let (code, stdout, stderr) = run_and_report(&deployer).await;
        assert_eq!(code, FAILURE_EXIT_CODE);
        assert!(stdout.is_empty());
        assert!(stderr.contains(reason));
        assert_eq!(client.waited.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reverted_transaction() {
        let artifacts = project_artifacts();
        let client = MockClient::new(MockBehavior::Revert);
        let deployer =
            Deployer::new(&client, Artifacts::new(artifacts.path()), DeployConfig::default());

        let err = deployer.deploy().await.unwrap_err();
        assert!(matches!(err, DeployError::Deployment(ref msg) if msg.contains("reverted")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_timeout() {
        let artifacts = project_artifacts();
        let client = MockClient::new(MockBehavior::NeverConfirm);
        let config =
            DeployConfig { confirmation_timeout: Duration::from_secs(30), ..Default::default() };
        let deployer = Deployer::new(&client, Artifacts::new(artifacts.path()), config);

        let err = deployer.deploy().await.unwrap_err();
        assert!(matches!(err, DeployError::ConfirmationTimeout(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmation_timeout_report() {
        let artifacts = project_artifacts();
        let client = MockClient::new(MockBehavior::NeverConfirm);
        let deployer =
            Deployer::new(&client, Artifacts::new(artifacts.path()), DeployConfig::default());

        let (code, stdout, stderr) = run_and_report(&deployer).await;
        assert_eq!(code, FAILURE_EXIT_CODE);
        assert!(stdout.is_empty());
        assert!(stderr.contains("timed out waiting for confirmation"));
    }
}
