//! Definitions of CLI arguments for the deploy script
//!
//! Every argument has a default or an environment variable, so the script
//! runs with no arguments against a local development node.

use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Parser};
use tracing::{info, Level};

use crate::{
    artifacts::Artifacts,
    client::RpcDeployClient,
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_CONTRACT_NAME,
        DEFAULT_PKEY, DEFAULT_RPC_URL, NUM_DEPLOY_CONFIRMATIONS,
    },
    deployer::Deployer,
    deployments::record_deployment,
    errors::DeployError,
    types::{DeployConfig, DeploymentResult},
};

/// Deploy the BlockWeave contract to an EVM chain
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Private key of the deployer, defaults to the first development node account
    // TODO: Support keystore files instead of raw keys
    #[arg(short, long, env = "PKEY", default_value = DEFAULT_PKEY, hide_default_value = true)]
    pub priv_key: String,

    /// Directory containing the compiled contract artifacts
    #[arg(short, long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Name of the contract to deploy, optionally qualified as `path/To.sol:Name`
    #[arg(short, long, env = "CONTRACT", default_value = DEFAULT_CONTRACT_NAME)]
    pub contract: String,

    /// Number of confirmations to wait for
    #[arg(long, env = "CONFIRMATIONS", default_value_t = NUM_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Seconds to wait for the deployment to be confirmed
    #[arg(long, env = "CONFIRMATION_TIMEOUT", default_value_t = DEFAULT_CONFIRMATION_TIMEOUT_SECS)]
    pub confirmation_timeout: u64,

    /// Path to a `deployments.json` file to record the deployed address in
    #[arg(short, long, env = "DEPLOYMENTS_PATH")]
    pub deployments_path: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The deployment parameters given on the command line
    pub fn deploy_config(&self) -> DeployConfig {
        DeployConfig {
            contract: self.contract.clone(),
            confirmations: self.confirmations,
            confirmation_timeout: Duration::from_secs(self.confirmation_timeout),
        }
    }

    /// The maximum level of logs to emit
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Deploy the contract and record its address if a deployments file was given
    pub async fn run(self) -> Result<DeploymentResult, DeployError> {
        let client = RpcDeployClient::new(&self.rpc_url, &self.priv_key)?;
        let artifacts = Artifacts::new(&self.artifacts_dir);
        let deployer = Deployer::new(client, artifacts, self.deploy_config());

        let deployment = deployer.deploy().await?;

        if let Some(path) = &self.deployments_path {
            record_deployment(path, &deployment)?;
            info!(path = %path.display(), "recorded deployment");
        }

        Ok(deployment)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use clap::{CommandFactory, Parser};
    use tracing::Level;

    use super::Cli;
    use crate::constants::DEFAULT_CONTRACT_NAME;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["deploy"]).unwrap();
        assert_eq!(cli.contract, DEFAULT_CONTRACT_NAME);
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_level(), Level::WARN);
        assert!(cli.deployments_path.is_none());
    }

    #[test]
    fn test_explicit_arguments() {
        let cli = Cli::try_parse_from([
            "deploy",
            "--contract",
            "contracts/Project.sol:Project",
            "--confirmations",
            "3",
            "--confirmation-timeout",
            "60",
            "-vv",
        ])
        .unwrap();

        let config = cli.deploy_config();
        assert_eq!(config.contract, "contracts/Project.sol:Project");
        assert_eq!(config.confirmations, 3);
        assert_eq!(config.confirmation_timeout, Duration::from_secs(60));
        assert_eq!(cli.log_level(), Level::DEBUG);
    }
}
