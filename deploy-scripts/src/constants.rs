//! Constants used in the deploy script

/// The name of the contract deployed when none is given
pub const DEFAULT_CONTRACT_NAME: &str = "Project";

/// The directory searched for compiled artifacts when none is given
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The RPC URL of a local development node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The private key of the first default account in a local development node
pub const DEFAULT_PKEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The number of seconds to wait for the deployment transaction to be confirmed
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 300;

/// The key under which contract addresses are stored in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The extension of a compiled artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The suffix of the debug files emitted next to compiled artifacts
pub const DEBUG_ARTIFACT_SUFFIX: &str = ".dbg.json";

/// The extension of a Solidity source file, which names the directory
/// holding the artifacts compiled from it
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The separator between the source name and the contract name in a
/// fully qualified contract name
pub const FQN_SEPARATOR: char = ':';

/// The marker of an unlinked library placeholder in creation bytecode
pub const LIBRARY_PLACEHOLDER_MARKER: &str = "__";

/// The line printed before the address of a successful deployment
pub const SUCCESS_PREFIX: &str = "✅ BlockWeave contract deployed to:";

/// The line printed before the error of a failed deployment
pub const FAILURE_PREFIX: &str = "❌ Deployment failed:";

/// The process exit code for a successful deployment
pub const SUCCESS_EXIT_CODE: u8 = 0;

/// The process exit code for a failed deployment
pub const FAILURE_EXIT_CODE: u8 = 1;
