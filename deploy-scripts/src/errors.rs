//! Definitions of errors that can occur while deploying a contract

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur while deploying a contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployError {
    /// No compiled artifact exists for the requested contract
    ArtifactNotFound(String),
    /// More than one compiled artifact matches the requested contract name
    AmbiguousArtifact(String),
    /// Error parsing a compilation artifact, or the artifact is not deployable
    ArtifactParsing(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// The deployment transaction was rejected, reverted, or could not be sent
    Deployment(String),
    /// The deployment transaction was not confirmed in time
    ConfirmationTimeout(String),
    /// Error reading the deployments file
    ReadDeployments(String),
    /// Error writing the deployments file
    WriteDeployments(String),
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::ArtifactNotFound(s) => write!(f, "artifact not found: {}", s),
            DeployError::AmbiguousArtifact(s) => write!(f, "ambiguous artifact: {}", s),
            DeployError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            DeployError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            DeployError::Deployment(s) => write!(f, "error deploying contract: {}", s),
            DeployError::ConfirmationTimeout(s) => {
                write!(f, "timed out waiting for confirmation: {}", s)
            }
            DeployError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            DeployError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
        }
    }
}

impl Error for DeployError {}
