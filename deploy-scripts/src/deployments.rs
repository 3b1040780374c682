//! Recording deployed addresses in a `deployments.json` file
//!
//! The file maps contract names to addresses under a top-level `deployments` key;
//! any other content is preserved.

use std::{fs, path::Path};

use alloy::primitives::Address;
use serde_json::{json, Map, Value};

use crate::{constants::DEPLOYMENTS_KEY, errors::DeployError, types::DeploymentResult};

/// Read the deployments file, or an empty object if it does not exist yet
fn read_deployments(path: &Path) -> Result<Value, DeployError> {
    if !path.exists() {
        return Ok(json!({}));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| DeployError::ReadDeployments(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| DeployError::ReadDeployments(format!("{}: {}", path.display(), e)))
}

/// Record a deployment in the deployments file under the deployed contract's name
pub fn record_deployment(
    path: &Path,
    deployment: &DeploymentResult,
) -> Result<(), DeployError> {
    write_deployed_address(path, &deployment.contract_name, deployment.address)
}

/// Write the address of a deployed contract to the deployments file,
/// creating the file if needed
fn write_deployed_address(
    path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), DeployError> {
    let mut json = read_deployments(path)?;

    let deployments = json
        .as_object_mut()
        .ok_or_else(|| not_an_object(path, "file root"))?
        .entry(DEPLOYMENTS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| not_an_object(path, DEPLOYMENTS_KEY))?;
    deployments.insert(contract_key.to_string(), Value::String(address.to_checksum(None)));

    let contents = serde_json::to_string_pretty(&json)
        .map_err(|e| DeployError::WriteDeployments(e.to_string()))?;
    fs::write(path, contents)
        .map_err(|e| DeployError::WriteDeployments(format!("{}: {}", path.display(), e)))
}

/// The error for a deployments file whose `what` is not a JSON object
fn not_an_object(path: &Path, what: &str) -> DeployError {
    DeployError::ReadDeployments(format!("{}: {} is not a JSON object", path.display(), what))
}
