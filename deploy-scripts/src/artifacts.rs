//! Lookup and parsing of compiled contract artifacts
//!
//! Artifacts are the JSON files a Solidity build step writes next to each other
//! in a tree of `<Source>.sol/<Contract>.json` entries, e.g.
//! `artifacts/contracts/Project.sol/Project.json` or `out/Project.sol/Project.json`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    json_abi::JsonAbi,
    primitives::{hex, Bytes},
};
use itertools::Itertools;
use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    constants::{
        ARTIFACT_EXTENSION, DEBUG_ARTIFACT_SUFFIX, FQN_SEPARATOR, LIBRARY_PLACEHOLDER_MARKER,
        SOLIDITY_EXTENSION,
    },
    errors::DeployError,
};

// -------------
// | Raw Types |
// -------------

/// An artifact file as written by the build step
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    /// Only present in the Hardhat layout
    contract_name: Option<String>,
    /// Only present in the Hardhat layout
    source_name: Option<String>,
    /// The contract ABI
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: RawBytecode,
}

/// Creation bytecode, either a bare hex string or an object wrapping one
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// The Hardhat layout
    Hex(String),
    /// The Foundry layout
    Object {
        /// The hex encoded bytecode
        object: String,
    },
}

impl RawBytecode {
    /// The hex encoded bytecode
    fn as_hex(&self) -> &str {
        match self {
            RawBytecode::Hex(s) => s,
            RawBytecode::Object { object } => object,
        }
    }
}

/// A contract name as requested by the caller, optionally qualified by the
/// source file it was compiled from (`contracts/Project.sol:Project`)
struct RequestedName<'a> {
    /// The trailing components of the source path, if qualified
    source: Option<&'a str>,
    /// The contract name
    contract: &'a str,
}

impl<'a> RequestedName<'a> {
    /// Split a name on the last `:`
    fn parse(name: &'a str) -> Self {
        match name.rsplit_once(FQN_SEPARATOR) {
            Some((source, contract)) => Self { source: Some(source), contract },
            None => Self { source: None, contract: name },
        }
    }

    /// Whether the candidate has this contract name and, if qualified, a source
    /// path ending with the requested source path.
    ///
    /// Paths are compared by whole components, so `legacy/Project.sol` does not
    /// match `notlegacy/Project.sol`.
    fn matches(&self, candidate: &ArtifactPath) -> bool {
        if candidate.contract_name != self.contract {
            return false;
        }

        match self.source {
            Some(source) => {
                let requested = source.split('/').collect_vec();
                let candidate = candidate.source_name.split('/').collect_vec();
                candidate.ends_with(&requested)
            }
            None => true,
        }
    }
}

/// An artifact file found on disk, named by its location in the tree
struct ArtifactPath {
    /// The source path relative to the artifacts root, e.g. `contracts/Project.sol`
    source_name: String,
    /// The contract name, taken from the file name
    contract_name: String,
    /// The path of the artifact file
    path: PathBuf,
}

impl ArtifactPath {
    /// The `source.sol:Name` form of the contract name
    fn fully_qualified_name(&self) -> String {
        format!("{}{}{}", self.source_name, FQN_SEPARATOR, self.contract_name)
    }
}

// -------------
// | Artifacts |
// -------------

/// A directory of compiled artifacts
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// The directory searched for artifacts
    root: PathBuf,
}

impl Artifacts {
    /// Create a handle to the artifacts under the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get a factory for the contract with the given name.
    ///
    /// The name may be a bare contract name, in which case it must be unique
    /// across the artifacts tree, or a fully qualified `source.sol:Name`.
    pub fn get_contract_factory(&self, name: &str) -> Result<ContractFactory, DeployError> {
        let artifact = self.find_artifact(name)?;
        debug!(
            contract = %artifact.fully_qualified_name(),
            path = %artifact.path.display(),
            "found contract artifact"
        );

        let contents = fs::read_to_string(&artifact.path).map_err(|e| {
            DeployError::ArtifactParsing(format!("{}: {}", artifact.path.display(), e))
        })?;

        ContractFactory::parse(&contents, &artifact)
    }

    /// Find the single artifact file matching the requested name
    fn find_artifact(&self, name: &str) -> Result<ArtifactPath, DeployError> {
        let requested = RequestedName::parse(name);
        let mut matches = self.artifact_paths().filter(|a| requested.matches(a)).collect_vec();

        match matches.len() {
            0 => Err(DeployError::ArtifactNotFound(format!(
                "no artifact for contract {} in {}",
                name,
                self.root.display()
            ))),
            1 => Ok(matches.remove(0)),
            _ => Err(DeployError::AmbiguousArtifact(format!(
                "multiple artifacts for contract {}, use one of: {}",
                name,
                matches.iter().map(ArtifactPath::fully_qualified_name).sorted().join(", ")
            ))),
        }
    }

    /// All artifact files under the root, skipping unreadable entries
    fn artifact_paths(&self) -> impl Iterator<Item = ArtifactPath> + '_ {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.artifact_path(entry.path()))
    }

    /// Interpret a file as an artifact, if it sits where an artifact would
    fn artifact_path(&self, path: &Path) -> Option<ArtifactPath> {
        let file_name = path.file_name()?.to_str()?;
        if file_name.ends_with(DEBUG_ARTIFACT_SUFFIX) {
            return None;
        }

        let contract_name = file_name.strip_suffix(ARTIFACT_EXTENSION)?.strip_suffix('.')?;
        let source_dir = path.parent()?;
        if source_dir.extension()? != SOLIDITY_EXTENSION {
            return None;
        }

        let source_name = source_dir
            .strip_prefix(&self.root)
            .ok()?
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .join("/");

        Some(ArtifactPath {
            source_name,
            contract_name: contract_name.to_string(),
            path: path.to_path_buf(),
        })
    }
}

// -----------
// | Factory |
// -----------

/// A compiled contract that new instances can be deployed from
#[derive(Debug, Clone)]
pub struct ContractFactory {
    /// The name of the contract
    contract_name: String,
    /// The source file the contract was compiled from
    source_name: String,
    /// The contract ABI, consulted for the constructor signature
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: Bytes,
}

impl ContractFactory {
    /// Parse the contents of an artifact file
    fn parse(contents: &str, artifact: &ArtifactPath) -> Result<Self, DeployError> {
        let raw: RawArtifact = serde_json::from_str(contents).map_err(|e| {
            DeployError::ArtifactParsing(format!("{}: {}", artifact.path.display(), e))
        })?;

        let contract_name = raw.contract_name.unwrap_or_else(|| artifact.contract_name.clone());
        let source_name = raw.source_name.unwrap_or_else(|| artifact.source_name.clone());
        let bytecode = decode_bytecode(&contract_name, raw.bytecode.as_hex())?;

        Ok(Self { contract_name, source_name, abi: raw.abi, bytecode })
    }

    /// The name of the contract
    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    /// The `source.sol:Name` form of the contract name
    pub fn fully_qualified_name(&self) -> String {
        format!("{}{}{}", self.source_name, FQN_SEPARATOR, self.contract_name)
    }

    /// Build the calldata of a deployment transaction taking no constructor
    /// arguments.
    ///
    /// Fails if the contract's constructor expects arguments.
    pub fn deploy_code(&self) -> Result<Bytes, DeployError> {
        let num_inputs = self.abi.constructor.as_ref().map_or(0, |c| c.inputs.len());
        if num_inputs != 0 {
            return Err(DeployError::Deployment(format!(
                "contract {} expects {} constructor argument(s), none were given",
                self.contract_name, num_inputs
            )));
        }

        Ok(self.bytecode.clone())
    }
}

/// Decode creation bytecode, rejecting code that cannot be deployed as-is
fn decode_bytecode(contract_name: &str, bytecode: &str) -> Result<Bytes, DeployError> {
    if bytecode.contains(LIBRARY_PLACEHOLDER_MARKER) {
        return Err(DeployError::ArtifactParsing(format!(
            "contract {} has unlinked library references",
            contract_name
        )));
    }

    let bytes = hex::decode(bytecode).map_err(|e| {
        DeployError::ArtifactParsing(format!("invalid bytecode for {}: {}", contract_name, e))
    })?;
    if bytes.is_empty() {
        return Err(DeployError::ArtifactParsing(format!(
            "contract {} is abstract and can't be deployed",
            contract_name
        )));
    }

    Ok(bytes.into())
}
