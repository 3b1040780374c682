//! Script for deploying the BlockWeave `Project` contract from its compiled artifact.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod client;
pub mod constants;
pub mod deployer;
pub mod deployments;
pub mod errors;
pub mod output;
pub mod types;
