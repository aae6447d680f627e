//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error resolving the network configuration from the environment
    NetworkConfiguration(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error reading the deployments record
    ReadDeployments(String),
    /// Error writing the deployments record
    WriteDeployments(String),
    /// Error parsing a compilation artifact
    ArtifactParsing(String),
    /// Error linking a library address into creation bytecode
    LibraryLinking(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error decoding an event from a transaction receipt
    EventDecoding(String),
    /// Error verifying a contract's source against the block explorer
    ContractVerification(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::NetworkConfiguration(s) => {
                write!(f, "error resolving network configuration: {}", s)
            }
            ScriptError::ClientInitialization(s) => {
                write!(f, "error initializing client: {}", s)
            }
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::LibraryLinking(s) => write!(f, "error linking library: {}", s),
            ScriptError::CalldataConstruction(s) => {
                write!(f, "error constructing calldata: {}", s)
            }
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::EventDecoding(s) => write!(f, "error decoding event: {}", s),
            ScriptError::ContractVerification(s) => {
                write!(f, "error verifying contract: {}", s)
            }
        }
    }
}

impl Error for ScriptError {}
