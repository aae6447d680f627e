//! Etherscan source verification for deployed contracts

use ethers::{
    abi::Token,
    etherscan::{verify::VerifyContract, Client},
    types::Address,
};
use tracing::info;

use crate::{
    deployer::Artifact, errors::ScriptError, network::Network, types::LineContract,
};

/// The explorer responses meaning the contract's source was submitted by an
/// earlier run
const ALREADY_VERIFIED_RESPONSES: [&str; 2] =
    ["Contract source code already verified", "Already Verified"];

/// Whether an explorer response or error message means the contract is
/// already verified, which reruns treat as success
pub fn is_already_verified(message: &str) -> bool {
    ALREADY_VERIFIED_RESPONSES
        .iter()
        .any(|phrase| message.contains(phrase))
}

/// Build the explorer client for the given network
pub fn etherscan_client(network: Network, api_key: &str) -> Result<Client, ScriptError> {
    Client::new(network.chain(), api_key)
        .map_err(|e| ScriptError::ContractVerification(e.to_string()))
}

/// Submit a deployed contract's source for verification.
///
/// The artifact must carry its flattened source and compiler version;
/// constructor arguments are ABI-encoded into the submission. An
/// already-verified contract is success, any other explorer failure
/// propagates.
pub async fn verify_contract(
    client: &Client,
    contract: LineContract,
    address: Address,
    artifact: &Artifact,
    constructor_args: &[Token],
) -> Result<(), ScriptError> {
    info!("verifying {contract} at {address:#x}");

    let source = artifact.source.clone().ok_or_else(|| {
        ScriptError::ContractVerification(format!("artifact for {contract} carries no source"))
    })?;
    let compiler_version = artifact.compiler_version.clone().ok_or_else(|| {
        ScriptError::ContractVerification(format!(
            "artifact for {contract} carries no compiler version"
        ))
    })?;

    let encoded_args = (!constructor_args.is_empty())
        .then(|| hex::encode(ethers::abi::encode(constructor_args)));

    let request = VerifyContract::new(
        address,
        artifact.contract_name.clone(),
        source,
        compiler_version,
    )
    .constructor_arguments(encoded_args);

    match client.submit_contract_verification(&request).await {
        Ok(resp) if is_already_verified(&resp.result) => {
            info!("{contract} already verified, skipping");
            Ok(())
        }
        Ok(_) => {
            info!("successfully submitted {contract} for verification");
            Ok(())
        }
        Err(err) if is_already_verified(&err.to_string()) => {
            info!("{contract} already verified, skipping");
            Ok(())
        }
        Err(err) => Err(ScriptError::ContractVerification(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Both explorer phrasings for a repeat submission count as success
    #[test]
    fn already_verified_phrasings_are_accepted() {
        assert!(is_already_verified("Contract source code already verified"));
        assert!(is_already_verified("Smart-contract already verified. Already Verified"));
        assert!(is_already_verified(
            "error: Contract source code already verified (exact match)"
        ));
    }

    /// Any other explorer failure propagates
    #[test]
    fn other_responses_are_rejected() {
        assert!(!is_already_verified("Invalid API Key"));
        assert!(!is_already_verified("Unable to locate ContractCode"));
        assert!(!is_already_verified("already verified")); // explorer casing only
    }
}
