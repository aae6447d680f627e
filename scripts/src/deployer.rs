//! Contract deployment from compilation artifacts, recorded per network for
//! idempotent reruns.

use std::{collections::BTreeMap, fs, path::PathBuf, sync::Arc};

use ethers::{
    abi::{Abi, Address, Token},
    contract::ContractFactory,
    providers::Middleware,
    types::Bytes,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    constants::{NUM_BYTES_ADDRESS, NUM_DEPLOY_CONFIRMATIONS},
    errors::ScriptError,
    types::{Deployment, LineContract},
    utils::{read_deployed_address, write_deployed_address},
};

/// A single occurrence of a library placeholder in creation bytecode
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct LinkReference {
    /// Byte offset of the placeholder within the unprefixed bytecode
    pub start: usize,
    /// Placeholder length in bytes; always the length of an address
    pub length: usize,
}

/// A contract compilation artifact, read from `<artifacts-dir>/<Name>.json`
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// The name of the contract
    pub contract_name: String,
    /// The contract ABI
    pub abi: Abi,
    /// The hex-encoded creation bytecode, `0x`-prefixed, with unresolved
    /// placeholders at every link reference
    pub bytecode: String,
    /// The library placeholders in the bytecode, keyed by source file and
    /// library name
    #[serde(default)]
    pub link_references: BTreeMap<String, BTreeMap<String, Vec<LinkReference>>>,
    /// The flattened source, submitted for explorer verification
    #[serde(default)]
    pub source: Option<String>,
    /// The solc version the artifact was built with, e.g.
    /// `v0.8.9+commit.e5eed63a`
    #[serde(default)]
    pub compiler_version: Option<String>,
}

/// Splice the given library addresses into an artifact's creation bytecode.
///
/// Every library the artifact references must be supplied; each placeholder
/// is overwritten in place at the byte offsets the compiler recorded.
pub fn link_bytecode(
    artifact: &Artifact,
    libraries: &[(LineContract, Address)],
) -> Result<Bytes, ScriptError> {
    let mut body = artifact
        .bytecode
        .strip_prefix("0x")
        .unwrap_or(&artifact.bytecode)
        .to_string();

    for libs in artifact.link_references.values() {
        for (name, refs) in libs {
            let (_, address) = libraries
                .iter()
                .find(|(lib, _)| lib.to_string() == *name)
                .ok_or_else(|| {
                    ScriptError::LibraryLinking(format!(
                        "no address supplied for library {name}"
                    ))
                })?;
            let addr_hex = hex::encode(address.as_bytes());

            for link in refs {
                if link.length != NUM_BYTES_ADDRESS {
                    return Err(ScriptError::LibraryLinking(format!(
                        "placeholder for {name} has length {}",
                        link.length
                    )));
                }

                let start = link.start * 2;
                let end = start + link.length * 2;
                if end > body.len() {
                    return Err(ScriptError::LibraryLinking(format!(
                        "link reference for {name} lies outside the bytecode"
                    )));
                }
                body.replace_range(start..end, &addr_hex);
            }
        }
    }

    let code = hex::decode(&body).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    Ok(code.into())
}

/// Deploys contracts from their artifacts and records the resulting
/// addresses.
///
/// This is the sole boundary to the chain for contract creation: a deploy
/// whose contract already appears in the deployments record reuses the
/// recorded address instead of broadcasting anything.
pub struct Deployer<M> {
    /// The RPC client the deployment transactions are sent through
    client: Arc<M>,
    /// The directory holding the compilation artifacts
    artifacts_dir: PathBuf,
    /// The path of the deployments record
    deployments_path: String,
    /// The address the deployment transactions are sent from
    sender: Address,
}

impl<M: Middleware + 'static> Deployer<M> {
    /// Create a deployer sending from the client's attached signer
    pub fn new(
        client: Arc<M>,
        artifacts_dir: impl Into<PathBuf>,
        deployments_path: String,
    ) -> Result<Self, ScriptError> {
        let sender = client.default_sender().ok_or_else(|| {
            ScriptError::ClientInitialization("client does not have a sender attached".to_string())
        })?;

        Ok(Self {
            client,
            artifacts_dir: artifacts_dir.into(),
            deployments_path,
            sender,
        })
    }

    /// The client the deployer sends through
    pub fn client(&self) -> Arc<M> {
        self.client.clone()
    }

    /// The deployer's sending address
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Read a contract's compilation artifact from the artifacts directory
    pub fn load_artifact(&self, contract: LineContract) -> Result<Artifact, ScriptError> {
        let path = self.artifacts_dir.join(format!("{contract}.json"));
        let raw = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {e}", path.display())))?;

        serde_json::from_str(&raw).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    /// Deploy a contract with the given constructor arguments and linked
    /// libraries, or reuse its address from a prior run.
    ///
    /// Library addresses must come from deployments that have already
    /// resolved.
    pub async fn deploy(
        &self,
        contract: LineContract,
        args: Vec<Token>,
        libraries: &[(LineContract, Address)],
    ) -> Result<Deployment, ScriptError> {
        if let Some(address) = read_deployed_address(&self.deployments_path, contract)? {
            info!("{contract} already deployed at {address:#x}, reusing");
            return Ok(Deployment {
                address,
                newly_deployed: false,
            });
        }

        let artifact = self.load_artifact(contract)?;
        let bytecode = link_bytecode(&artifact, libraries)?;

        let factory = ContractFactory::new(artifact.abi, bytecode, self.client.clone());
        let deployed = factory
            .deploy_tokens(args)
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
            .confirmations(NUM_DEPLOY_CONFIRMATIONS)
            .send()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        let address = deployed.address();
        info!("{contract} deployed at {address:#x}");
        write_deployed_address(&self.deployments_path, contract, address)?;

        Ok(Deployment {
            address,
            newly_deployed: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An artifact whose bytecode holds one `CreditLib` placeholder at byte
    /// offset 2
    fn linked_artifact() -> Artifact {
        let placeholder = "__$290f287d00c1c41b85a5dcbbcedd4e2be6$__";
        let raw = format!(
            r#"{{
                "contractName": "Escrow",
                "abi": [],
                "bytecode": "0x6080{placeholder}6080",
                "linkReferences": {{
                    "contracts/Escrow.sol": {{
                        "CreditLib": [{{ "start": 2, "length": 20 }}]
                    }}
                }}
            }}"#
        );

        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn linking_splices_the_library_address() {
        let artifact = linked_artifact();
        let address = Address::repeat_byte(0x42);

        let linked = link_bytecode(&artifact, &[(LineContract::CreditLib, address)]).unwrap();

        assert_eq!(linked.len(), 24);
        assert_eq!(&linked[..2], &[0x60, 0x80]);
        assert_eq!(&linked[2..22], address.as_bytes());
        assert_eq!(&linked[22..], &[0x60, 0x80]);
    }

    #[test]
    fn linking_fails_without_the_library_address() {
        let artifact = linked_artifact();

        let err = link_bytecode(&artifact, &[]).unwrap_err();
        assert!(matches!(err, ScriptError::LibraryLinking(_)));
    }

    /// Bytecode without link references passes through untouched
    #[test]
    fn unlinked_bytecode_is_decoded_directly() {
        let raw = r#"{
            "contractName": "RevenueToken",
            "abi": [],
            "bytecode": "0x60806040"
        }"#;
        let artifact: Artifact = serde_json::from_str(raw).unwrap();

        let code = link_bytecode(&artifact, &[]).unwrap();
        assert_eq!(code.as_ref(), &[0x60, 0x80, 0x60, 0x40]);
    }
}
