//! Utilities for the deploy scripts.

use std::{
    fs::{self, File},
    io::Read,
    path::Path,
    str::FromStr,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use ethers::{
    middleware::{NonceManagerMiddleware, SignerMiddleware},
    providers::{Http, Middleware, Provider},
    signers::{coins_bip39::English, MnemonicBuilder, Signer},
    types::Address,
};
use json::JsonValue;

use crate::{
    constants::{
        CREDIT_LIB_CONTRACT_KEY, CREDIT_LIST_LIB_CONTRACT_KEY, CREDIT_TOKEN_CONTRACT_KEY,
        DEBT_TOKEN_CONTRACT_KEY, DEPLOYMENTS_KEY, ESCROW_CONTRACT_KEY, LOAN_LIB_CONTRACT_KEY,
        ORACLE_CONTRACT_KEY, PARTNER_VESTING_CONTRACT_KEY, REVENUE_TOKEN_CONTRACT_KEY,
        SECURED_LOAN_CONTRACT_KEY, SPIGOTED_LOAN_LIB_CONTRACT_KEY, SPIGOT_CONTRACT_KEY,
        TEAM_VESTING_CONTRACT_KEY, TREASURY_VESTING_CONTRACT_KEY,
    },
    errors::ScriptError,
    network::Network,
    types::LineContract,
};

/// Sets up the client used to deploy and drive the contracts, reading the
/// RPC URL and deployer mnemonic from the target network's environment
/// variables.
///
/// The signer is wrapped in a nonce manager so that batches of concurrent
/// transactions from the deployer don't collide on nonce assignment.
pub async fn setup_client(network: Network) -> Result<Arc<impl Middleware>, ScriptError> {
    let rpc_url = network.rpc_url()?;
    let mnemonic = network.mnemonic()?;

    let provider = Provider::<Http>::try_from(rpc_url)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let wallet = MnemonicBuilder::<English>::default()
        .phrase(mnemonic.as_str())
        .build()
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let chain_id = provider
        .get_chainid()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .as_u64();

    let wallet = wallet.with_chain_id(chain_id);
    let sender = wallet.address();
    let client = Arc::new(NonceManagerMiddleware::new(
        SignerMiddleware::new(provider, wallet),
        sender,
    ));

    Ok(client)
}

/// The deployments-record key under which the given contract's address
/// is written
pub fn contract_key(contract: LineContract) -> &'static str {
    match contract {
        LineContract::RevenueToken => REVENUE_TOKEN_CONTRACT_KEY,
        LineContract::SimpleOracle => ORACLE_CONTRACT_KEY,
        LineContract::LoanLib => LOAN_LIB_CONTRACT_KEY,
        LineContract::CreditLib => CREDIT_LIB_CONTRACT_KEY,
        LineContract::CreditListLib => CREDIT_LIST_LIB_CONTRACT_KEY,
        LineContract::SpigotedLoanLib => SPIGOTED_LOAN_LIB_CONTRACT_KEY,
        LineContract::Spigot => SPIGOT_CONTRACT_KEY,
        LineContract::Escrow => ESCROW_CONTRACT_KEY,
        LineContract::SecuredLoan => SECURED_LOAN_CONTRACT_KEY,
        LineContract::CreditToken => CREDIT_TOKEN_CONTRACT_KEY,
        LineContract::DebtToken => DEBT_TOKEN_CONTRACT_KEY,
        LineContract::PartnerVesting => PARTNER_VESTING_CONTRACT_KEY,
        LineContract::TreasuryVesting => TREASURY_VESTING_CONTRACT_KEY,
        LineContract::TeamVesting => TEAM_VESTING_CONTRACT_KEY,
    }
}

/// Parse the deployments record at the given path
fn get_json_from_file(file_path: &str) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Look up a contract's address in the deployments record.
///
/// Returns `None` when either the record or the contract's entry doesn't
/// exist yet, in which case the contract should be deployed fresh.
pub fn read_deployed_address(
    file_path: &str,
    contract: LineContract,
) -> Result<Option<Address>, ScriptError> {
    if !Path::new(file_path).exists() {
        return Ok(None);
    }

    let parsed_json = get_json_from_file(file_path)?;
    match parsed_json[DEPLOYMENTS_KEY][contract_key(contract)].as_str() {
        Some(addr) => Address::from_str(addr)
            .map(Some)
            .map_err(|e| ScriptError::ReadDeployments(e.to_string())),
        None => Ok(None),
    }
}

/// Record a contract's address in the deployments record, creating the
/// record (and its parent directory) if this is the first deployment
pub fn write_deployed_address(
    file_path: &str,
    contract: LineContract,
    address: Address,
) -> Result<(), ScriptError> {
    let path = Path::new(file_path);
    if !path.exists() {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
            }
        }
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }

    let mut parsed_json = get_json_from_file(file_path)?;
    parsed_json[DEPLOYMENTS_KEY][contract_key(contract)] =
        JsonValue::String(format!("{address:#x}"));

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    Ok(())
}

/// Parse a hex Ethereum address given on the command line
pub fn parse_address(addr: &str) -> Result<Address, ScriptError> {
    Address::from_str(addr)
        .map_err(|e| ScriptError::CalldataConstruction(format!("{addr}: {e}")))
}

/// Seconds since the Unix epoch, used as the vesting start time
pub fn unix_timestamp_secs() -> Result<u64, ScriptError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// Every deployable contract, used to exercise the key mapping
    const ALL_CONTRACTS: [LineContract; 14] = [
        LineContract::RevenueToken,
        LineContract::SimpleOracle,
        LineContract::LoanLib,
        LineContract::CreditLib,
        LineContract::CreditListLib,
        LineContract::SpigotedLoanLib,
        LineContract::Spigot,
        LineContract::Escrow,
        LineContract::SecuredLoan,
        LineContract::CreditToken,
        LineContract::DebtToken,
        LineContract::PartnerVesting,
        LineContract::TreasuryVesting,
        LineContract::TeamVesting,
    ];

    /// Each deployable instance gets its own record entry, including the
    /// three deployments of the shared `TokenVesting` artifact
    #[test]
    fn contract_keys_are_unique() {
        let keys: HashSet<&'static str> = ALL_CONTRACTS.iter().map(|c| contract_key(*c)).collect();
        assert_eq!(keys.len(), ALL_CONTRACTS.len());
    }

    /// A written address is read back; an unwritten contract reads as a
    /// cache miss
    #[test]
    fn deployments_record_round_trip() {
        let path = std::env::temp_dir().join(format!("deployments-{}.json", std::process::id()));
        let path = path.to_str().unwrap().to_string();
        let _ = fs::remove_file(&path);

        assert!(read_deployed_address(&path, LineContract::Spigot)
            .unwrap()
            .is_none());

        let address = Address::repeat_byte(0xab);
        write_deployed_address(&path, LineContract::Spigot, address).unwrap();

        assert_eq!(
            read_deployed_address(&path, LineContract::Spigot).unwrap(),
            Some(address)
        );
        assert!(read_deployed_address(&path, LineContract::Escrow)
            .unwrap()
            .is_none());

        fs::remove_file(&path).unwrap();
    }
}
