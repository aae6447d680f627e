//! Definitions of the networks the scripts deploy against

use std::{
    env,
    fmt::{self, Display},
};

use clap::ValueEnum;
use ethers::types::Chain;

use crate::{
    constants::{
        GOERLI_MNEMONIC_ENV_VAR, GOERLI_RPC_ENV_VAR, MAINNET_MNEMONIC_ENV_VAR,
        MAINNET_RPC_ENV_VAR,
    },
    errors::ScriptError,
};

/// The named environments the scripts can target
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Network {
    /// The production chain
    Mainnet,
    /// The test chain
    Goerli,
}

impl Network {
    /// The environment variable holding the network's RPC URL
    pub fn rpc_url_env_var(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_RPC_ENV_VAR,
            Network::Goerli => GOERLI_RPC_ENV_VAR,
        }
    }

    /// The environment variable holding the deployer mnemonic for the network
    pub fn mnemonic_env_var(self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_MNEMONIC_ENV_VAR,
            Network::Goerli => GOERLI_MNEMONIC_ENV_VAR,
        }
    }

    /// The chain identity used by the block explorer client
    pub fn chain(self) -> Chain {
        match self {
            Network::Mainnet => Chain::Mainnet,
            Network::Goerli => Chain::Goerli,
        }
    }

    /// The default deployments record for the network.
    ///
    /// Each network keeps its own record so mainnet and testnet runs never
    /// reuse one another's addresses.
    pub fn default_deployments_path(self) -> String {
        format!("deployments/{self}.json")
    }

    /// Read the network's RPC URL from the environment
    pub fn rpc_url(self) -> Result<String, ScriptError> {
        let var = self.rpc_url_env_var();
        env::var(var).map_err(|_| ScriptError::NetworkConfiguration(format!("{var} is not set")))
    }

    /// Read the deployer mnemonic from the environment
    pub fn mnemonic(self) -> Result<String, ScriptError> {
        let var = self.mnemonic_env_var();
        env::var(var).map_err(|_| ScriptError::NetworkConfiguration(format!("{var} is not set")))
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Goerli => write!(f, "goerli"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Per-network deployments records must never collide
    #[test]
    fn deployments_paths_are_distinct() {
        assert_ne!(
            Network::Mainnet.default_deployments_path(),
            Network::Goerli.default_deployments_path(),
        );
    }

    /// Secrets are sourced from per-network environment variables
    #[test]
    fn env_vars_are_per_network() {
        assert_eq!(Network::Mainnet.rpc_url_env_var(), "MAINNET_ETH_RPC");
        assert_eq!(Network::Mainnet.mnemonic_env_var(), "MAINNET_ETH_MNEMONIC");
        assert_eq!(Network::Goerli.rpc_url_env_var(), "GOERLI_ETH_RPC");
        assert_eq!(Network::Goerli.mnemonic_env_var(), "GOERLI_ETH_MNEMONIC");
    }
}
