//! Definitions of CLI arguments and commands for the deploy scripts

use clap::{Args, Parser, Subcommand};
use ethers::providers::Middleware;

use crate::{
    commands::{deploy_testnet_line, launch_tokens},
    constants::DEFAULT_TEAM_MULTISIG,
    deployer::Deployer,
    errors::ScriptError,
    network::Network,
};

/// Deploy and initialize the line-of-credit contracts
#[derive(Parser)]
pub struct Cli {
    /// The network to deploy against
    #[arg(short, long, value_enum, default_value_t = Network::Goerli)]
    pub network: Network,

    /// The directory holding the contracts' compilation artifacts
    #[arg(short, long, default_value = "artifacts")]
    pub artifacts_dir: String,

    /// Path of the deployments record; defaults to the per-network file
    #[arg(short, long)]
    pub deployments_path: Option<String>,

    /// The Etherscan API key, used for source verification
    #[arg(long, env = "ETHERSCAN_API_KEY")]
    pub etherscan_api_key: Option<String>,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Bootstrap a fully wired lending system on a test network and open a
    /// live credit line against it
    DeployTestnet(DeployTestnetArgs),
    /// Launch the credit & debt tokens, start vesting, and verify the
    /// deployed sources
    LaunchTokens(LaunchTokensArgs),
}

impl Command {
    /// Run the selected script
    pub async fn run<M: Middleware + 'static>(
        self,
        deployer: Deployer<M>,
        network: Network,
        etherscan_api_key: Option<String>,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployTestnet(args) => deploy_testnet_line(args, &deployer).await,
            Command::LaunchTokens(args) => {
                launch_tokens(args, &deployer, network, etherscan_api_key).await
            }
        }
    }
}

/// Deploy the revenue token, oracle, libraries, Spigot, Escrow and
/// SecuredLoan; wire their ownership; open two credit positions and draw
/// against the second.
#[derive(Args)]
pub struct DeployTestnetArgs {
    /// The arbiter of the line; defaults to the deployer
    #[arg(long)]
    pub arbiter: Option<String>,

    /// The borrower of the line; defaults to the deployer
    #[arg(long)]
    pub borrower: Option<String>,
}

/// Deploy the credit & debt tokens, assign roles, distribute the initial
/// debt supply into vesting contracts, and hand ownership to the treasury.
#[derive(Args)]
pub struct LaunchTokensArgs {
    /// The treasury receiving the launch allocation and, finally, ownership
    /// of the debt token
    #[arg(long)]
    pub debt_treasury: String,

    /// The partner treasury receiving the partnership vesting grant
    #[arg(long)]
    pub partner_treasury: String,

    /// The team multisig; becomes minter and owner of the credit token
    #[arg(long, default_value = DEFAULT_TEAM_MULTISIG)]
    pub team_multisig: String,

    /// Skip explorer verification, for chains without one
    #[arg(long)]
    pub skip_verification: bool,
}
