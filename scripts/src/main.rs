//! Entrypoint of the deploy scripts

use clap::Parser;
use scripts::{cli::Cli, deployer::Deployer, errors::ScriptError, utils::setup_client};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        network,
        artifacts_dir,
        deployments_path,
        etherscan_api_key,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let client = setup_client(network).await?;
    let deployments_path =
        deployments_path.unwrap_or_else(|| network.default_deployments_path());
    let deployer = Deployer::new(client, artifacts_dir, deployments_path)?;

    command.run(deployer, network, etherscan_api_key).await
}
