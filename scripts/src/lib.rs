//! Scripts for deploying and initializing the line-of-credit smart contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
mod commands;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod network;
mod solidity;
pub mod types;
pub mod utils;
pub mod verify;
