//! Constants used in the deploy scripts

/// The deployments key in the deployments record file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The revenue token contract key in the deployments record
pub const REVENUE_TOKEN_CONTRACT_KEY: &str = "revenue_token_contract";

/// The oracle contract key in the deployments record
pub const ORACLE_CONTRACT_KEY: &str = "oracle_contract";

/// The loan library contract key in the deployments record
pub const LOAN_LIB_CONTRACT_KEY: &str = "loan_lib_contract";

/// The credit library contract key in the deployments record
pub const CREDIT_LIB_CONTRACT_KEY: &str = "credit_lib_contract";

/// The credit list library contract key in the deployments record
pub const CREDIT_LIST_LIB_CONTRACT_KEY: &str = "credit_list_lib_contract";

/// The spigoted loan library contract key in the deployments record
pub const SPIGOTED_LOAN_LIB_CONTRACT_KEY: &str = "spigoted_loan_lib_contract";

/// The spigot contract key in the deployments record
pub const SPIGOT_CONTRACT_KEY: &str = "spigot_contract";

/// The escrow contract key in the deployments record
pub const ESCROW_CONTRACT_KEY: &str = "escrow_contract";

/// The secured loan contract key in the deployments record
pub const SECURED_LOAN_CONTRACT_KEY: &str = "secured_loan_contract";

/// The credit token contract key in the deployments record
pub const CREDIT_TOKEN_CONTRACT_KEY: &str = "credit_token_contract";

/// The debt token contract key in the deployments record
pub const DEBT_TOKEN_CONTRACT_KEY: &str = "debt_token_contract";

/// The partner vesting contract key in the deployments record
pub const PARTNER_VESTING_CONTRACT_KEY: &str = "partner_vesting_contract";

/// The treasury vesting contract key in the deployments record
pub const TREASURY_VESTING_CONTRACT_KEY: &str = "treasury_vesting_contract";

/// The team vesting contract key in the deployments record
pub const TEAM_VESTING_CONTRACT_KEY: &str = "team_vesting_contract";

/// The number of confirmations to wait for a contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: usize = 1;

/// The number of bytes in an Ethereum address
pub const NUM_BYTES_ADDRESS: usize = 20;

/// The number of seconds in a day
pub const SECONDS_PER_DAY: u64 = 60 * 60 * 24;

/// The time-to-live of the test line, in seconds
pub const LINE_TTL_SECS: u64 = SECONDS_PER_DAY * 3;

/// The revenue split granted to the line by default
pub const DEFAULT_REVENUE_SPLIT: u64 = 0;

/// The minimum collateral ratio the escrow enforces on the test network
pub const MIN_COLLATERAL_RATIO: u64 = 0;

/// The amount of revenue tokens minted to the deployer on a fresh deploy
pub const MINT_AMOUNT: u64 = 5;

/// The allowance, in wei, pre-approved for the line to pull from the deployer
pub const APPROVE_AMOUNT_WEI: u64 = 100;

/// The collateral deposited into the escrow during initialization
pub const COLLATERAL_DEPOSIT: u64 = 1;

/// The interest rate charged on drawn balances, in basis points (10%)
pub const DRAWN_RATE_BPS: u64 = 1000;

/// The facility fee charged on undrawn balances, in basis points (5%)
pub const FACILITY_RATE_BPS: u64 = 500;

/// The deposit backing each opened credit position
pub const CREDIT_DEPOSIT: u64 = 10;

/// The amount drawn against the opened position
pub const BORROW_AMOUNT: u64 = 5;

/// The initial credit token supply (a 10 million dollar global credit limit)
pub const INITIAL_CREDIT_SUPPLY: u64 = 10_u64.pow(7);

/// The initial debt token supply (10 billion)
pub const INITIAL_DEBT_SUPPLY: u64 = 10_u64.pow(11);

/// The denominator of the basis-point allocations
pub const BPS_DENOMINATOR: u64 = 10_000;

/// The partner treasury's share of the initial debt supply,
/// approved in the partnership agreement (3.3%)
pub const PARTNER_ALLOCATION_BPS: u64 = 330;

/// The project treasury's share of the initial debt supply:
/// 36.7% community treasury + 15% partnerships + 10% strategic raise
pub const TREASURY_ALLOCATION_BPS: u64 = 6_170;

/// The team's share of the initial debt supply (20%)
pub const TEAM_ALLOCATION_BPS: u64 = 2_000;

/// The share of the initial debt supply released immediately for
/// the public launch (15%)
pub const LAUNCH_ALLOCATION_BPS: u64 = 1_500;

/// The number of seconds in a vesting year (364.25 days)
pub const SECONDS_PER_YEAR: u64 = 31_471_200;

/// The duration of the partner vesting schedule (1.5 years)
pub const PARTNER_VESTING_DURATION_SECS: u64 = SECONDS_PER_YEAR + SECONDS_PER_YEAR / 2;

/// The duration of the treasury vesting schedule (3 years)
pub const TREASURY_VESTING_DURATION_SECS: u64 = SECONDS_PER_YEAR * 3;

/// The cliff of the team vesting schedule (1 year)
pub const TEAM_VESTING_CLIFF_SECS: u64 = SECONDS_PER_YEAR;

/// The duration of the team vesting schedule (4 years)
pub const TEAM_VESTING_DURATION_SECS: u64 = SECONDS_PER_YEAR * 4;

/// The team multisig, default minter and owner of the credit token
pub const DEFAULT_TEAM_MULTISIG: &str = "0xA097856Ef35D368184DE4c3771E7F363B5Cb01E5";

/// The environment variable holding the mainnet RPC URL
pub const MAINNET_RPC_ENV_VAR: &str = "MAINNET_ETH_RPC";

/// The environment variable holding the mainnet deployer mnemonic
pub const MAINNET_MNEMONIC_ENV_VAR: &str = "MAINNET_ETH_MNEMONIC";

/// The environment variable holding the goerli RPC URL
pub const GOERLI_RPC_ENV_VAR: &str = "GOERLI_ETH_RPC";

/// The environment variable holding the goerli deployer mnemonic
pub const GOERLI_MNEMONIC_ENV_VAR: &str = "GOERLI_ETH_MNEMONIC";
